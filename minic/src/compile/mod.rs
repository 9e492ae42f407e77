pub mod func;
pub mod global;
pub mod local;

use crate::config::Config;
use crate::error::Error;
use crate::grammer::ast::Program;
use arch::{ArithOp, Cond, Inst, Ty};
use func::{method2code, MethodCode};
use global::{Global, IPOW};
use local::Local;
use log::info;
use std::fmt;

const INDENT: &str = "   ";

const CONSTRUCTOR: [&str; 6] = [
    ".limit stack          1",
    ".limit locals         1",
    ".line                 1",
    "aload_0",
    "invokespecial         java/lang/Object/<init>()V",
    "return",
];

/// Complete output program: header, constructor, compiled methods and helpers
#[derive(Debug, Clone)]
pub struct Listing {
    pub source: String,
    pub class: String,
    pub methods: Vec<MethodCode>,
}

/// Compile every method. All methods are attempted; any failure discards the listing.
pub fn program2listing(program: &Program, config: &Config) -> Result<Listing, Vec<Error>> {
    let global = Global::collect(program, &config.class_name).map_err(|e| vec![e])?;

    let mut methods = Vec::new();
    let mut errors = Vec::new();
    for method in &program.0 {
        match method2code(&global, method, config) {
            Ok(code) => methods.push(code),
            Err(e) => errors.push(Error::MethodFailed {
                method: method.name.clone(),
                source: Box::new(e),
            }),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    if methods.iter().any(|code| code.calls(IPOW)) {
        methods.push(ipow_helper(&global));
    }
    info!("compiled {} method(s) into {}", methods.len(), global.owner());

    Ok(Listing {
        source: config.source_name(),
        class: config.class_name.clone(),
        methods,
    })
}

/// `$ipow(base, exp)`: repeated multiplication, 1 for a non-positive exponent
fn ipow_helper(global: &Global) -> MethodCode {
    let (top, end) = ("L0".to_string(), "L1".to_string());
    let insts = vec![
        Inst::Ldc("1".to_string()),
        Inst::Store(Ty::Int, 2),
        Inst::Label(top.clone()),
        Inst::Load(Ty::Int, 1),
        Inst::If(Cond::Le, end.clone()),
        Inst::Load(Ty::Int, 2),
        Inst::Load(Ty::Int, 0),
        Inst::Arith(Ty::Int, ArithOp::Mul),
        Inst::Store(Ty::Int, 2),
        Inst::Load(Ty::Int, 1),
        Inst::Ldc("1".to_string()),
        Inst::Arith(Ty::Int, ArithOp::Sub),
        Inst::Store(Ty::Int, 1),
        Inst::Goto(top),
        Inst::Label(end),
        Inst::Load(Ty::Int, 2),
        Inst::Return(Ty::Int),
    ];
    let mut local = Local::fork(3, 0);
    insts.iter().for_each(|inst| local.track(inst));
    MethodCode {
        sig: global.ipow(),
        insts,
        max_stack: local.max_stack(),
        max_locals: 3,
    }
}

impl Listing {
    fn render(&self, inst_text: impl Fn(&Inst) -> String) -> String {
        let mut out = String::new();
        out += &format!("{:<25}{}\n", ".source", self.source);
        out += &format!("{:<25}public {}\n", ".class", self.class);
        out += &format!("{:<25}java/lang/Object\n\n\n", ".super");

        out += &format!("{:<25}public <init>()V\n", ".method");
        for line in CONSTRUCTOR {
            out += &format!("{}{}\n", INDENT, line);
        }
        out += ".end method\n\n";

        for code in &self.methods {
            out += &format!("{:<25}public static {}\n", ".method", code.sig.declaration());
            out += &format!("{}{:<22}{}\n", INDENT, ".limit stack", code.max_stack);
            out += &format!("{}{:<22}{}\n", INDENT, ".limit locals", code.max_locals);
            for inst in &code.insts {
                if inst.is_label() {
                    out += &format!("{}\n", inst_text(inst));
                } else {
                    out += &format!("{}{}\n", INDENT, inst_text(inst));
                }
            }
            out += ".end method\n\n";
        }
        out
    }

    /// Colored listing for terminal output
    pub fn cformat(&self) -> String {
        self.render(Inst::cformat)
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(|inst| inst.to_string()))
    }
}
