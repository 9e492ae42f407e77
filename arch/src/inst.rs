use crate::{sig::Signature, ty::Ty};

use color_print::cformat;
use std::fmt;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
}

/// Branch conditions (`ifeq`, `if_icmplt`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Cond {
    Eq,
    Ne,
    Lt,
    Ge,
    Gt,
    Le,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inst {
    Load(Ty, u16),
    Store(Ty, u16),
    Ldc(String),
    Ldc2W(String),

    Arith(Ty, ArithOp),
    Cast(Ty, Ty),
    DCmpL,
    DCmpG,

    If(Cond, String),
    IfICmp(Cond, String),
    Goto(String),
    Label(String),

    Pop(Ty),
    Return(Ty),
    GetStatic(String, String),
    InvokeStatic(Signature),
    InvokeVirtual(Signature),
}

impl Inst {
    /// Operand-stack cells (popped, pushed) by this instruction
    pub fn stack_effect(&self) -> (usize, usize) {
        match self {
            Inst::Load(ty, _) => (0, ty.cells()),
            Inst::Store(ty, _) => (ty.cells(), 0),
            Inst::Ldc(_) => (0, 1),
            Inst::Ldc2W(_) => (0, 2),
            Inst::Arith(ty, _) => (ty.cells() * 2, ty.cells()),
            Inst::Cast(from, to) => (from.cells(), to.cells()),
            Inst::DCmpL | Inst::DCmpG => (4, 1),
            Inst::If(_, _) => (1, 0),
            Inst::IfICmp(_, _) => (2, 0),
            Inst::Goto(_) | Inst::Label(_) => (0, 0),
            Inst::Pop(ty) => (ty.cells(), 0),
            Inst::Return(ty) => (ty.cells(), 0),
            Inst::GetStatic(_, _) => (0, 1),
            Inst::InvokeStatic(sig) => (sig.arg_cells(), sig.ret.cells()),
            Inst::InvokeVirtual(sig) => (sig.arg_cells() + 1, sig.ret.cells()),
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Inst::Label(_))
    }

    fn parts(&self) -> (String, String) {
        match self {
            Inst::Load(ty, idx) => (format!("{}load", ty.prefix()), idx.to_string()),
            Inst::Store(ty, idx) => (format!("{}store", ty.prefix()), idx.to_string()),
            Inst::Ldc(value) => ("ldc".to_string(), value.clone()),
            Inst::Ldc2W(value) => ("ldc2_w".to_string(), value.clone()),
            Inst::Arith(ty, op) => (format!("{}{}", ty.prefix(), op), String::new()),
            Inst::Cast(from, to) => (format!("{}2{}", from.prefix(), to.prefix()), String::new()),
            Inst::DCmpL => ("dcmpl".to_string(), String::new()),
            Inst::DCmpG => ("dcmpg".to_string(), String::new()),
            Inst::If(cond, label) => (format!("if{}", cond), label.clone()),
            Inst::IfICmp(cond, label) => (format!("if_icmp{}", cond), label.clone()),
            Inst::Goto(label) => ("goto".to_string(), label.clone()),
            Inst::Label(label) => (format!("{}:", label), String::new()),
            Inst::Pop(Ty::Double) => ("pop2".to_string(), String::new()),
            Inst::Pop(_) => ("pop".to_string(), String::new()),
            Inst::Return(ty) => (format!("{}return", ty.prefix()), String::new()),
            Inst::GetStatic(field, desc) => ("getstatic".to_string(), format!("{} {}", field, desc)),
            Inst::InvokeStatic(sig) => ("invokestatic".to_string(), sig.to_string()),
            Inst::InvokeVirtual(sig) => ("invokevirtual".to_string(), sig.to_string()),
        }
    }

    pub fn cformat(&self) -> String {
        let (name, operand) = self.parts();
        match self {
            Inst::Label(_) => cformat!("<g>{}</>", name),
            _ => cformat!("<r>{:<22}</><b>{}</>", name, operand),
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, operand) = self.parts();
        if operand.is_empty() {
            write!(f, "{}", name)
        } else {
            write!(f, "{:<22}{}", name, operand)
        }
    }
}
