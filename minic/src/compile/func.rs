use crate::compile::{global::Global, local::Local};
use crate::config::Config;
use crate::error::Error;
use crate::grammer::ast::{BinaryOp, Call, Command, CondBlock, Conditional, Expr, Literal, Method};
use arch::{ArithOp, Cond, Inst, Signature, Ty};
use itertools::chain;
use log::{debug, trace};
use std::iter;

/// Instructions and limits of one compiled method
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCode {
    pub sig: Signature,
    pub insts: Vec<Inst>,
    pub max_stack: usize,
    pub max_locals: usize,
}

impl MethodCode {
    pub fn calls(&self, name: &str) -> bool {
        self.insts
            .iter()
            .any(|inst| matches!(inst, Inst::InvokeStatic(sig) if sig.name == name))
    }
}

pub fn method2code<'a>(
    global: &'a Global,
    method: &'a Method,
    config: &Config,
) -> Result<MethodCode, Error> {
    let compiler = FuncCompiler::new(global, method, config)?;
    compiler.compile()
}

struct FuncCompiler<'a> {
    global: &'a Global,
    method: &'a Method,
    sig: Signature,
    local: Local<'a>,
    insts: Vec<Inst>,
}

impl<'a> FuncCompiler<'a> {
    fn new(global: &'a Global, method: &'a Method, config: &Config) -> Result<Self, Error> {
        let sig = global.signature(&method.name)?.clone();
        let mut local = Local::fork(config.max_slots, config.temp_pad);
        if sig.is_entry() {
            local.reserve(1)?;
        }
        for (ty, name) in &method.params {
            local.declare(name, *ty)?;
        }
        Ok(Self {
            global,
            method,
            sig,
            local,
            insts: Vec::new(),
        })
    }

    fn compile(mut self) -> Result<MethodCode, Error> {
        for command in &self.method.body {
            self.compile_command(command)?;
        }

        if !always_returns(&self.method.body) {
            if self.method.ret.is_value() {
                return Err(Error::MissingReturn(self.method.name.clone()));
            }
            self.emit(Inst::Return(Ty::Void));
        }

        for (name, (ty, slot)) in self.local.vars() {
            trace!("{}: {} {} in slot {}", self.method.name, ty, name, slot);
        }
        debug!(
            "{}: .limit stack {} .limit locals {}",
            self.sig,
            self.local.max_stack(),
            self.local.max_locals()
        );

        Ok(MethodCode {
            max_stack: self.local.max_stack(),
            max_locals: self.local.max_locals(),
            sig: self.sig,
            insts: self.insts,
        })
    }

    fn emit(&mut self, inst: Inst) {
        self.local.track(&inst);
        self.insts.push(inst);
    }
}

// ----------------------------------------------------------------------------
// Commands
// ----------------------------------------------------------------------------

impl<'a> FuncCompiler<'a> {
    fn compile_command(&mut self, command: &'a Command) -> Result<(), Error> {
        match command {
            Command::Declare(ty, name) => {
                self.local.declare(name, *ty)?;
            }

            Command::Assign(name, value) => {
                let (ty, slot) = self.local.lookup(name)?;
                let value_ty = self.compile_expr(value)?;
                self.coerce(value_ty, ty, || format!("Value assigned to `{}`", name))?;
                self.emit(Inst::Store(ty, slot));
            }

            Command::Return(None) => {
                if self.method.ret.is_value() {
                    return Err(Error::MissingReturnValue(self.method.name.clone()));
                }
                self.emit(Inst::Return(Ty::Void));
            }

            Command::Return(Some(value)) => {
                if !self.method.ret.is_value() {
                    return Err(Error::ReturnValueFromVoid(self.method.name.clone()));
                }
                let value_ty = self.compile_expr(value)?;
                self.coerce(value_ty, self.method.ret, || "Returned expression".to_string())?;
                self.emit(Inst::Return(self.method.ret));
            }

            Command::Print(value) => {
                self.emit(Inst::GetStatic(
                    "java/lang/System/out".to_string(),
                    "Ljava/io/PrintStream;".to_string(),
                ));
                let ty = self.compile_value(value, || "Printed expression".to_string())?;
                self.emit(Inst::InvokeVirtual(Global::println(ty)));
            }

            Command::Call(call) => {
                let ty = self.compile_call(call)?;
                if ty.is_value() {
                    self.emit(Inst::Pop(ty));
                }
            }

            Command::Cond(cond) => self.compile_conditional(cond)?,
        }
        Ok(())
    }

    /// if/elseif blocks fall through to the next test on a zero condition
    fn compile_conditional(&mut self, cond: &'a Conditional) -> Result<(), Error> {
        let end = self.local.label();
        for CondBlock(test, body) in chain!(iter::once(&cond.if_block), &cond.elseif_blocks) {
            let next = self.local.label();
            self.compile_condition(test)?;
            self.emit(Inst::If(Cond::Eq, next.clone()));
            for command in body {
                self.compile_command(command)?;
            }
            if !always_returns(body) {
                self.emit(Inst::Goto(end.clone()));
            }
            self.emit(Inst::Label(next));
        }
        for command in cond.else_block.iter().flatten() {
            self.compile_command(command)?;
        }
        self.emit(Inst::Label(end));
        Ok(())
    }

    /// Leave an int on the stack that is zero exactly when the condition is false
    fn compile_condition(&mut self, test: &'a Expr) -> Result<(), Error> {
        if self.compile_value(test, || "Condition".to_string())? == Ty::Double {
            self.emit(Inst::Ldc2W("0.0".to_string()));
            self.emit(Inst::DCmpL);
        }
        Ok(())
    }
}

/// A body ends in `return`, or in an if/else chain whose every branch does
fn always_returns(body: &[Command]) -> bool {
    match body.last() {
        Some(Command::Return(_)) => true,
        Some(Command::Cond(cond)) => match &cond.else_block {
            Some(else_block) => {
                always_returns(else_block)
                    && chain!(iter::once(&cond.if_block), &cond.elseif_blocks)
                        .all(|CondBlock(_, body)| always_returns(body))
            }
            None => false,
        },
        _ => false,
    }
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl<'a> FuncCompiler<'a> {
    fn compile_expr(&mut self, expr: &'a Expr) -> Result<Ty, Error> {
        match expr {
            Expr::Literal(Literal::Int(text)) => {
                self.emit(Inst::Ldc(text.clone()));
                Ok(Ty::Int)
            }

            Expr::Literal(Literal::Double(text)) => {
                self.emit(Inst::Ldc2W(text.clone()));
                Ok(Ty::Double)
            }

            Expr::Var(name) => {
                let (ty, slot) = self.local.lookup(name)?;
                self.emit(Inst::Load(ty, slot));
                Ok(ty)
            }

            Expr::Call(call) => self.compile_call(call),

            // Multiply by a typed -1
            Expr::Neg(operand) => {
                let ty = self.compile_value(operand, || "Operand of `-`".to_string())?;
                self.push_const(ty, -1);
                self.emit(Inst::Arith(ty, ArithOp::Mul));
                Ok(ty)
            }

            Expr::Not(operand) => {
                let ty = self.compile_value(operand, || "Operand of `!`".to_string())?;
                if ty != Ty::Int {
                    return Err(Error::NonIntegerOperand("!".to_string()));
                }
                self.materialize(|label| Inst::If(Cond::Eq, label));
                Ok(Ty::Int)
            }

            Expr::Binary(op, lhs, rhs) => self.compile_binary(*op, lhs, rhs),
        }
    }

    fn compile_binary(&mut self, op: BinaryOp, lhs: &'a Expr, rhs: &'a Expr) -> Result<Ty, Error> {
        let operand = || format!("Operand of `{}`", op.symbol());
        let lhs_ty = self.compile_value(lhs, operand)?;
        let rhs_ty = self.compile_value(rhs, operand)?;

        match op {
            BinaryOp::And | BinaryOp::Or => {
                if lhs_ty != Ty::Int || rhs_ty != Ty::Int {
                    return Err(Error::NonIntegerOperand(op.symbol().to_string()));
                }
                let arith = if op == BinaryOp::And { ArithOp::And } else { ArithOp::Or };
                self.emit(Inst::Arith(Ty::Int, arith));
                Ok(Ty::Int)
            }

            BinaryOp::Eq | BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Lt | BinaryOp::Le => {
                let cond = match op {
                    BinaryOp::Eq => Cond::Eq,
                    BinaryOp::Gt => Cond::Gt,
                    BinaryOp::Ge => Cond::Ge,
                    BinaryOp::Lt => Cond::Lt,
                    _ => Cond::Le,
                };
                match self.reconcile(lhs_ty, rhs_ty)? {
                    // NaN compares as 1 under dcmpg, so `<` and `<=` come out false
                    Ty::Double if matches!(cond, Cond::Lt | Cond::Le) => {
                        self.emit(Inst::DCmpG);
                        self.materialize(|label| Inst::If(cond, label));
                    }
                    Ty::Double => {
                        self.emit(Inst::DCmpL);
                        self.materialize(|label| Inst::If(cond, label));
                    }
                    _ => self.materialize(|label| Inst::IfICmp(cond, label)),
                }
                Ok(Ty::Int)
            }

            BinaryOp::Pow => {
                let ty = self.reconcile(lhs_ty, rhs_ty)?;
                let sig = match ty {
                    Ty::Double => Global::math_pow(),
                    _ => self.global.ipow(),
                };
                self.emit(Inst::InvokeStatic(sig));
                Ok(ty)
            }

            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                let arith = match op {
                    BinaryOp::Add => ArithOp::Add,
                    BinaryOp::Sub => ArithOp::Sub,
                    BinaryOp::Mul => ArithOp::Mul,
                    _ => ArithOp::Div,
                };
                let ty = self.reconcile(lhs_ty, rhs_ty)?;
                self.emit(Inst::Arith(ty, arith));
                Ok(ty)
            }
        }
    }

    fn compile_call(&mut self, call: &'a Call) -> Result<Ty, Error> {
        let Call(name, args) = call;
        let sig = self.global.callee(name)?.clone();
        if args.len() != sig.params.len() {
            return Err(Error::ArgumentCount {
                method: name.clone(),
                expected: sig.params.len(),
                found: args.len(),
            });
        }
        for (arg, param) in args.iter().zip(&sig.params) {
            let ty = self.compile_expr(arg)?;
            self.coerce(ty, *param, || format!("Argument of `{}`", name))?;
        }
        let ret = sig.ret;
        self.emit(Inst::InvokeStatic(sig));
        Ok(ret)
    }

    /// Compile an expression that must leave a value on the stack
    fn compile_value<F: Fn() -> String>(&mut self, expr: &'a Expr, what: F) -> Result<Ty, Error> {
        let ty = self.compile_expr(expr)?;
        if !ty.is_value() {
            return Err(Error::VoidValue(what()));
        }
        Ok(ty)
    }
}

// ----------------------------------------------------------------------------
// Type reconciliation
// ----------------------------------------------------------------------------

impl<'a> FuncCompiler<'a> {
    /// Bring the two topmost operands to a common type, returning it
    fn reconcile(&mut self, lhs: Ty, rhs: Ty) -> Result<Ty, Error> {
        match (lhs, rhs) {
            // Only the top of the stack can be cast, so park the double while the int widens
            (Ty::Int, Ty::Double) => {
                let temp = self.local.temp()?;
                self.emit(Inst::Store(Ty::Double, temp));
                self.emit(Inst::Cast(Ty::Int, Ty::Double));
                self.emit(Inst::Load(Ty::Double, temp));
            }
            (Ty::Double, Ty::Int) => self.emit(Inst::Cast(Ty::Int, Ty::Double)),
            _ => {}
        }
        Ok(Ty::promote(lhs, rhs))
    }

    /// Convert the value on top of the stack to a declared type
    fn coerce<F: Fn() -> String>(&mut self, from: Ty, to: Ty, what: F) -> Result<(), Error> {
        if !from.is_value() {
            return Err(Error::VoidValue(what()));
        }
        if from != to {
            self.emit(Inst::Cast(from, to));
        }
        Ok(())
    }

    fn push_const(&mut self, ty: Ty, value: i32) {
        match ty {
            Ty::Double => self.emit(Inst::Ldc2W(format!("{}.0", value))),
            _ => self.emit(Inst::Ldc(value.to_string())),
        }
    }

    /// Turn a conditional jump into an int 1 (jump taken) or 0
    fn materialize<F: FnOnce(String) -> Inst>(&mut self, jump: F) {
        let taken = self.local.label();
        let end = self.local.label();
        self.emit(jump(taken.clone()));
        let depth = self.local.depth();
        self.emit(Inst::Ldc("0".to_string()));
        self.emit(Inst::Goto(end.clone()));
        self.local.set_depth(depth);
        self.emit(Inst::Label(taken));
        self.emit(Inst::Ldc("1".to_string()));
        self.emit(Inst::Label(end));
    }
}
