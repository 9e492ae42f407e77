use crate::grammer::ast::{BinaryOp, Call, Command, Conditional, Expr, Literal, Method, Program, Stratum};
use std::fmt::{self, Write};

// ----------------------------------------------------------------------------
// Tree dump
// ----------------------------------------------------------------------------

struct Tree(String);

impl Tree {
    fn line(&mut self, depth: usize, text: impl fmt::Display) {
        let _ = writeln!(self.0, "{}{}", "| ".repeat(depth), text);
    }

    fn method(&mut self, depth: usize, method: &Method) {
        let params: Vec<String> = method.params.iter().map(|(ty, name)| format!("{} {}", ty, name)).collect();
        self.line(depth, format!("METHOD {} {} ({})", method.ret, method.name, params.join(", ")));
        self.body(depth + 1, &method.body);
    }

    fn body(&mut self, depth: usize, body: &[Command]) {
        for command in body {
            self.command(depth, command);
        }
    }

    fn command(&mut self, depth: usize, command: &Command) {
        match command {
            Command::Declare(ty, name) => self.line(depth, format!("DECLARE {} {}", ty, name)),
            Command::Assign(name, value) => {
                self.line(depth, format!("ASSIGN {}", name));
                self.expr(depth + 1, value);
            }
            Command::Return(value) => {
                self.line(depth, "RETURN");
                if let Some(value) = value {
                    self.expr(depth + 1, value);
                }
            }
            Command::Print(value) => {
                self.line(depth, "PRINT");
                self.expr(depth + 1, value);
            }
            Command::Call(call) => self.call(depth, call),
            Command::Cond(cond) => self.conditional(depth, cond),
        }
    }

    fn conditional(&mut self, depth: usize, cond: &Conditional) {
        self.line(depth, "CONDITIONAL");
        let blocks = std::iter::once(("IF", &cond.if_block))
            .chain(cond.elseif_blocks.iter().map(|block| ("ELSEIF", block)));
        for (tag, block) in blocks {
            self.line(depth + 1, tag);
            self.expr(depth + 2, &block.0);
            self.line(depth + 2, "BODY");
            self.body(depth + 3, &block.1);
        }
        if let Some(body) = &cond.else_block {
            self.line(depth + 1, "ELSE");
            self.body(depth + 2, body);
        }
    }

    fn call(&mut self, depth: usize, Call(name, args): &Call) {
        self.line(depth, format!("CALL {}", name));
        for arg in args {
            self.expr(depth + 1, arg);
        }
    }

    fn expr(&mut self, depth: usize, expr: &Expr) {
        match expr {
            Expr::Binary(op, lhs, rhs) => {
                let stratum = match op.stratum() {
                    Stratum::Expression => "EXPRESSION",
                    Stratum::Term => "TERM",
                    Stratum::Factor => "FACTOR",
                };
                self.line(depth, format!("{} {}", stratum, op.token()));
                self.expr(depth + 1, lhs);
                self.expr(depth + 1, rhs);
            }
            Expr::Neg(operand) => {
                self.line(depth, "MINUS");
                self.expr(depth + 1, operand);
            }
            Expr::Not(operand) => {
                self.line(depth, "NOT");
                self.expr(depth + 1, operand);
            }
            Expr::Call(call) => self.call(depth, call),
            Expr::Var(name) => self.line(depth, format!("VARIABLE {}", name)),
            Expr::Literal(lit) => self.line(depth, format!("LITERAL {} {}", lit.ty(), lit.text())),
        }
    }
}

impl Program {
    /// Indented description of the tree, one node per line
    pub fn tree(&self) -> String {
        let mut tree = Tree(String::new());
        tree.line(0, "PROGRAM");
        for method in &self.0 {
            tree.method(1, method);
        }
        tree.0
    }
}

// ----------------------------------------------------------------------------
// Source printer
// ----------------------------------------------------------------------------

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, method) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", method)?;
        }
        Ok(())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(|(ty, name)| format!("{} {}", ty, name)).collect();
        write!(f, "{} {}({}) ", self.ret, self.name, params.join(", "))?;
        write_block(f, &self.body, 0)
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, body: &[Command], depth: usize) -> fmt::Result {
    if body.is_empty() {
        return write!(f, "{{}}");
    }
    writeln!(f, "{{")?;
    for (i, command) in body.iter().enumerate() {
        write!(f, "{}", "    ".repeat(depth + 1))?;
        write_command(f, command, depth + 1)?;
        if i + 1 < body.len() {
            write!(f, ";")?;
        }
        writeln!(f)?;
    }
    write!(f, "{}}}", "    ".repeat(depth))
}

fn write_command(f: &mut fmt::Formatter<'_>, command: &Command, depth: usize) -> fmt::Result {
    match command {
        Command::Cond(cond) => {
            write!(f, "if ({}) ", cond.if_block.0)?;
            write_block(f, &cond.if_block.1, depth)?;
            for block in &cond.elseif_blocks {
                write!(f, " elseif ({}) ", block.0)?;
                write_block(f, &block.1, depth)?;
            }
            if let Some(body) = &cond.else_block {
                write!(f, " else ")?;
                write_block(f, body, depth)?;
            }
            Ok(())
        }
        _ => write!(f, "{}", command),
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Declare(ty, name) => write!(f, "{} {}", ty, name),
            Command::Assign(name, value) => write!(f, "{} = {}", name, value),
            Command::Return(None) => write!(f, "return"),
            Command::Return(Some(value)) => write!(f, "return {}", value),
            Command::Print(value) => write!(f, "print {}", value),
            Command::Call(call) => write!(f, "{}", call),
            Command::Cond(_) => write_command(f, self, 0),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.1.iter().map(|arg| arg.to_string()).collect();
        write!(f, "{}({})", self.0, args.join(", "))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Fully parenthesised, so printing then parsing gives back the same tree
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary(op, lhs, rhs) if op.is_comparison() => write!(f, "({}) {} ({})", lhs, op, rhs),
            Expr::Binary(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op, rhs),
            Expr::Neg(operand) => write!(f, "-{}", Operand(operand)),
            Expr::Not(operand) => write!(f, "!{}", Operand(operand)),
            Expr::Call(call) => write!(f, "{}", call),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

/// Operand of a unary operator, which must print as a single atom
struct Operand<'a>(&'a Expr);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Binary(op, ..) if !op.is_comparison() => write!(f, "{}", self.0),
            Expr::Call(_) | Expr::Var(_) | Expr::Literal(_) => write!(f, "{}", self.0),
            _ => write!(f, "({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::grammer::parsercore::Parser;

    #[test]
    fn tree_dump() {
        let (program, _) = Parser::from_source("int f(int a) { return a + 1 }").unwrap().parse().unwrap();
        assert_eq!(
            program.tree(),
            "PROGRAM\n\
             | METHOD int f (int a)\n\
             | | RETURN\n\
             | | | EXPRESSION `+`\n\
             | | | | VARIABLE a\n\
             | | | | LITERAL int 1\n"
        );
    }

    #[test]
    fn source_print() {
        let (program, _) = Parser::from_source("void main() { int a; a = 1 + 2 * 3; print -a }")
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(
            program.to_string(),
            "void main() {\n    int a;\n    a = (1 + (2 * 3));\n    print -a\n}\n"
        );
    }
}
