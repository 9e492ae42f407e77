use super::token::TokenKind;
use arch::Ty;

#[derive(Debug, Clone, PartialEq)]
pub struct Program(pub Vec<Method>); // program = method { method }

// method = type ident "(" [ type ident { "," type ident } ] ")" "{" body "}"
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub ret: Ty,
    pub name: String,
    pub params: Vec<(Ty, String)>,
    pub body: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Declare(Ty, String),   // type ident
    Assign(String, Expr),  // ident "=" expr
    Return(Option<Expr>),  // "return" [ expr ]
    Print(Expr),           // "print" expr
    Call(Call),            // ident "(" [ expr { "," expr } ] ")"
    Cond(Conditional),     // "if" ... { "elseif" ... } [ "else" ... ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call(pub String, pub Vec<Expr>); // ident "(" [ expr { "," expr } ] ")"

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub if_block: CondBlock,
    pub elseif_blocks: Vec<CondBlock>,
    pub else_block: Option<Vec<Command>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondBlock(pub Expr, pub Vec<Command>); // "(" expr ")" "{" body "}"

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(BinaryOp, Box<Expr>, Box<Expr>), // expr (binop) expr
    Neg(Box<Expr>),                         // "-" atom
    Not(Box<Expr>),                         // "!" atom
    Call(Call),                             // ident "(" [ expr { "," expr } ] ")"
    Var(String),                            // ident
    Literal(Literal),                       // int-lit | double-lit
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn neg(operand: Expr) -> Self {
        Expr::Neg(Box::new(operand))
    }

    pub fn int(text: &str) -> Self {
        Expr::Literal(Literal::Int(text.to_string()))
    }

    pub fn double(text: &str) -> Self {
        Expr::Literal(Literal::Double(text.to_string()))
    }

    pub fn var(name: &str) -> Self {
        Expr::Var(name.to_string())
    }
}

/// Literal text with its type fixed by the token that produced it
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(String),
    Double(String),
}

impl Literal {
    pub fn ty(&self) -> Ty {
        match self {
            Literal::Int(_) => Ty::Int,
            Literal::Double(_) => Ty::Double,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Literal::Int(text) | Literal::Double(text) => text,
        }
    }
}

/// Precedence level a binary operator is parsed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stratum {
    Expression, // + - || and comparisons
    Term,       // * / &&
    Factor,     // ^
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add, // "+"
    Sub, // "-"
    Or,  // "||"
    Mul, // "*"
    Div, // "/"
    And, // "&&"
    Pow, // "^"
    Eq,  // "=="
    Gt,  // ">"
    Ge,  // ">="
    Lt,  // "<"
    Le,  // "<="
}

impl BinaryOp {
    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::PipePipe => Some(BinaryOp::Or),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::AmpAmp => Some(BinaryOp::And),
            TokenKind::Caret => Some(BinaryOp::Pow),
            TokenKind::EqualEqual => Some(BinaryOp::Eq),
            TokenKind::RAngle => Some(BinaryOp::Gt),
            TokenKind::RAngleEqual => Some(BinaryOp::Ge),
            TokenKind::LAngle => Some(BinaryOp::Lt),
            TokenKind::LAngleEqual => Some(BinaryOp::Le),
            _ => None,
        }
    }

    pub fn token(&self) -> TokenKind {
        match self {
            BinaryOp::Add => TokenKind::Plus,
            BinaryOp::Sub => TokenKind::Minus,
            BinaryOp::Or => TokenKind::PipePipe,
            BinaryOp::Mul => TokenKind::Star,
            BinaryOp::Div => TokenKind::Slash,
            BinaryOp::And => TokenKind::AmpAmp,
            BinaryOp::Pow => TokenKind::Caret,
            BinaryOp::Eq => TokenKind::EqualEqual,
            BinaryOp::Gt => TokenKind::RAngle,
            BinaryOp::Ge => TokenKind::RAngleEqual,
            BinaryOp::Lt => TokenKind::LAngle,
            BinaryOp::Le => TokenKind::LAngleEqual,
        }
    }

    pub fn stratum(&self) -> Stratum {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::And => Stratum::Term,
            BinaryOp::Pow => Stratum::Factor,
            _ => Stratum::Expression,
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Lt | BinaryOp::Le
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Or => "||",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::And => "&&",
            BinaryOp::Pow => "^",
            BinaryOp::Eq => "==",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
        }
    }
}
