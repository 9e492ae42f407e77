use std::fmt;

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Token { kind, pos }
    }
}

/// Tokens are equal by kind and lexeme, wherever they appear
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Double character tokens
    EqualEqual,  // '=='
    RAngleEqual, // '>='
    LAngleEqual, // '<='
    AmpAmp,      // '&&'
    PipePipe,    // '||'

    // Single character tokens
    Equal,     // '='
    Plus,      // '+'
    Minus,     // '-'
    Star,      // '*'
    Slash,     // '/'
    Caret,     // '^'
    Excl,      // '!'
    Semicolon, // ';'
    Comma,     // ','
    LParen,    // '('
    RParen,    // ')'
    LCurly,    // '{'
    RCurly,    // '}'
    LAngle,    // '<'
    RAngle,    // '>'

    // Keywords
    KwInt,    // "int"
    KwDouble, // "double"
    KwVoid,   // "void"
    KwIf,     // "if"
    KwElse,   // "else"
    KwElseIf, // "elseif"
    KwReturn, // "return"
    KwPrint,  // "print"

    // Identifier
    Ident(String),

    // Literals
    Integer(String),
    Double(String),

    // Special
    EOF,
}

impl TokenKind {
    /// Source text of literal and identifier tokens
    pub fn lexeme(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(s) | TokenKind::Integer(s) | TokenKind::Double(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, TokenKind::KwInt | TokenKind::KwDouble | TokenKind::KwVoid)
    }

    pub fn is_comparison(&self) -> bool {
        use TokenKind::*;
        matches!(self, EqualEqual | RAngle | RAngleEqual | LAngle | LAngleEqual)
    }

    fn symbol(&self) -> &'static str {
        use TokenKind::*;
        match self {
            EqualEqual => "==",
            RAngleEqual => ">=",
            LAngleEqual => "<=",
            AmpAmp => "&&",
            PipePipe => "||",
            Equal => "=",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Caret => "^",
            Excl => "!",
            Semicolon => ";",
            Comma => ",",
            LParen => "(",
            RParen => ")",
            LCurly => "{",
            RCurly => "}",
            LAngle => "<",
            RAngle => ">",
            KwInt => "int",
            KwDouble => "double",
            KwVoid => "void",
            KwIf => "if",
            KwElse => "else",
            KwElseIf => "elseif",
            KwReturn => "return",
            KwPrint => "print",
            Ident(_) => "identifier",
            Integer(_) => "integer",
            Double(_) => "double",
            EOF => "end of program",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lexeme() {
            Some(text) => write!(f, "{} `{}`", self.symbol(), text),
            None if matches!(self, TokenKind::EOF) => write!(f, "{}", self.symbol()),
            None => write!(f, "`{}`", self.symbol()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    pub fn start() -> Self {
        Pos { line: 1, col: 1 }
    }

    pub fn advance(&mut self, ch: char) {
        match ch {
            '\n' => {
                self.line += 1;
                self.col = 1;
            }
            '\0' => {}
            _ => self.col += 1,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
