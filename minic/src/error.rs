use crate::grammer::token::{Pos, Token, TokenKind};
use color_print::ceprintln;
use std::fmt;
use thiserror::Error;

// Token information for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.pos)
    }
}

impl From<Token> for TokenInfo {
    fn from(token: Token) -> Self {
        TokenInfo {
            kind: token.kind,
            pos: token.pos,
        }
    }
}

impl From<&Token> for TokenInfo {
    fn from(token: &Token) -> Self {
        TokenInfo {
            kind: token.kind.clone(),
            pos: token.pos,
        }
    }
}

// Unified error type for minic
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Invalid config file: {0}")]
    Config(String, #[source] serde_yaml::Error),

    // Lexical errors
    #[error("Illegal character `{}` at {}", .0.escape_default(), .1)]
    IllegalCharacter(char, Pos),

    #[error("Unterminated comment starting at {0}")]
    UnterminatedComment(Pos),

    // Syntax errors
    #[error("{expected} expected instead of {found}")]
    UnexpectedToken { expected: String, found: TokenInfo },

    // Compilation errors
    #[error("Method `{0}` was not declared")]
    UndeclaredMethod(String),

    #[error("Method `{0}` is declared more than once")]
    DuplicateMethod(String),

    #[error("Entry point `main` cannot be called")]
    EntryPointCall,

    #[error("Entry point must be declared as `void main()`")]
    InvalidEntryPoint,

    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Duplicate local variable: {0}")]
    DuplicateVariable(String),

    #[error("Variable `{0}` cannot have type void")]
    InvalidVariableType(String),

    #[error("{0} does not produce a value")]
    VoidValue(String),

    #[error("Void method `{0}` cannot return a value")]
    ReturnValueFromVoid(String),

    #[error("Method `{0}` must return a value")]
    MissingReturnValue(String),

    #[error("Method `{0}` does not end with a return")]
    MissingReturn(String),

    #[error("Method `{method}` expects {expected} argument(s), got {found}")]
    ArgumentCount {
        method: String,
        expected: usize,
        found: usize,
    },

    #[error("Operator `{0}` requires integer operands")]
    NonIntegerOperand(String),

    #[error("No free local slot for `{0}`")]
    SlotsExhausted(String),

    #[error("In method `{method}`: {source}")]
    MethodFailed {
        method: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn unexpected(expected: impl Into<String>, found: &Token) -> Self {
        Error::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            Error::IllegalCharacter(..) | Error::UnterminatedComment(_)
        )
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::UnexpectedToken { .. })
    }

    pub fn is_compilation(&self) -> bool {
        match self {
            Error::MethodFailed { .. } => true,
            Error::Io(_) | Error::FileOpen(..) | Error::FileWrite(..) | Error::Config(..) => false,
            _ => !self.is_lexical() && !self.is_syntax(),
        }
    }

    /// Source position the error points at, if any
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Error::IllegalCharacter(_, pos) | Error::UnterminatedComment(pos) => Some(*pos),
            Error::UnexpectedToken { found, .. } => Some(found.pos),
            Error::MethodFailed { source, .. } => source.pos(),
            _ => None,
        }
    }

    /// Print error with the offending source line
    pub fn print_diag(&self, file: &str, source: &str) {
        ceprintln!("<red,bold>error</>: {}", self);
        self.print_location(file, source);
    }

    /// Print a recovered error as a warning
    pub fn print_warn(&self, file: &str, source: &str) {
        ceprintln!("<yellow,bold>warn</>: {}", self);
        self.print_location(file, source);
    }

    fn print_location(&self, file: &str, source: &str) {
        let Some(pos) = self.pos() else {
            ceprintln!("     <blue>--></> <underline>{}</>", file);
            return;
        };
        let line = source.lines().nth(pos.line.saturating_sub(1)).unwrap_or("");
        ceprintln!("     <blue>--></> <underline>{}:{}</>", file, pos);
        ceprintln!("      <blue>|</>");
        ceprintln!(" <blue>{:>4} |</> {}", pos.line, line);
        ceprintln!("      <blue>|</> {}<red>^</>", " ".repeat(pos.col.saturating_sub(1)));
    }
}
