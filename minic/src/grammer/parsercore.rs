use super::lexer::{Lexer, DEFAULT_WINDOW};
use super::token::Token;
use crate::error::Error;
use log::warn;
use std::io::Read;

/// Recursive-descent parser state: the lexer plus one token of lookahead.
pub struct Parser<R: Read> {
    lexer: Lexer<R>,
    current: Token,
    errors: Vec<Error>,
}

impl<R: Read> Parser<R> {
    pub fn new(mut lexer: Lexer<R>) -> Result<Self, Error> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            errors: Vec::new(),
        })
    }

    /// Record an error swallowed by list recovery
    pub fn error(&mut self, e: Error) {
        warn!("recovered from parse error: {}", e);
        self.errors.push(e);
    }

    pub fn geterrors(self) -> Vec<Error> {
        self.errors
    }
}

impl<'a> Parser<&'a [u8]> {
    pub fn from_source(source: &'a str) -> Result<Self, Error> {
        Parser::new(Lexer::new(source.as_bytes(), DEFAULT_WINDOW)?)
    }
}

impl<R: Read> Parser<R> {
    /// Peek : Watch current token without consuming it
    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// Advance : Consume current token and return it
    pub fn advance(&mut self) -> Result<Token, Error> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Check current token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&self, cond: F) -> bool {
        cond(&self.current)
    }

    /// Consume if current token is match with condition
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Result<Option<Token>, Error> {
        if cond(&self.current) {
            self.advance().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Current token must be match with condition
    pub fn expect_tobe<F: Fn(&Token) -> bool>(
        &mut self,
        expected: &str,
        cond: F,
    ) -> Result<Token, Error> {
        if cond(&self.current) {
            self.advance()
        } else {
            Err(Error::unexpected(expected, &self.current))
        }
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:pat, $what:expr) => {
        $parser.expect_tobe($what, |token| matches!(&token.kind, $kind))
    };
    ($parser:expr, $kind:pat) => {
        $parser.expect_tobe(stringify!($kind), |token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! optional {
    ($parser:expr, $trigger:pat, $following:expr) => {
        if $crate::check!($parser, $trigger) {
            $crate::expect!($parser, $trigger)?;
            Some($following)
        } else {
            None
        }
    };
    ($parser:expr, $trigger:pat) => {
        $parser.consume_if(|token| matches!(&token.kind, $trigger))?
    };
}

/// Parse `[ element { delimiter element } ] terminal`, leaving the terminal unconsumed
#[macro_export]
macro_rules! repeat {
    ($parser:expr, $elem:expr, $delimiter:pat, $terminal:pat) => {{
        let mut items = Vec::new();
        if !$crate::check!($parser, $terminal) {
            items.push($elem?);
            while $crate::check!($parser, $delimiter) {
                $crate::expect!($parser, $delimiter)?;
                items.push($elem?);
            }
        }
        items
    }};
}
