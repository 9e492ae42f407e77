use super::buffer::Buffer;
use super::token::{Pos, Token, TokenKind};
use crate::error::Error;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::io::Read;

pub const DEFAULT_WINDOW: usize = 10;

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ("int", TokenKind::KwInt),
        ("double", TokenKind::KwDouble),
        ("void", TokenKind::KwVoid),
        ("if", TokenKind::KwIf),
        ("else", TokenKind::KwElse),
        ("elseif", TokenKind::KwElseIf),
        ("return", TokenKind::KwReturn),
        ("print", TokenKind::KwPrint),
    ])
});

static SYMBOLS: Lazy<HashMap<char, TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ('\0', TokenKind::EOF),
        ('+', TokenKind::Plus),
        ('-', TokenKind::Minus),
        ('*', TokenKind::Star),
        ('^', TokenKind::Caret),
        ('!', TokenKind::Excl),
        ('(', TokenKind::LParen),
        (')', TokenKind::RParen),
        ('{', TokenKind::LCurly),
        ('}', TokenKind::RCurly),
        (',', TokenKind::Comma),
        (';', TokenKind::Semicolon),
    ])
});

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Ready,
    Integer,
    Double,
    Word,
}

/// Pull-based tokenizer: one token per `next_token` call.
pub struct Lexer<R: Read> {
    buffer: Buffer<R>,
    finished: bool,
}

impl<R: Read> Lexer<R> {
    pub fn new(reader: R, window: usize) -> Result<Self, Error> {
        Ok(Self {
            buffer: Buffer::new(reader, window)?,
            finished: false,
        })
    }
}

impl<'a> Lexer<&'a [u8]> {
    pub fn from_source(source: &'a str) -> Result<Self, Error> {
        Lexer::new(source.as_bytes(), DEFAULT_WINDOW)
    }
}

// ----------------------------------------------------------------------------
// State machine
// ----------------------------------------------------------------------------

impl<R: Read> Lexer<R> {
    pub fn next_token(&mut self) -> Result<Token, Error> {
        let mut state = State::Ready;
        let mut lexeme = String::new();
        let mut start = self.buffer.pos();

        loop {
            match state {
                State::Ready => {
                    start = self.buffer.pos();
                    let ch0 = self.buffer.next_char()?;

                    // 1. Single character token
                    if let Some(kind) = SYMBOLS.get(&ch0) {
                        return Ok(Token::new(kind.clone(), start));
                    }

                    // 2. Operators decided by the following character
                    let ch1 = self.buffer.peek_char();
                    match (ch0, ch1) {
                        ('/', '/') => {
                            self.buffer.next_char()?;
                            self.skip_line_comment()?;
                            continue;
                        }
                        ('/', '*') => {
                            self.buffer.next_char()?;
                            self.skip_block_comment(start)?;
                            continue;
                        }
                        ('/', _) => return Ok(Token::new(TokenKind::Slash, start)),
                        ('=', _) | ('<', _) | ('>', _) | ('&', _) | ('|', _) => {
                            return match double_char_token(ch0, ch1) {
                                Some(kind) => {
                                    self.buffer.next_char()?;
                                    Ok(Token::new(kind, start))
                                }
                                None => match single_operator(ch0) {
                                    Some(kind) => Ok(Token::new(kind, start)),
                                    None => Err(Error::IllegalCharacter(ch0, start)),
                                },
                            };
                        }
                        _ => {}
                    }

                    // 3. Multi character tokens
                    if ch0.is_alphabetic() {
                        lexeme.push(ch0);
                        state = State::Word;
                    } else if ch0.is_ascii_digit() {
                        lexeme.push(ch0);
                        state = State::Integer;
                    } else if !ch0.is_whitespace() {
                        return Err(Error::IllegalCharacter(ch0, start));
                    }
                }

                State::Integer => {
                    let ch = self.buffer.peek_char();
                    if ch.is_ascii_digit() {
                        lexeme.push(self.buffer.next_char()?);
                    } else if ch == '.' {
                        lexeme.push(self.buffer.next_char()?);
                        state = State::Double;
                    } else {
                        return Ok(Token::new(TokenKind::Integer(lexeme), start));
                    }
                }

                State::Double => {
                    if self.buffer.peek_char().is_ascii_digit() {
                        lexeme.push(self.buffer.next_char()?);
                    } else {
                        return Ok(Token::new(TokenKind::Double(lexeme), start));
                    }
                }

                State::Word => {
                    if self.buffer.peek_char().is_alphabetic() {
                        lexeme.push(self.buffer.next_char()?);
                    } else {
                        let kind = keyword(&lexeme).unwrap_or(TokenKind::Ident(lexeme));
                        return Ok(Token::new(kind, start));
                    }
                }
            }
        }
    }

    fn skip_line_comment(&mut self) -> Result<(), Error> {
        loop {
            match self.buffer.next_char()? {
                '\n' | '\0' => return Ok(()),
                _ => {}
            }
        }
    }

    fn skip_block_comment(&mut self, start: Pos) -> Result<(), Error> {
        loop {
            match (self.buffer.peek_char(), self.buffer.peek_next_char()) {
                ('*', '/') => {
                    self.buffer.next_char()?;
                    self.buffer.next_char()?;
                    return Ok(());
                }
                ('\0', _) => return Err(Error::UnterminatedComment(start)),
                _ => {
                    self.buffer.next_char()?;
                }
            }
        }
    }
}

impl<R: Read> Iterator for Lexer<R> {
    type Item = Result<Token, Error>;

    /// Yields tokens up to and including `EOF`, or up to the first error
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let res = self.next_token();
        match &res {
            Ok(Token { kind: TokenKind::EOF, .. }) | Err(_) => self.finished = true,
            Ok(_) => {}
        }
        Some(res)
    }
}

pub fn keyword(s: &str) -> Option<TokenKind> {
    KEYWORDS.get(s).cloned()
}

fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    match (ch0, ch1) {
        ('=', '=') => Some(TokenKind::EqualEqual),
        ('<', '=') => Some(TokenKind::LAngleEqual),
        ('>', '=') => Some(TokenKind::RAngleEqual),
        ('&', '&') => Some(TokenKind::AmpAmp),
        ('|', '|') => Some(TokenKind::PipePipe),
        _ => None,
    }
}

fn single_operator(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Equal),
        '<' => Some(TokenKind::LAngle),
        '>' => Some(TokenKind::RAngle),
        _ => None,
    }
}
