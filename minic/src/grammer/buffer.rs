use super::token::Pos;
use std::io::{self, Read};

/// Smallest window that still allows `peek_next_char`
pub const MIN_WINDOW: usize = 2;

/// Sliding character window over a byte stream.
///
/// The end of the stream is an endless run of `'\0'`.
pub struct Buffer<R: Read> {
    reader: R,
    window: Vec<char>,
    cursor: usize,
    exhausted: bool,
    pos: Pos,
}

impl<R: Read> Buffer<R> {
    pub fn new(reader: R, size: usize) -> io::Result<Self> {
        let size = size.max(MIN_WINDOW);
        let mut buffer = Self {
            reader,
            window: vec!['\0'; size],
            cursor: 0,
            exhausted: false,
            pos: Pos::start(),
        };
        buffer.fill(0)?;
        Ok(buffer)
    }

    /// Consume the character under the cursor
    pub fn next_char(&mut self) -> io::Result<char> {
        let ch = self.window[self.cursor];
        self.cursor += 1;
        self.pos.advance(ch);

        if self.cursor >= self.window.len() - 1 {
            self.refresh()?;
        }

        Ok(ch)
    }

    pub fn peek_char(&self) -> char {
        self.window[self.cursor]
    }

    pub fn peek_next_char(&self) -> char {
        self.window[self.cursor + 1]
    }

    /// Position of the character under the cursor
    pub fn pos(&self) -> Pos {
        self.pos
    }

    fn refresh(&mut self) -> io::Result<()> {
        let last = self.window.len() - 1;
        self.window[0] = self.window[last];
        self.cursor = 0;
        self.fill(1)
    }

    fn fill(&mut self, from: usize) -> io::Result<()> {
        for idx in from..self.window.len() {
            self.window[idx] = match self.read_char()? {
                Some(ch) => ch,
                None => '\0',
            };
        }
        Ok(())
    }

    fn read_char(&mut self) -> io::Result<Option<char>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut bytes = [0u8; 4];
        if let Err(e) = self.reader.read_exact(&mut bytes[..1]) {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                self.exhausted = true;
                return Ok(None);
            }
            return Err(e);
        }

        let width = match bytes[0] {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(invalid_utf8()),
        };
        self.reader.read_exact(&mut bytes[1..width])?;

        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(invalid_utf8)
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8")
}
