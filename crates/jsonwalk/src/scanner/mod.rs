//! Scanner: turns a byte stream into JSON tokens.
//!
//! The scanner owns the read buffer, the position counters and the decoded
//! text of the most recent string or number token. It is the only component
//! that looks at raw bytes; the [`Decoder`](crate::Decoder) drives it one token
//! at a time.
//!
//! Lookahead
//! - A single token may be handed back with [`Scanner::push_back`]. The next
//!   [`Scanner::next_token`] returns it again, and its text is still available
//!   from [`Scanner::text`] because no other token was scanned in between.
//! - Pushing back twice without reading is a programming error and panics.
//!
//! Text
//! - String tokens are unescaped and validated as UTF-8 while scanning, so
//!   [`Scanner::text`] always holds the decoded value.
//! - Number tokens keep their source spelling; the typed readers parse it.

mod escape_buffer;
mod literal_buffer;
mod numbers;
mod token;

#[cfg(test)]
mod tests;

use core::str::FromStr;
use std::io::{ErrorKind, Read};

use escape_buffer::{UnicodeEscapeBuffer, combine_surrogates, is_high_surrogate, is_low_surrogate};
use literal_buffer::{ExpectedLiteralBuffer, Step};
use numbers::{NumberState, NumberStep};
pub use token::{Token, TokenKind};

use crate::error::{DecodeError, InvalidByte, Position, SyntaxError};

pub(crate) const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// A pull tokenizer over any [`Read`] implementation.
pub struct Scanner<R> {
    reader: R,
    buf: Box<[u8]>,
    start: usize,
    end: usize,
    eof: bool,

    position: Position,
    text: String,
    escape: UnicodeEscapeBuffer,

    pending: Option<Token>,
    consumed: u64,
}

impl<R: Read> Scanner<R> {
    /// Creates a scanner with the default 8 KiB read buffer.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_CAPACITY)
    }

    /// Creates a scanner reading from `reader` in chunks of up to `capacity`
    /// bytes.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buf: vec![0; capacity.max(1)].into_boxed_slice(),
            start: 0,
            end: 0,
            eof: false,
            position: Position::default(),
            text: String::new(),
            escape: UnicodeEscapeBuffer::new(),
            pending: None,
            consumed: 0,
        }
    }

    /// Reads the next token, returning a pushed-back token first if there is
    /// one.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors and malformed input.
    pub fn next_token(&mut self) -> Result<Token, DecodeError> {
        if let Some(token) = self.pending.take() {
            self.consumed += 1;
            return Ok(token);
        }

        self.skip_whitespace()?;
        let position = self.position;
        let Some(b) = self.peek_byte()? else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position,
            });
        };

        let kind = if let Some(kind) = TokenKind::from_punctuator(b) {
            self.bump(b);
            kind
        } else if b == b'"' {
            self.bump(b);
            self.lex_string()?;
            TokenKind::String
        } else if let Some(state) = NumberState::start(b) {
            self.lex_number(b, state)?;
            TokenKind::Number
        } else if let Some(literal) = ExpectedLiteralBuffer::new(b) {
            self.bump(b);
            self.lex_literal(literal)?
        } else {
            return Err(syntax(SyntaxError::InvalidByte(InvalidByte(b)), position));
        };

        self.consumed += 1;
        Ok(Token { kind, position })
    }

    /// Returns `token` to the stream; the next [`next_token`](Self::next_token)
    /// call yields it again.
    ///
    /// # Panics
    ///
    /// Panics if a token is already pending.
    pub fn push_back(&mut self, token: Token) {
        if let Some(pending) = self.pending {
            panic!(
                "push_back of {} at {} while {} at {} is still pending",
                token.kind, token.position, pending.kind, pending.position
            );
        }
        self.consumed = self.consumed.saturating_sub(1);
        self.pending = Some(token);
    }

    /// Whether a pushed-back token is waiting to be read.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Position of the next token if one is pending, otherwise of the next
    /// unread byte.
    #[must_use]
    pub fn position(&self) -> Position {
        self.pending.map_or(self.position, |t| t.position)
    }

    /// Decoded text of the last string or number token.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of tokens consumed so far; pushed-back tokens do not count.
    #[must_use]
    pub fn tokens_consumed(&self) -> u64 {
        self.consumed
    }

    pub(crate) fn take_text(&mut self) -> String {
        core::mem::take(&mut self.text)
    }

    /// Hands a string from [`take_text`](Self::take_text) back for reuse.
    ///
    /// Ignored while a token is pending, since its text must survive.
    pub(crate) fn recycle(&mut self, mut text: String) {
        if self.pending.is_none() && text.capacity() > self.text.capacity() {
            text.clear();
            self.text = text;
        }
    }

    /// Builds a structural error for `token`, which must be the token read
    /// last.
    pub(crate) fn unexpected(&self, token: Token, expected: &'static str) -> DecodeError {
        DecodeError::Structural {
            found: token.kind,
            text: if token.kind.has_payload() {
                self.text.clone()
            } else {
                String::new()
            },
            expected,
            position: token.position,
        }
    }

    // --------------------------------------------------------------------------------------------
    // Typed scalar reads
    // --------------------------------------------------------------------------------------------

    /// Reads a string token and returns its decoded text.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::TypeMismatch`] if the next token is not a
    /// string.
    pub fn read_str(&mut self) -> Result<&str, DecodeError> {
        self.expect(TokenKind::String, "string")?;
        Ok(&self.text)
    }

    /// Reads a number token as an integer type. `target` names the type in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Fails if the next token is not a number, or if it has a fraction, an
    /// exponent, or does not fit in `T`.
    pub fn read_integer<T: FromStr>(&mut self, target: &'static str) -> Result<T, DecodeError> {
        let token = self.expect(TokenKind::Number, target)?;
        self.text.parse().map_err(|_| self.invalid_number(token, target))
    }

    /// Reads a number token as `f64`.
    ///
    /// # Errors
    ///
    /// Fails if the next token is not a number or is out of range.
    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        let token = self.expect(TokenKind::Number, "f64")?;
        match self.text.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(self.invalid_number(token, "f64")),
        }
    }

    /// Reads a number token as `f32`.
    ///
    /// # Errors
    ///
    /// Fails if the next token is not a number or is out of range.
    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        let token = self.expect(TokenKind::Number, "f32")?;
        match self.text.parse::<f32>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(self.invalid_number(token, "f32")),
        }
    }

    /// Reads `true` or `false`.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::TypeMismatch`] on any other token.
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::True => Ok(true),
            TokenKind::False => Ok(false),
            found => Err(DecodeError::TypeMismatch {
                expected: "boolean",
                found,
                position: token.position,
            }),
        }
    }

    /// Reads `null`.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::TypeMismatch`] on any other token.
    pub fn read_null(&mut self) -> Result<(), DecodeError> {
        self.expect(TokenKind::Null, "null").map(|_| ())
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, DecodeError> {
        let token = self.next_token()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(DecodeError::TypeMismatch {
                expected,
                found: token.kind,
                position: token.position,
            })
        }
    }

    fn invalid_number(&self, token: Token, target: &'static str) -> DecodeError {
        DecodeError::InvalidNumber {
            text: self.text.clone(),
            target,
            position: token.position,
        }
    }

    // --------------------------------------------------------------------------------------------
    // Bytes
    // --------------------------------------------------------------------------------------------

    fn fill(&mut self) -> Result<(), DecodeError> {
        while self.start == self.end && !self.eof {
            match self.reader.read(&mut self.buf) {
                Ok(0) => self.eof = true,
                Ok(n) => {
                    self.start = 0;
                    self.end = n;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    #[inline]
    fn peek_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        if self.start == self.end {
            self.fill()?;
        }
        Ok(self.buf[self.start..self.end].first().copied())
    }

    #[inline]
    fn bump(&mut self, b: u8) {
        self.start += 1;
        self.position.offset += 1;
        if b == b'\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
    }

    /// Consumes the next byte, failing at end of input.
    fn next_byte(&mut self) -> Result<u8, DecodeError> {
        match self.peek_byte()? {
            Some(b) => {
                self.bump(b);
                Ok(b)
            }
            None => Err(syntax(SyntaxError::UnexpectedEndOfInput, self.position)),
        }
    }

    fn skip_whitespace(&mut self) -> Result<(), DecodeError> {
        while let Some(b) = self.peek_byte()? {
            if !matches!(b, b' ' | b'\n' | b'\r' | b'\t') {
                break;
            }
            self.bump(b);
        }
        Ok(())
    }

    // --------------------------------------------------------------------------------------------
    // Lexing
    // --------------------------------------------------------------------------------------------

    fn lex_literal(&mut self, mut literal: ExpectedLiteralBuffer) -> Result<TokenKind, DecodeError> {
        loop {
            let position = self.position;
            let Some(b) = self.peek_byte()? else {
                return Err(syntax(SyntaxError::InvalidLiteral(literal.literal()), position));
            };
            match literal.step(b) {
                Step::NeedMore => self.bump(b),
                Step::Done(kind) => {
                    self.bump(b);
                    return Ok(kind);
                }
                Step::Reject => {
                    return Err(syntax(SyntaxError::InvalidLiteral(literal.literal()), position));
                }
            }
        }
    }

    fn lex_number(&mut self, first: u8, mut state: NumberState) -> Result<(), DecodeError> {
        self.text.clear();
        self.text.push(char::from(first));
        self.bump(first);
        loop {
            let position = self.position;
            let Some(b) = self.peek_byte()? else {
                return if state.is_complete() {
                    Ok(())
                } else {
                    Err(syntax(SyntaxError::UnexpectedEndOfInput, position))
                };
            };
            match state.step(b) {
                NumberStep::Continue(next) => {
                    self.text.push(char::from(b));
                    self.bump(b);
                    state = next;
                }
                NumberStep::End => return Ok(()),
                NumberStep::Malformed => {
                    return Err(syntax(SyntaxError::MalformedNumber(self.text.clone()), position));
                }
            }
        }
    }

    fn lex_string(&mut self) -> Result<(), DecodeError> {
        self.text.clear();
        loop {
            self.copy_ascii_run()?;
            let position = self.position;
            let b = self.next_byte()?;
            match b {
                b'"' => return Ok(()),
                b'\\' => self.lex_escape()?,
                0x00..=0x1F => return Err(syntax(SyntaxError::ControlCharacter(b), position)),
                0x80..=0xFF => self.lex_utf8(b, position)?,
                _ => self.text.push(char::from(b)),
            }
        }
    }

    /// Copies plain ASCII string content straight out of the read buffer.
    fn copy_ascii_run(&mut self) -> Result<(), DecodeError> {
        self.peek_byte()?;
        let window = &self.buf[self.start..self.end];
        let run = window
            .iter()
            .position(|&b| b == b'"' || b == b'\\' || b < 0x20 || b >= 0x80)
            .unwrap_or(window.len());
        self.text.extend(window[..run].iter().map(|&b| char::from(b)));
        // No newlines can occur in the run.
        self.start += run;
        self.position.offset += run as u64;
        self.position.column += run;
        Ok(())
    }

    fn lex_utf8(&mut self, lead: u8, position: Position) -> Result<(), DecodeError> {
        let width = match lead {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(syntax(SyntaxError::InvalidUtf8, position)),
        };
        let mut seq = [lead, 0, 0, 0];
        for slot in &mut seq[1..width] {
            *slot = self.next_byte()?;
        }
        let s = core::str::from_utf8(&seq[..width])
            .map_err(|_| syntax(SyntaxError::InvalidUtf8, position))?;
        self.text.push_str(s);
        Ok(())
    }

    fn lex_escape(&mut self) -> Result<(), DecodeError> {
        let position = self.position;
        let ch = match self.next_byte()? {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{0008}',
            b'f' => '\u{000C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => self.lex_unicode_escape(position)?,
            other => {
                return Err(syntax(SyntaxError::InvalidEscape(char::from(other)), position));
            }
        };
        self.text.push(ch);
        Ok(())
    }

    fn lex_unicode_escape(&mut self, position: Position) -> Result<char, DecodeError> {
        let unit = self.lex_code_unit()?;
        if is_low_surrogate(unit) {
            return Err(syntax(SyntaxError::UnpairedSurrogate(unit), position));
        }
        if !is_high_surrogate(unit) {
            return char::from_u32(u32::from(unit))
                .ok_or_else(|| syntax(SyntaxError::UnpairedSurrogate(unit), position));
        }
        if self.next_byte()? != b'\\' || self.next_byte()? != b'u' {
            return Err(syntax(SyntaxError::UnpairedSurrogate(unit), position));
        }
        let low = self.lex_code_unit()?;
        combine_surrogates(unit, low).map_err(|e| syntax(e, position))
    }

    fn lex_code_unit(&mut self) -> Result<u16, DecodeError> {
        self.escape.reset();
        loop {
            let position = self.position;
            let b = self.next_byte()?;
            match self.escape.feed(b) {
                Ok(Some(unit)) => return Ok(unit),
                Ok(None) => {}
                Err(e) => return Err(syntax(e, position)),
            }
        }
    }
}

impl<R> core::fmt::Debug for Scanner<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scanner")
            .field("position", &self.position)
            .field("pending", &self.pending)
            .field("eof", &self.eof)
            .finish_non_exhaustive()
    }
}

fn syntax(error: SyntaxError, position: Position) -> DecodeError {
    DecodeError::Syntax { error, position }
}
