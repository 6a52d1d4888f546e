//! Accumulates the four hexadecimal digits of a `\uXXXX` escape.
//!
//! The buffer yields UTF-16 code units rather than `char`s: a high surrogate
//! has to be joined with the low surrogate of the following escape, which is
//! the scanner's job (see [`combine_surrogates`]).

use crate::error::SyntaxError;

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    buffer: [u8; 4],
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Feeds one hex digit. Returns the code unit once four digits are in,
    /// resetting the buffer for the next escape.
    pub fn feed(&mut self, b: u8) -> Result<Option<u16>, SyntaxError> {
        if !b.is_ascii_hexdigit() {
            return Err(SyntaxError::InvalidUnicodeEscape(format!(
                "invalid hex digit {:?}",
                char::from(b)
            )));
        }
        if self.len >= 4 {
            return Err(SyntaxError::InvalidUnicodeEscape(
                "escape buffer overflow".into(),
            ));
        }
        self.buffer[self.len as usize] = b;
        self.len += 1;

        if self.len < 4 {
            return Ok(None);
        }
        let unit = self
            .buffer
            .iter()
            .fold(0u16, |acc, &d| (acc << 4) | u16::from(hex_value(d)));
        self.reset();
        Ok(Some(unit))
    }
}

fn hex_value(d: u8) -> u8 {
    match d {
        b'0'..=b'9' => d - b'0',
        b'a'..=b'f' => d - b'a' + 10,
        _ => d - b'A' + 10,
    }
}

pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..0xE000).contains(&unit)
}

/// Joins a surrogate pair into the scalar it encodes.
pub(crate) fn combine_surrogates(high: u16, low: u16) -> Result<char, SyntaxError> {
    if !is_high_surrogate(high) {
        return Err(SyntaxError::UnpairedSurrogate(high));
    }
    if !is_low_surrogate(low) {
        return Err(SyntaxError::UnpairedSurrogate(low));
    }
    let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code).ok_or(SyntaxError::UnpairedSurrogate(high))
}
