use core::fmt;
use std::io;

use thiserror::Error;

use crate::scanner::TokenKind;

/// A location in the input stream.
///
/// `offset` counts bytes from the start of the stream; `line` and `column` are
/// 1-based, with columns counted in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Bytes from the start of the stream.
    pub offset: u64,
    /// 1-based line number.
    pub line: usize,
    /// 1-based byte column within the line.
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "byte {} ({}:{})", self.offset, self.line, self.column)
    }
}

/// Errors returned while decoding.
///
/// Any error aborts the traversal in progress. Whatever the visitors wrote
/// before the error should not be trusted.
#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum DecodeError {
    /// The underlying reader failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The input is not lexically valid JSON.
    #[error("syntax error: {error} at {position}")]
    Syntax {
        error: SyntaxError,
        position: Position,
    },
    /// A well-formed token showed up where the grammar does not allow it.
    ///
    /// `text` holds the decoded text of string and number tokens and is
    /// empty otherwise.
    #[error("unexpected {} at {position}; expected {expected}", describe_token(.found, .text))]
    Structural {
        found: TokenKind,
        text: String,
        expected: &'static str,
        position: Position,
    },
    /// A typed read met a value of another kind.
    #[error("cannot read {found} as {expected} at {position}")]
    TypeMismatch {
        expected: &'static str,
        found: TokenKind,
        position: Position,
    },
    /// A number is not representable in the requested type.
    #[error("number {text} does not fit in {target} at {position}")]
    InvalidNumber {
        text: String,
        target: &'static str,
        position: Position,
    },
    /// Objects and arrays nest deeper than
    /// [`DecoderOptions::max_depth`](crate::DecoderOptions::max_depth).
    #[error("maximum nesting depth of {limit} exceeded at {position}")]
    DepthExceeded { limit: usize, position: Position },
    /// Raised by a visitor through [`DecodeError::custom`].
    #[error("{0}")]
    Custom(String),
}

impl DecodeError {
    /// Builds an error raised by a visitor, e.g. for an unsupported member.
    pub fn custom(msg: impl fmt::Display) -> Self {
        Self::Custom(msg.to_string())
    }

    /// Where in the input the error was detected, if known.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Syntax { position, .. }
            | Self::Structural { position, .. }
            | Self::TypeMismatch { position, .. }
            | Self::InvalidNumber { position, .. }
            | Self::DepthExceeded { position, .. } => Some(*position),
            Self::Io(_) | Self::Custom(_) => None,
        }
    }

    /// Returns `true` for [`DecodeError::Structural`].
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. })
    }

    /// Returns `true` for [`DecodeError::TypeMismatch`].
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

fn describe_token(kind: &TokenKind, text: &str) -> String {
    match kind {
        TokenKind::String => format!("string {text:?}"),
        TokenKind::Number => format!("number {text}"),
        _ => kind.to_string(),
    }
}

/// Lexical errors raised by the [`Scanner`](crate::Scanner).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum SyntaxError {
    #[error("invalid byte {0}")]
    InvalidByte(InvalidByte),
    #[error("invalid literal, expected '{0}'")]
    InvalidLiteral(&'static str),
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("invalid unicode escape sequence: {0}")]
    InvalidUnicodeEscape(String),
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u16),
    #[error("control character {0:#04x} in string")]
    ControlCharacter(u8),
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("malformed number {0}")]
    MalformedNumber(String),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

/// A raw input byte, displayed with `bstr` escaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidByte(pub u8);

impl fmt::Display for InvalidByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use bstr::ByteSlice;
        write!(f, "{:?}", [self.0].as_bstr())
    }
}
