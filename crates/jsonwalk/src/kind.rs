use core::fmt;

use crate::{error::Position, scanner::TokenKind};

/// The coarse kind of a JSON value, computed from its first token.
///
/// Array visitors receive it before the element is read so they can pick the
/// matching read call.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Read with [`Decoder::read_string`](crate::Decoder::read_string) or as `String`.
    String,
    /// Read as any integer or float type.
    Number,
    /// `true` or `false`.
    Boolean,
    /// `null`; usually left unread or read as `Option<T>`.
    Null,
    /// Walk with [`Decoder::each_member`](crate::Decoder::each_member).
    Object,
    /// Walk with [`Decoder::each_value`](crate::Decoder::each_value).
    Array,
}

impl ElementKind {
    /// Maps the lead token of a value to its kind.
    ///
    /// # Panics
    ///
    /// Panics if `kind` cannot start a value. The decoder checks for that
    /// before classifying, so reaching the panic means the scanner and the
    /// decoder disagree about the token set.
    #[must_use]
    pub fn classify(kind: TokenKind, position: Position) -> Self {
        match kind {
            TokenKind::String => Self::String,
            TokenKind::Number => Self::Number,
            TokenKind::True | TokenKind::False => Self::Boolean,
            TokenKind::Null => Self::Null,
            TokenKind::BeginObject => Self::Object,
            TokenKind::BeginArray => Self::Array,
            TokenKind::EndObject
            | TokenKind::EndArray
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::Eof => {
                panic!("unexpected token kind {kind:?} at {position}: no value starts with it")
            }
        }
    }

    /// Returns `true` unless the value is an object or an array.
    #[must_use]
    pub fn is_scalar(self) -> bool {
        !matches!(self, Self::Object | Self::Array)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Object => "object",
            Self::Array => "array",
        })
    }
}
