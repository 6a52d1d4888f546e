use core::fmt;

use crate::error::Position;

/// The closed set of lexical tokens produced by the [`Scanner`](super::Scanner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A string; the unescaped text is in [`Scanner::text`](super::Scanner::text).
    String,
    /// A number; its source spelling is in [`Scanner::text`](super::Scanner::text).
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// `{`
    BeginObject,
    /// `}`
    EndObject,
    /// `[`
    BeginArray,
    /// `]`
    EndArray,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// End of input, returned for every read once the stream is exhausted.
    Eof,
}

impl TokenKind {
    pub(crate) fn from_punctuator(b: u8) -> Option<Self> {
        Some(match b {
            b'{' => Self::BeginObject,
            b'}' => Self::EndObject,
            b'[' => Self::BeginArray,
            b']' => Self::EndArray,
            b',' => Self::Comma,
            b':' => Self::Colon,
            _ => return None,
        })
    }

    /// Returns `true` if a JSON value may start with this token.
    #[must_use]
    pub fn starts_value(self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Number
                | Self::True
                | Self::False
                | Self::Null
                | Self::BeginObject
                | Self::BeginArray
        )
    }

    /// Whether the token text is worth quoting in diagnostics.
    pub(crate) fn has_payload(self) -> bool {
        matches!(self, Self::String | Self::Number)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Number => "number",
            Self::True => "'true'",
            Self::False => "'false'",
            Self::Null => "'null'",
            Self::BeginObject => "'{'",
            Self::EndObject => "'}'",
            Self::BeginArray => "'['",
            Self::EndArray => "']'",
            Self::Comma => "','",
            Self::Colon => "':'",
            Self::Eof => "end of input",
        })
    }
}

/// A token read from the input. The decoded text of string and number tokens
/// stays in the scanner until the next token is read; see
/// [`Scanner::text`](super::Scanner::text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// What was read.
    pub kind: TokenKind,
    /// Where the first byte of the token was found.
    pub position: Position,
}
