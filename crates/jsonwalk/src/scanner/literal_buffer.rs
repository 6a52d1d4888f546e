use super::TokenKind;

/// What happened after feeding one more byte into the literal matcher?
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    /// Byte matched, but the literal is not finished yet.
    NeedMore,
    /// Byte matched *and* it was the last byte of the literal.
    Done(TokenKind),
    /// Byte did **not** match the expected byte.
    Reject,
}

/// Matches the remainder of `null`, `true` or `false` after its first byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExpectedLiteralBuffer {
    rest: &'static [u8],
    kind: TokenKind,
    literal: &'static str,
}

impl ExpectedLiteralBuffer {
    /// Starts matching after the first byte (`n`, `t`, or `f`).
    pub fn new(first: u8) -> Option<Self> {
        let (literal, kind) = match first {
            b'n' => ("null", TokenKind::Null),
            b't' => ("true", TokenKind::True),
            b'f' => ("false", TokenKind::False),
            _ => return None,
        };
        Some(Self {
            rest: &literal.as_bytes()[1..],
            kind,
            literal,
        })
    }

    /// The literal being matched, for diagnostics.
    pub fn literal(&self) -> &'static str {
        self.literal
    }

    pub fn step(&mut self, b: u8) -> Step {
        match self.rest.split_first() {
            Some((&expected, rest)) if expected == b => {
                self.rest = rest;
                if rest.is_empty() {
                    Step::Done(self.kind)
                } else {
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_true() {
        let mut lit = ExpectedLiteralBuffer::new(b't').unwrap();
        assert_eq!(lit.step(b'r'), Step::NeedMore);
        assert_eq!(lit.step(b'u'), Step::NeedMore);
        assert_eq!(lit.step(b'e'), Step::Done(TokenKind::True));
    }

    #[test]
    fn rejects_mismatch() {
        let mut lit = ExpectedLiteralBuffer::new(b'n').unwrap();
        assert_eq!(lit.step(b'u'), Step::NeedMore);
        assert_eq!(lit.step(b'x'), Step::Reject);
        assert_eq!(lit.literal(), "null");
    }

    #[test]
    fn unknown_first_byte() {
        assert!(ExpectedLiteralBuffer::new(b'x').is_none());
    }
}
