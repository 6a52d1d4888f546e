/// States of the JSON number grammar, entered after the first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberState {
    Sign,
    Zero,
    Integer,
    Point,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
}

/// Outcome of offering one byte to the number grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberStep {
    /// The byte belongs to the number.
    Continue(NumberState),
    /// The byte ends the number and is not part of it.
    End,
    /// The byte cannot follow what was read so far.
    Malformed,
}

impl NumberState {
    pub fn start(first: u8) -> Option<Self> {
        match first {
            b'-' => Some(Self::Sign),
            b'0' => Some(Self::Zero),
            b'1'..=b'9' => Some(Self::Integer),
            _ => None,
        }
    }

    /// Whether a number may end in this state.
    pub fn is_complete(self) -> bool {
        matches!(
            self,
            Self::Zero | Self::Integer | Self::Fraction | Self::ExponentDigits
        )
    }

    pub fn step(self, b: u8) -> NumberStep {
        use NumberStep::{Continue, End, Malformed};
        match (self, b) {
            (Self::Sign, b'0') => Continue(Self::Zero),
            (Self::Sign, b'1'..=b'9') => Continue(Self::Integer),
            (Self::Zero, b'0'..=b'9') => Malformed,
            (Self::Zero | Self::Integer, b'.') => Continue(Self::Point),
            (Self::Zero | Self::Integer | Self::Fraction, b'e' | b'E') => Continue(Self::Exponent),
            (Self::Integer, b'0'..=b'9') => Continue(Self::Integer),
            (Self::Point | Self::Fraction, b'0'..=b'9') => Continue(Self::Fraction),
            (Self::Exponent, b'+' | b'-') => Continue(Self::ExponentSign),
            (Self::Exponent | Self::ExponentSign | Self::ExponentDigits, b'0'..=b'9') => {
                Continue(Self::ExponentDigits)
            }
            (state, _) if state.is_complete() => End,
            _ => Malformed,
        }
    }
}
