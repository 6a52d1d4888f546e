//! A streaming JSON decoder driven by visitors.
//!
//! Instead of building a generic tree or matching fields by reflection, the
//! [`Decoder`] walks the input token by token and asks caller code what to do
//! with every object member ([`Decoder::each_member`]) and array element
//! ([`Decoder::each_value`]). All knowledge about the shape of the data lives
//! in the visitors, which read values with the typed readers
//! ([`Decoder::read`] and friends) or recurse into nested traversals.
//!
//! ```rust
//! use jsonwalk::{DecodeError, Decoder, ElementKind};
//!
//! let mut decoder = Decoder::new(&br#"{"a": 1, "b": [true, null, "x"]}"#[..]);
//! let mut a = 0i64;
//! let mut b = Vec::new();
//! decoder.each_member(|dec, key| match key {
//!     "a" => dec.read_i64(&mut a),
//!     "b" => dec.each_value(|dec, kind| {
//!         match kind {
//!             ElementKind::Boolean => b.push(dec.value::<bool>()?.to_string()),
//!             ElementKind::String => b.push(dec.value::<String>()?),
//!             _ => {} // left unread, skipped by the decoder
//!         }
//!         Ok(())
//!     }),
//!     other => Err(DecodeError::custom(format!("unknown member {other}"))),
//! })?;
//! decoder.finish()?;
//!
//! assert_eq!(a, 1);
//! assert_eq!(b, ["true", "x"]);
//! # Ok::<(), DecodeError>(())
//! ```

mod decoder;
mod error;
mod kind;
mod options;
mod scalar;
mod scanner;
mod value;

#[cfg(test)]
mod tests;

pub use decoder::Decoder;
pub use error::{DecodeError, InvalidByte, Position, SyntaxError};
pub use kind::ElementKind;
pub use options::DecoderOptions;
pub use scalar::Scalar;
pub use scanner::{Scanner, Token, TokenKind};
pub use value::{Array, Map, Value};
