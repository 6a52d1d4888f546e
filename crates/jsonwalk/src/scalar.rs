use std::io::Read;

use crate::{
    decoder::Decoder,
    error::DecodeError,
    kind::ElementKind,
    value::{Map, Value},
};

/// Types the decoder can read directly off the stream with
/// [`Decoder::read`] and [`Decoder::value`].
///
/// Besides the primitives this covers [`Map`] and [`Value`] for sub-documents
/// that should be decoded generically, and `Option<T>` which maps `null` to
/// `None`.
pub trait Scalar: Sized {
    /// Consumes exactly one value from `decoder`.
    ///
    /// # Errors
    ///
    /// Fails if the next value cannot be represented as `Self`.
    fn decode<R: Read>(decoder: &mut Decoder<R>) -> Result<Self, DecodeError>;
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {$(
        impl Scalar for $ty {
            fn decode<R: Read>(decoder: &mut Decoder<R>) -> Result<Self, DecodeError> {
                decoder.scanner_mut().read_integer(stringify!($ty))
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Scalar for f32 {
    fn decode<R: Read>(decoder: &mut Decoder<R>) -> Result<Self, DecodeError> {
        decoder.scanner_mut().read_f32()
    }
}

impl Scalar for f64 {
    fn decode<R: Read>(decoder: &mut Decoder<R>) -> Result<Self, DecodeError> {
        decoder.scanner_mut().read_f64()
    }
}

impl Scalar for bool {
    fn decode<R: Read>(decoder: &mut Decoder<R>) -> Result<Self, DecodeError> {
        decoder.scanner_mut().read_bool()
    }
}

impl Scalar for String {
    fn decode<R: Read>(decoder: &mut Decoder<R>) -> Result<Self, DecodeError> {
        decoder.scanner_mut().read_str().map(str::to_owned)
    }
}

impl Scalar for Map {
    fn decode<R: Read>(decoder: &mut Decoder<R>) -> Result<Self, DecodeError> {
        let mut map = Map::new();
        decoder.read_map(&mut map)?;
        Ok(map)
    }
}

impl Scalar for Value {
    fn decode<R: Read>(decoder: &mut Decoder<R>) -> Result<Self, DecodeError> {
        decoder.read_value()
    }
}

impl<T: Scalar> Scalar for Option<T> {
    fn decode<R: Read>(decoder: &mut Decoder<R>) -> Result<Self, DecodeError> {
        if decoder.peek_kind()? == ElementKind::Null {
            decoder.scanner_mut().read_null()?;
            Ok(None)
        } else {
            T::decode(decoder).map(Some)
        }
    }
}
