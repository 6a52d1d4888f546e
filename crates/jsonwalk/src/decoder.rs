//! Visitor-driven traversal.
//!
//! The decoder keeps no tree of its own. [`Decoder::each_member`] and
//! [`Decoder::each_value`] walk one object or array and hand control to a
//! visitor for every member or element; the visitor reads the value with one
//! of the typed readers or recurses into another traversal.
//!
//! Contract
//! - A visitor consumes exactly one value per call.
//! - Every read API consumes a whole value, so a visitor can only get this
//!   wrong by reading nothing or by reading too much. Reading nothing is
//!   repaired by skipping the value when
//!   [`DecoderOptions::skip_unconsumed_values`] is set. Reading too much is
//!   always caught by the separator check that follows the visitor.
//!
//! Invariants
//! - When a traversal returns `Ok`, the scanner is positioned right after the
//!   closing `}` or `]` and no token is pending.
//! - At most one token is pending at a time; see [`Scanner::push_back`].
use std::io::Read;

use log::{debug, trace};

use crate::{
    error::{DecodeError, Position},
    kind::ElementKind,
    options::DecoderOptions,
    scalar::Scalar,
    scanner::{Scanner, Token, TokenKind},
    value::{Map, Value},
};

/// Reads JSON from a byte stream through caller-supplied visitors.
///
/// # Examples
///
/// ```rust
/// use jsonwalk::{Decoder, ElementKind};
///
/// let input = r#"{"name": "walk", "tags": ["a", "b"], "size": 3}"#;
/// let mut decoder = Decoder::new(input.as_bytes());
///
/// let (mut name, mut tags, mut size) = (String::new(), Vec::new(), 0u32);
/// decoder
///     .each_member(|dec, key| match key {
///         "name" => dec.read_string(&mut name),
///         "size" => dec.read_u32(&mut size),
///         "tags" => dec.each_value(|dec, kind| {
///             assert_eq!(kind, ElementKind::String);
///             tags.push(dec.value::<String>()?);
///             Ok(())
///         }),
///         _ => Ok(()),
///     })
///     .unwrap();
/// decoder.finish().unwrap();
///
/// assert_eq!((name.as_str(), tags.len(), size), ("walk", 2, 3));
/// ```
#[derive(Debug)]
pub struct Decoder<R> {
    scanner: Scanner<R>,
    options: DecoderOptions,
    depth: usize,
}

impl<R: Read> Decoder<R> {
    /// Creates a decoder reading from `reader` with default options.
    ///
    /// The decoder buffers its input and may read past the end of the values
    /// it is asked for.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecoderOptions::default())
    }

    /// Creates a decoder reading from `reader` with the given options.
    pub fn with_options(reader: R, options: DecoderOptions) -> Self {
        Self {
            scanner: Scanner::with_capacity(reader, options.buffer_capacity),
            options,
            depth: 0,
        }
    }

    /// The options this decoder was created with.
    #[must_use]
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Where the next token starts, or the next unread byte.
    #[must_use]
    pub fn position(&self) -> Position {
        self.scanner.position()
    }

    /// Number of objects and arrays currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn scanner_mut(&mut self) -> &mut Scanner<R> {
        &mut self.scanner
    }

    // --------------------------------------------------------------------------------------------
    // Traversal
    // --------------------------------------------------------------------------------------------

    /// Iterates over the members of an object, calling `visit` with each key
    /// in document order.
    ///
    /// `visit` must consume the member's value, for instance with
    /// [`read`](Self::read) or a nested traversal. A `null` in place of the
    /// object is accepted as an absent object: it is consumed and `visit` is
    /// never called.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::Structural`] on anything but a well-formed
    /// object, and passes on errors from the scanner and from `visit`.
    pub fn each_member<F>(&mut self, mut visit: F) -> Result<(), DecodeError>
    where
        F: FnMut(&mut Self, &str) -> Result<(), DecodeError>,
    {
        let token = self.scanner.next_token()?;
        match token.kind {
            TokenKind::Null => return Ok(()),
            TokenKind::BeginObject => {}
            _ => return Err(self.scanner.unexpected(token, "'{'")),
        }
        self.enter(token)?;
        let result = self.visit_members(&mut visit);
        self.depth -= 1;
        result
    }

    fn visit_members<F>(&mut self, visit: &mut F) -> Result<(), DecodeError>
    where
        F: FnMut(&mut Self, &str) -> Result<(), DecodeError>,
    {
        let mut index = 0usize;
        loop {
            let token = self.scanner.next_token()?;
            let key = match token.kind {
                TokenKind::EndObject => return Ok(()),
                TokenKind::String if index == 0 => token,
                TokenKind::Comma if index > 0 => self.scanner.next_token()?,
                _ if index == 0 => return Err(self.scanner.unexpected(token, "string or '}'")),
                _ => return Err(self.scanner.unexpected(token, "',' or '}'")),
            };
            if key.kind != TokenKind::String {
                return Err(self.scanner.unexpected(key, "string"));
            }
            let key = self.scanner.take_text();

            let colon = self.scanner.next_token()?;
            if colon.kind != TokenKind::Colon {
                return Err(self.scanner.unexpected(colon, "':'"));
            }

            let consumed = self.scanner.tokens_consumed();
            visit(self, &key)?;
            if self.scanner.tokens_consumed() == consumed && self.options.skip_unconsumed_values {
                debug!("skipping unread value of member {key:?} at {}", self.scanner.position());
                self.skip_value()?;
            }
            self.scanner.recycle(key);
            index += 1;
        }
    }

    /// Iterates over the elements of an array, calling `visit` with the kind
    /// of each element before it is read.
    ///
    /// The kind tells the visitor which read is going to succeed: a scalar
    /// read for scalar kinds, [`each_member`](Self::each_member) for
    /// [`ElementKind::Object`] and [`each_value`](Self::each_value) for
    /// [`ElementKind::Array`]. As with objects, `visit` must consume the
    /// element.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::Structural`] on anything but a well-formed
    /// array, and passes on errors from the scanner and from `visit`.
    pub fn each_value<F>(&mut self, mut visit: F) -> Result<(), DecodeError>
    where
        F: FnMut(&mut Self, ElementKind) -> Result<(), DecodeError>,
    {
        let token = self.scanner.next_token()?;
        if token.kind != TokenKind::BeginArray {
            return Err(self.scanner.unexpected(token, "'['"));
        }
        self.enter(token)?;
        let result = self.visit_elements(&mut visit);
        self.depth -= 1;
        result
    }

    fn visit_elements<F>(&mut self, visit: &mut F) -> Result<(), DecodeError>
    where
        F: FnMut(&mut Self, ElementKind) -> Result<(), DecodeError>,
    {
        let mut index = 0usize;
        loop {
            let token = self.scanner.next_token()?;
            match token.kind {
                TokenKind::EndArray => return Ok(()),
                TokenKind::Comma if index > 0 => {}
                TokenKind::Comma => return Err(self.scanner.unexpected(token, "value or ']'")),
                _ if index == 0 => self.scanner.push_back(token),
                _ => return Err(self.scanner.unexpected(token, "',' or ']'")),
            }

            let kind = self.peek_kind()?;
            let consumed = self.scanner.tokens_consumed();
            visit(self, kind)?;
            if self.scanner.tokens_consumed() == consumed && self.options.skip_unconsumed_values {
                debug!("skipping unread {kind} element {index} at {}", self.scanner.position());
                self.skip_value()?;
            }
            index += 1;
        }
    }

    fn enter(&mut self, token: Token) -> Result<(), DecodeError> {
        if self.depth >= self.options.max_depth {
            debug!("nesting deeper than {} at {}", self.options.max_depth, token.position);
            return Err(DecodeError::DepthExceeded {
                limit: self.options.max_depth,
                position: token.position,
            });
        }
        self.depth += 1;
        trace!("enter {} at {} (depth {})", token.kind, token.position, self.depth);
        Ok(())
    }

    /// Returns the kind of the next value without consuming it.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::Structural`] if the next token cannot start
    /// a value.
    pub fn peek_kind(&mut self) -> Result<ElementKind, DecodeError> {
        let token = self.scanner.next_token()?;
        if !token.kind.starts_value() {
            return Err(self.scanner.unexpected(token, "value"));
        }
        let kind = ElementKind::classify(token.kind, token.position);
        self.scanner.push_back(token);
        Ok(kind)
    }

    /// Reads and discards the next value, however deeply nested.
    ///
    /// # Errors
    ///
    /// Fails if the value is malformed or nests deeper than
    /// [`DecoderOptions::max_depth`].
    pub fn skip_value(&mut self) -> Result<(), DecodeError> {
        match self.peek_kind()? {
            ElementKind::Object => self.each_member(|dec, _| dec.skip_value()),
            ElementKind::Array => self.each_value(|dec, _| dec.skip_value()),
            _ => self.scanner.next_token().map(drop),
        }
    }

    /// Returns `true` once only whitespace is left in the input.
    ///
    /// Useful for reading a stream of concatenated documents.
    ///
    /// # Errors
    ///
    /// Passes on scanner errors.
    pub fn at_end(&mut self) -> Result<bool, DecodeError> {
        let token = self.scanner.next_token()?;
        let end = token.kind == TokenKind::Eof;
        self.scanner.push_back(token);
        Ok(end)
    }

    /// Checks that the input holds nothing but whitespace after the values
    /// read so far.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::Structural`] on trailing content.
    pub fn finish(mut self) -> Result<(), DecodeError> {
        let token = self.scanner.next_token()?;
        if token.kind == TokenKind::Eof {
            trace!("finished at {}", token.position);
            Ok(())
        } else {
            Err(self.scanner.unexpected(token, "end of input"))
        }
    }

    // --------------------------------------------------------------------------------------------
    // Scalar reads
    // --------------------------------------------------------------------------------------------

    /// Reads the next value into `target`.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::TypeMismatch`] if the next value cannot be
    /// read as `T`, or [`DecodeError::InvalidNumber`] if a number does not fit.
    pub fn read<T: Scalar>(&mut self, target: &mut T) -> Result<(), DecodeError> {
        *target = T::decode(self)?;
        Ok(())
    }

    /// Reads the next value as `T`.
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn value<T: Scalar>(&mut self) -> Result<T, DecodeError> {
        T::decode(self)
    }

    /// Reads a string into `target`, reusing its allocation.
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_string(&mut self, target: &mut String) -> Result<(), DecodeError> {
        let s = self.scanner.read_str()?;
        target.clear();
        target.push_str(s);
        Ok(())
    }

    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_i32(&mut self, target: &mut i32) -> Result<(), DecodeError> {
        self.read(target)
    }

    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_i64(&mut self, target: &mut i64) -> Result<(), DecodeError> {
        self.read(target)
    }

    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_u32(&mut self, target: &mut u32) -> Result<(), DecodeError> {
        self.read(target)
    }

    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_u64(&mut self, target: &mut u64) -> Result<(), DecodeError> {
        self.read(target)
    }

    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_f32(&mut self, target: &mut f32) -> Result<(), DecodeError> {
        self.read(target)
    }

    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_f64(&mut self, target: &mut f64) -> Result<(), DecodeError> {
        self.read(target)
    }

    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_bool(&mut self, target: &mut bool) -> Result<(), DecodeError> {
        self.read(target)
    }

    /// Decodes an object generically, inserting its members into `target`.
    ///
    /// Existing entries are kept unless the object has the same key. A `null`
    /// leaves `target` untouched.
    ///
    /// # Errors
    ///
    /// Fails on anything but an object or `null`.
    pub fn read_map(&mut self, target: &mut Map) -> Result<(), DecodeError> {
        self.each_member(|dec, key| {
            let value = dec.read_value()?;
            target.insert(key.to_owned(), value);
            Ok(())
        })
    }

    /// Decodes the next value, whatever its kind, into a [`Value`].
    ///
    /// # Errors
    ///
    /// Fails if the value is malformed or nests deeper than
    /// [`DecoderOptions::max_depth`].
    pub fn read_value(&mut self) -> Result<Value, DecodeError> {
        Ok(match self.peek_kind()? {
            ElementKind::String => Value::String(self.scanner.read_str()?.to_owned()),
            ElementKind::Number => Value::Number(self.scanner.read_f64()?),
            ElementKind::Boolean => Value::Boolean(self.scanner.read_bool()?),
            ElementKind::Null => {
                self.scanner.read_null()?;
                Value::Null
            }
            ElementKind::Object => {
                let mut map = Map::new();
                self.read_map(&mut map)?;
                Value::Object(map)
            }
            ElementKind::Array => {
                let mut array = Vec::new();
                self.each_value(|dec, _| {
                    array.push(dec.read_value()?);
                    Ok(())
                })?;
                Value::Array(array)
            }
        })
    }
}
