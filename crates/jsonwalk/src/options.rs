use crate::scanner::DEFAULT_BUFFER_CAPACITY;

/// Configuration for a [`Decoder`](crate::Decoder).
///
/// # Examples
///
/// ```rust
/// use jsonwalk::{Decoder, DecoderOptions};
///
/// let options = DecoderOptions {
///     max_depth: 16,
///     ..Default::default()
/// };
/// let mut decoder = Decoder::with_options(&b"{}"[..], options);
/// decoder.each_member(|_, _| Ok(())).unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Maximum number of nested objects and arrays.
    ///
    /// Traversal is recursive, so this also bounds stack use. Entering a
    /// container beyond the limit fails with
    /// [`DecodeError::DepthExceeded`](crate::DecodeError::DepthExceeded).
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: usize,

    /// Whether to skip a member or element value that the visitor left
    /// unread.
    ///
    /// Visitors are expected to consume exactly one value each time they are
    /// called. With this enabled, a visitor that returns without reading
    /// anything (for example on an unknown key) has the value skipped for it.
    /// With it disabled, such a visitor desynchronizes the decoder and the
    /// next token is reported as a structural error.
    ///
    /// # Default
    ///
    /// `true`
    pub skip_unconsumed_values: bool,

    /// Size in bytes of the read buffer.
    ///
    /// # Default
    ///
    /// `8192`
    pub buffer_capacity: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_depth: 128,
            skip_unconsumed_values: true,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}
