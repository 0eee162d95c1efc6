//! Configuration options for encoding.
//!
//! - [`EncodeOptions`]: main configuration struct
//! - [`OverflowPolicy`]: what to do with tokens longer than [`MAX_TOKEN_LEN`]
//!
//! ## Examples
//!
//! ```rust
//! use xftmpl::{EncodeOptions, OverflowPolicy};
//!
//! // Reproduce the byte output of the legacy tool, which dropped the tail
//! // of over-long names and strings.
//! let options = EncodeOptions::new()
//!     .with_overflow(OverflowPolicy::Truncate)
//!     .with_var_name("templates");
//! assert_eq!(options.var_name.as_deref(), Some("templates"));
//! ```

/// Longest name, string, number or directive line the encoder keeps.
pub const MAX_TOKEN_LEN: usize = 511;

/// Handling of tokens longer than [`MAX_TOKEN_LEN`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Fail with [`LexErrorKind::TokenTooLong`](crate::LexErrorKind::TokenTooLong).
    #[default]
    Reject,
    /// Consume the excess bytes and keep only the first [`MAX_TOKEN_LEN`].
    Truncate,
}

/// Configuration options for encoding.
///
/// `var_name` and `size_name` preset the C header names; when set they take
/// precedence over `#pragma xftmpl` directives found in the input.
#[derive(Clone, Debug, Default)]
pub struct EncodeOptions {
    pub overflow: OverflowPolicy,
    pub var_name: Option<String>,
    pub size_name: Option<String>,
}

impl EncodeOptions {
    /// Creates default options (reject over-long tokens, no preset names).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xftmpl::{EncodeOptions, OverflowPolicy};
    ///
    /// let options = EncodeOptions::new();
    /// assert_eq!(options.overflow, OverflowPolicy::Reject);
    /// assert!(options.var_name.is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Sets the C array variable name.
    #[must_use]
    pub fn with_var_name(mut self, name: impl Into<String>) -> Self {
        self.var_name = Some(name.into());
        self
    }

    /// Sets the name of the C macro defined to the encoded size.
    #[must_use]
    pub fn with_size_name(mut self, name: impl Into<String>) -> Self {
        self.size_name = Some(name.into());
        self
    }
}
