//! Error types for X template encoding.
//!
//! Every failure is fatal to the run that produced it: the encoder stops at the
//! first error and returns it, and no partial token stream is ever handed out.
//!
//! ## Error Categories
//!
//! - **Usage Errors**: bad command-line arguments
//! - **Header Errors**: the 16-byte file signature names an unsupported format
//! - **Lexical Errors**: malformed input text, reported with a line number
//! - **Resource Errors**: I/O failures and allocation failures
//! - **Configuration Errors**: C header output requested without a variable name
//! - **Decode Errors**: malformed binary token streams fed to the decoder
//!
//! ## Examples
//!
//! ```rust
//! use xftmpl::{encode_slice, EncodeOptions, Error};
//!
//! let result = encode_slice(b"xof 0302txt 0032\n\"abc", &EncodeOptions::new());
//! match result {
//!     Err(Error::Lex { line, .. }) => assert_eq!(line, 2),
//!     other => panic!("expected a lexical error, got {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while encoding or decoding X templates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Bad command-line usage
    #[error("{0}")]
    Usage(String),

    /// The input file signature was rejected
    #[error(transparent)]
    Header(#[from] HeaderError),

    /// Lexical error at a given input line
    #[error("line {line}: {kind}")]
    Lex { line: usize, kind: LexErrorKind },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The output buffer could not grow
    #[error("out of memory (requested {requested} bytes)")]
    OutOfMemory { requested: usize },

    /// Inconsistent output configuration, with the last input line when it
    /// was detected after reading the input
    #[error("{msg}")]
    Config { line: Option<usize>, msg: String },

    /// Malformed binary token stream
    #[error("invalid token stream at offset {offset}: {msg}")]
    Decode { offset: usize, msg: String },
}

/// Identifies which field of the 16-byte file header failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("failed to read file header")]
    Truncated,

    #[error("invalid magic value '{0}'")]
    Magic(String),

    #[error("unsupported version '{0}'")]
    Version(String),

    /// Binary (or any non-text) encoded input
    #[error("only text encoded X files are supported, not '{0}'")]
    Encoding(String),

    #[error("only 32-bit or 64-bit float format supported, not '{0}'")]
    FloatSize(String),
}

/// The specific lexical rule an input violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("invalid single '/' comment token")]
    InvalidComment,

    #[error("line too long")]
    LineTooLong,

    #[error("truncated GUID")]
    TruncatedGuid,

    #[error("invalid GUID '{0}'")]
    InvalidGuid(String),

    #[error("unterminated string")]
    UnterminatedString,

    #[error("invalid float token '{0}'")]
    InvalidFloat(String),

    #[error("invalid integer token '{0}'")]
    InvalidInteger(String),

    #[error("invalid character '{}' to start token", .0.escape_ascii())]
    InvalidCharacter(u8),

    /// A name, string, number or directive exceeded the token length limit
    #[error("{what} longer than {limit} bytes")]
    TokenTooLong { what: &'static str, limit: usize },
}

impl Error {
    /// Creates a lexical error at the given line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xftmpl::{Error, LexErrorKind};
    ///
    /// let err = Error::lex(7, LexErrorKind::UnterminatedString);
    /// assert_eq!(err.to_string(), "line 7: unterminated string");
    /// ```
    pub fn lex(line: usize, kind: LexErrorKind) -> Self {
        Error::Lex { line, kind }
    }

    /// Creates a decode error at a byte offset of the token stream.
    pub fn decode(offset: usize, msg: &str) -> Self {
        Error::Decode {
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates a configuration error.
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config {
            line: None,
            msg: msg.to_string(),
        }
    }

    /// Creates a configuration error found once the input ended at `line`.
    pub fn config_at<T: fmt::Display>(line: usize, msg: T) -> Self {
        Error::Config {
            line: Some(line),
            msg: msg.to_string(),
        }
    }

    /// Creates a usage error.
    pub fn usage<T: fmt::Display>(msg: T) -> Self {
        Error::Usage(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the input line for lexical and configuration errors.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Lex { line, .. } => Some(*line),
            Error::Config { line, .. } => *line,
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_character_is_escaped() {
        let err = Error::lex(3, LexErrorKind::InvalidCharacter(b'\x01'));
        assert_eq!(
            err.to_string(),
            "line 3: invalid character '\\x01' to start token"
        );
        let err = Error::lex(3, LexErrorKind::InvalidCharacter(b'@'));
        assert_eq!(err.to_string(), "line 3: invalid character '@' to start token");
    }

    #[test]
    fn test_header_error_is_transparent() {
        let err: Error = HeaderError::Version("0401".to_string()).into();
        assert_eq!(err.to_string(), "unsupported version '0401'");
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_config_error_line() {
        let err = Error::config_at(12, "no name");
        assert_eq!(err.to_string(), "no name");
        assert_eq!(err.line(), Some(12));
        assert_eq!(Error::config("no name").line(), None);
    }
}
