//! # xftmpl
//!
//! Binary encoder for X template definitions.
//!
//! ## What does it do?
//!
//! X files describe structured records (meshes, materials, frames) using
//! *templates*. Templates are usually written in the text dialect:
//!
//! ```text
//! xof 0302txt 0032
//! template Vector {
//!     <3D82AB5E-62DA-11cf-AB39-0020AF71E433>
//!     FLOAT x;
//!     FLOAT y;
//!     FLOAT z;
//! }
//! ```
//!
//! Consumers that register templates at runtime want them in the compact
//! binary dialect instead. This crate lexes the text dialect in a single pass
//! and emits the binary token stream, optionally wrapped in a C header so the
//! result can be compiled into a program.
//!
//! ## Key Features
//!
//! - **Single pass**: one byte of lookahead, no parse tree
//! - **Owned state**: every [`Encoder`] owns its reader and output buffer
//! - **Typed errors**: one [`Error`] variant per failure category, with line
//!   numbers for lexical errors
//! - **Safe output files**: [`PendingOutput`] deletes partial output unless
//!   committed
//!
//! ## Quick Start
//!
//! ```rust
//! use xftmpl::{encode_slice, EncodeOptions};
//!
//! let text = b"xof 0302txt 0032\n\
//!     #pragma xftmpl name vector_template\n\
//!     template Vector { <3D82AB5E-62DA-11cf-AB39-0020AF71E433> FLOAT x; }\n";
//!
//! let encoded = encode_slice(text, &EncodeOptions::new()).unwrap();
//! assert_eq!(&encoded.bytes[..16], b"xof 0302bin 0064");
//! assert_eq!(encoded.directives.var_name.as_deref(), Some("vector_template"));
//!
//! // Render as a C header
//! let mut header = Vec::new();
//! encoded.write_c_header(&mut header, "vector.x", "vector.h").unwrap();
//! let header = String::from_utf8(header).unwrap();
//! assert!(header.contains("#ifndef __WINE_VECTOR_H"));
//! assert!(header.contains("unsigned char vector_template[] = {"));
//! ```
//!
//! ## Binary Format
//!
//! The output is the 16-byte header `xof 0302bin 0064` followed by tokens. See
//! the [`token`] module for the token table.

pub mod buffer;
pub mod cleanup;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod options;
pub mod reader;
pub mod sink;
pub mod token;

pub use buffer::OutputBuffer;
pub use cleanup::{InterruptHook, PendingOutput};
pub use decoder::{decode, Decoded, TokenReader};
pub use encoder::{Directives, Encoded, Encoder};
pub use error::{Error, HeaderError, LexErrorKind, Result};
pub use header::FileHeader;
pub use options::{EncodeOptions, OverflowPolicy, MAX_TOKEN_LEN};
pub use sink::CHeader;
pub use token::{lookup_keyword, Guid, Token, TokenCode};

use std::io;

/// Encode a text-format template file read from `reader`.
///
/// The reader is buffered internally.
///
/// # Examples
///
/// ```rust
/// use xftmpl::{encode, EncodeOptions};
/// use std::io::Cursor;
///
/// let input = Cursor::new(b"xof 0303txt 0064\ntemplate Foo {}\n".to_vec());
/// let encoded = encode(input, &EncodeOptions::new()).unwrap();
/// // header, TEMPLATE, NAME "Foo", "{", "}"
/// assert_eq!(encoded.len(), 16 + 2 + 9 + 2 + 2);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the header is not a supported text
/// header, or the input is lexically invalid.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode<R>(reader: R, options: &EncodeOptions) -> Result<Encoded>
where
    R: io::Read,
{
    Encoder::new(io::BufReader::new(reader), options).encode()
}

/// Encode a text-format template file held in memory.
///
/// # Errors
///
/// Returns an error if the header is not a supported text header or the input
/// is lexically invalid.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_slice(input: &[u8], options: &EncodeOptions) -> Result<Encoded> {
    Encoder::new(input, options).encode()
}

impl Encoded {
    /// Length of the encoded stream, header included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the binary stream as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_raw<W: io::Write>(&self, writer: W) -> Result<()> {
        sink::write_raw(writer, &self.bytes)
    }

    /// Write the stream as a C header.
    ///
    /// `input_name` appears in the banner comment and `output_name` determines
    /// the include guard.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no variable name is known, or an I/O error
    /// if writing fails.
    pub fn write_c_header<W: io::Write>(
        &self,
        writer: W,
        input_name: &str,
        output_name: &str,
    ) -> Result<()> {
        let header = CHeader::for_encoded(self, input_name, output_name)?;
        sink::write_c_header(writer, &self.bytes, &header)
    }
}
