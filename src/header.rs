//! The 16-byte X file signature.
//!
//! ```text
//! offset  0..4   magic         "xof "
//! offset  4..8   version       "0302" | "0303"
//! offset  8..12  encoding      "txt " | "bin "
//! offset 12..16  float width   "0032" | "0064"
//! ```
//!
//! Only text-encoded input is accepted. Whatever variant was read, the encoded
//! output always starts with [`FileHeader::CANONICAL`].

use crate::error::HeaderError;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const HEADER_LEN: usize = 16;

const MAGIC: &[u8; 4] = b"xof ";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    V0302,
    V0303,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    Text,
    Binary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloatWidth {
    Bits32,
    Bits64,
}

/// A validated file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub version: Version,
    pub encoding: Encoding,
    pub float_width: FloatWidth,
}

impl FileHeader {
    /// The header written in front of every encoded stream.
    pub const CANONICAL: [u8; HEADER_LEN] = *b"xof 0302bin 0064";

    /// Validates all four fields, accepting either encoding.
    pub fn parse(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < HEADER_LEN {
            return Err(HeaderError::Truncated);
        }
        let field =
            |range: std::ops::Range<usize>| String::from_utf8_lossy(&bytes[range]).into_owned();

        if &bytes[0..4] != MAGIC {
            return Err(HeaderError::Magic(field(0..4)));
        }
        let version = match &bytes[4..8] {
            b"0302" => Version::V0302,
            b"0303" => Version::V0303,
            _ => return Err(HeaderError::Version(field(4..8))),
        };
        let encoding = match &bytes[8..12] {
            b"txt " => Encoding::Text,
            b"bin " => Encoding::Binary,
            _ => return Err(HeaderError::Encoding(field(8..12))),
        };
        let float_width = match &bytes[12..16] {
            b"0032" => FloatWidth::Bits32,
            b"0064" => FloatWidth::Bits64,
            _ => return Err(HeaderError::FloatSize(field(12..16))),
        };

        Ok(FileHeader {
            version,
            encoding,
            float_width,
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(MAGIC);
        bytes[4..8].copy_from_slice(match self.version {
            Version::V0302 => b"0302",
            Version::V0303 => b"0303",
        });
        bytes[8..12].copy_from_slice(match self.encoding {
            Encoding::Text => b"txt ",
            Encoding::Binary => b"bin ",
        });
        bytes[12..16].copy_from_slice(match self.float_width {
            FloatWidth::Bits32 => b"0032",
            FloatWidth::Bits64 => b"0064",
        });
        bytes
    }
}

/// Validates the header of a text-format input file.
///
/// Binary-encoded input is rejected with [`HeaderError::Encoding`].
///
/// # Examples
///
/// ```rust
/// use xftmpl::header::{classify, FloatWidth};
///
/// let header = classify(b"xof 0303txt 0064").unwrap();
/// assert_eq!(header.float_width, FloatWidth::Bits64);
/// assert!(classify(b"xof 0302bin 0064").is_err());
/// ```
pub fn classify(bytes: &[u8]) -> Result<FileHeader, HeaderError> {
    let header = FileHeader::parse(bytes)?;
    if header.encoding != Encoding::Text {
        return Err(HeaderError::Encoding("bin ".to_string()));
    }
    debug!(
        version = ?header.version,
        float_width = ?header.float_width,
        "accepted text header"
    );
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_is_parseable() {
        let header = FileHeader::parse(&FileHeader::CANONICAL).unwrap();
        assert_eq!(header.encoding, Encoding::Binary);
        assert_eq!(header.to_bytes(), FileHeader::CANONICAL);
    }

    #[test]
    fn test_each_field_is_reported() {
        assert_eq!(
            classify(b"xof 0302txt 003"),
            Err(HeaderError::Truncated)
        );
        assert_eq!(
            classify(b"XOF 0302txt 0032"),
            Err(HeaderError::Magic("XOF ".to_string()))
        );
        assert_eq!(
            classify(b"xof 0304txt 0032"),
            Err(HeaderError::Version("0304".to_string()))
        );
        assert_eq!(
            classify(b"xof 0302tzip0032"),
            Err(HeaderError::Encoding("tzip".to_string()))
        );
        assert_eq!(
            classify(b"xof 0302txt 0016"),
            Err(HeaderError::FloatSize("0016".to_string()))
        );
    }

    #[test]
    fn test_field_order_magic_first() {
        assert!(matches!(
            classify(b"abcd9999bin 0000"),
            Err(HeaderError::Magic(_))
        ));
    }
}
