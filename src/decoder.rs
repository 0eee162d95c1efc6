//! Binary token stream decoding.
//!
//! The inverse of the encoder, for inspecting and verifying encoded output:
//!
//! ```rust
//! use xftmpl::{decode, encode_slice, EncodeOptions, Token, TokenCode};
//!
//! let encoded = encode_slice(b"xof 0302txt 0032 template Mesh {}", &EncodeOptions::new()).unwrap();
//! let decoded = decode(&encoded.bytes).unwrap();
//! assert_eq!(
//!     decoded.tokens,
//!     vec![
//!         Token::Symbol(TokenCode::Template),
//!         Token::Name(b"Mesh".to_vec()),
//!         Token::Symbol(TokenCode::OBrace),
//!         Token::Symbol(TokenCode::CBrace),
//!     ]
//! );
//! ```
//!
//! Code 42 is read as the bare `FLOAT` keyword. Float literals written by the
//! encoder reuse that code with a payload, so streams containing them cannot be
//! decoded unambiguously. When the bytes after a code 42 do not start another
//! token, the decoder reports the ambiguous float payload at the offset of the
//! code rather than failing somewhere inside it.

use crate::header::{Encoding, FileHeader, HEADER_LEN};
use crate::token::{Guid, Token, TokenCode};
use crate::{Error, Result};

/// A decoded binary stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded {
    pub header: FileHeader,
    pub tokens: Vec<Token>,
}

/// Iterator over the tokens of a header-less binary stream.
pub struct TokenReader<'a> {
    input: &'a [u8],
    position: usize,
    /// Offset of `input[0]` within the original stream, for error messages.
    base: usize,
}

impl<'a> TokenReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        TokenReader {
            input,
            position: 0,
            base: 0,
        }
    }

    fn with_base(input: &'a [u8], base: usize) -> Self {
        TokenReader {
            input,
            position: 0,
            base,
        }
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        let end = self.position.checked_add(len).filter(|&end| end <= self.input.len());
        match end {
            Some(end) => {
                let bytes = &self.input[self.position..end];
                self.position = end;
                Ok(bytes)
            }
            None => Err(Error::decode(
                self.base + self.position,
                &format!("truncated {}", what),
            )),
        }
    }

    fn take_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn take_u32(&mut self, what: &str) -> Result<u32> {
        self.take_array(what).map(u32::from_le_bytes)
    }

    fn take_count(&mut self, what: &str) -> Result<usize> {
        let count = self.take_u32(what)? as usize;
        if count > (self.input.len() - self.position) / 4 {
            return Err(Error::decode(
                self.base + self.position,
                &format!("truncated {}", what),
            ));
        }
        Ok(count)
    }

    fn read_token(&mut self) -> Result<Token> {
        let start = self.base + self.position;
        let raw = u16::from_le_bytes(self.take_array("token code")?);
        let code = TokenCode::from_u16(raw)
            .ok_or_else(|| Error::decode(start, &format!("unknown token code {}", raw)))?;

        let token = match code {
            TokenCode::Name | TokenCode::String => {
                let len = self.take_u32("length")? as usize;
                let bytes = self.take(len, "token text")?.to_vec();
                if code == TokenCode::Name {
                    Token::Name(bytes)
                } else {
                    Token::String(bytes)
                }
            }
            TokenCode::Integer => Token::Integer(i32::from_le_bytes(self.take_array("integer")?)),
            TokenCode::Guid => Token::Guid(Guid::from_bytes(&self.take_array("GUID")?)),
            TokenCode::IntegerList => {
                let count = self.take_count("integer list")?;
                let values = (0..count)
                    .map(|_| self.take_u32("integer list"))
                    .collect::<Result<Vec<_>>>()?;
                Token::IntegerList(values)
            }
            TokenCode::FloatList => {
                let count = self.take_count("float list")?;
                let values = (0..count)
                    .map(|_| self.take_array("float list").map(f32::from_le_bytes))
                    .collect::<Result<Vec<_>>>()?;
                Token::FloatList(values)
            }
            TokenCode::Float if !self.code_follows() => {
                return Err(Error::decode(start, "float literal payload is ambiguous"));
            }
            bare => Token::Symbol(bare),
        };
        Ok(token)
    }

    /// True at end of input or when the next two bytes form a known code.
    fn code_follows(&self) -> bool {
        match self.input.get(self.position..self.position + 2) {
            Some(&[lo, hi]) => TokenCode::from_u16(u16::from_le_bytes([lo, hi])).is_some(),
            Some(_) => false,
            None => self.position == self.input.len(),
        }
    }
}

impl Iterator for TokenReader<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.input.len() {
            return None;
        }
        let result = self.read_token();
        if result.is_err() {
            // Stop after the first error; the rest of the stream is unaligned.
            self.position = self.input.len();
        }
        Some(result)
    }
}

/// Decodes a complete binary stream, header included.
///
/// # Errors
///
/// Returns an error if the header is not a binary X file header, or if the
/// token stream holds an unknown code or a truncated payload.
pub fn decode(bytes: &[u8]) -> Result<Decoded> {
    let header = FileHeader::parse(bytes)?;
    if header.encoding != Encoding::Binary {
        return Err(Error::decode(8, "not a binary encoded stream"));
    }
    let tokens = TokenReader::with_base(&bytes[HEADER_LEN..], HEADER_LEN)
        .collect::<Result<Vec<_>>>()?;
    Ok(Decoded { header, tokens })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists() {
        let mut stream = vec![6, 0, 2, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0];
        stream.extend_from_slice(&[7, 0, 1, 0, 0, 0]);
        stream.extend_from_slice(&1.5f32.to_le_bytes());
        let tokens = TokenReader::new(&stream)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(
            tokens,
            vec![Token::IntegerList(vec![1, 2]), Token::FloatList(vec![1.5])]
        );
    }

    #[test]
    fn test_unknown_code() {
        let err = decode(&[&FileHeader::CANONICAL[..], &[4u8, 0][..]].concat()).unwrap_err();
        assert_eq!(err, Error::decode(16, "unknown token code 4"));
    }

    #[test]
    fn test_truncated_name() {
        let mut reader = TokenReader::new(&[1, 0, 9, 0, 0, 0, b'a']);
        assert_eq!(
            reader.next(),
            Some(Err(Error::decode(6, "truncated token text")))
        );
        assert_eq!(reader.next(), None);
    }

    #[test]
    fn test_oversized_list_count() {
        let mut reader = TokenReader::new(&[6, 0, 255, 255, 255, 255]);
        assert!(matches!(reader.next(), Some(Err(Error::Decode { .. }))));
    }

    #[test]
    fn test_float_literal_payload_reported() {
        let mut stream = FileHeader::CANONICAL.to_vec();
        stream.extend_from_slice(&[42, 0]);
        stream.extend_from_slice(&3.5f32.to_le_bytes());
        assert_eq!(
            decode(&stream).unwrap_err(),
            Error::decode(16, "float literal payload is ambiguous")
        );
    }

    #[test]
    fn test_float_keyword_decodes() {
        let stream = [42, 0, 1, 0, 1, 0, 0, 0, b'x', 20, 0, 42, 0];
        let tokens = TokenReader::new(&stream)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Symbol(TokenCode::Float),
                Token::Name(b"x".to_vec()),
                Token::Symbol(TokenCode::Semicolon),
                Token::Symbol(TokenCode::Float),
            ]
        );
    }

    #[test]
    fn test_text_header_rejected() {
        assert!(decode(b"xof 0302txt 0032").is_err());
    }
}
