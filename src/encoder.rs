//! Text-to-binary token encoding.
//!
//! This module provides the [`Encoder`], a single-pass lexer that reads the
//! text dialect of X template definitions byte by byte and appends binary
//! tokens to an owned [`OutputBuffer`].
//!
//! ## Overview
//!
//! - **No parse tree**: every lexeme is encoded as soon as it ends
//! - **One byte of lookahead**: a token ends at the first byte that cannot
//!   continue it, and that byte is pushed back
//! - **Comments and directives are stripped**: `//` comments vanish, and
//!   `#pragma xftmpl name|size VALUE` lines are collected into [`Directives`]
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use xftmpl::{encode_slice, EncodeOptions};
//!
//! let input = b"xof 0302txt 0032\ntemplate Foo { <00000000-0000-0000-0000-000000000000> }\n";
//! let encoded = encode_slice(input, &EncodeOptions::new()).unwrap();
//! assert_eq!(&encoded.bytes[..16], b"xof 0302bin 0064");
//! ```

use crate::buffer::OutputBuffer;
use crate::error::LexErrorKind;
use crate::header::{self, FileHeader, HEADER_LEN};
use crate::options::{EncodeOptions, OverflowPolicy, MAX_TOKEN_LEN};
use crate::reader::ByteReader;
use crate::token::{lookup_keyword, Guid, Token, TokenCode};
use crate::{Error, Result};
use std::io::BufRead;
use tracing::{debug, trace};

/// C header names gathered from options and `#pragma xftmpl` directives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directives {
    pub var_name: Option<String>,
    pub size_name: Option<String>,
}

impl Directives {
    fn apply_pragma(&mut self, line: &[u8]) {
        let mut words = line
            .split(|&b| matches!(b, b' ' | b'\t' | b'\r'))
            .filter(|word| !word.is_empty());

        if words.next() != Some(&b"pragma"[..]) || words.next() != Some(&b"xftmpl"[..]) {
            return;
        }
        let slot = match words.next() {
            Some(b"name") => &mut self.var_name,
            Some(b"size") => &mut self.size_name,
            _ => return,
        };
        if slot.is_some() {
            return;
        }
        if let Some(value) = words.next() {
            let value = String::from_utf8_lossy(value).into_owned();
            debug!(%value, "pragma xftmpl");
            *slot = Some(value);
        }
    }
}

/// Result of a successful encoding run.
#[derive(Clone, Debug, PartialEq)]
pub struct Encoded {
    /// Canonical header followed by the token stream.
    pub bytes: Vec<u8>,
    pub directives: Directives,
    /// Line number the input ended on.
    pub lines: usize,
}

/// The text-to-binary encoder.
///
/// Owns its reader and output buffer; independent encoders share nothing.
pub struct Encoder<R> {
    reader: ByteReader<R>,
    output: OutputBuffer,
    overflow: OverflowPolicy,
    directives: Directives,
}

impl<R: BufRead> Encoder<R> {
    pub fn new(input: R, options: &EncodeOptions) -> Self {
        Encoder {
            reader: ByteReader::new(input),
            output: OutputBuffer::with_capacity(256),
            overflow: options.overflow,
            directives: Directives {
                var_name: options.var_name.clone(),
                size_name: options.size_name.clone(),
            },
        }
    }

    /// Validates the input header and encodes the whole input.
    pub fn encode(mut self) -> Result<Encoded> {
        let mut raw = [0u8; HEADER_LEN];
        let read = self.reader.read_raw(&mut raw)?;
        header::classify(&raw[..read])?;
        self.output.write_bytes(&FileHeader::CANONICAL)?;

        while self.next_token()? {}

        debug!(
            bytes = self.output.len(),
            lines = self.reader.line(),
            "encoding finished"
        );
        Ok(Encoded {
            bytes: self.output.into_inner(),
            directives: self.directives,
            lines: self.reader.line(),
        })
    }

    fn error(&self, kind: LexErrorKind) -> Error {
        Error::lex(self.reader.line(), kind)
    }

    fn emit(&mut self, token: Token) -> Result<()> {
        trace!(line = self.reader.line(), %token, "emit");
        self.output.write_token(&token)
    }

    /// Appends `byte` to a token under construction, honoring the overflow policy.
    fn push_limited(&self, buf: &mut Vec<u8>, byte: u8, what: &'static str) -> Result<()> {
        if buf.len() < MAX_TOKEN_LEN {
            buf.push(byte);
            return Ok(());
        }
        match self.overflow {
            OverflowPolicy::Truncate => Ok(()),
            OverflowPolicy::Reject => Err(self.error(LexErrorKind::TokenTooLong {
                what,
                limit: MAX_TOKEN_LEN,
            })),
        }
    }

    /// Lexes one token. Returns `false` once the input is exhausted.
    fn next_token(&mut self) -> Result<bool> {
        let Some(c) = self.reader.read()? else {
            return Ok(false);
        };

        match c {
            b'\n' | b'\r' | b' ' | b'\t' => {}
            b'/' => return self.skip_comment(),
            b'#' => self.directive()?,
            b'<' => self.guid()?,
            b'"' => self.string()?,
            _ => {
                if let Some(code) = TokenCode::punctuation(c) {
                    self.emit(Token::Symbol(code))?;
                } else if c.is_ascii_digit() || c == b'-' {
                    self.reader.unread(c);
                    self.number()?;
                } else if c.is_ascii_alphabetic() || c == b'_' {
                    self.reader.unread(c);
                    self.name()?;
                } else {
                    return Err(self.error(LexErrorKind::InvalidCharacter(c)));
                }
            }
        }
        Ok(true)
    }

    fn skip_comment(&mut self) -> Result<bool> {
        if self.reader.read()? != Some(b'/') {
            return Err(self.error(LexErrorKind::InvalidComment));
        }
        loop {
            match self.reader.read()? {
                Some(b'\n') => return Ok(true),
                Some(_) => {}
                None => return Ok(false),
            }
        }
    }

    fn directive(&mut self) -> Result<()> {
        let mut line = Vec::new();
        loop {
            match self.reader.read()? {
                Some(b'\n') => break,
                Some(c) => {
                    if line.len() < MAX_TOKEN_LEN {
                        line.push(c);
                    } else if self.overflow == OverflowPolicy::Reject {
                        return Err(self.error(LexErrorKind::LineTooLong));
                    }
                }
                None => return Err(self.error(LexErrorKind::LineTooLong)),
            }
        }
        self.directives.apply_pragma(&line);
        Ok(())
    }

    fn guid(&mut self) -> Result<()> {
        let mut text = [0u8; Guid::TEXT_LEN];
        text[0] = b'<';
        if self.reader.read_raw(&mut text[1..])? < Guid::TEXT_LEN - 1 {
            return Err(self.error(LexErrorKind::TruncatedGuid));
        }
        let guid = Guid::parse_braced(&text).ok_or_else(|| {
            self.error(LexErrorKind::InvalidGuid(
                String::from_utf8_lossy(&text).into_owned(),
            ))
        })?;
        self.emit(Token::Guid(guid))
    }

    fn string(&mut self) -> Result<()> {
        let mut value = Vec::new();
        loop {
            match self.reader.read()? {
                Some(b'"') => break,
                Some(c) => self.push_limited(&mut value, c, "string")?,
                None => return Err(self.error(LexErrorKind::UnterminatedString)),
            }
        }
        self.emit(Token::String(value))
    }

    fn number(&mut self) -> Result<()> {
        let mut text = Vec::new();
        let mut seen_dot = false;
        let mut first = true;
        while let Some(c) = self.reader.read()? {
            let accept = (first && c == b'-') || (!seen_dot && c == b'.') || c.is_ascii_digit();
            if !accept {
                self.reader.unread(c);
                break;
            }
            self.push_limited(&mut text, c, "number")?;
            seen_dot |= c == b'.';
            first = false;
        }

        // The accepted alphabet is pure ASCII.
        let text = String::from_utf8_lossy(&text);
        let token = if seen_dot {
            let value = text
                .parse::<f32>()
                .map_err(|_| self.error(LexErrorKind::InvalidFloat(text.to_string())))?;
            Token::Float(value)
        } else {
            let value = text
                .parse::<i32>()
                .map_err(|_| self.error(LexErrorKind::InvalidInteger(text.to_string())))?;
            Token::Integer(value)
        };
        self.emit(token)
    }

    fn name(&mut self) -> Result<()> {
        let mut name = Vec::new();
        while let Some(c) = self.reader.read()? {
            if !(c.is_ascii_alphanumeric() || c == b'_' || c == b'-') {
                self.reader.unread(c);
                break;
            }
            self.push_limited(&mut name, c, "name")?;
        }

        match lookup_keyword(&name) {
            Some(code) => self.emit(Token::Symbol(code)),
            None => self.emit(Token::Name(name)),
        }
    }
}
