//! Growable accumulator for the encoded token stream.

use crate::token::Token;
use crate::{Error, Result};

/// Append-only byte buffer.
///
/// Capacity doubles on overflow, or jumps straight to the required size when
/// doubling is not enough. Allocation failure is reported instead of aborting.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        OutputBuffer {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    fn grow_for(&mut self, additional: usize) -> Result<()> {
        let required = self
            .data
            .len()
            .checked_add(additional)
            .ok_or(Error::OutOfMemory {
                requested: usize::MAX,
            })?;
        if required <= self.data.capacity() {
            return Ok(());
        }
        let target = required.max(self.data.capacity().saturating_mul(2));
        self.data
            .try_reserve_exact(target - self.data.len())
            .map_err(|_| Error::OutOfMemory { requested: target })
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.grow_for(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| Error::OutOfMemory { requested: len })?;
        self.write_u32(len)
    }

    /// Appends one token: its code followed by the payload the code implies.
    pub fn write_token(&mut self, token: &Token) -> Result<()> {
        self.grow_for(token.encoded_len())?;
        self.write_u16(token.code().as_u16())?;
        match token {
            Token::Name(bytes) | Token::String(bytes) => {
                self.write_len(bytes.len())?;
                self.write_bytes(bytes)
            }
            Token::Integer(value) => self.write_i32(*value),
            Token::Float(value) => self.write_f32(*value),
            Token::Guid(guid) => self.write_bytes(&guid.to_bytes()),
            Token::IntegerList(values) => {
                self.write_len(values.len())?;
                values.iter().try_for_each(|&v| self.write_u32(v))
            }
            Token::FloatList(values) => {
                self.write_len(values.len())?;
                values.iter().try_for_each(|&v| self.write_f32(v))
            }
            Token::Symbol(_) => Ok(()),
        }
    }
}
