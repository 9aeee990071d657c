//! Length-prefixed binary codec.
//!
//! Every variable-length field is a big-endian `u16` length followed by that
//! many bytes. Reads are bounds-checked against both an explicit limit and
//! the bytes actually remaining, so hostile input never triggers an
//! allocation larger than itself.

use crate::limits::{LENGTH_PREFIX_SIZE, MAX_VARIABLE_LEN};
use crate::{ProtocolError, Result};

/// Append `bytes` to `buf` behind a 2-byte big-endian length.
///
/// # Errors
///
/// Returns `ProtocolError::FieldTooLong` if `bytes` is longer than 65535.
pub fn write_variable_bytes(buf: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
    let len = u16::try_from(bytes.len()).map_err(|_| ProtocolError::FieldTooLong {
        field: "variable field",
        len: bytes.len(),
        max: MAX_VARIABLE_LEN,
    })?;
    buf.reserve(LENGTH_PREFIX_SIZE + bytes.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Cursor over a borrowed byte slice.
///
/// Returned slices borrow from the input; nothing is copied.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Start reading at the beginning of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether everything has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume exactly `n` bytes.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Truncated` if fewer than `n` bytes remain.
    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(ProtocolError::Truncated {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Consume one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_exact(1)?[0])
    }

    /// Consume a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Consume a length-prefixed field of at most `limit` bytes.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::LengthExceedsLimit` if the declared length is
    /// above `limit`, and `ProtocolError::Truncated` if it is above what
    /// remains. Nothing past the prefix is consumed on error.
    pub fn read_variable_bytes(&mut self, limit: usize) -> Result<&'a [u8]> {
        let len = usize::from(self.read_u16()?);
        if len > limit {
            return Err(ProtocolError::LengthExceedsLimit { len, limit });
        }
        self.read_exact(len)
    }

    /// Consume everything that is left.
    pub fn rest(&mut self) -> &'a [u8] {
        let out = &self.data[self.pos..];
        self.pos = self.data.len();
        out
    }
}
