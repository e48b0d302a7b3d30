//! Shared binary decoding support.
//!
//! Every multi-byte integer on the wire is big-endian, and every variable
//! length field carries a length prefix. [`Reader`] wraps a byte slice and
//! reads those primitives with bounds checks, turning a short buffer into
//! [`DecodeError::UnexpectedEnd`] instead of a panic.

use bytes::Buf;
use thiserror::Error;

use crate::types::TypeError;

/// Errors raised when parsing wire bytes back into engine types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input ended before `field` could be read.
    #[error("unexpected end of input while reading {field}: need {needed} bytes, {remaining} left")]
    UnexpectedEnd {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// Bytes were left over after a complete value was read.
    #[error("{count} trailing bytes after {what}")]
    TrailingBytes { what: &'static str, count: usize },

    /// The payload tag names a transaction type this crate cannot decode.
    #[error("unsupported transaction type tag {0}")]
    UnsupportedTransactionType(u8),

    /// The block item version byte is not one this crate understands.
    #[error("unsupported block item version {0}")]
    InvalidVersion(u8),

    /// The block item is not an account transaction.
    #[error("block item kind {0} is not an account transaction")]
    InvalidBlockItemKind(u8),

    /// The header's payload size disagrees with the bytes that follow it.
    #[error("header declares a payload of {declared} bytes, found {actual}")]
    PayloadSizeMismatch { declared: u32, actual: usize },

    /// A field decoded but failed its value object's validation.
    #[error("invalid value: {0}")]
    InvalidValue(#[from] TypeError),

    /// A signature map with no credentials.
    #[error("signature map has no credentials")]
    EmptySignatureMap,

    /// Signature map indices must be strictly ascending.
    #[error("{0} out of order or repeated in signature map")]
    UnorderedIndex(&'static str),
}

/// Bounds-checked big-endian reader over a borrowed buffer.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn ensure(&self, field: &'static str, needed: usize) -> Result<(), DecodeError> {
        if self.buf.remaining() < needed {
            return Err(DecodeError::UnexpectedEnd {
                field,
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub(crate) fn u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        self.ensure(field, 1)?;
        Ok(self.buf.get_u8())
    }

    pub(crate) fn u16(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        self.ensure(field, 2)?;
        Ok(self.buf.get_u16())
    }

    pub(crate) fn u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        self.ensure(field, 4)?;
        Ok(self.buf.get_u32())
    }

    pub(crate) fn u64(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        self.ensure(field, 8)?;
        Ok(self.buf.get_u64())
    }

    pub(crate) fn array<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<[u8; N], DecodeError> {
        self.ensure(field, N)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    /// Borrow the next `len` bytes.
    pub(crate) fn bytes(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], DecodeError> {
        self.ensure(field, len)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    /// Read a `u16` length prefix followed by that many bytes.
    pub(crate) fn u16_prefixed(&mut self, field: &'static str) -> Result<&'a [u8], DecodeError> {
        let len = self.u16(field)?;
        self.bytes(field, usize::from(len))
    }

    /// Borrow everything that is left.
    pub(crate) fn rest(&mut self) -> &'a [u8] {
        std::mem::take(&mut self.buf)
    }

    /// Fail if anything is left.
    pub(crate) fn finish(self, what: &'static str) -> Result<(), DecodeError> {
        match self.buf.remaining() {
            0 => Ok(()),
            count => Err(DecodeError::TrailingBytes { what, count }),
        }
    }
}
