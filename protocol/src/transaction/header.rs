//! # Header Codec
//!
//! The account transaction header is a fixed 60-byte record:
//!
//! ```text
//! offset  size  field
//!      0    32  sender address
//!     32     8  sequence number (nonce)
//!     40     8  energy allowance
//!     48     4  payload size
//!     52     8  expiry (unix seconds)
//! ```
//!
//! All integers are big-endian. The header size is
//! [`TRANSACTION_HEADER_SIZE`], the same constant the energy model charges
//! for.

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use super::codec::{DecodeError, Reader};
use crate::config::TRANSACTION_HEADER_SIZE;
use crate::types::{AccountAddress, Energy, Expiry, PayloadSize, SequenceNumber};

/// Encoded header length as a `usize`.
pub const HEADER_LEN: usize = TRANSACTION_HEADER_SIZE as usize;

/// Metadata every account transaction carries in front of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHeader {
    pub sender: AccountAddress,
    pub sequence_number: SequenceNumber,
    pub energy_amount: Energy,
    pub payload_size: PayloadSize,
    pub expiry: Expiry,
}

impl TransactionHeader {
    /// Serialize to the fixed 60-byte layout.
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        let mut buf = &mut out[..];
        buf.put_slice(self.sender.as_bytes());
        buf.put_u64(self.sequence_number.value());
        buf.put_u64(self.energy_amount.value());
        buf.put_u32(self.payload_size.value());
        buf.put_u64(self.expiry.seconds());
        out
    }

    /// Parse exactly 60 bytes. A zero nonce or an out-of-range expiry is
    /// rejected as an invalid value.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let header = Self::read(&mut r)?;
        r.finish("transaction header")?;
        Ok(header)
    }

    /// Read a header from the front of a longer buffer.
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            sender: AccountAddress::new(r.array("sender")?),
            sequence_number: SequenceNumber::new(r.u64("sequence number")?)?,
            energy_amount: Energy::new(r.u64("energy")?),
            payload_size: PayloadSize::new(r.u32("payload size")?),
            expiry: Expiry::from_unix_seconds(r.u64("expiry")?)?,
        })
    }
}
