//! # Domain Value Objects
//!
//! Small, immutable wrappers around fixed-width integers and byte strings.
//! Each type validates its invariants when it is constructed, so the codecs
//! in [`crate::transaction`] never have to re-check them and serialization of
//! a constructed value cannot fail.
//!
//! ```text
//! address.rs   - AccountAddress and alias arithmetic
//! amount.rs    - CcdAmount (microCCD)
//! contract.rs  - ContractAddress, ModuleReference, InitName, ReceiveName, Parameter
//! data.rs      - OnChainData (memos and registered data)
//! energy.rs    - Energy and PayloadSize
//! expiry.rs    - Expiry (unix seconds)
//! hash.rs      - TransactionHash
//! index.rs     - CredentialIndex and KeyIndex
//! sequence.rs  - SequenceNumber (account nonce)
//! ```

use thiserror::Error;

pub mod address;
pub mod amount;
pub mod contract;
pub mod data;
pub mod energy;
pub mod expiry;
pub mod hash;
pub mod index;
pub(crate) mod serde_hex;
pub mod sequence;

pub use address::AccountAddress;
pub use amount::CcdAmount;
pub use contract::{ContractAddress, InitName, ModuleReference, Parameter, ReceiveName};
pub use data::OnChainData;
pub use energy::{Energy, PayloadSize};
pub use expiry::Expiry;
pub use hash::TransactionHash;
pub use index::{CredentialIndex, KeyIndex};
pub use sequence::SequenceNumber;

/// Errors raised when a value object is constructed from invalid input.
///
/// These are always reported at the point of construction, never later
/// during serialization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A byte string had the wrong length for a fixed-width type.
    #[error("invalid length for {what}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A string was not valid hex.
    #[error("invalid hex for {what}: {reason}")]
    InvalidHex { what: &'static str, reason: String },

    /// Sequence numbers start at 1.
    #[error("account sequence numbers must be at least 1")]
    ZeroSequenceNumber,

    /// Incrementing the sequence number would exceed `u64::MAX`.
    #[error("sequence number {0} cannot be incremented")]
    SequenceNumberOverflow(u64),

    /// Alias indices are limited to three bytes.
    #[error("alias index can be at most {max}, got {actual}")]
    AliasOutOfRange { max: u32, actual: u32 },

    /// An amount computation left the `u64` range.
    #[error("amount arithmetic overflowed: {0}")]
    AmountOverflow(String),

    /// Expiry timestamps must fit in a signed 64-bit integer.
    #[error("expiry {0} exceeds the maximum unix timestamp")]
    ExpiryOutOfRange(u64),

    /// Expiry timestamps cannot precede the unix epoch.
    #[error("expiry {0} is before the unix epoch")]
    ExpiryBeforeEpoch(i64),

    /// A contract init or receive name failed validation.
    #[error("invalid contract function name {name:?}: {reason}")]
    InvalidFunctionName { name: String, reason: &'static str },

    /// A contract parameter exceeds the `u16` length prefix.
    #[error("parameter of {actual} bytes exceeds the maximum of {max}")]
    ParameterTooLarge { max: usize, actual: usize },

    /// A memo or registered data blob exceeds the protocol limit.
    #[error("on-chain data of {actual} bytes exceeds the maximum of {max}")]
    DataTooLarge { max: usize, actual: usize },
}

/// Decodes a hex string into exactly `N` bytes.
pub(crate) fn decode_hex_array<const N: usize>(
    what: &'static str,
    hex_str: &str,
) -> Result<[u8; N], TypeError> {
    let bytes = hex::decode(hex_str).map_err(|e| TypeError::InvalidHex {
        what,
        reason: e.to_string(),
    })?;
    to_array(what, &bytes)
}

/// Copies a slice into a fixed-size array, reporting a length mismatch.
pub(crate) fn to_array<const N: usize>(
    what: &'static str,
    bytes: &[u8],
) -> Result<[u8; N], TypeError> {
    bytes.try_into().map_err(|_| TypeError::InvalidLength {
        what,
        expected: N,
        actual: bytes.len(),
    })
}
