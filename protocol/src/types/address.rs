//! Account addresses and alias arithmetic.
//!
//! An address is 32 raw bytes. The first 29 bytes identify the account; the
//! last 3 bytes select one of 2^24 aliases of that account. All aliases of an
//! account share its balance and nonce, so two addresses are aliases of each
//! other exactly when their first 29 bytes agree.
//!
//! Parsing the base58check text form is a concern of the caller. This module
//! only deals with raw bytes (and hex for configuration and tests).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{decode_hex_array, to_array, TypeError};
use crate::config::{ACCOUNT_ADDRESS_IDENTITY_LENGTH, ACCOUNT_ADDRESS_LENGTH, MAX_ALIAS_INDEX};

/// A 32-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountAddress(#[serde(with = "super::serde_hex")] [u8; ACCOUNT_ADDRESS_LENGTH]);

impl AccountAddress {
    /// Encoded length in bytes.
    pub const BYTES_LENGTH: usize = ACCOUNT_ADDRESS_LENGTH;

    /// Wraps raw address bytes.
    pub const fn new(bytes: [u8; ACCOUNT_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Builds an address from a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        to_array("account address", bytes).map(Self)
    }

    /// The raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ADDRESS_LENGTH] {
        &self.0
    }

    /// Returns `true` if both addresses refer to the same account.
    pub fn is_alias_of(&self, other: &AccountAddress) -> bool {
        self.0[..ACCOUNT_ADDRESS_IDENTITY_LENGTH] == other.0[..ACCOUNT_ADDRESS_IDENTITY_LENGTH]
    }

    /// Returns the `n`-th alias of this account.
    ///
    /// The alias keeps the 29 identity bytes and writes `n` big-endian into
    /// the last three bytes. Fails for `n > 2^24 - 1`.
    pub fn nth_alias(&self, n: u32) -> Result<AccountAddress, TypeError> {
        if n > MAX_ALIAS_INDEX {
            return Err(TypeError::AliasOutOfRange {
                max: MAX_ALIAS_INDEX,
                actual: n,
            });
        }
        let mut bytes = self.0;
        // Drop the most significant byte of the big-endian u32.
        bytes[ACCOUNT_ADDRESS_IDENTITY_LENGTH..].copy_from_slice(&n.to_be_bytes()[1..]);
        Ok(Self(bytes))
    }

    /// Hex encoding of the raw bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; ACCOUNT_ADDRESS_LENGTH]> for AccountAddress {
    fn from(bytes: [u8; ACCOUNT_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl FromStr for AccountAddress {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex_array("account address", s).map(Self)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.to_hex())
    }
}
