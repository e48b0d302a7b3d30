//! Transaction hashes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{decode_hex_array, to_array, TypeError};
use crate::config::HASH_LENGTH;

/// SHA-256 identity of a transaction on the chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionHash(#[serde(with = "super::serde_hex")] [u8; HASH_LENGTH]);

impl TransactionHash {
    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        to_array("transaction hash", bytes).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for TransactionHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex_array("transaction hash", s).map(Self)
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionHash({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lower_hex() {
        let s = "d59d3a72ae4cb40f200da16a2a4b15db58b45dbb156129259e00b43806c3e650";
        let hash: TransactionHash = s.parse().unwrap();
        assert_eq!(hash.to_string(), s);
        assert_eq!(hash.as_bytes()[0], 0xd5);
    }

    #[test]
    fn rejects_short_hex() {
        let err = "d59d".parse::<TransactionHash>().unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                what: "transaction hash",
                expected: 32,
                actual: 2
            }
        );
    }
}
