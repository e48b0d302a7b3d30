//! Arbitrary data stored on chain: transfer memos and registered data.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::TypeError;
use crate::config::MAX_ON_CHAIN_DATA_LENGTH;

/// Up to 256 bytes of opaque data. Encoded as a `u16` big-endian length
/// followed by the bytes.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OnChainData(#[serde(with = "super::serde_hex::vec")] Vec<u8>);

impl OnChainData {
    pub fn new(bytes: Vec<u8>) -> Result<Self, TypeError> {
        if bytes.len() > MAX_ON_CHAIN_DATA_LENGTH {
            return Err(TypeError::DataTooLarge {
                max: MAX_ON_CHAIN_DATA_LENGTH,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(hex_str).map_err(|e| TypeError::InvalidHex {
            what: "on-chain data",
            reason: e.to_string(),
        })?;
        Self::new(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the encoded form, including the length prefix.
    pub fn serialized_len(&self) -> usize {
        2 + self.0.len()
    }
}

impl<'de> Deserialize<'de> for OnChainData {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = super::serde_hex::vec::deserialize(d)?;
        Self::new(bytes).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for OnChainData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OnChainData({})", hex::encode(&self.0))
    }
}

impl fmt::Display for OnChainData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}
