//! Hex string serialization for byte values in human-readable formats.
//!
//! Binary formats get the raw bytes; JSON and friends get lowercase hex.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize a fixed-size byte array.
pub fn serialize<const N: usize, S>(bytes: &[u8; N], s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if s.is_human_readable() {
        hex::encode(bytes).serialize(s)
    } else {
        bytes[..].serialize(s)
    }
}

/// Deserialize a fixed-size byte array.
pub fn deserialize<'de, const N: usize, D>(d: D) -> Result<[u8; N], D::Error>
where
    D: Deserializer<'de>,
{
    let bytes: Vec<u8> = if d.is_human_readable() {
        let string = String::deserialize(d)?;
        hex::decode(string).map_err(serde::de::Error::custom)?
    } else {
        Vec::deserialize(d)?
    };
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        serde::de::Error::custom(format!("expected {N} bytes, found {len}"))
    })
}

/// Variable-length byte strings.
pub mod vec {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if s.is_human_readable() {
            hex::serialize(bytes, s)
        } else {
            bytes.serialize(s)
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        if d.is_human_readable() {
            hex::deserialize(d)
        } else {
            Vec::deserialize(d)
        }
    }
}
