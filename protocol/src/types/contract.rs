//! Smart contract identifiers, function names and parameters.
//!
//! Names are restricted to printable ASCII so that their UTF-8 encoding is
//! one byte per character and the `u16` length prefix always equals the
//! character count.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::{decode_hex_array, to_array, TypeError};
use crate::config::{HASH_LENGTH, INIT_NAME_PREFIX, MAX_FUNCTION_NAME_LENGTH, MAX_PARAMETER_LENGTH};

// ---------------------------------------------------------------------------
// ContractAddress
// ---------------------------------------------------------------------------

/// Address of a smart contract instance: index and subindex, each encoded
/// as 8 bytes big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractAddress {
    pub index: u64,
    pub subindex: u64,
}

impl ContractAddress {
    /// Encoded length in bytes.
    pub const BYTES_LENGTH: usize = 16;

    pub const fn new(index: u64, subindex: u64) -> Self {
        Self { index, subindex }
    }

    pub fn to_be_bytes(&self) -> [u8; Self::BYTES_LENGTH] {
        let mut out = [0u8; Self::BYTES_LENGTH];
        out[..8].copy_from_slice(&self.index.to_be_bytes());
        out[8..].copy_from_slice(&self.subindex.to_be_bytes());
        out
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.index, self.subindex)
    }
}

// ---------------------------------------------------------------------------
// ModuleReference
// ---------------------------------------------------------------------------

/// Hash identifying a deployed smart contract module.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleReference(#[serde(with = "super::serde_hex")] [u8; HASH_LENGTH]);

impl ModuleReference {
    /// Encoded length in bytes.
    pub const BYTES_LENGTH: usize = HASH_LENGTH;

    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        to_array("module reference", bytes).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }
}

impl FromStr for ModuleReference {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex_array("module reference", s).map(Self)
    }
}

impl fmt::Display for ModuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ModuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleReference({})", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Function names
// ---------------------------------------------------------------------------

fn check_function_name(name: &str) -> Result<(), TypeError> {
    let invalid = |reason| TypeError::InvalidFunctionName {
        name: name.to_string(),
        reason,
    };
    if name.len() > MAX_FUNCTION_NAME_LENGTH {
        return Err(invalid("longer than 100 characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c.is_ascii_punctuation())
    {
        return Err(invalid("only ASCII alphanumerics and punctuation are allowed"));
    }
    Ok(())
}

/// Name of a contract init function, e.g. `init_counter`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InitName(String);

impl InitName {
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_function_name(&name)?;
        let invalid = |reason| TypeError::InvalidFunctionName {
            name: name.clone(),
            reason,
        };
        if !name.starts_with(INIT_NAME_PREFIX) {
            return Err(invalid("init names must start with \"init_\""));
        }
        if name.contains('.') {
            return Err(invalid("init names must not contain '.'"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Contract name without the `init_` prefix.
    pub fn contract_name(&self) -> &str {
        &self.0[INIT_NAME_PREFIX.len()..]
    }

    /// Length of the encoded form, including the length prefix.
    pub fn serialized_len(&self) -> usize {
        2 + self.0.len()
    }
}

/// Name of a contract receive function, `<contract>.<entrypoint>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReceiveName(String);

impl ReceiveName {
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_function_name(&name)?;
        if !name.contains('.') {
            return Err(TypeError::InvalidFunctionName {
                name,
                reason: "receive names must have the form <contract>.<entrypoint>",
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn contract_name(&self) -> &str {
        self.0.split_once('.').map(|(c, _)| c).unwrap_or(&self.0)
    }

    pub fn entrypoint(&self) -> &str {
        self.0.split_once('.').map(|(_, e)| e).unwrap_or("")
    }

    /// Length of the encoded form, including the length prefix.
    pub fn serialized_len(&self) -> usize {
        2 + self.0.len()
    }
}

impl<'de> Deserialize<'de> for InitName {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Self::new(String::deserialize(d)?).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for ReceiveName {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Self::new(String::deserialize(d)?).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for InitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ReceiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Parameter
// ---------------------------------------------------------------------------

/// Schema-serialized contract parameter. Opaque to the engine; only its
/// length is checked.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Parameter(#[serde(with = "super::serde_hex::vec")] Vec<u8>);

impl Parameter {
    pub fn new(bytes: Vec<u8>) -> Result<Self, TypeError> {
        if bytes.len() > MAX_PARAMETER_LENGTH {
            return Err(TypeError::ParameterTooLarge {
                max: MAX_PARAMETER_LENGTH,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    /// The empty parameter, for functions that take none.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the encoded form, including the length prefix.
    pub fn serialized_len(&self) -> usize {
        2 + self.0.len()
    }
}

impl<'de> Deserialize<'de> for Parameter {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = super::serde_hex::vec::deserialize(d)?;
        Self::new(bytes).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter({})", hex::encode(&self.0))
    }
}
