//! Credential and key indices of an account's signing keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of one of an account's credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialIndex(pub u8);

/// Index of a signing key within a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyIndex(pub u8);

impl From<u8> for CredentialIndex {
    fn from(index: u8) -> Self {
        Self(index)
    }
}

impl From<u8> for KeyIndex {
    fn from(index: u8) -> Self {
        Self(index)
    }
}

impl fmt::Display for CredentialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for KeyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
