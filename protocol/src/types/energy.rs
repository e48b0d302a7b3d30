//! Energy amounts and payload sizes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Abstract unit of execution cost charged against a transaction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Energy(u64);

impl Energy {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Energy) -> Option<Energy> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl From<u64> for Energy {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} NRG", self.0)
    }
}

/// Byte length of an encoded payload, as recorded in the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadSize(u32);

impl PayloadSize {
    pub const fn new(size: u32) -> Self {
        Self(size)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PayloadSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
