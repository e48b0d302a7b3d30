//! CCD amounts.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TypeError;
use crate::config::MICRO_CCD_PER_CCD;

/// An amount of CCD in microCCD, the smallest unit. Encoded as 8 bytes
/// big-endian.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CcdAmount(u64);

impl CcdAmount {
    /// Encoded length in bytes.
    pub const BYTES_LENGTH: usize = 8;

    /// Zero CCD.
    pub const ZERO: CcdAmount = CcdAmount(0);

    pub const fn from_micro_ccd(micro_ccd: u64) -> Self {
        Self(micro_ccd)
    }

    /// Converts whole CCD to microCCD, failing if the result does not fit.
    pub fn from_ccd(ccd: u64) -> Result<Self, TypeError> {
        ccd.checked_mul(MICRO_CCD_PER_CCD)
            .map(Self)
            .ok_or_else(|| {
                TypeError::AmountOverflow(format!(
                    "{ccd} CCD * {MICRO_CCD_PER_CCD} does not fit in u64"
                ))
            })
    }

    pub const fn micro_ccd(&self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: CcdAmount) -> Result<Self, TypeError> {
        self.0.checked_add(other.0).map(Self).ok_or_else(|| {
            TypeError::AmountOverflow(format!("{} + {} does not fit in u64", self.0, other.0))
        })
    }

    pub fn checked_sub(self, other: CcdAmount) -> Result<Self, TypeError> {
        self.0.checked_sub(other.0).map(Self).ok_or_else(|| {
            TypeError::AmountOverflow(format!("{} - {} is negative", self.0, other.0))
        })
    }

    pub fn to_be_bytes(&self) -> [u8; Self::BYTES_LENGTH] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for CcdAmount {
    /// Formats as whole CCD with six decimals, e.g. `1.500000 CCD`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:06} CCD",
            self.0 / MICRO_CCD_PER_CCD,
            self.0 % MICRO_CCD_PER_CCD
        )
    }
}
