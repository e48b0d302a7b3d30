//! Transaction expiry timestamps.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::TypeError;

/// Unix time in seconds after which a transaction may no longer be included
/// in a block. A block whose slot time is at or after the expiry rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Expiry(u64);

impl Expiry {
    /// Encoded length in bytes.
    pub const BYTES_LENGTH: usize = 8;

    /// Fails if the timestamp does not fit in an `i64`, the range every
    /// date-time library on the other side of the wire can represent.
    pub fn from_unix_seconds(seconds: u64) -> Result<Self, TypeError> {
        if seconds > i64::MAX as u64 {
            return Err(TypeError::ExpiryOutOfRange(seconds));
        }
        Ok(Self(seconds))
    }

    pub fn from_datetime(timestamp: DateTime<Utc>) -> Result<Self, TypeError> {
        let seconds = timestamp.timestamp();
        u64::try_from(seconds)
            .map(Self)
            .map_err(|_| TypeError::ExpiryBeforeEpoch(seconds))
    }

    /// Expiry `duration` from the current system time.
    pub fn after(duration: Duration) -> Result<Self, TypeError> {
        let now = Utc::now().timestamp().max(0) as u64;
        let seconds = now
            .checked_add(duration.as_secs())
            .ok_or(TypeError::ExpiryOutOfRange(u64::MAX))?;
        Self::from_unix_seconds(seconds)
    }

    pub fn at_seconds_from_now(seconds: u64) -> Result<Self, TypeError> {
        Self::after(Duration::from_secs(seconds))
    }

    pub fn at_minutes_from_now(minutes: u64) -> Result<Self, TypeError> {
        let seconds = minutes
            .checked_mul(60)
            .ok_or(TypeError::ExpiryOutOfRange(u64::MAX))?;
        Self::at_seconds_from_now(seconds)
    }

    pub const fn seconds(&self) -> u64 {
        self.0
    }

    /// Returns `true` if a block with the given slot time (unix seconds)
    /// can no longer include the transaction.
    pub fn is_expired_at(&self, block_time: u64) -> bool {
        block_time >= self.0
    }

    pub fn to_be_bytes(&self) -> [u8; Self::BYTES_LENGTH] {
        self.0.to_be_bytes()
    }
}

impl<'de> Deserialize<'de> for Expiry {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(d)?;
        Self::from_unix_seconds(seconds).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp(self.0 as i64, 0) {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}s", self.0),
        }
    }
}
