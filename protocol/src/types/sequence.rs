//! Account sequence numbers (nonces).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::TypeError;

/// Per-account transaction counter. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    /// The first sequence number of every account.
    pub const FIRST: SequenceNumber = SequenceNumber(1);

    /// Fails if `value` is zero.
    pub fn new(value: u64) -> Result<Self, TypeError> {
        if value == 0 {
            return Err(TypeError::ZeroSequenceNumber);
        }
        Ok(Self(value))
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The sequence number of the account's following transaction.
    pub fn next(&self) -> Result<Self, TypeError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(TypeError::SequenceNumberOverflow(self.0))
    }
}

impl TryFrom<u64> for SequenceNumber {
    type Error = TypeError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for SequenceNumber {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u64::deserialize(d)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert_eq!(SequenceNumber::new(0), Err(TypeError::ZeroSequenceNumber));
        assert!(SequenceNumber::try_from(0u64).is_err());
    }

    #[test]
    fn next_increments() {
        let n = SequenceNumber::new(41).unwrap();
        assert_eq!(n.next().unwrap().value(), 42);
    }

    #[test]
    fn next_overflows_at_max() {
        let n = SequenceNumber::new(u64::MAX).unwrap();
        assert_eq!(n.next(), Err(TypeError::SequenceNumberOverflow(u64::MAX)));
    }

    #[test]
    fn deserializing_zero_fails() {
        assert!(serde_json::from_str::<SequenceNumber>("0").is_err());
        assert_eq!(
            serde_json::from_str::<SequenceNumber>("7").unwrap(),
            SequenceNumber::new(7).unwrap()
        );
    }
}
