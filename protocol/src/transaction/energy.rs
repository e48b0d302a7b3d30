//! # Energy Model
//!
//! The energy allowance written into a header must cover what the chain
//! charges to check and execute the transaction:
//!
//! ```text
//! energy = base_cost
//!        + ENERGY_PER_SIGNATURE * signature_count
//!        + ENERGY_PER_BYTE * (header_size + payload_size)
//! ```
//!
//! The signature count is part of the formula, so the number of signatures
//! must be known before the header (and therefore the signing digest) exists.
//! The assembler enforces that ordering through its type states.

use thiserror::Error;

use crate::config::{ENERGY_PER_BYTE, ENERGY_PER_SIGNATURE};
use crate::types::Energy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnergyError {
    /// The allowance does not fit in a `u64`.
    #[error("energy cost overflows u64")]
    Overflow,
}

/// Energy allowance for a transaction with the given shape.
pub fn calculate_energy_cost(
    signature_count: u32,
    base_cost: Energy,
    header_size: u32,
    payload_size: u32,
) -> Result<Energy, EnergyError> {
    let signatures = ENERGY_PER_SIGNATURE
        .checked_mul(u64::from(signature_count))
        .ok_or(EnergyError::Overflow)?;
    let bytes = u64::from(header_size)
        .checked_add(u64::from(payload_size))
        .and_then(|size| size.checked_mul(ENERGY_PER_BYTE))
        .ok_or(EnergyError::Overflow)?;
    base_cost
        .value()
        .checked_add(signatures)
        .and_then(|total| total.checked_add(bytes))
        .map(Energy::new)
        .ok_or(EnergyError::Overflow)
}
