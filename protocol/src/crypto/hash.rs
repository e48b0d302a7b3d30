//! # Hashing
//!
//! SHA-256 is the only hash function the chain uses for account
//! transactions. It produces both the signing digest
//! (`SHA-256(header ‖ payload)`) and the transaction hash
//! (`SHA-256(kind ‖ signatures ‖ header ‖ payload)`).
//!
//! Both inputs are concatenations of buffers the assembler already holds, so
//! [`sha256_concat`] feeds the parts to the hasher one after another instead
//! of first copying them into a single allocation.

use sha2::{Digest, Sha256};

use crate::config::HASH_LENGTH;

/// Compute the SHA-256 digest of `data`.
///
/// # Example
///
/// ```
/// use ccd_tx::crypto::sha256;
///
/// let digest = sha256(b"abc");
/// assert_eq!(digest[0], 0xba);
/// ```
pub fn sha256(data: &[u8]) -> [u8; HASH_LENGTH] {
    Sha256::digest(data).into()
}

/// Compute the SHA-256 digest of the concatenation of `parts`.
///
/// Equivalent to `sha256(&parts.concat())`.
pub fn sha256_concat(parts: &[&[u8]]) -> [u8; HASH_LENGTH] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
