//! # Account Signing Keys
//!
//! Ed25519 is the signature scheme behind every account credential key. This
//! module wraps `ed25519-dalek` in two small types:
//!
//! - [`Ed25519SignKey`] holds a secret key and implements the engine's
//!   [`Signer`](crate::transaction::Signer) capability. It is the only
//!   concrete signer the crate ships; hardware wallets or remote signers
//!   implement the trait themselves.
//! - [`Ed25519PublicKey`] verifies signatures, e.g. when checking a signature
//!   map against an account's published keys.
//!
//! Secret key bytes never appear in `Debug` output or in log lines.

use std::fmt;

use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::{SIGNING_KEY_LENGTH, VERIFYING_KEY_LENGTH};
use crate::transaction::Signer;

/// Errors raised when key material is parsed.
///
/// Messages never include the offending bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("key is not valid hex")]
    InvalidHex,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

// ---------------------------------------------------------------------------
// Ed25519SignKey
// ---------------------------------------------------------------------------

/// An Ed25519 secret key used to sign account transactions.
///
/// Does not implement `Serialize`. Writing a secret key somewhere is left to
/// the caller, through [`Ed25519SignKey::to_bytes`].
///
/// # Example
///
/// ```
/// use ccd_tx::crypto::Ed25519SignKey;
/// use ccd_tx::transaction::Signer;
///
/// let key = Ed25519SignKey::from_bytes(&[1u8; 32]);
/// let signature = key.sign(b"digest");
/// assert!(key.public_key().verify(b"digest", &signature));
/// ```
#[derive(Clone)]
pub struct Ed25519SignKey {
    signing_key: SigningKey,
}

impl Ed25519SignKey {
    /// Generate a fresh key from the operating system RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a key from its 32 secret bytes.
    pub fn from_bytes(bytes: &[u8; SIGNING_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(bytes),
        }
    }

    /// Build a key from a slice, which must be exactly 32 bytes long.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; SIGNING_KEY_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidLength {
                expected: SIGNING_KEY_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Parse a key from 64 hex characters, the format wallet exports use.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidHex)?;
        Self::try_from_slice(&bytes)
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    pub fn to_bytes(&self) -> [u8; SIGNING_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

impl Signer for Ed25519SignKey {
    fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }
}

impl fmt::Debug for Ed25519SignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519SignKey")
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Ed25519SignKey {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for Ed25519SignKey {}

// ---------------------------------------------------------------------------
// Ed25519PublicKey
// ---------------------------------------------------------------------------

/// The public half of an account credential key.
///
/// Serialized as a hex string. Deserialization runs the same curve-point
/// check as [`Ed25519PublicKey::from_bytes`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ed25519PublicKey {
    bytes: [u8; VERIFYING_KEY_LENGTH],
}

impl Ed25519PublicKey {
    /// Wrap 32 bytes after checking that they decode to a curve point.
    pub fn from_bytes(bytes: [u8; VERIFYING_KEY_LENGTH]) -> Result<Self, KeyError> {
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; VERIFYING_KEY_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidLength {
                expected: VERIFYING_KEY_LENGTH,
                actual: slice.len(),
            })?;
        Self::from_bytes(bytes)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidHex)?;
        Self::try_from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; VERIFYING_KEY_LENGTH] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Check `signature` over `message`.
    ///
    /// Malformed signatures (wrong length, non-canonical encoding) simply
    /// fail verification.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        key.verify(message, &signature).is_ok()
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        crate::types::serde_hex::serialize(&self.bytes, s)
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = crate::types::serde_hex::deserialize(d)?;
        Self::from_bytes(bytes).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", self.to_hex())
    }
}
