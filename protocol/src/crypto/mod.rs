//! # Cryptographic Primitives
//!
//! Everything the engine needs from cryptography is here, and it is not much:
//!
//! - **SHA-256** for the signing digest and the transaction hash.
//! - **Ed25519** for account credential keys.
//!
//! Both are thin wrappers around audited implementations (`sha2` and
//! `ed25519-dalek`).

pub mod hash;
pub mod keys;

pub use hash::{sha256, sha256_concat};
pub use keys::{Ed25519PublicKey, Ed25519SignKey, KeyError};
