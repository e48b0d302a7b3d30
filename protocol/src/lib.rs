// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ccd-tx: Account Transaction Engine
//!
//! Builds Concordium account transactions, encodes them byte-exactly,
//! computes their energy allowance, signs them with one or more account keys
//! and hands back either a self-contained signed blob or a structured
//! message for a transport to submit.
//!
//! ## Architecture
//!
//! - **config** - Protocol constants: energy model, wire sizes, limits.
//! - **types** - Validated value objects (addresses, amounts, nonces, names).
//! - **crypto** - SHA-256 and Ed25519 account keys.
//! - **transaction** - Payload and header codecs, energy model, signer
//!   registry, assembler and wire framings.
//!
//! Transport (gRPC), address base58 handling and contract schemas are left
//! to the caller.
//!
//! ## Example
//!
//! ```
//! use ccd_tx::crypto::Ed25519SignKey;
//! use ccd_tx::transaction::{AccountTransactionPayload, TransactionSigner};
//! use ccd_tx::types::{AccountAddress, CcdAmount, Expiry, SequenceNumber};
//!
//! let signer = TransactionSigner::single(Ed25519SignKey::from_bytes(&[7; 32]));
//! let item = AccountTransactionPayload::transfer(
//!     CcdAmount::from_micro_ccd(1_000_000),
//!     AccountAddress::new([1; 32]),
//! )
//! .prepare(
//!     AccountAddress::new([0; 32]),
//!     SequenceNumber::FIRST,
//!     Expiry::from_unix_seconds(1_700_000_000).unwrap(),
//! )
//! .sign(&signer)
//! .unwrap()
//! .to_block_item();
//!
//! assert_eq!(item.as_bytes()[0], 0);
//! ```

pub mod config;
pub mod crypto;
pub mod transaction;
pub mod types;
