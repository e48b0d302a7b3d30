//! # Account Transactions
//!
//! Construction, encoding, energy accounting and signing of account
//! transactions: transactions sent from an account and paid for by it.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        - TransactionType, the payload tag
//! payload.rs      - AccountTransactionPayload and its wire codec
//! header.rs       - the fixed 60-byte TransactionHeader
//! energy.rs       - energy allowance formula
//! signing.rs      - Signer capability and the signer registry
//! signature.rs    - AccountTransactionSignature, the signature map
//! builder.rs      - type-state assembler and wire framings
//! verification.rs - TransactionError and pre-submission checks
//! codec.rs        - DecodeError and the bounds-checked reader
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build** a payload and [`prepare`](AccountTransactionPayload::prepare)
//!    it with sender, nonce and expiry.
//! 2. **Header** it with the number of signatures; this fixes the energy.
//! 3. **Sign** the header and payload digest with a [`TransactionSigner`].
//! 4. **Frame** it as a [`BlockItem`] or an [`AccountTransactionMessage`]
//!    and hand it to a transport.
//!
//! ## Design Decisions
//!
//! - All integers on the wire are big-endian.
//! - The transaction hash is always computed locally. A hash reported by a
//!   transport is only compared against it.
//! - Nothing here does I/O or retries; every failure is final for that
//!   attempt.

pub mod builder;
pub mod codec;
pub mod energy;
pub mod header;
pub mod payload;
pub mod signature;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{
    AccountTransactionMessage, AccountTransactionMessageHeader, BlockItem,
    HeaderedAccountTransaction, PreparedAccountTransaction, SignedAccountTransaction,
};
pub use codec::DecodeError;
pub use energy::{calculate_energy_cost, EnergyError};
pub use header::TransactionHeader;
pub use payload::AccountTransactionPayload;
pub use signature::AccountTransactionSignature;
pub use signing::{
    SharedTransactionSigner, Signer, SigningError, TransactionSigner, TransactionSignerBuilder,
};
pub use types::TransactionType;
pub use verification::{verify_transaction, TransactionError};
