//! # Protocol Configuration & Constants
//!
//! Every protocol-defined number the transaction engine depends on lives here.
//! These values are fixed by the node software the transactions are sent to.
//! They are not tunables: changing one of them without the chain changing it
//! first produces transactions the chain rejects.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Energy Model
// ---------------------------------------------------------------------------

/// Energy charged for every signature attached to a transaction.
pub const ENERGY_PER_SIGNATURE: u64 = 100;

/// Energy charged for every byte of the serialized header and payload.
pub const ENERGY_PER_BYTE: u64 = 1;

/// Base cost of the fixed-cost transaction types (simple transfer,
/// transfer with memo, register data).
pub const FIXED_TRANSACTION_BASE_COST: u64 = 300;

/// Divisor applied to the module length when costing a module deployment.
pub const DEPLOY_MODULE_COST_DIVISOR: u64 = 10;

// ---------------------------------------------------------------------------
// Wire Layout
// ---------------------------------------------------------------------------

/// Length of a raw account address.
pub const ACCOUNT_ADDRESS_LENGTH: usize = 32;

/// Number of leading address bytes that identify the account. The remaining
/// bytes select an alias of that account.
pub const ACCOUNT_ADDRESS_IDENTITY_LENGTH: usize = 29;

/// Largest alias index that fits in the three trailing address bytes.
pub const MAX_ALIAS_INDEX: u32 = (1 << 24) - 1;

/// Serialized size of an account transaction header:
/// sender (32) + nonce (8) + energy (8) + payload size (4) + expiry (8).
///
/// The energy model reads this constant, so the header codec and the cost
/// computation can never disagree about the header size.
pub const TRANSACTION_HEADER_SIZE: u32 = (ACCOUNT_ADDRESS_LENGTH + 8 + 8 + 4 + 8) as u32;

/// Version byte prepended to a block item in the self-contained framing.
/// Not part of the transaction hash.
pub const BLOCK_ITEM_VERSION: u8 = 0;

/// Block item kind discriminator for account transactions.
pub const ACCOUNT_TRANSACTION_KIND: u8 = 0;

/// Length of a SHA-256 digest (transaction hashes, module references).
pub const HASH_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Payload Limits
// ---------------------------------------------------------------------------

/// Maximum length of a memo or of registered data.
pub const MAX_ON_CHAIN_DATA_LENGTH: usize = 256;

/// Maximum length of a contract init or receive name.
pub const MAX_FUNCTION_NAME_LENGTH: usize = 100;

/// Maximum length of a contract parameter. Bounded by its `u16` length prefix.
pub const MAX_PARAMETER_LENGTH: usize = u16::MAX as usize;

/// Prefix every contract init function name carries.
pub const INIT_NAME_PREFIX: &str = "init_";

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Maximum number of credentials, and of keys per credential, that one
/// signature map can hold. Both counts are written as a single byte.
pub const MAX_SIGNER_ENTRIES: usize = 255;

/// Largest signature the signature map can encode (`u16` length prefix).
pub const MAX_SIGNATURE_LENGTH: usize = u16::MAX as usize;

/// Ed25519 signing key length in bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Ed25519 verifying key length in bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Amounts & Time
// ---------------------------------------------------------------------------

/// microCCD per CCD.
pub const MICRO_CCD_PER_CCD: u64 = 1_000_000;

/// Expiry used by callers that do not pick one themselves.
pub const DEFAULT_TRANSACTION_EXPIRY: Duration = Duration::from_secs(30 * 60);
