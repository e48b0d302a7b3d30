//! # CLI Interface
//!
//! Command-line argument structure for `ccd-tx`, using `clap` derive. Every
//! subcommand prints a single JSON document to stdout.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use ccd_tx::types::AccountAddress;

use crate::logging::LogFormat;

/// Build, sign and inspect Concordium account transactions.
///
/// Signed transactions are printed as hex block items ready for submission
/// by any transport. Nothing is sent to a node.
#[derive(Parser, Debug)]
#[command(name = "ccd-tx", version, propagate_version = true)]
pub struct CcdTxCli {
    /// Log output format: pretty or json.
    #[arg(long, global = true, env = "CCD_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, global = true, env = "CCD_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transfer CCD to another account, optionally with a memo.
    Transfer(TransferArgs),
    /// Register arbitrary data on chain.
    RegisterData(RegisterDataArgs),
    /// Deploy a compiled smart contract module.
    DeployModule(DeployModuleArgs),
    /// Compute an energy allowance without building a transaction.
    Energy(EnergyArgs),
    /// Decode a hex block item and print its contents.
    Inspect(InspectArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments shared by every subcommand that signs a transaction.
#[derive(Args, Debug)]
pub struct SigningArgs {
    /// Wallet key export (genesis or browser wallet format).
    #[arg(long, short = 'k', env = "CCD_KEYS_FILE")]
    pub keys: PathBuf,

    /// Sender account address as hex. Required when the key export holds
    /// a base58 address.
    #[arg(long, env = "CCD_SENDER")]
    pub sender: Option<AccountAddress>,

    /// Sender account sequence number (nonce). Must be at least 1.
    #[arg(long, short = 'n')]
    pub nonce: u64,

    /// Minutes from now until the transaction expires.
    #[arg(long, env = "CCD_EXPIRY_MINUTES", default_value_t = 30)]
    pub expiry_minutes: u64,
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    #[command(flatten)]
    pub signing: SigningArgs,

    /// Receiver account address (64 hex characters).
    #[arg(long)]
    pub to: String,

    /// Amount in microCCD.
    #[arg(long)]
    pub amount: u64,

    /// Optional memo, hex-encoded (at most 256 bytes).
    #[arg(long)]
    pub memo: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterDataArgs {
    #[command(flatten)]
    pub signing: SigningArgs,

    /// Data to register, hex-encoded (at most 256 bytes).
    #[arg(long)]
    pub data: String,
}

#[derive(Args, Debug)]
pub struct DeployModuleArgs {
    #[command(flatten)]
    pub signing: SigningArgs,

    /// Path to the versioned module file.
    #[arg(long)]
    pub module: PathBuf,
}

#[derive(Args, Debug)]
pub struct EnergyArgs {
    /// Number of signatures the transaction will carry.
    #[arg(long, default_value_t = 1)]
    pub signatures: u32,

    /// Encoded payload size in bytes.
    #[arg(long)]
    pub payload_size: u32,

    /// Base cost of the payload.
    #[arg(long, default_value_t = 300)]
    pub base_cost: u64,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Hex-encoded block item.
    pub block_item: String,
}
