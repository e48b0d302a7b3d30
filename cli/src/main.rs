// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ccd-tx
//!
//! Entry point for the `ccd-tx` binary. Parses CLI arguments, initializes
//! logging, and runs one of:
//!
//! - `transfer`      build and sign a CCD transfer, with or without memo
//! - `register-data` build and sign a data registration
//! - `deploy-module` build and sign a module deployment
//! - `energy`        compute an energy allowance
//! - `inspect`       decode a hex block item
//! - `version`       print build version information
//!
//! Results are printed to stdout as JSON. Logs go to stderr.

mod cli;
mod keys;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use ccd_tx::transaction::{
    calculate_energy_cost, AccountTransactionPayload, BlockItem, SignedAccountTransaction,
};
use ccd_tx::types::{AccountAddress, CcdAmount, Energy, Expiry, OnChainData, SequenceNumber};

use cli::{CcdTxCli, Commands, SigningArgs};
use keys::AccountKeys;

/// What the signing subcommands print.
#[derive(Debug, Serialize)]
struct SignedOutput {
    transaction_hash: String,
    block_item: String,
    energy: u64,
    payload_size: u32,
}

impl From<&SignedAccountTransaction> for SignedOutput {
    fn from(tx: &SignedAccountTransaction) -> Self {
        let item = tx.to_block_item();
        Self {
            transaction_hash: item.hash().to_hex(),
            block_item: item.to_hex(),
            energy: tx.header().energy_amount.value(),
            payload_size: tx.header().payload_size.value(),
        }
    }
}

fn main() -> Result<()> {
    let cli = CcdTxCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Transfer(args) => {
            let receiver: AccountAddress = args.to.parse().context("invalid receiver address")?;
            let amount = CcdAmount::from_micro_ccd(args.amount);
            let payload = match args.memo {
                Some(memo) => {
                    let memo = OnChainData::from_hex(&memo).context("invalid memo")?;
                    AccountTransactionPayload::transfer_with_memo(amount, receiver, memo)
                }
                None => AccountTransactionPayload::transfer(amount, receiver),
            };
            sign_and_print(payload, &args.signing)
        }
        Commands::RegisterData(args) => {
            let data = OnChainData::from_hex(&args.data).context("invalid data")?;
            sign_and_print(AccountTransactionPayload::register_data(data), &args.signing)
        }
        Commands::DeployModule(args) => {
            let module = std::fs::read(&args.module)
                .with_context(|| format!("failed to read module {}", args.module.display()))?;
            sign_and_print(AccountTransactionPayload::deploy_module(module), &args.signing)
        }
        Commands::Energy(args) => {
            let energy = calculate_energy_cost(
                args.signatures,
                Energy::new(args.base_cost),
                ccd_tx::config::TRANSACTION_HEADER_SIZE,
                args.payload_size,
            )?;
            print_json(&serde_json::json!({ "energy": energy }))
        }
        Commands::Inspect(args) => inspect(&args.block_item),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn sign_and_print(payload: AccountTransactionPayload, args: &SigningArgs) -> Result<()> {
    let keys = AccountKeys::load(&args.keys, args.sender)?;
    let nonce = SequenceNumber::new(args.nonce).context("invalid nonce")?;
    let expiry = Expiry::at_minutes_from_now(args.expiry_minutes).context("invalid expiry")?;

    tracing::info!(
        sender = %keys.address,
        wallet = ?keys.format,
        nonce = nonce.value(),
        kind = %payload.transaction_type(),
        "signing transaction"
    );
    let signed = payload
        .prepare(keys.address, nonce, expiry)
        .sign(&keys.signer)
        .context("failed to sign transaction")?;

    print_json(&SignedOutput::from(&signed))
}

fn inspect(block_item: &str) -> Result<()> {
    let bytes = hex::decode(block_item.trim()).context("block item is not valid hex")?;
    let tx = BlockItem::decode(&bytes).context("failed to decode block item")?;

    print_json(&serde_json::json!({
        "transaction_hash": tx.hash(),
        "transaction_type": tx.payload().transaction_type().to_string(),
        "header": tx.header(),
        "payload": tx.payload(),
        "signatures": tx.signature(),
    }))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}

fn print_version() {
    println!("ccd-tx {}", env!("CARGO_PKG_VERSION"));
    println!("header {} bytes", ccd_tx::config::TRANSACTION_HEADER_SIZE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccd_tx::transaction::{Signer, TransactionSigner};

    struct FixedSigner;

    impl Signer for FixedSigner {
        fn sign(&self, _message: &[u8]) -> Vec<u8> {
            vec![0x42; 64]
        }
    }

    #[test]
    fn signed_output_mirrors_block_item() {
        let signed = AccountTransactionPayload::transfer(
            CcdAmount::from_micro_ccd(1_000_000),
            AccountAddress::new([1; 32]),
        )
        .prepare(
            AccountAddress::new([0; 32]),
            SequenceNumber::FIRST,
            Expiry::from_unix_seconds(1_700_000_000).unwrap(),
        )
        .sign(&TransactionSigner::single(FixedSigner))
        .unwrap();

        let out = SignedOutput::from(&signed);
        assert_eq!(
            out.transaction_hash,
            "95a7170adec9300db105c6fef6ffbf299177c63d54d9e6217c7f2979cab04cd9"
        );
        assert_eq!(out.energy, 501);
        assert_eq!(out.payload_size, 41);
        assert_eq!(out.block_item.len(), 173 * 2);
    }
}
