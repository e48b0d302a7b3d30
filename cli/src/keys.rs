//! Wallet key exports.
//!
//! Signing keys are imported from the two export formats Concordium wallets
//! produce. Both carry the same `accountKeys` object:
//!
//! ```json
//! { "keys": { "<cred>": { "keys": { "<key>": { "signKey": "<64 hex>", ... } } } } }
//! ```
//!
//! The genesis format has `accountKeys` and `address` at the top level. The
//! browser wallet format nests them under `value`. A file is read as a
//! genesis export first and as a browser export if that fails.
//!
//! Exported addresses are base58. They are only used when they are written
//! as hex; otherwise the sender must be given explicitly.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use ccd_tx::crypto::Ed25519SignKey;
use ccd_tx::transaction::TransactionSigner;
use ccd_tx::types::{AccountAddress, CredentialIndex, KeyIndex};

// ---------------------------------------------------------------------------
// Export formats
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenesisWalletExport {
    account_keys: WalletKeys,
    address: String,
}

#[derive(Deserialize)]
struct BrowserWalletExport {
    value: BrowserWalletValue,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrowserWalletValue {
    account_keys: WalletKeys,
    address: String,
}

#[derive(Deserialize)]
struct WalletKeys {
    keys: BTreeMap<u8, CredentialKeys>,
}

#[derive(Deserialize)]
struct CredentialKeys {
    keys: BTreeMap<u8, KeyPair>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyPair {
    sign_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletFormat {
    Genesis,
    Browser,
}

// ---------------------------------------------------------------------------
// AccountKeys
// ---------------------------------------------------------------------------

/// The sender account and its signer registry, imported from a wallet export.
pub struct AccountKeys {
    pub address: AccountAddress,
    pub signer: TransactionSigner,
    pub format: WalletFormat,
}

impl fmt::Debug for AccountKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountKeys")
            .field("address", &self.address)
            .field("format", &self.format)
            .field("signatures", &self.signer.num_signatures())
            .finish()
    }
}

impl AccountKeys {
    pub fn load(path: &Path, sender: Option<AccountAddress>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read key file {}", path.display()))?;
        Self::from_wallet_export(&raw, sender)
            .with_context(|| format!("invalid key file {}", path.display()))
    }

    /// Parse a genesis or browser wallet export. `sender` takes the place of
    /// the exported address when that address is not hex.
    pub fn from_wallet_export(raw: &str, sender: Option<AccountAddress>) -> Result<Self> {
        let genesis = serde_json::from_str::<GenesisWalletExport>(raw)
            .map_err(anyhow::Error::from)
            .and_then(|export| {
                Self::from_parts(WalletFormat::Genesis, &export.address, export.account_keys, sender)
            });
        let genesis_err = match genesis {
            Ok(keys) => return Ok(keys),
            Err(err) => err,
        };

        serde_json::from_str::<BrowserWalletExport>(raw)
            .map_err(anyhow::Error::from)
            .and_then(|export| {
                let value = export.value;
                Self::from_parts(WalletFormat::Browser, &value.address, value.account_keys, sender)
            })
            .map_err(|browser_err| {
                tracing::debug!(error = %browser_err, "not a browser wallet export");
                genesis_err.context("not a genesis or browser wallet key export")
            })
    }

    fn from_parts(
        format: WalletFormat,
        exported_address: &str,
        keys: WalletKeys,
        sender: Option<AccountAddress>,
    ) -> Result<Self> {
        let address = resolve_sender(exported_address, sender)?;

        let mut builder = TransactionSigner::builder();
        for (credential, credential_keys) in keys.keys {
            for (key, pair) in credential_keys.keys {
                let sign_key = Ed25519SignKey::from_hex(&pair.sign_key)
                    .with_context(|| format!("bad sign key at slot ({credential}, {key})"))?;
                builder = builder.add(CredentialIndex(credential), KeyIndex(key), sign_key)?;
            }
        }
        let signer = builder.build();
        if signer.is_empty() {
            bail!("wallet export holds no sign keys");
        }

        tracing::debug!(
            ?format,
            address = %address,
            signatures = signer.num_signatures(),
            "imported wallet keys"
        );
        Ok(Self {
            address,
            signer,
            format,
        })
    }
}

fn resolve_sender(exported: &str, sender: Option<AccountAddress>) -> Result<AccountAddress> {
    let parsed = exported.parse::<AccountAddress>().ok();
    match (sender, parsed) {
        (Some(sender), Some(parsed)) if sender != parsed => {
            bail!("sender {sender} does not match the exported address {parsed}")
        }
        (Some(sender), _) => Ok(sender),
        (None, Some(parsed)) => Ok(parsed),
        (None, None) => bail!(
            "exported address {exported:?} is not hex; pass the sender address with --sender"
        ),
    }
}
