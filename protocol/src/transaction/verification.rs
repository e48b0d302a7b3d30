//! Transaction errors and pre-submission verification.
//!
//! [`TransactionError`] is the error every assembler step returns. It wraps
//! the narrower error enums of the codecs, the energy model and the signer
//! registry, so callers can `?` through the whole pipeline.
//!
//! [`verify_transaction`] re-checks a signed transaction the way the chain
//! will before accepting it, e.g. for a transaction decoded from a block
//! item. The checks are ordered from cheapest to most expensive.

use std::collections::BTreeMap;

use thiserror::Error;

use super::builder::SignedAccountTransaction;
use super::codec::DecodeError;
use super::energy::{calculate_energy_cost, EnergyError};
use super::signing::SigningError;
use crate::config::TRANSACTION_HEADER_SIZE;
use crate::crypto::Ed25519PublicKey;
use crate::types::{CredentialIndex, Energy, Expiry, KeyIndex, TransactionHash, TypeError};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Energy(#[from] EnergyError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The encoded payload does not fit the header's `u32` size field.
    #[error("payload of {size} bytes does not fit in a transaction")]
    PayloadTooLarge { size: usize },

    /// A transport reported a hash different from the locally computed one.
    #[error("remote transaction hash {remote} does not match local hash {local}")]
    RemoteHashMismatch {
        local: TransactionHash,
        remote: TransactionHash,
    },

    /// The transaction can no longer be included in a block.
    #[error("transaction expired at {expiry}")]
    Expired { expiry: Expiry },

    /// The header's allowance does not cover the signature and size charges.
    #[error("energy allowance {allowance} is below the required minimum {required}")]
    InsufficientEnergy { allowance: Energy, required: Energy },

    /// A signature has no registered key or fails to verify.
    #[error("signature of credential {credential}, key {key} does not verify")]
    InvalidSignature {
        credential: CredentialIndex,
        key: KeyIndex,
    },
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Check a signed transaction against the sender's published keys at the
/// given block time (unix seconds).
///
/// 1. **Expiry**: the block time must be before the expiry.
/// 2. **Energy**: the allowance must at least cover the per-signature and
///    per-byte charges for the signatures actually attached.
/// 3. **Signatures**: every signature must verify over the signing digest
///    with the key registered for its slot.
pub fn verify_transaction(
    tx: &SignedAccountTransaction,
    keys: &BTreeMap<CredentialIndex, BTreeMap<KeyIndex, Ed25519PublicKey>>,
    block_time: u64,
) -> Result<(), TransactionError> {
    let header = tx.header();
    if header.expiry.is_expired_at(block_time) {
        return Err(TransactionError::Expired {
            expiry: header.expiry,
        });
    }

    let signatures = tx.signature().num_signatures() as u32;
    let required = calculate_energy_cost(
        signatures,
        Energy::default(),
        TRANSACTION_HEADER_SIZE,
        header.payload_size.value(),
    )?;
    if header.energy_amount < required {
        return Err(TransactionError::InsufficientEnergy {
            allowance: header.energy_amount,
            required,
        });
    }

    let digest = tx.signing_digest();
    for (credential, sigs) in tx.signature().signatures() {
        for (key, signature) in sigs {
            let verified = keys
                .get(credential)
                .and_then(|cred_keys| cred_keys.get(key))
                .is_some_and(|public| public.verify(&digest, signature));
            if !verified {
                return Err(TransactionError::InvalidSignature {
                    credential: *credential,
                    key: *key,
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Ed25519SignKey;
    use crate::transaction::{AccountTransactionPayload, BlockItem, TransactionSigner};
    use crate::types::{AccountAddress, CcdAmount, SequenceNumber};

    const EXPIRY: u64 = 1_700_000_000;

    fn keys_and_signer() -> (
        BTreeMap<CredentialIndex, BTreeMap<KeyIndex, Ed25519PublicKey>>,
        TransactionSigner,
    ) {
        let a = Ed25519SignKey::from_bytes(&[1; 32]);
        let b = Ed25519SignKey::from_bytes(&[2; 32]);
        let mut keys = BTreeMap::new();
        keys.insert(
            CredentialIndex(0),
            BTreeMap::from([(KeyIndex(0), a.public_key()), (KeyIndex(1), b.public_key())]),
        );
        let signer = TransactionSigner::builder()
            .add(CredentialIndex(0), KeyIndex(0), a)
            .unwrap()
            .add(CredentialIndex(0), KeyIndex(1), b)
            .unwrap()
            .build();
        (keys, signer)
    }

    fn signed(signer: &TransactionSigner) -> SignedAccountTransaction {
        AccountTransactionPayload::transfer(CcdAmount::from_micro_ccd(10), AccountAddress::new([3; 32]))
            .prepare(
                AccountAddress::new([4; 32]),
                SequenceNumber::FIRST,
                Expiry::from_unix_seconds(EXPIRY).unwrap(),
            )
            .sign(signer)
            .unwrap()
    }

    #[test]
    fn valid_transaction_passes() {
        let (keys, signer) = keys_and_signer();
        assert_eq!(verify_transaction(&signed(&signer), &keys, EXPIRY - 1), Ok(()));
    }

    #[test]
    fn expired_at_expiry_time() {
        let (keys, signer) = keys_and_signer();
        assert!(matches!(
            verify_transaction(&signed(&signer), &keys, EXPIRY),
            Err(TransactionError::Expired { .. })
        ));
    }

    #[test]
    fn unknown_key_fails() {
        let (mut keys, signer) = keys_and_signer();
        keys.get_mut(&CredentialIndex(0))
            .unwrap()
            .remove(&KeyIndex(1));
        assert_eq!(
            verify_transaction(&signed(&signer), &keys, 0),
            Err(TransactionError::InvalidSignature {
                credential: CredentialIndex(0),
                key: KeyIndex(1)
            })
        );
    }

    #[test]
    fn tampered_block_item_fails_verification() {
        let (keys, signer) = keys_and_signer();
        let mut bytes = signed(&signer).to_block_item().into_bytes();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let decoded = BlockItem::decode(&bytes).unwrap();
        assert!(matches!(
            verify_transaction(&decoded, &keys, 0),
            Err(TransactionError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn underfunded_header_fails() {
        let (keys, signer) = keys_and_signer();
        let mut bytes = signed(&signer).to_block_item().into_bytes();
        // Energy field: after version, kind, the two-key signature map and
        // the sender and nonce fields.
        let energy_at = 2 + (1 + 2 + 2 * (3 + 64)) + 32 + 8;
        bytes[energy_at..energy_at + 8].copy_from_slice(&1u64.to_be_bytes());
        let decoded = BlockItem::decode(&bytes).unwrap();
        assert_eq!(
            verify_transaction(&decoded, &keys, 0),
            Err(TransactionError::InsufficientEnergy {
                allowance: Energy::new(1),
                required: Energy::new(200 + 60 + 41)
            })
        );
    }
}
