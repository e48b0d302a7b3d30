//! # Signer Registry & Multi-Signature Engine
//!
//! An account transaction is signed by one or more keys of the sender
//! account, each addressed by a (credential index, key index) pair. The
//! engine never sees key material: every key is a [`Signer`], a capability
//! that turns a digest into signature bytes. Software keys
//! ([`Ed25519SignKey`](crate::crypto::Ed25519SignKey)), hardware wallets and
//! remote signing services all fit behind it.
//!
//! ## Lifecycle
//!
//! 1. Collect signers with a [`TransactionSignerBuilder`].
//! 2. `build()` freezes them into an immutable [`TransactionSigner`].
//! 3. [`TransactionSigner::sign`] asks every signer, in ascending index
//!    order, to sign the same digest and returns the
//!    [`AccountTransactionSignature`] map.
//!
//! A frozen registry can be shared freely between threads. To rotate keys at
//! runtime without disturbing in-flight signing, hold it in a
//! [`SharedTransactionSigner`] and swap in a new registry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use super::signature::AccountTransactionSignature;
use crate::config::MAX_SIGNER_ENTRIES;
use crate::types::{CredentialIndex, KeyIndex};

// ---------------------------------------------------------------------------
// Signer
// ---------------------------------------------------------------------------

/// Something that can sign a transaction digest.
///
/// Implementations must be deterministic in the sense the chain cares
/// about: the returned bytes must verify against the public key registered
/// for the signer's (credential, key) slot.
pub trait Signer: Send + Sync {
    fn sign(&self, message: &[u8]) -> Vec<u8>;
}

impl<S: Signer + ?Sized> Signer for Arc<S> {
    fn sign(&self, message: &[u8]) -> Vec<u8> {
        (**self).sign(message)
    }
}

impl<S: Signer + ?Sized> Signer for Box<S> {
    fn sign(&self, message: &[u8]) -> Vec<u8> {
        (**self).sign(message)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// The registry holds no signers.
    #[error("no signers registered")]
    NoSigners,

    /// A signer is already registered for this slot.
    #[error("a signer is already registered for credential {credential}, key {key}")]
    DuplicateKey {
        credential: CredentialIndex,
        key: KeyIndex,
    },

    #[error("at most {max} credentials can sign a transaction")]
    TooManyCredentials { max: usize },

    #[error("credential {credential} can have at most {max} signing keys")]
    TooManyKeys {
        credential: CredentialIndex,
        max: usize,
    },

    /// A signer returned more bytes than a `u16` length prefix can describe.
    #[error("signature from credential {credential}, key {key} is {length} bytes long")]
    SignatureTooLong {
        credential: CredentialIndex,
        key: KeyIndex,
        length: usize,
    },

    /// The registry would produce a different number of signatures than the
    /// header's energy allowance was computed for.
    #[error("energy was computed for {expected} signatures but the signer produces {actual}")]
    SignatureCountMismatch { expected: u32, actual: u32 },
}

// ---------------------------------------------------------------------------
// TransactionSignerBuilder
// ---------------------------------------------------------------------------

type SignerMap = BTreeMap<CredentialIndex, BTreeMap<KeyIndex, Arc<dyn Signer>>>;

/// Collects signers before they are frozen into a [`TransactionSigner`].
#[derive(Default)]
pub struct TransactionSignerBuilder {
    signers: SignerMap,
}

impl TransactionSignerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `signer` for the (credential, key) slot.
    pub fn add(
        self,
        credential: CredentialIndex,
        key: KeyIndex,
        signer: impl Signer + 'static,
    ) -> Result<Self, SigningError> {
        self.add_shared(credential, key, Arc::new(signer))
    }

    /// Register a signer that is already shared elsewhere.
    pub fn add_shared(
        mut self,
        credential: CredentialIndex,
        key: KeyIndex,
        signer: Arc<dyn Signer>,
    ) -> Result<Self, SigningError> {
        if !self.signers.contains_key(&credential) && self.signers.len() >= MAX_SIGNER_ENTRIES {
            return Err(SigningError::TooManyCredentials {
                max: MAX_SIGNER_ENTRIES,
            });
        }
        let keys = self.signers.entry(credential).or_default();
        if keys.contains_key(&key) {
            return Err(SigningError::DuplicateKey { credential, key });
        }
        if keys.len() >= MAX_SIGNER_ENTRIES {
            return Err(SigningError::TooManyKeys {
                credential,
                max: MAX_SIGNER_ENTRIES,
            });
        }
        keys.insert(key, signer);
        Ok(self)
    }

    pub fn build(self) -> TransactionSigner {
        TransactionSigner {
            signers: Arc::new(self.signers),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionSigner
// ---------------------------------------------------------------------------

/// An immutable registry of signers for one account.
///
/// Cloning is cheap; clones share the same signers.
#[derive(Clone)]
pub struct TransactionSigner {
    signers: Arc<SignerMap>,
}

impl TransactionSigner {
    pub fn builder() -> TransactionSignerBuilder {
        TransactionSignerBuilder::new()
    }

    /// Registry with a single signer in slot (0, 0), the common case of an
    /// account with one credential and one key.
    pub fn single(signer: impl Signer + 'static) -> Self {
        let mut keys: BTreeMap<KeyIndex, Arc<dyn Signer>> = BTreeMap::new();
        keys.insert(KeyIndex(0), Arc::new(signer));
        let mut signers = SignerMap::new();
        signers.insert(CredentialIndex(0), keys);
        Self {
            signers: Arc::new(signers),
        }
    }

    /// Number of signatures [`sign`](Self::sign) produces. This is the
    /// count the energy model charges for.
    pub fn num_signatures(&self) -> u32 {
        // Bounded by 255 * 255 in the builder.
        self.signers.values().map(|keys| keys.len() as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Registered slots in ascending order.
    pub fn slots(&self) -> impl Iterator<Item = (CredentialIndex, KeyIndex)> + '_ {
        self.signers
            .iter()
            .flat_map(|(cred, keys)| keys.keys().map(move |key| (*cred, *key)))
    }

    /// Sign `digest` with every registered signer.
    pub fn sign(&self, digest: &[u8]) -> Result<AccountTransactionSignature, SigningError> {
        if self.signers.is_empty() {
            return Err(SigningError::NoSigners);
        }
        let signatures: BTreeMap<CredentialIndex, BTreeMap<KeyIndex, Vec<u8>>> = self
            .signers
            .iter()
            .map(|(cred, keys)| {
                let sigs: BTreeMap<KeyIndex, Vec<u8>> = keys
                    .iter()
                    .map(|(key, signer)| (*key, signer.sign(digest)))
                    .collect();
                (*cred, sigs)
            })
            .collect();
        let signature = AccountTransactionSignature::new(signatures)?;
        debug!(
            credentials = signature.num_credentials(),
            signatures = signature.num_signatures(),
            "signed transaction digest"
        );
        Ok(signature)
    }
}

impl fmt::Debug for TransactionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionSigner")
            .field("slots", &self.slots().collect::<Vec<_>>())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SharedTransactionSigner
// ---------------------------------------------------------------------------

/// A replaceable registry for long-running processes that rotate keys.
///
/// Signing always goes through a [`snapshot`](Self::snapshot): a
/// `replace()` that lands mid-signature affects only later snapshots.
#[derive(Clone)]
pub struct SharedTransactionSigner {
    current: Arc<RwLock<Arc<TransactionSigner>>>,
}

impl SharedTransactionSigner {
    pub fn new(signer: TransactionSigner) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(signer))),
        }
    }

    /// The registry in effect right now.
    pub fn snapshot(&self) -> Arc<TransactionSigner> {
        Arc::clone(&self.current.read())
    }

    /// Install a new registry, returning the previous one.
    pub fn replace(&self, signer: TransactionSigner) -> Arc<TransactionSigner> {
        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(signer));
        debug!(
            signatures = self.current.read().num_signatures(),
            "replaced transaction signer"
        );
        previous
    }
}

impl fmt::Debug for SharedTransactionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedTransactionSigner")
            .field(&*self.snapshot())
            .finish()
    }
}
