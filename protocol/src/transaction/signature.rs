//! The signature map attached to a signed account transaction.
//!
//! An account may hold several credentials, each with several keys. A
//! transaction carries one signature per (credential, key) pair that signed
//! it, encoded as:
//!
//! ```text
//! cred_count[1]
//!   ( cred_index[1] key_count[1]
//!       ( key_index[1] sig_len[2] sig[sig_len] )*
//!   )*
//! ```
//!
//! Both levels are written in ascending index order.

use std::collections::BTreeMap;

use bytes::BufMut;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::codec::{DecodeError, Reader};
use super::signing::SigningError;
use crate::config::{MAX_SIGNATURE_LENGTH, MAX_SIGNER_ENTRIES};
use crate::crypto::Ed25519PublicKey;
use crate::types::{CredentialIndex, KeyIndex};

type SignatureMap = BTreeMap<CredentialIndex, BTreeMap<KeyIndex, Vec<u8>>>;

/// Signatures of a transaction, keyed by credential and key index.
///
/// Produced by [`TransactionSigner::sign`](super::TransactionSigner::sign)
/// and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTransactionSignature {
    signatures: SignatureMap,
}

impl AccountTransactionSignature {
    /// Check the map's shape: at least one credential, at most 255 entries
    /// at either level and no signature longer than a `u16` length prefix
    /// can describe.
    pub fn new(signatures: SignatureMap) -> Result<Self, SigningError> {
        if signatures.is_empty() {
            return Err(SigningError::NoSigners);
        }
        if signatures.len() > MAX_SIGNER_ENTRIES {
            return Err(SigningError::TooManyCredentials {
                max: MAX_SIGNER_ENTRIES,
            });
        }
        for (&credential, keys) in &signatures {
            if keys.len() > MAX_SIGNER_ENTRIES {
                return Err(SigningError::TooManyKeys {
                    credential,
                    max: MAX_SIGNER_ENTRIES,
                });
            }
            for (&key, signature) in keys {
                if signature.len() > MAX_SIGNATURE_LENGTH {
                    return Err(SigningError::SignatureTooLong {
                        credential,
                        key,
                        length: signature.len(),
                    });
                }
            }
        }
        Ok(Self { signatures })
    }

    pub fn signatures(&self) -> &SignatureMap {
        &self.signatures
    }

    pub fn get(&self, credential: CredentialIndex, key: KeyIndex) -> Option<&[u8]> {
        self.signatures
            .get(&credential)
            .and_then(|keys| keys.get(&key))
            .map(Vec::as_slice)
    }

    pub fn num_credentials(&self) -> usize {
        self.signatures.len()
    }

    /// Total number of signatures across all credentials.
    pub fn num_signatures(&self) -> usize {
        self.signatures.values().map(BTreeMap::len).sum()
    }

    /// Length of [`encode`](Self::encode)'s output.
    pub fn encoded_len(&self) -> usize {
        1 + self
            .signatures
            .values()
            .map(|keys| 2 + keys.values().map(|sig| 3 + sig.len()).sum::<usize>())
            .sum::<usize>()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        // Counts and lengths were bounded in `new`.
        buf.put_u8(self.signatures.len() as u8);
        for (credential, keys) in &self.signatures {
            buf.put_u8(credential.0);
            buf.put_u8(keys.len() as u8);
            for (key, signature) in keys {
                buf.put_u8(key.0);
                buf.put_u16(signature.len() as u16);
                buf.put_slice(signature);
            }
        }
        buf
    }

    /// Parse a signature map that makes up the whole of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let signature = Self::read(&mut r)?;
        r.finish("signature map")?;
        Ok(signature)
    }

    /// Read a signature map from the front of a longer buffer.
    ///
    /// Indices must be strictly ascending, so every encoding has exactly one
    /// decoding and re-encodes to the same bytes.
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let credential_count = r.u8("credential count")?;
        if credential_count == 0 {
            return Err(DecodeError::EmptySignatureMap);
        }
        let mut signatures = SignatureMap::new();
        let mut last_credential = None;
        for _ in 0..credential_count {
            let credential = CredentialIndex(r.u8("credential index")?);
            if last_credential.is_some_and(|last| credential <= last) {
                return Err(DecodeError::UnorderedIndex("credential index"));
            }
            last_credential = Some(credential);

            let key_count = r.u8("key count")?;
            let mut keys = BTreeMap::new();
            let mut last_key = None;
            for _ in 0..key_count {
                let key = KeyIndex(r.u8("key index")?);
                if last_key.is_some_and(|last| key <= last) {
                    return Err(DecodeError::UnorderedIndex("key index"));
                }
                last_key = Some(key);
                let length = r.u16("signature length")?;
                keys.insert(key, r.bytes("signature", usize::from(length))?.to_vec());
            }
            signatures.insert(credential, keys);
        }
        Ok(Self { signatures })
    }

    /// Check every signature over `digest` against the account's published
    /// keys. Fails if any signature has no matching key or does not verify.
    pub fn verify(
        &self,
        digest: &[u8],
        keys: &BTreeMap<CredentialIndex, BTreeMap<KeyIndex, Ed25519PublicKey>>,
    ) -> bool {
        self.signatures.iter().all(|(credential, sigs)| {
            sigs.iter().all(|(key, signature)| {
                keys.get(credential)
                    .and_then(|cred_keys| cred_keys.get(key))
                    .is_some_and(|public| public.verify(digest, signature))
            })
        })
    }
}

impl Serialize for AccountTransactionSignature {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let hexed: BTreeMap<CredentialIndex, BTreeMap<KeyIndex, String>> = self
            .signatures
            .iter()
            .map(|(cred, keys)| {
                let keys = keys.iter().map(|(k, sig)| (*k, hex::encode(sig))).collect();
                (*cred, keys)
            })
            .collect();
        hexed.serialize(s)
    }
}

impl<'de> Deserialize<'de> for AccountTransactionSignature {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let hexed = BTreeMap::<CredentialIndex, BTreeMap<KeyIndex, String>>::deserialize(d)?;
        let mut signatures = SignatureMap::new();
        for (cred, keys) in hexed {
            let mut decoded = BTreeMap::new();
            for (key, sig) in keys {
                decoded.insert(key, hex::decode(sig).map_err(serde::de::Error::custom)?);
            }
            signatures.insert(cred, decoded);
        }
        Self::new(signatures).map_err(serde::de::Error::custom)
    }
}
