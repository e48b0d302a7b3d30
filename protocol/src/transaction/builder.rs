//! # Transaction Assembler
//!
//! Turns a payload into a signed account transaction, one type state per
//! step:
//!
//! ```text
//! AccountTransactionPayload
//!   --prepare(sender, nonce, expiry)-->  PreparedAccountTransaction
//!   --with_signature_count(n)-->         HeaderedAccountTransaction
//!   --sign(&signer)-->                   SignedAccountTransaction
//!   --to_block_item() / to_message()-->  BlockItem / AccountTransactionMessage
//! ```
//!
//! The energy allowance depends on the number of signatures, and the header
//! that carries it is part of the signing digest. Fixing the signature count
//! before the header exists, and checking it against the signer afterwards,
//! is what keeps the allowance honest. There is no way to reach a
//! `SignedAccountTransaction` whose header was computed for a different
//! number of signatures than it carries.
//!
//! ## Digests
//!
//! - Signing digest: `SHA-256(header ‖ payload)`.
//! - Transaction hash: `SHA-256(kind ‖ signatures ‖ header ‖ payload)`,
//!   always computed locally. The version byte of the block item framing is
//!   not part of it.

use bytes::BufMut;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::codec::{DecodeError, Reader};
use super::energy::calculate_energy_cost;
use super::header::{TransactionHeader, HEADER_LEN};
use super::payload::AccountTransactionPayload;
use super::signature::AccountTransactionSignature;
use super::signing::{SigningError, TransactionSigner};
use super::verification::TransactionError;
use crate::config::{ACCOUNT_TRANSACTION_KIND, BLOCK_ITEM_VERSION, HASH_LENGTH, TRANSACTION_HEADER_SIZE};
use crate::crypto::sha256_concat;
use crate::types::{AccountAddress, Energy, Expiry, PayloadSize, SequenceNumber, TransactionHash};

// ---------------------------------------------------------------------------
// Built
// ---------------------------------------------------------------------------

impl AccountTransactionPayload {
    /// Start assembling a transaction from `sender` carrying this payload.
    pub fn prepare(
        self,
        sender: AccountAddress,
        sequence_number: SequenceNumber,
        expiry: Expiry,
    ) -> PreparedAccountTransaction {
        PreparedAccountTransaction::new(sender, sequence_number, expiry, self)
    }
}

/// A payload with its sender, nonce and expiry, before the signature count
/// (and therefore the energy) is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedAccountTransaction {
    sender: AccountAddress,
    sequence_number: SequenceNumber,
    expiry: Expiry,
    payload: AccountTransactionPayload,
    payload_bytes: Vec<u8>,
}

impl PreparedAccountTransaction {
    pub fn new(
        sender: AccountAddress,
        sequence_number: SequenceNumber,
        expiry: Expiry,
        payload: AccountTransactionPayload,
    ) -> Self {
        let payload_bytes = payload.encode();
        debug!(
            transaction_type = %payload.transaction_type(),
            payload_size = payload_bytes.len(),
            nonce = sequence_number.value(),
            "prepared account transaction"
        );
        Self {
            sender,
            sequence_number,
            expiry,
            payload,
            payload_bytes,
        }
    }

    pub fn sender(&self) -> AccountAddress {
        self.sender
    }

    pub fn sequence_number(&self) -> SequenceNumber {
        self.sequence_number
    }

    pub fn expiry(&self) -> Expiry {
        self.expiry
    }

    pub fn payload(&self) -> &AccountTransactionPayload {
        &self.payload
    }

    pub fn payload_bytes(&self) -> &[u8] {
        &self.payload_bytes
    }

    /// Fix the number of signatures, compute the energy allowance and
    /// build the header.
    pub fn with_signature_count(
        self,
        signature_count: u32,
    ) -> Result<HeaderedAccountTransaction, TransactionError> {
        let size = u32::try_from(self.payload_bytes.len()).map_err(|_| {
            TransactionError::PayloadTooLarge {
                size: self.payload_bytes.len(),
            }
        })?;
        let energy = calculate_energy_cost(
            signature_count,
            self.payload.base_energy_cost(),
            TRANSACTION_HEADER_SIZE,
            size,
        )?;
        let header = TransactionHeader {
            sender: self.sender,
            sequence_number: self.sequence_number,
            energy_amount: energy,
            payload_size: PayloadSize::new(size),
            expiry: self.expiry,
        };
        debug!(
            signatures = signature_count,
            energy = energy.value(),
            "computed transaction header"
        );
        Ok(HeaderedAccountTransaction {
            header,
            payload: self.payload,
            payload_bytes: self.payload_bytes,
            signature_count,
        })
    }

    /// Header and sign in one step, with the signature count taken from
    /// `signer`.
    pub fn sign(self, signer: &TransactionSigner) -> Result<SignedAccountTransaction, TransactionError> {
        if signer.is_empty() {
            return Err(SigningError::NoSigners.into());
        }
        self.with_signature_count(signer.num_signatures())?.sign(signer)
    }
}

// ---------------------------------------------------------------------------
// Headered
// ---------------------------------------------------------------------------

/// A transaction whose header, including the energy allowance, is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderedAccountTransaction {
    header: TransactionHeader,
    payload: AccountTransactionPayload,
    payload_bytes: Vec<u8>,
    signature_count: u32,
}

impl HeaderedAccountTransaction {
    pub fn header(&self) -> &TransactionHeader {
        &self.header
    }

    pub fn payload(&self) -> &AccountTransactionPayload {
        &self.payload
    }

    pub fn signature_count(&self) -> u32 {
        self.signature_count
    }

    /// `SHA-256(header ‖ payload)`, the message every signer signs.
    pub fn signing_digest(&self) -> [u8; HASH_LENGTH] {
        sha256_concat(&[&self.header.encode()[..], &self.payload_bytes[..]])
    }

    /// Sign with `signer`, which must produce exactly the number of
    /// signatures the energy was computed for.
    pub fn sign(self, signer: &TransactionSigner) -> Result<SignedAccountTransaction, TransactionError> {
        let actual = signer.num_signatures();
        if actual != self.signature_count {
            return Err(SigningError::SignatureCountMismatch {
                expected: self.signature_count,
                actual,
            }
            .into());
        }
        let signature = signer.sign(&self.signing_digest())?;
        Ok(SignedAccountTransaction::new(
            self.header,
            self.payload,
            self.payload_bytes,
            signature,
        ))
    }
}

// ---------------------------------------------------------------------------
// Signed
// ---------------------------------------------------------------------------

/// A complete account transaction, ready to be framed for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAccountTransaction {
    header: TransactionHeader,
    payload: AccountTransactionPayload,
    payload_bytes: Vec<u8>,
    signature: AccountTransactionSignature,
    signature_bytes: Vec<u8>,
    hash: TransactionHash,
}

impl SignedAccountTransaction {
    fn new(
        header: TransactionHeader,
        payload: AccountTransactionPayload,
        payload_bytes: Vec<u8>,
        signature: AccountTransactionSignature,
    ) -> Self {
        let signature_bytes = signature.encode();
        let hash = TransactionHash::new(sha256_concat(&[
            &[ACCOUNT_TRANSACTION_KIND][..],
            &signature_bytes[..],
            &header.encode()[..],
            &payload_bytes[..],
        ]));
        debug!(%hash, "signed account transaction");
        Self {
            header,
            payload,
            payload_bytes,
            signature,
            signature_bytes,
            hash,
        }
    }

    pub fn header(&self) -> &TransactionHeader {
        &self.header
    }

    pub fn payload(&self) -> &AccountTransactionPayload {
        &self.payload
    }

    pub fn payload_bytes(&self) -> &[u8] {
        &self.payload_bytes
    }

    pub fn signature(&self) -> &AccountTransactionSignature {
        &self.signature
    }

    pub fn hash(&self) -> TransactionHash {
        self.hash
    }

    pub fn signing_digest(&self) -> [u8; HASH_LENGTH] {
        sha256_concat(&[&self.header.encode()[..], &self.payload_bytes[..]])
    }

    /// Self-contained binary framing:
    /// `version ‖ kind ‖ signatures ‖ header ‖ payload`.
    pub fn to_block_item(&self) -> BlockItem {
        let mut bytes =
            Vec::with_capacity(2 + self.signature_bytes.len() + HEADER_LEN + self.payload_bytes.len());
        bytes.put_u8(BLOCK_ITEM_VERSION);
        bytes.put_u8(ACCOUNT_TRANSACTION_KIND);
        bytes.put_slice(&self.signature_bytes);
        bytes.put_slice(&self.header.encode());
        bytes.put_slice(&self.payload_bytes);
        BlockItem {
            bytes,
            hash: self.hash,
        }
    }

    /// Structured framing for transports that carry the parts as separate
    /// fields.
    pub fn to_message(&self) -> AccountTransactionMessage {
        AccountTransactionMessage {
            header: AccountTransactionMessageHeader {
                sender: self.header.sender,
                sequence_number: self.header.sequence_number,
                expiry: self.header.expiry,
                energy_amount: self.header.energy_amount,
            },
            payload: self.payload_bytes.clone(),
            signature: self.signature.clone(),
        }
    }

    /// Compare a hash reported by a remote endpoint with the local one.
    ///
    /// The local hash stays authoritative; a disagreement is an error.
    pub fn reconcile_remote_hash(
        &self,
        remote: TransactionHash,
    ) -> Result<TransactionHash, TransactionError> {
        if remote != self.hash {
            warn!(local = %self.hash, %remote, "remote transaction hash differs from local hash");
            return Err(TransactionError::RemoteHashMismatch {
                local: self.hash,
                remote,
            });
        }
        Ok(self.hash)
    }
}

// ---------------------------------------------------------------------------
// Wire framings
// ---------------------------------------------------------------------------

/// A serialized block item and its transaction hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockItem {
    #[serde(with = "crate::types::serde_hex::vec")]
    bytes: Vec<u8>,
    hash: TransactionHash,
}

impl BlockItem {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn hash(&self) -> TransactionHash {
        self.hash
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parse a self-contained block item back into a signed transaction.
    ///
    /// The execution budget of contract calls is not on the wire. It is
    /// recovered from the header as the energy left after the signature and
    /// size charges.
    pub fn decode(bytes: &[u8]) -> Result<SignedAccountTransaction, DecodeError> {
        let mut r = Reader::new(bytes);
        let version = r.u8("block item version")?;
        if version != BLOCK_ITEM_VERSION {
            return Err(DecodeError::InvalidVersion(version));
        }
        let kind = r.u8("block item kind")?;
        if kind != ACCOUNT_TRANSACTION_KIND {
            return Err(DecodeError::InvalidBlockItemKind(kind));
        }
        let signature = AccountTransactionSignature::read(&mut r)?;
        let header = TransactionHeader::read(&mut r)?;
        let payload_bytes = r.rest();
        if payload_bytes.len() != header.payload_size.value() as usize {
            return Err(DecodeError::PayloadSizeMismatch {
                declared: header.payload_size.value(),
                actual: payload_bytes.len(),
            });
        }

        let signatures = signature.num_signatures() as u32;
        let overhead = calculate_energy_cost(
            signatures,
            Energy::default(),
            TRANSACTION_HEADER_SIZE,
            header.payload_size.value(),
        )
        .unwrap_or(Energy::new(u64::MAX));
        let budget = Energy::new(header.energy_amount.value().saturating_sub(overhead.value()));
        let payload = AccountTransactionPayload::decode_with_energy(payload_bytes, budget)?;

        Ok(SignedAccountTransaction::new(
            header,
            payload,
            payload_bytes.to_vec(),
            signature,
        ))
    }
}

/// Header fields carried by the structured framing. The payload size is
/// implied by the payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTransactionMessageHeader {
    pub sender: AccountAddress,
    pub sequence_number: SequenceNumber,
    pub expiry: Expiry,
    pub energy_amount: Energy,
}

/// An account transaction as separate header, payload and signature fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTransactionMessage {
    pub header: AccountTransactionMessageHeader,
    #[serde(with = "crate::types::serde_hex::vec")]
    pub payload: Vec<u8>,
    pub signature: AccountTransactionSignature,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Ed25519SignKey;
    use crate::transaction::Signer;
    use crate::types::{CcdAmount, ContractAddress, CredentialIndex, KeyIndex, Parameter, ReceiveName};

    struct FixedSigner([u8; 64]);

    impl Signer for FixedSigner {
        fn sign(&self, _message: &[u8]) -> Vec<u8> {
            self.0.to_vec()
        }
    }

    fn transfer() -> PreparedAccountTransaction {
        AccountTransactionPayload::transfer(
            CcdAmount::from_micro_ccd(1_000_000),
            AccountAddress::new([1; 32]),
        )
        .prepare(
            AccountAddress::new([0; 32]),
            SequenceNumber::FIRST,
            Expiry::from_unix_seconds(1_700_000_000).unwrap(),
        )
    }

    fn one_signer() -> TransactionSigner {
        TransactionSigner::single(FixedSigner([0x42; 64]))
    }

    #[test]
    fn header_reflects_signature_count() {
        let headered = transfer().with_signature_count(3).unwrap();
        assert_eq!(headered.header().energy_amount, Energy::new(701));
        assert_eq!(headered.header().payload_size, PayloadSize::new(41));
        assert_eq!(headered.signature_count(), 3);
    }

    #[test]
    fn one_step_sign_matches_two_step() {
        let signer = one_signer();
        let direct = transfer().sign(&signer).unwrap();
        let stepped = transfer().with_signature_count(1).unwrap().sign(&signer).unwrap();
        assert_eq!(direct, stepped);
        assert_eq!(direct.header().energy_amount, Energy::new(501));
    }

    #[test]
    fn signature_count_must_match_signer() {
        let err = transfer()
            .with_signature_count(2)
            .unwrap()
            .sign(&one_signer())
            .unwrap_err();
        assert_eq!(
            err,
            TransactionError::Signing(SigningError::SignatureCountMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn empty_signer_fails_before_headering() {
        let empty = TransactionSigner::builder().build();
        assert_eq!(
            transfer().sign(&empty).unwrap_err(),
            TransactionError::Signing(SigningError::NoSigners)
        );
    }

    #[test]
    fn energy_overflow_surfaces() {
        let prepared = AccountTransactionPayload::UpdateContract {
            amount: CcdAmount::ZERO,
            address: ContractAddress::new(0, 0),
            receive_name: ReceiveName::new("a.b").unwrap(),
            parameter: Parameter::empty(),
            max_energy: Energy::new(u64::MAX),
        }
        .prepare(
            AccountAddress::new([0; 32]),
            SequenceNumber::FIRST,
            Expiry::from_unix_seconds(0).unwrap(),
        );
        assert!(matches!(
            prepared.with_signature_count(1),
            Err(TransactionError::Energy(_))
        ));
    }

    #[test]
    fn block_item_layout() {
        let signed = transfer().sign(&one_signer()).unwrap();
        let item = signed.to_block_item();
        let bytes = item.as_bytes();
        assert_eq!(bytes[0], BLOCK_ITEM_VERSION);
        assert_eq!(bytes[1], ACCOUNT_TRANSACTION_KIND);
        let sig_len = signed.signature().encoded_len();
        assert_eq!(sig_len, 1 + 2 + 3 + 64);
        assert_eq!(&bytes[2 + sig_len..2 + sig_len + 60], &signed.header().encode());
        assert_eq!(&bytes[2 + sig_len + 60..], signed.payload_bytes());
        assert_eq!(bytes.len(), 2 + sig_len + 60 + 41);
    }

    #[test]
    fn hash_excludes_version_byte() {
        let signed = transfer().sign(&one_signer()).unwrap();
        let item = signed.to_block_item();
        assert_eq!(
            item.hash().as_bytes(),
            &crate::crypto::sha256(&item.as_bytes()[1..])
        );
    }

    #[test]
    fn block_item_decodes_to_same_transaction() {
        let signed = transfer().sign(&one_signer()).unwrap();
        let decoded = BlockItem::decode(signed.to_block_item().as_bytes()).unwrap();
        assert_eq!(decoded, signed);
    }

    #[test]
    fn decode_recovers_contract_budget() {
        let payload = AccountTransactionPayload::UpdateContract {
            amount: CcdAmount::from_micro_ccd(5),
            address: ContractAddress::new(3, 0),
            receive_name: ReceiveName::new("counter.inc").unwrap(),
            parameter: Parameter::new(vec![1]).unwrap(),
            max_energy: Energy::new(12_345),
        };
        let signed = payload
            .prepare(
                AccountAddress::new([2; 32]),
                SequenceNumber::new(9).unwrap(),
                Expiry::from_unix_seconds(1_800_000_000).unwrap(),
            )
            .sign(&one_signer())
            .unwrap();
        let decoded = BlockItem::decode(signed.to_block_item().as_bytes()).unwrap();
        assert_eq!(decoded.payload(), signed.payload());
    }

    #[test]
    fn decode_rejects_bad_framing() {
        let bytes = transfer().sign(&one_signer()).unwrap().to_block_item().into_bytes();

        let mut wrong_version = bytes.clone();
        wrong_version[0] = 1;
        assert_eq!(BlockItem::decode(&wrong_version), Err(DecodeError::InvalidVersion(1)));

        let mut wrong_kind = bytes.clone();
        wrong_kind[1] = 2;
        assert_eq!(BlockItem::decode(&wrong_kind), Err(DecodeError::InvalidBlockItemKind(2)));

        let mut extra = bytes.clone();
        extra.push(0);
        assert_eq!(
            BlockItem::decode(&extra),
            Err(DecodeError::PayloadSizeMismatch {
                declared: 41,
                actual: 42
            })
        );
    }

    #[test]
    fn message_carries_parts() {
        let signed = transfer().sign(&one_signer()).unwrap();
        let message = signed.to_message();
        assert_eq!(message.payload, signed.payload_bytes());
        assert_eq!(message.header.energy_amount, Energy::new(501));
        assert_eq!(message.header.sequence_number, SequenceNumber::FIRST);
        assert_eq!(&message.signature, signed.signature());

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["header"]["sequenceNumber"], 1);
        assert_eq!(json["signature"]["0"]["0"], hex::encode([0x42; 64]));
        let back: AccountTransactionMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn remote_hash_reconciliation() {
        let signed = transfer().sign(&one_signer()).unwrap();
        assert_eq!(signed.reconcile_remote_hash(signed.hash()), Ok(signed.hash()));

        let other = TransactionHash::new([0xee; 32]);
        assert_eq!(
            signed.reconcile_remote_hash(other),
            Err(TransactionError::RemoteHashMismatch {
                local: signed.hash(),
                remote: other
            })
        );
    }

    #[test]
    fn ed25519_signatures_verify_over_digest() {
        let key = Ed25519SignKey::from_bytes(&[8; 32]);
        let public = key.public_key();
        let signed = transfer().sign(&TransactionSigner::single(key)).unwrap();
        let sig = signed
            .signature()
            .get(CredentialIndex(0), KeyIndex(0))
            .unwrap();
        assert!(public.verify(&signed.signing_digest(), sig));
    }
}
