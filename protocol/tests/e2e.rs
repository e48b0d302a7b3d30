//! End-to-end tests for the account transaction engine.
//!
//! These run the full pipeline: payload, header, energy, signing, framing,
//! and decoding back. Every expected byte and hash below is a literal, so a
//! change in any layout shows up here even if the unit tests agree with
//! themselves.

use std::collections::BTreeMap;

use ccd_tx::crypto::{sha256, Ed25519SignKey};
use ccd_tx::transaction::{
    verify_transaction, AccountTransactionPayload, AccountTransactionSignature, BlockItem,
    SharedTransactionSigner, Signer, SigningError, TransactionError, TransactionHeader,
    TransactionSigner,
};
use ccd_tx::types::{
    AccountAddress, CcdAmount, CredentialIndex, Energy, Expiry, KeyIndex, OnChainData,
    PayloadSize, SequenceNumber, TransactionHash,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// A signer that ignores its input and returns fixed bytes.
struct FixedSigner(Vec<u8>);

impl Signer for FixedSigner {
    fn sign(&self, _message: &[u8]) -> Vec<u8> {
        self.0.clone()
    }
}

const EXPIRY: u64 = 1_700_000_000;

fn sender() -> AccountAddress {
    AccountAddress::new([0; 32])
}

fn receiver() -> AccountAddress {
    AccountAddress::new([1; 32])
}

fn reference_transfer() -> AccountTransactionPayload {
    AccountTransactionPayload::transfer(CcdAmount::from_micro_ccd(1_000_000), receiver())
}

fn reference_signer() -> TransactionSigner {
    TransactionSigner::single(FixedSigner(vec![0x42; 64]))
}

fn assemble(
    payload: AccountTransactionPayload,
    signer: &TransactionSigner,
) -> ccd_tx::transaction::SignedAccountTransaction {
    payload
        .prepare(
            sender(),
            SequenceNumber::FIRST,
            Expiry::from_unix_seconds(EXPIRY).unwrap(),
        )
        .sign(signer)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Reference scenario
// ---------------------------------------------------------------------------

#[test]
fn reference_transfer_end_to_end() {
    let signed = assemble(reference_transfer(), &reference_signer());

    assert_eq!(signed.payload_bytes().len(), 41);
    assert_eq!(signed.header().encode().len(), 60);
    assert_eq!(signed.header().energy_amount, Energy::new(501));
    assert_eq!(signed.header().payload_size, PayloadSize::new(41));

    assert_eq!(
        hex::encode(signed.signing_digest()),
        "043e08a048786cef565d7f6be94307c5d3a06429c4304eb2bf220ed8b0d70070"
    );
    let expected_hash: TransactionHash =
        "95a7170adec9300db105c6fef6ffbf299177c63d54d9e6217c7f2979cab04cd9"
            .parse()
            .unwrap();
    assert_eq!(signed.hash(), expected_hash);

    let item = signed.to_block_item();
    assert_eq!(item.hash(), expected_hash);
    assert_eq!(item.as_bytes().len(), 173);
    assert_eq!(
        item.to_hex(),
        concat!(
            "0000",
            "010001000040",
            "42424242424242424242424242424242424242424242424242424242424242424242424242424242424242424242424242424242424242424242424242424242",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "0000000000000001",
            "00000000000001f5",
            "00000029",
            "000000006553f100",
            "03",
            "0101010101010101010101010101010101010101010101010101010101010101",
            "00000000000f4240",
        )
    );
}

#[test]
fn reference_transfer_round_trips_through_block_item() {
    let signed = assemble(reference_transfer(), &reference_signer());
    let decoded = BlockItem::decode(signed.to_block_item().as_bytes()).unwrap();
    assert_eq!(decoded, signed);
    assert_eq!(
        TransactionHeader::decode(&signed.header().encode()).unwrap(),
        *signed.header()
    );
}

#[test]
fn structured_message_matches_block_item() {
    let signed = assemble(reference_transfer(), &reference_signer());
    let message = signed.to_message();
    let item = signed.to_block_item();

    let sig_bytes = message.signature.encode();
    let header = TransactionHeader {
        sender: message.header.sender,
        sequence_number: message.header.sequence_number,
        energy_amount: message.header.energy_amount,
        payload_size: PayloadSize::new(message.payload.len() as u32),
        expiry: message.header.expiry,
    };
    let rebuilt = [&[0u8, 0][..], &sig_bytes[..], &header.encode()[..], &message.payload[..]].concat();
    assert_eq!(rebuilt, item.as_bytes());
}

// ---------------------------------------------------------------------------
// Known-answer payloads
// ---------------------------------------------------------------------------

const WALLET_RECEIVER: [u8; 32] = [
    71, 16, 92, 61, 132, 191, 45, 174, 170, 208, 206, 153, 215, 123, 117, 254, 225, 53, 137, 184,
    94, 41, 112, 215, 225, 165, 254, 29, 145, 253, 190, 160,
];

#[test]
fn hundred_ccd_transfer_bytes() {
    let payload = AccountTransactionPayload::transfer(
        CcdAmount::from_ccd(100).unwrap(),
        AccountAddress::new(WALLET_RECEIVER),
    );
    let mut expected = vec![3u8];
    expected.extend_from_slice(&WALLET_RECEIVER);
    expected.extend_from_slice(&[0, 0, 0, 0, 5, 245, 225, 0]);
    assert_eq!(payload.encode(), expected);
}

#[test]
fn memo_transfer_costs_bytes_not_base() {
    let plain = assemble(reference_transfer(), &reference_signer());
    let memo = assemble(
        AccountTransactionPayload::transfer_with_memo(
            CcdAmount::from_micro_ccd(1_000_000),
            receiver(),
            OnChainData::new(b"\x67message".to_vec()).unwrap(),
        ),
        &reference_signer(),
    );
    // Two length bytes plus eight memo bytes on top of the plain transfer.
    assert_eq!(
        memo.header().energy_amount.value() - plain.header().energy_amount.value(),
        10
    );
}

// ---------------------------------------------------------------------------
// Multi-signature
// ---------------------------------------------------------------------------

#[test]
fn three_signatures_cost_701() {
    let signer = TransactionSigner::builder()
        .add(CredentialIndex(0), KeyIndex(0), FixedSigner(vec![1; 64]))
        .unwrap()
        .add(CredentialIndex(0), KeyIndex(1), FixedSigner(vec![2; 64]))
        .unwrap()
        .add(CredentialIndex(2), KeyIndex(5), FixedSigner(vec![3; 64]))
        .unwrap()
        .build();
    let signed = assemble(reference_transfer(), &signer);
    assert_eq!(signed.header().energy_amount, Energy::new(701));

    let signature = signed.signature();
    assert_eq!(signature.num_credentials(), 2);
    assert_eq!(signature.signatures()[&CredentialIndex(0)].len(), 2);
    assert_eq!(signature.encode()[0], 0x02);
    assert_eq!(
        AccountTransactionSignature::decode(&signature.encode()).unwrap(),
        *signature
    );
}

#[test]
fn empty_registry_is_rejected() {
    let empty = TransactionSigner::builder().build();
    let err = reference_transfer()
        .prepare(
            sender(),
            SequenceNumber::FIRST,
            Expiry::from_unix_seconds(EXPIRY).unwrap(),
        )
        .sign(&empty)
        .unwrap_err();
    assert_eq!(err, TransactionError::Signing(SigningError::NoSigners));
}

#[test]
fn ed25519_multisig_verifies() {
    let keys: Vec<Ed25519SignKey> = (1..=3u8).map(|i| Ed25519SignKey::from_bytes(&[i; 32])).collect();
    let mut public = BTreeMap::new();
    let mut builder = TransactionSigner::builder();
    for (i, key) in keys.into_iter().enumerate() {
        let slot = KeyIndex(i as u8);
        public
            .entry(CredentialIndex(0))
            .or_insert_with(BTreeMap::new)
            .insert(slot, key.public_key());
        builder = builder.add(CredentialIndex(0), slot, key).unwrap();
    }
    let signed = assemble(reference_transfer(), &builder.build());
    assert!(signed.signature().verify(&signed.signing_digest(), &public));
    assert_eq!(verify_transaction(&signed, &public, EXPIRY - 1), Ok(()));
}

#[test]
fn key_rotation_does_not_affect_in_flight_snapshot() {
    let shared = SharedTransactionSigner::new(reference_signer());
    let snapshot = shared.snapshot();
    shared.replace(TransactionSigner::single(FixedSigner(vec![0x99; 64])));

    let before = assemble(reference_transfer(), &snapshot);
    let after = assemble(reference_transfer(), &shared.snapshot());
    assert_eq!(before.hash(), assemble(reference_transfer(), &reference_signer()).hash());
    assert_ne!(before.hash(), after.hash());
}

// ---------------------------------------------------------------------------
// Determinism and sensitivity
// ---------------------------------------------------------------------------

#[test]
fn assembly_is_deterministic() {
    let a = assemble(reference_transfer(), &reference_signer()).to_block_item();
    let b = assemble(reference_transfer(), &reference_signer()).to_block_item();
    assert_eq!(a, b);
}

#[test]
fn every_byte_contributes_to_the_hash() {
    let item = assemble(reference_transfer(), &reference_signer()).to_block_item();
    let bytes = item.as_bytes();
    // Byte 0 is the version, which is not hashed.
    for i in 1..bytes.len() {
        let mut flipped = bytes.to_vec();
        flipped[i] ^= 0x01;
        assert_ne!(
            sha256(&flipped[1..]),
            *item.hash().as_bytes(),
            "flipping byte {i} must change the hash"
        );
    }
}

#[test]
fn hash_excludes_version() {
    let item = assemble(reference_transfer(), &reference_signer()).to_block_item();
    assert_eq!(sha256(&item.as_bytes()[1..]), *item.hash().as_bytes());
}

#[test]
fn zero_nonce_never_reaches_the_wire() {
    assert!(SequenceNumber::new(0).is_err());
    let mut header = assemble(reference_transfer(), &reference_signer())
        .header()
        .encode();
    header[32..40].copy_from_slice(&[0; 8]);
    assert!(TransactionHeader::decode(&header).is_err());
}
