//! # Payload Codec
//!
//! An [`AccountTransactionPayload`] is the body of an account transaction:
//! what the sender wants the chain to do. This module turns each payload into
//! its exact wire bytes and reports the base energy the chain charges for it.
//!
//! ## Wire layouts
//!
//! Every encoding starts with the one-byte [`TransactionType`] tag. All
//! integers are big-endian; names, memos, data and parameters carry a `u16`
//! length prefix.
//!
//! ```text
//! DeployModule      0  | module bytes
//! InitContract      1  | amount[8] | module_ref[32] | len[2] name | len[2] param
//! UpdateContract    2  | amount[8] | index[8] | subindex[8] | len[2] name | len[2] param
//! Transfer          3  | receiver[32] | amount[8]
//! RegisterData     21  | len[2] data
//! TransferWithMemo 22  | receiver[32] | len[2] memo | amount[8]
//! ```
//!
//! ## Base energy
//!
//! The three fixed-cost kinds cost 300. Contract calls cost the execution
//! budget the caller chose. Module deployment costs a tenth of the module
//! length, rounded half to even.

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use super::codec::{DecodeError, Reader};
use super::types::TransactionType;
use crate::config::{DEPLOY_MODULE_COST_DIVISOR, FIXED_TRANSACTION_BASE_COST};
use crate::types::{
    AccountAddress, CcdAmount, ContractAddress, Energy, InitName, ModuleReference, OnChainData,
    Parameter, ReceiveName,
};

// ---------------------------------------------------------------------------
// AccountTransactionPayload
// ---------------------------------------------------------------------------

/// The supported account transaction payloads.
///
/// Every field is a validated value object, so encoding a constructed
/// payload cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AccountTransactionPayload {
    /// Deploy a compiled smart contract module.
    DeployModule {
        #[serde(with = "crate::types::serde_hex::vec")]
        module: Vec<u8>,
    },

    /// Create a new contract instance from a deployed module.
    InitContract {
        amount: CcdAmount,
        module_ref: ModuleReference,
        init_name: InitName,
        parameter: Parameter,
        /// Execution budget. Charged as the base cost; not on the wire.
        max_energy: Energy,
    },

    /// Invoke an entrypoint of an existing contract instance.
    UpdateContract {
        amount: CcdAmount,
        address: ContractAddress,
        receive_name: ReceiveName,
        parameter: Parameter,
        /// Execution budget. Charged as the base cost; not on the wire.
        max_energy: Energy,
    },

    /// Move CCD to another account.
    Transfer {
        amount: CcdAmount,
        receiver: AccountAddress,
    },

    /// Record arbitrary data on chain.
    RegisterData { data: OnChainData },

    /// Move CCD to another account with an attached memo.
    TransferWithMemo {
        amount: CcdAmount,
        receiver: AccountAddress,
        memo: OnChainData,
    },
}

impl AccountTransactionPayload {
    pub fn transfer(amount: CcdAmount, receiver: AccountAddress) -> Self {
        Self::Transfer { amount, receiver }
    }

    pub fn transfer_with_memo(amount: CcdAmount, receiver: AccountAddress, memo: OnChainData) -> Self {
        Self::TransferWithMemo {
            amount,
            receiver,
            memo,
        }
    }

    pub fn register_data(data: OnChainData) -> Self {
        Self::RegisterData { data }
    }

    pub fn deploy_module(module: Vec<u8>) -> Self {
        Self::DeployModule { module }
    }

    /// The type tag written as the first payload byte.
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::DeployModule { .. } => TransactionType::DeployModule,
            Self::InitContract { .. } => TransactionType::InitContract,
            Self::UpdateContract { .. } => TransactionType::Update,
            Self::Transfer { .. } => TransactionType::Transfer,
            Self::RegisterData { .. } => TransactionType::RegisterData,
            Self::TransferWithMemo { .. } => TransactionType::TransferWithMemo,
        }
    }

    /// Exact length of [`encode`](Self::encode)'s output, computed without
    /// encoding.
    pub fn size(&self) -> usize {
        let body = match self {
            Self::DeployModule { module } => module.len(),
            Self::InitContract {
                init_name,
                parameter,
                ..
            } => {
                CcdAmount::BYTES_LENGTH
                    + ModuleReference::BYTES_LENGTH
                    + init_name.serialized_len()
                    + parameter.serialized_len()
            }
            Self::UpdateContract {
                receive_name,
                parameter,
                ..
            } => {
                CcdAmount::BYTES_LENGTH
                    + ContractAddress::BYTES_LENGTH
                    + receive_name.serialized_len()
                    + parameter.serialized_len()
            }
            Self::Transfer { .. } => AccountAddress::BYTES_LENGTH + CcdAmount::BYTES_LENGTH,
            Self::RegisterData { data } => data.serialized_len(),
            Self::TransferWithMemo { memo, .. } => {
                AccountAddress::BYTES_LENGTH + memo.serialized_len() + CcdAmount::BYTES_LENGTH
            }
        };
        1 + body
    }

    /// Serialize to wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.size());
        buf.put_u8(self.transaction_type().tag());
        match self {
            Self::DeployModule { module } => buf.put_slice(module),
            Self::InitContract {
                amount,
                module_ref,
                init_name,
                parameter,
                ..
            } => {
                buf.put_u64(amount.micro_ccd());
                buf.put_slice(module_ref.as_bytes());
                put_u16_prefixed(&mut buf, init_name.as_str().as_bytes());
                put_u16_prefixed(&mut buf, parameter.as_bytes());
            }
            Self::UpdateContract {
                amount,
                address,
                receive_name,
                parameter,
                ..
            } => {
                buf.put_u64(amount.micro_ccd());
                buf.put_u64(address.index);
                buf.put_u64(address.subindex);
                put_u16_prefixed(&mut buf, receive_name.as_str().as_bytes());
                put_u16_prefixed(&mut buf, parameter.as_bytes());
            }
            Self::Transfer { amount, receiver } => {
                buf.put_slice(receiver.as_bytes());
                buf.put_u64(amount.micro_ccd());
            }
            Self::RegisterData { data } => put_u16_prefixed(&mut buf, data.as_bytes()),
            Self::TransferWithMemo {
                amount,
                receiver,
                memo,
            } => {
                buf.put_slice(receiver.as_bytes());
                put_u16_prefixed(&mut buf, memo.as_bytes());
                buf.put_u64(amount.micro_ccd());
            }
        }
        debug_assert_eq!(buf.len(), self.size());
        buf
    }

    /// Energy the chain charges for this payload before the per-signature
    /// and per-byte components.
    pub fn base_energy_cost(&self) -> Energy {
        match self {
            Self::DeployModule { module } => Energy::new(deploy_module_cost(module.len() as u64)),
            Self::InitContract { max_energy, .. } | Self::UpdateContract { max_energy, .. } => {
                *max_energy
            }
            Self::Transfer { .. } | Self::RegisterData { .. } | Self::TransferWithMemo { .. } => {
                Energy::new(FIXED_TRANSACTION_BASE_COST)
            }
        }
    }

    /// Parse wire bytes. Contract calls get a zero execution budget, since
    /// the budget is not part of the encoding.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with_energy(bytes, Energy::default())
    }

    /// Parse wire bytes, assigning `max_energy` to contract calls.
    pub fn decode_with_energy(bytes: &[u8], max_energy: Energy) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let tag = r.u8("transaction type")?;
        let payload = match TransactionType::from_tag(tag) {
            Some(TransactionType::DeployModule) => Self::DeployModule {
                module: r.rest().to_vec(),
            },
            Some(TransactionType::InitContract) => Self::InitContract {
                amount: CcdAmount::from_micro_ccd(r.u64("amount")?),
                module_ref: ModuleReference::new(r.array("module reference")?),
                init_name: InitName::new(utf8(r.u16_prefixed("init name")?))?,
                parameter: Parameter::new(r.u16_prefixed("parameter")?.to_vec())?,
                max_energy,
            },
            Some(TransactionType::Update) => Self::UpdateContract {
                amount: CcdAmount::from_micro_ccd(r.u64("amount")?),
                address: ContractAddress::new(r.u64("contract index")?, r.u64("contract subindex")?),
                receive_name: ReceiveName::new(utf8(r.u16_prefixed("receive name")?))?,
                parameter: Parameter::new(r.u16_prefixed("parameter")?.to_vec())?,
                max_energy,
            },
            Some(TransactionType::Transfer) => {
                let receiver = AccountAddress::new(r.array("receiver")?);
                let amount = CcdAmount::from_micro_ccd(r.u64("amount")?);
                Self::Transfer { amount, receiver }
            }
            Some(TransactionType::RegisterData) => Self::RegisterData {
                data: OnChainData::new(r.u16_prefixed("data")?.to_vec())?,
            },
            Some(TransactionType::TransferWithMemo) => {
                let receiver = AccountAddress::new(r.array("receiver")?);
                let memo = OnChainData::new(r.u16_prefixed("memo")?.to_vec())?;
                let amount = CcdAmount::from_micro_ccd(r.u64("amount")?);
                Self::TransferWithMemo {
                    amount,
                    receiver,
                    memo,
                }
            }
            _ => return Err(DecodeError::UnsupportedTransactionType(tag)),
        };
        r.finish("payload")?;
        Ok(payload)
    }
}

/// `len / 10`, rounded half to even.
fn deploy_module_cost(len: u64) -> u64 {
    let quotient = len / DEPLOY_MODULE_COST_DIVISOR;
    let remainder = len % DEPLOY_MODULE_COST_DIVISOR;
    let half = DEPLOY_MODULE_COST_DIVISOR / 2;
    if remainder > half || (remainder == half && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// Value objects bound every prefixed field to at most `u16::MAX` bytes.
fn put_u16_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.put_u16(bytes.len() as u16);
    buf.put_slice(bytes);
}

/// Invalid UTF-8 is mapped to U+FFFD, which name validation then rejects.
fn utf8(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeError;

    const RECEIVER: [u8; 32] = [
        71, 16, 92, 61, 132, 191, 45, 174, 170, 208, 206, 153, 215, 123, 117, 254, 225, 53, 137,
        184, 94, 41, 112, 215, 225, 165, 254, 29, 145, 253, 190, 160,
    ];

    fn hundred_ccd() -> CcdAmount {
        CcdAmount::from_ccd(100).unwrap()
    }

    #[test]
    fn transfer_known_bytes() {
        let payload = AccountTransactionPayload::transfer(hundred_ccd(), AccountAddress::new(RECEIVER));
        let mut expected = vec![3];
        expected.extend_from_slice(&RECEIVER);
        expected.extend_from_slice(&[0, 0, 0, 0, 5, 245, 225, 0]);
        assert_eq!(payload.encode(), expected);
        assert_eq!(payload.size(), 41);
        assert_eq!(payload.base_energy_cost(), Energy::new(300));
    }

    #[test]
    fn transfer_with_memo_known_bytes() {
        // CBOR text string "message".
        let memo = OnChainData::new(b"\x67message".to_vec()).unwrap();
        let payload = AccountTransactionPayload::transfer_with_memo(
            hundred_ccd(),
            AccountAddress::new(RECEIVER),
            memo,
        );
        let mut expected = vec![22];
        expected.extend_from_slice(&RECEIVER);
        expected.extend_from_slice(&[0, 8, 103, 109, 101, 115, 115, 97, 103, 101]);
        expected.extend_from_slice(&[0, 0, 0, 0, 5, 245, 225, 0]);
        assert_eq!(payload.encode(), expected);
        assert_eq!(payload.size(), expected.len());
        assert_eq!(payload.base_energy_cost(), Energy::new(300));
    }

    #[test]
    fn register_data_bytes() {
        let payload = AccountTransactionPayload::register_data(OnChainData::new(vec![0xaa, 0xbb]).unwrap());
        assert_eq!(payload.encode(), vec![21, 0, 2, 0xaa, 0xbb]);
        assert_eq!(payload.size(), 5);
        assert_eq!(payload.base_energy_cost(), Energy::new(300));
    }

    #[test]
    fn deploy_module_cost_rounds_half_to_even() {
        let cost = |len| AccountTransactionPayload::deploy_module(vec![0; len]).base_energy_cost();
        assert_eq!(cost(0), Energy::new(0));
        assert_eq!(cost(14), Energy::new(1));
        assert_eq!(cost(15), Energy::new(2));
        assert_eq!(cost(16), Energy::new(2));
        assert_eq!(cost(25), Energy::new(2));
        assert_eq!(cost(35), Energy::new(4));
        assert_eq!(cost(1_000), Energy::new(100));
    }

    #[test]
    fn deploy_module_is_raw_bytes_after_tag() {
        let payload = AccountTransactionPayload::deploy_module(vec![1, 2, 3]);
        assert_eq!(payload.encode(), vec![0, 1, 2, 3]);
        assert_eq!(payload.size(), 4);
    }

    #[test]
    fn init_contract_layout() {
        let payload = AccountTransactionPayload::InitContract {
            amount: CcdAmount::from_micro_ccd(1),
            module_ref: ModuleReference::new([9; 32]),
            init_name: InitName::new("init_a").unwrap(),
            parameter: Parameter::new(vec![0xff]).unwrap(),
            max_energy: Energy::new(5_000),
        };
        let bytes = payload.encode();
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..9], &[0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(&bytes[9..41], &[9; 32]);
        assert_eq!(&bytes[41..49], &[0, 6, b'i', b'n', b'i', b't', b'_', b'a']);
        assert_eq!(&bytes[49..], &[0, 1, 0xff]);
        assert_eq!(payload.size(), bytes.len());
        assert_eq!(payload.base_energy_cost(), Energy::new(5_000));
    }

    #[test]
    fn update_contract_layout() {
        let payload = AccountTransactionPayload::UpdateContract {
            amount: CcdAmount::ZERO,
            address: ContractAddress::new(7, 0),
            receive_name: ReceiveName::new("c.f").unwrap(),
            parameter: Parameter::empty(),
            max_energy: Energy::new(42),
        };
        let bytes = payload.encode();
        assert_eq!(bytes[0], 2);
        assert_eq!(&bytes[9..17], &[0, 0, 0, 0, 0, 0, 0, 7]);
        assert_eq!(&bytes[17..25], &[0; 8]);
        assert_eq!(&bytes[25..], &[0, 3, b'c', b'.', b'f', 0, 0]);
        assert_eq!(payload.size(), bytes.len());
        assert_eq!(payload.base_energy_cost(), Energy::new(42));
    }

    #[test]
    fn decode_inverts_encode() {
        let payloads = [
            AccountTransactionPayload::transfer(hundred_ccd(), AccountAddress::new(RECEIVER)),
            AccountTransactionPayload::register_data(OnChainData::new(vec![1; 256]).unwrap()),
            AccountTransactionPayload::deploy_module(vec![0, 97, 115, 109]),
        ];
        for payload in payloads {
            assert_eq!(AccountTransactionPayload::decode(&payload.encode()).unwrap(), payload);
        }
    }

    #[test]
    fn decode_contract_call_takes_caller_energy() {
        let payload = AccountTransactionPayload::UpdateContract {
            amount: CcdAmount::from_micro_ccd(10),
            address: ContractAddress::new(1, 2),
            receive_name: ReceiveName::new("counter.inc").unwrap(),
            parameter: Parameter::new(vec![1, 2, 3]).unwrap(),
            max_energy: Energy::new(30_000),
        };
        let bytes = payload.encode();
        assert_eq!(
            AccountTransactionPayload::decode_with_energy(&bytes, Energy::new(30_000)).unwrap(),
            payload
        );
        match AccountTransactionPayload::decode(&bytes).unwrap() {
            AccountTransactionPayload::UpdateContract { max_energy, .. } => {
                assert_eq!(max_energy, Energy::new(0))
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_unsupported_tag() {
        assert_eq!(
            AccountTransactionPayload::decode(&[4, 0, 0]),
            Err(DecodeError::UnsupportedTransactionType(4))
        );
        assert_eq!(
            AccountTransactionPayload::decode(&[200]),
            Err(DecodeError::UnsupportedTransactionType(200))
        );
    }

    #[test]
    fn decode_rejects_truncation_and_trailing_bytes() {
        let bytes = AccountTransactionPayload::transfer(hundred_ccd(), AccountAddress::new(RECEIVER)).encode();
        assert!(matches!(
            AccountTransactionPayload::decode(&bytes[..40]),
            Err(DecodeError::UnexpectedEnd { field: "amount", .. })
        ));
        let mut long = bytes.clone();
        long.push(0);
        assert_eq!(
            AccountTransactionPayload::decode(&long),
            Err(DecodeError::TrailingBytes {
                what: "payload",
                count: 1
            })
        );
        assert!(matches!(
            AccountTransactionPayload::decode(&[]),
            Err(DecodeError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn decode_validates_names() {
        let mut bytes = vec![1];
        bytes.extend_from_slice(&[0; 8]);
        bytes.extend_from_slice(&[0; 32]);
        bytes.extend_from_slice(&[0, 3, b'b', b'a', b'd']);
        bytes.extend_from_slice(&[0, 0]);
        assert!(matches!(
            AccountTransactionPayload::decode(&bytes),
            Err(DecodeError::InvalidValue(TypeError::InvalidFunctionName { .. }))
        ));
    }

    #[test]
    fn json_shape() {
        let payload = AccountTransactionPayload::register_data(OnChainData::new(vec![0xab]).unwrap());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "registerData");
        assert_eq!(json["data"], "ab");
        let back: AccountTransactionPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }
}
