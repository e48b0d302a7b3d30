//! Transaction type tags.
//!
//! The first byte of every encoded payload names its transaction type. The
//! numbering is fixed by the chain; gaps belong to update instructions and
//! retired types that never appear as account transaction payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Every account transaction type known to the protocol.
///
/// Only six of these have a payload in this crate (see
/// [`AccountTransactionPayload`](super::AccountTransactionPayload)); the
/// rest exist so that a decoder can name an unsupported tag precisely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransactionType {
    DeployModule = 0,
    InitContract = 1,
    Update = 2,
    Transfer = 3,
    AddBaker = 4,
    RemoveBaker = 5,
    UpdateBakerStake = 6,
    UpdateBakerRestakeEarnings = 7,
    UpdateBakerKeys = 8,
    UpdateCredentialKeys = 13,
    EncryptedAmountTransfer = 16,
    TransferToEncrypted = 17,
    TransferToPublic = 18,
    TransferWithSchedule = 19,
    UpdateCredentials = 20,
    RegisterData = 21,
    TransferWithMemo = 22,
    EncryptedAmountTransferWithMemo = 23,
    TransferWithScheduleAndMemo = 24,
    ConfigureBaker = 25,
    ConfigureDelegation = 26,
}

impl TransactionType {
    /// The wire tag.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Look up a tag. `None` for numbers the protocol does not assign.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => Self::DeployModule,
            1 => Self::InitContract,
            2 => Self::Update,
            3 => Self::Transfer,
            4 => Self::AddBaker,
            5 => Self::RemoveBaker,
            6 => Self::UpdateBakerStake,
            7 => Self::UpdateBakerRestakeEarnings,
            8 => Self::UpdateBakerKeys,
            13 => Self::UpdateCredentialKeys,
            16 => Self::EncryptedAmountTransfer,
            17 => Self::TransferToEncrypted,
            18 => Self::TransferToPublic,
            19 => Self::TransferWithSchedule,
            20 => Self::UpdateCredentials,
            21 => Self::RegisterData,
            22 => Self::TransferWithMemo,
            23 => Self::EncryptedAmountTransferWithMemo,
            24 => Self::TransferWithScheduleAndMemo,
            25 => Self::ConfigureBaker,
            26 => Self::ConfigureDelegation,
            _ => return None,
        })
    }
}

impl From<TransactionType> for u8 {
    fn from(ty: TransactionType) -> Self {
        ty.tag()
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DeployModule => "DeployModule",
            Self::InitContract => "InitContract",
            Self::Update => "Update",
            Self::Transfer => "Transfer",
            Self::AddBaker => "AddBaker",
            Self::RemoveBaker => "RemoveBaker",
            Self::UpdateBakerStake => "UpdateBakerStake",
            Self::UpdateBakerRestakeEarnings => "UpdateBakerRestakeEarnings",
            Self::UpdateBakerKeys => "UpdateBakerKeys",
            Self::UpdateCredentialKeys => "UpdateCredentialKeys",
            Self::EncryptedAmountTransfer => "EncryptedAmountTransfer",
            Self::TransferToEncrypted => "TransferToEncrypted",
            Self::TransferToPublic => "TransferToPublic",
            Self::TransferWithSchedule => "TransferWithSchedule",
            Self::UpdateCredentials => "UpdateCredentials",
            Self::RegisterData => "RegisterData",
            Self::TransferWithMemo => "TransferWithMemo",
            Self::EncryptedAmountTransferWithMemo => "EncryptedAmountTransferWithMemo",
            Self::TransferWithScheduleAndMemo => "TransferWithScheduleAndMemo",
            Self::ConfigureBaker => "ConfigureBaker",
            Self::ConfigureDelegation => "ConfigureDelegation",
        };
        f.write_str(name)
    }
}
