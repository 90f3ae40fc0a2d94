/*!
# Facade Data Types

Legacy-shaped inputs and outputs of [`Connection`](crate::Connection). Inputs
that the legacy API accepted in more than one shape (a bare commitment or a
config object, a transaction object or raw bytes) convert into a single
canonical type here, at the edge.
*/

use crate::{
    address::Address,
    codec::DataEncoding,
    compile::CompiledTransaction,
    commitment::Commitment,
    error::{CompatError, CompatResult},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use solana_sdk::{
    pubkey::Pubkey,
    transaction::{Transaction, VersionedTransaction},
};

/// Node context attached to every `{context, value}` response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcContext {
    pub slot: u64,
    pub api_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcResponse<T> {
    pub context: RpcContext,
    pub value: T,
}

/// Decoded account snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub data: Vec<u8>,
    pub executable: bool,
    pub lamports: u64,
    pub owner: Pubkey,
    pub rent_epoch: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramAccount {
    pub pubkey: Pubkey,
    pub account: AccountInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSlice {
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountInfoConfig {
    pub commitment: Option<Commitment>,
    pub data_slice: Option<DataSlice>,
    pub min_context_slot: Option<u64>,
}

impl From<Commitment> for AccountInfoConfig {
    fn from(commitment: Commitment) -> Self {
        Self {
            commitment: Some(commitment),
            ..Default::default()
        }
    }
}

impl From<Option<Commitment>> for AccountInfoConfig {
    fn from(commitment: Option<Commitment>) -> Self {
        Self {
            commitment,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramAccountsConfig {
    pub commitment: Option<Commitment>,
    pub data_slice: Option<DataSlice>,
    /// Account encoding override, `base64` when unset
    pub encoding: Option<DataEncoding>,
    /// Passed to the node untouched
    pub filters: Option<Vec<Value>>,
    pub min_context_slot: Option<u64>,
    pub with_context: Option<bool>,
}

impl From<Commitment> for ProgramAccountsConfig {
    fn from(commitment: Commitment) -> Self {
        Self {
            commitment: Some(commitment),
            ..Default::default()
        }
    }
}

impl From<Option<Commitment>> for ProgramAccountsConfig {
    fn from(commitment: Option<Commitment>) -> Self {
        Self {
            commitment,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureStatus {
    pub slot: u64,
    /// `None` once the transaction is rooted (or no longer tracked)
    pub confirmations: Option<u64>,
    /// On-chain execution error, kept opaque
    pub err: Option<Value>,
    pub confirmation_status: Option<Commitment>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignatureStatusConfig {
    pub search_transaction_history: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub skip_preflight: Option<bool>,
    pub preflight_commitment: Option<Commitment>,
    pub max_retries: Option<usize>,
    pub min_context_slot: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulateAccountsConfig {
    pub addresses: Vec<Address>,
    pub encoding: Option<DataEncoding>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulateConfig {
    pub sig_verify: Option<bool>,
    pub replace_recent_blockhash: Option<bool>,
    pub commitment: Option<Commitment>,
    pub min_context_slot: Option<u64>,
    pub accounts: Option<SimulateAccountsConfig>,
    pub inner_instructions: Option<bool>,
}

/// Account state returned by a simulation, re-encoded as base64
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedAccountInfo {
    pub data: (String, DataEncoding),
    pub executable: bool,
    pub lamports: u64,
    pub owner: Address,
    pub rent_epoch: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedTransactionResponse {
    pub accounts: Option<Vec<Option<SimulatedAccountInfo>>>,
    pub err: Option<Value>,
    pub logs: Option<Vec<String>>,
    pub return_data: Option<Value>,
    pub units_consumed: Option<u64>,
}

/// Anything that can be submitted as a transaction
#[derive(Debug, Clone)]
pub enum RawTransaction {
    Versioned(VersionedTransaction),
    Legacy(Transaction),
    Compiled(CompiledTransaction),
    Bytes(Vec<u8>),
}

impl RawTransaction {
    /// Canonical wire bytes of the transaction
    pub fn to_bytes(&self) -> CompatResult<Vec<u8>> {
        match self {
            Self::Versioned(tx) => {
                bincode::serialize(tx).map_err(|e| CompatError::Serialization(e.to_string()))
            }
            Self::Legacy(tx) => {
                bincode::serialize(tx).map_err(|e| CompatError::Serialization(e.to_string()))
            }
            Self::Compiled(tx) => Ok(tx.to_wire_bytes()?),
            Self::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

impl From<VersionedTransaction> for RawTransaction {
    fn from(tx: VersionedTransaction) -> Self {
        Self::Versioned(tx)
    }
}

impl From<Transaction> for RawTransaction {
    fn from(tx: Transaction) -> Self {
        Self::Legacy(tx)
    }
}

impl From<CompiledTransaction> for RawTransaction {
    fn from(tx: CompiledTransaction) -> Self {
        Self::Compiled(tx)
    }
}

impl From<Vec<u8>> for RawTransaction {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for RawTransaction {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}
