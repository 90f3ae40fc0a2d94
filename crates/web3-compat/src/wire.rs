//! JSON shapes exchanged with the transport and the conversions in and out of
//! them. Numbers from the node are read as raw JSON numbers and checked
//! against the `u64` range before they reach callers.

use crate::{
    address::Address,
    codec::{decode_account_data, encode_for_simulation, AccountData, DataEncoding},
    commitment::Commitment,
    error::{CompatError, CompatResult},
    types::{
        AccountInfo, DataSlice, RpcContext, RpcResponse, SignatureStatus, SimulatedAccountInfo,
    },
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Number, Value};
use solana_client::rpc_request::RpcRequest;

pub(crate) fn widen(value: &Number, field: &'static str) -> CompatResult<u64> {
    value.as_u64().ok_or_else(|| CompatError::NumericRange {
        field,
        value: value.to_string(),
    })
}

pub(crate) fn widen_opt(value: Option<&Number>, field: &'static str) -> CompatResult<Option<u64>> {
    value.map(|v| widen(v, field)).transpose()
}

pub(crate) fn parse<T: DeserializeOwned>(method: RpcRequest, value: Value) -> CompatResult<T> {
    serde_json::from_value(value).map_err(|e| CompatError::UnexpectedResponse {
        method,
        reason: e.to_string(),
    })
}

/// Split a `{context, value}` envelope
pub(crate) fn parse_envelope<T: DeserializeOwned>(
    method: RpcRequest,
    value: Value,
) -> CompatResult<RpcResponse<T>> {
    #[derive(Deserialize)]
    struct Envelope<T> {
        #[serde(default)]
        context: Value,
        value: T,
    }

    let envelope: Envelope<T> = parse(method, value)?;
    Ok(RpcResponse {
        context: map_context(&envelope.context)?,
        value: envelope.value,
    })
}

/// Missing slots read as 0, string slots are parsed
pub(crate) fn map_context(raw: &Value) -> CompatResult<RpcContext> {
    let slot = match raw.get("slot") {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => widen(n, "context.slot")?,
        Some(Value::String(s)) => s.parse().map_err(|_| CompatError::NumericRange {
            field: "context.slot",
            value: s.clone(),
        })?,
        Some(other) => {
            return Err(CompatError::NumericRange {
                field: "context.slot",
                value: other.to_string(),
            })
        }
    };
    let api_version = raw
        .get("apiVersion")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(RpcContext { slot, api_version })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireBlockhash {
    pub blockhash: String,
    pub last_valid_block_height: Number,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireAccount {
    pub data: AccountData,
    #[serde(default)]
    pub executable: bool,
    pub lamports: Number,
    pub owner: String,
    #[serde(default)]
    pub rent_epoch: Option<Number>,
}

impl WireAccount {
    pub fn into_account_info(self) -> CompatResult<AccountInfo> {
        Ok(AccountInfo {
            data: decode_account_data(&self.data)?,
            executable: self.executable,
            lamports: widen(&self.lamports, "lamports")?,
            owner: parse_address(&self.owner)?.into(),
            rent_epoch: widen_opt(self.rent_epoch.as_ref(), "rentEpoch")?,
        })
    }

    pub fn into_simulated(self) -> CompatResult<SimulatedAccountInfo> {
        let bytes = decode_account_data(&self.data)?;
        Ok(SimulatedAccountInfo {
            data: encode_for_simulation(&bytes),
            executable: self.executable,
            lamports: widen(&self.lamports, "lamports")?,
            owner: parse_address(&self.owner)?,
            rent_epoch: widen_opt(self.rent_epoch.as_ref(), "rentEpoch")?,
        })
    }
}

fn parse_address(raw: &str) -> CompatResult<Address> {
    Ok(raw.parse::<Address>()?)
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireProgramAccount {
    pub pubkey: String,
    pub account: WireAccount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSignatureStatus {
    pub slot: Number,
    #[serde(default)]
    pub confirmations: Option<Number>,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub confirmation_status: Option<String>,
}

impl WireSignatureStatus {
    pub fn into_status(self) -> CompatResult<SignatureStatus> {
        Ok(SignatureStatus {
            slot: widen(&self.slot, "slot")?,
            confirmations: widen_opt(self.confirmations.as_ref(), "confirmations")?,
            err: self.err,
            confirmation_status: Commitment::normalize(self.confirmation_status.as_deref()),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSimulation {
    #[serde(default)]
    pub accounts: Option<Vec<Value>>,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub logs: Option<Vec<String>>,
    #[serde(default)]
    pub return_data: Option<Value>,
    #[serde(default)]
    pub units_consumed: Option<Number>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommitmentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment: Option<Commitment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountInfoRequest {
    pub encoding: DataEncoding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment: Option<Commitment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_slice: Option<DataSlice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_context_slot: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgramAccountsRequest {
    pub encoding: DataEncoding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment: Option<Commitment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_slice: Option<DataSlice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_context_slot: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_context: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignatureStatusRequest {
    pub search_transaction_history: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendTransactionRequest {
    pub encoding: DataEncoding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_preflight: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preflight_commitment: Option<Commitment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_context_slot: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SimulateAccountsRequest {
    pub addresses: Vec<Address>,
    pub encoding: DataEncoding,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SimulateTransactionRequest {
    pub encoding: DataEncoding,
    pub sig_verify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_recent_blockhash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment: Option<Commitment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_context_slot: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts: Option<SimulateAccountsRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_instructions: Option<bool>,
}
