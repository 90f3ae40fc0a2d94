//! JSON payloads shaped like real node responses.

use base64::{prelude::BASE64_STANDARD, Engine};
use serde_json::{json, Value};
use solana_sdk::{hash::Hash, pubkey::Pubkey};

pub const TEST_API_VERSION: &str = "2.1.21";

/// Wrap `value` in a `{context, value}` envelope at `slot`
pub fn rpc_envelope(slot: u64, value: Value) -> Value {
    json!({
        "context": {"slot": slot, "apiVersion": TEST_API_VERSION},
        "value": value,
    })
}

/// Account with base64 data, as returned for `encoding: base64`
pub fn account_json(data: &[u8], owner: &Pubkey, lamports: u64) -> Value {
    json!({
        "data": [BASE64_STANDARD.encode(data), "base64"],
        "executable": false,
        "lamports": lamports,
        "owner": owner.to_string(),
        "rentEpoch": u64::MAX,
        "space": data.len(),
    })
}

/// Same account with base58 data
pub fn account_json_base58(data: &[u8], owner: &Pubkey, lamports: u64) -> Value {
    let mut account = account_json(data, owner, lamports);
    account["data"] = json!([bs58::encode(data).into_string(), "base58"]);
    account
}

pub fn program_account_json(pubkey: &Pubkey, account: Value) -> Value {
    json!({"pubkey": pubkey.to_string(), "account": account})
}

pub fn blockhash_json(blockhash: &Hash, last_valid_block_height: u64) -> Value {
    json!({
        "blockhash": blockhash.to_string(),
        "lastValidBlockHeight": last_valid_block_height,
    })
}

/// A signature status entry. `confirmation_status` is sent verbatim.
pub fn signature_status_json(
    slot: u64,
    confirmations: Option<u64>,
    confirmation_status: Option<&str>,
    err: Option<Value>,
) -> Value {
    let status = match &err {
        Some(err) => json!({"Err": err}),
        None => json!({"Ok": null}),
    };
    json!({
        "slot": slot,
        "confirmations": confirmations,
        "err": err,
        "status": status,
        "confirmationStatus": confirmation_status,
    })
}

/// A `getSignatureStatuses` result holding one entry
pub fn single_status_response(slot: u64, status: Option<Value>) -> Value {
    rpc_envelope(slot, json!([status]))
}
