use solana_client::{client_error::ClientError, rpc_request::RpcRequest};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

pub type CompatResult<T> = Result<T, CompatError>;

/// Errors surfaced by the compatibility layer
#[derive(Error, Debug)]
pub enum CompatError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("RPC transport error: {0}")]
    Transport(#[from] ClientError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Field `{field}` value {value} does not fit in a u64")]
    NumericRange { field: &'static str, value: String },

    #[error("Unexpected {method} response: {reason}")]
    UnexpectedResponse { method: RpcRequest, reason: String },

    #[error("Message compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("Transaction serialization failed: {0}")]
    Serialization(String),
}

/// Malformed encodings of addresses, blockhashes and account payloads
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid base58 data: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("invalid base64 data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("expected {expected} bytes, decoded {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Failures while laying out a message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("account index overflowed during compilation ({0} accounts)")]
    AccountIndexOverflow(usize),

    #[error("{what} length {len} exceeds the compact-u16 range")]
    LengthOverflow { what: &'static str, len: usize },

    #[error("invalid blockhash `{blockhash}`: {source}")]
    InvalidBlockhash {
        blockhash: String,
        source: DecodeError,
    },

    #[error("signer {0} is not a required signer of this message")]
    UnknownSigner(Pubkey),

    #[error("signer {0} failed to sign: {1}")]
    Signing(Pubkey, String),
}
