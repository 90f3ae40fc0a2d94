use thiserror::Error;
use web3_compat::{CompatError, CompileError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("RPC error: {0}")]
    Compat(#[from] CompatError),

    #[error("Transaction compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read keypair {path}: {reason}")]
    Keypair { path: String, reason: String },

    #[error("Airdrop not credited: balance {balance} below {expected} lamports")]
    AirdropPending { balance: u64, expected: u64 },
}
