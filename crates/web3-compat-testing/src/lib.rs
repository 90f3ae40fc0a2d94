mod fixtures;
mod scripted_transport;

pub use fixtures::*;
pub use scripted_transport::{
    scripted_connection, RecordedRequest, ScriptedReply, ScriptedTransport,
};

use sha2::{Digest, Sha256};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::{keypair::keypair_from_seed, Signer},
};

/// Keypair derived from `identifier`, stable across runs
pub fn deterministic_keypair(identifier: &str) -> Keypair {
    let seed = Sha256::digest(identifier.as_bytes());
    keypair_from_seed(&seed).expect("SHA256 output should always be valid seed")
}

pub fn deterministic_pubkey(identifier: &str) -> Pubkey {
    deterministic_keypair(identifier).pubkey()
}

/// A well-formed signature derived from `identifier`
pub fn deterministic_signature(identifier: &str) -> Signature {
    deterministic_keypair(identifier).sign_message(identifier.as_bytes())
}
