pub mod airdrop;
pub mod balance;
pub mod status;
pub mod transfer;

use crate::{config::CliConfig, error::CliResult};
use solana_sdk::signer::Signer;
use web3_compat::{to_address, Address};

/// `explicit` if given, otherwise the configured keypair's address
pub(crate) fn target_address(config: &CliConfig, explicit: Option<String>) -> CliResult<Address> {
    match explicit {
        Some(raw) => Ok(to_address(raw)?),
        None => Ok(config.load_keypair()?.pubkey().into()),
    }
}
