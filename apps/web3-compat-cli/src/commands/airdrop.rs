use crate::{
    commands::target_address,
    config::CliConfig,
    error::{CliError, CliResult},
};
use backoff::{future::retry, ExponentialBackoff};
use std::time::Duration;
use tracing::debug;
use web3_compat::{Commitment, Connection};

fn balance_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(500),
        max_interval: Duration::from_secs(5),
        max_elapsed_time: Some(Duration::from_secs(60)),
        multiplier: 2.0,
        ..Default::default()
    }
}

pub async fn execute(
    connection: &Connection,
    config: &CliConfig,
    lamports: u64,
    to: Option<String>,
) -> CliResult<()> {
    let address = target_address(config, to)?;
    let starting_balance = connection
        .get_balance(&address, Commitment::Confirmed)
        .await?;

    println!("🪂 Requesting {} lamports for {}", lamports, address);
    let signature = connection.request_airdrop(&address, lamports, None).await?;
    println!("   Signature: {}", signature);

    // Faucet credits land asynchronously; poll the balance until they show up
    let expected = starting_balance.saturating_add(lamports);
    let balance = retry(balance_backoff(), || {
        let address = address.clone();
        async move {
            let balance = connection
                .get_balance(&address, Commitment::Confirmed)
                .await
                .map_err(|e| backoff::Error::Permanent(CliError::from(e)))?;
            if balance >= expected {
                Ok(balance)
            } else {
                debug!("Balance {} still below {}", balance, expected);
                Err(backoff::Error::transient(CliError::AirdropPending {
                    balance,
                    expected,
                }))
            }
        }
    })
    .await?;

    println!("✅ Balance now {} lamports", balance);
    Ok(())
}
