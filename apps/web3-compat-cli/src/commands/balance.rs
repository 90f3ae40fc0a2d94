use crate::{commands::target_address, config::CliConfig, error::CliResult};
use web3_compat::{Connection, LAMPORTS_PER_SOL};

pub async fn execute(
    connection: &Connection,
    config: &CliConfig,
    address: Option<String>,
) -> CliResult<()> {
    let address = target_address(config, address)?;
    let lamports = connection.get_balance(&address, None).await?;

    println!("💰 {}", address);
    println!(
        "   {} lamports ({} SOL)",
        lamports,
        lamports as f64 / LAMPORTS_PER_SOL as f64
    );
    Ok(())
}
