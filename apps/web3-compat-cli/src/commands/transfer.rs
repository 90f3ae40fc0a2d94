use crate::{
    config::CliConfig,
    error::{CliError, CliResult},
};
use solana_sdk::{hash::Hash, signer::Signer, transaction::Transaction};
use tracing::info;
use web3_compat::{
    compile_from_compat, send_and_confirm_transaction, system, to_address, to_public_key,
    CompileParams, Connection, SignableTransaction, TransactionVersion,
};

pub async fn execute(
    connection: &Connection,
    config: &CliConfig,
    to: String,
    lamports: u64,
    v0: bool,
) -> CliResult<()> {
    let payer = config.load_keypair()?;
    let recipient = to_public_key(&to_address(to)?);

    println!("💸 Transferring {} lamports", lamports);
    println!("   From: {}", payer.pubkey());
    println!("   To:   {}", recipient);

    let lifetime = connection.get_latest_blockhash(None).await?.value;
    let instruction = system::transfer(&payer.pubkey(), &recipient, lamports);

    let transaction: SignableTransaction = if v0 {
        let compiled = compile_from_compat(CompileParams {
            fee_payer: payer.pubkey(),
            instructions: vec![instruction.into()],
            latest_blockhash: lifetime,
            version: TransactionVersion::V0,
        })?;
        info!(
            "Compiled v0 message valid until block height {}",
            compiled.lifetime().last_valid_block_height
        );
        compiled.into()
    } else {
        let mut tx = Transaction::new_with_payer(&[instruction], Some(&payer.pubkey()));
        tx.message.recent_blockhash = lifetime.blockhash.parse::<Hash>().map_err(|e| {
            CliError::InvalidConfig(format!("node returned blockhash {}: {}", lifetime.blockhash, e))
        })?;
        tx.into()
    };

    info!(
        "Sending {} transfer",
        if v0 { "v0" } else { "legacy" }
    );
    let signature =
        send_and_confirm_transaction(connection, transaction, &[&payer], None).await?;

    println!("✅ Transfer sent: {}", signature);
    Ok(())
}
