use crate::error::CliResult;
use web3_compat::{Connection, SignatureStatusConfig};

pub async fn execute(connection: &Connection, signatures: Vec<String>) -> CliResult<()> {
    let response = connection
        .get_signature_statuses(
            &signatures,
            Some(SignatureStatusConfig {
                search_transaction_history: true,
            }),
        )
        .await?;

    println!("📊 Signature statuses at slot {}", response.context.slot);
    for (signature, status) in signatures.iter().zip(response.value) {
        match status {
            None => println!("   {}: not found", signature),
            Some(status) => {
                let level = status
                    .confirmation_status
                    .as_ref()
                    .map(|commitment| commitment.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                match &status.err {
                    Some(err) => println!(
                        "   {}: ❌ failed at slot {} ({}): {}",
                        signature, status.slot, level, err
                    ),
                    None => println!(
                        "   {}: ✅ {} at slot {} ({} confirmations)",
                        signature,
                        level,
                        status.slot,
                        status
                            .confirmations
                            .map(|count| count.to_string())
                            .unwrap_or_else(|| "max".to_string())
                    ),
                }
            }
        }
    }
    Ok(())
}
