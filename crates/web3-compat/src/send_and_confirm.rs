use crate::{
    commitment::Commitment,
    compile::CompiledTransaction,
    connection::Connection,
    error::{CompatResult, CompileError},
    types::{RawTransaction, SendOptions},
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::Signature,
    signer::Signer,
    transaction::{Transaction, VersionedTransaction},
};
use tracing::debug;

/// A transaction that still needs signatures before it can be sent
#[derive(Debug, Clone)]
pub enum SignableTransaction {
    Legacy(Transaction),
    Versioned(VersionedTransaction),
    Compiled(CompiledTransaction),
}

impl From<Transaction> for SignableTransaction {
    fn from(tx: Transaction) -> Self {
        Self::Legacy(tx)
    }
}

impl From<VersionedTransaction> for SignableTransaction {
    fn from(tx: VersionedTransaction) -> Self {
        Self::Versioned(tx)
    }
}

impl From<CompiledTransaction> for SignableTransaction {
    fn from(tx: CompiledTransaction) -> Self {
        Self::Compiled(tx)
    }
}

impl SignableTransaction {
    /// Keys whose signatures the message requires, in slot order
    pub fn required_signers(&self) -> Vec<Pubkey> {
        match self {
            Self::Legacy(tx) => {
                let required = usize::from(tx.message.header.num_required_signatures);
                tx.message.account_keys.iter().take(required).copied().collect()
            }
            Self::Versioned(tx) => {
                let required = usize::from(tx.message.header().num_required_signatures);
                tx.message
                    .static_account_keys()
                    .iter()
                    .take(required)
                    .copied()
                    .collect()
            }
            Self::Compiled(tx) => tx.signatures().iter().map(|slot| slot.signer).collect(),
        }
    }

    /// Sign with every signer whose key the message requires. Signers the
    /// message does not name are skipped.
    pub fn sign_matching(&mut self, signers: &[&dyn Signer]) -> Result<(), CompileError> {
        let required = self.required_signers();
        let matching: Vec<&dyn Signer> = signers
            .iter()
            .copied()
            .filter(|signer| {
                let pubkey = signer.pubkey();
                let is_required = required.contains(&pubkey);
                if !is_required {
                    debug!("Skipping signer {} not required by the message", pubkey);
                }
                is_required
            })
            .collect();

        match self {
            Self::Legacy(tx) => {
                let message = tx.message_data();
                fill_signatures(&mut tx.signatures, &required, &matching, &message)
            }
            Self::Versioned(tx) => {
                let message = tx.message.serialize();
                fill_signatures(&mut tx.signatures, &required, &matching, &message)
            }
            Self::Compiled(tx) => tx.sign(&matching),
        }
    }
}

impl From<SignableTransaction> for RawTransaction {
    fn from(tx: SignableTransaction) -> Self {
        match tx {
            SignableTransaction::Legacy(tx) => Self::Legacy(tx),
            SignableTransaction::Versioned(tx) => Self::Versioned(tx),
            SignableTransaction::Compiled(tx) => Self::Compiled(tx),
        }
    }
}

fn fill_signatures(
    signatures: &mut Vec<Signature>,
    required: &[Pubkey],
    signers: &[&dyn Signer],
    message: &[u8],
) -> Result<(), CompileError> {
    if signatures.len() < required.len() {
        signatures.resize(required.len(), Signature::default());
    }
    for signer in signers {
        let pubkey = signer.pubkey();
        let Some(index) = required.iter().position(|key| *key == pubkey) else {
            return Err(CompileError::UnknownSigner(pubkey));
        };
        signatures[index] = signer
            .try_sign_message(message)
            .map_err(|e| CompileError::Signing(pubkey, e.to_string()))?;
    }
    Ok(())
}

/// Commitment the confirmation step waits for: the preflight commitment,
/// else the connection default, else finalized. Unrecognized levels are
/// skipped since no status can ever satisfy them.
fn confirmation_target(
    preflight: Option<&Commitment>,
    connection_default: Option<&Commitment>,
) -> Commitment {
    preflight
        .into_iter()
        .chain(connection_default)
        .find(|commitment| commitment.priority().is_some())
        .cloned()
        .unwrap_or(Commitment::Finalized)
}

/// Sign a copy of `transaction`, submit it, and wait for confirmation.
///
/// Confirmation targets `options.preflight_commitment`, else the connection
/// default. Returns the signature whatever the confirmation outcome; send
/// failures propagate without polling.
pub async fn send_and_confirm_transaction(
    connection: &Connection,
    transaction: impl Into<SignableTransaction>,
    signers: &[&dyn Signer],
    options: Option<SendOptions>,
) -> CompatResult<String> {
    let mut transaction = transaction.into();
    transaction.sign_matching(signers)?;

    let target = confirmation_target(
        options
            .as_ref()
            .and_then(|options| options.preflight_commitment.as_ref()),
        connection.commitment(),
    );

    let signature = connection
        .send_raw_transaction(transaction, options)
        .await?;

    let confirmation = connection
        .confirm_transaction(&signature, target.clone())
        .await?;
    debug!(
        "Transaction {} confirmation at {}: {:?}",
        signature, target, confirmation.value
    );

    Ok(signature)
}
