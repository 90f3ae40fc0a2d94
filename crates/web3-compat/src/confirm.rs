/*!
# Confirmation Poller

Polls signature status until the transaction reaches the target commitment,
fails on-chain, or the time budget runs out.

```text
          ┌───────────┐  status satisfies target  ┌───────────┐
   ──────▶│  Polling  │──────────────────────────▶│ Confirmed │
          └───────────┘                           └───────────┘
            │       │      status carries err     ┌───────────┐
            │       └────────────────────────────▶│  Errored  │
            │                                     └───────────┘
            │ budget spent                        ┌───────────┐
            └────────────────────────────────────▶│ TimedOut  │
                                                  └───────────┘
```

A timeout is reported as a value (`value: None` or the last non-final
status), never as an error. Transport failures propagate.
*/

use crate::{
    commitment::{resolve_commitment, Commitment},
    connection::Connection,
    error::CompatResult,
    types::{RpcContext, RpcResponse, SignatureStatus, SignatureStatusConfig},
};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// Poller state after evaluating one status query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationState {
    Polling,
    Confirmed,
    Errored,
    TimedOut,
}

impl ConfirmationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Polling)
    }
}

/// Evaluate one observed status against `target`.
///
/// Never yields [`ConfirmationState::TimedOut`]; only the poll loop knows
/// about the clock.
pub fn next_state(status: Option<&SignatureStatus>, target: &Commitment) -> ConfirmationState {
    let Some(status) = status else {
        return ConfirmationState::Polling;
    };

    if status.err.is_some() {
        return ConfirmationState::Errored;
    }

    let reached = match &status.confirmation_status {
        Some(observed) => observed.satisfies(target),
        // Older nodes only report a confirmation count
        None => match target {
            Commitment::Processed => true,
            Commitment::Confirmed => status.confirmations.unwrap_or(0) > 0,
            Commitment::Finalized => status.confirmations.is_none(),
            Commitment::Unrecognized(_) => false,
        },
    };

    if reached {
        ConfirmationState::Confirmed
    } else {
        ConfirmationState::Polling
    }
}

impl Connection {
    /// Wait for `signature` to reach `commitment` (else the connection
    /// default, else `finalized`).
    pub async fn confirm_transaction(
        &self,
        signature: &str,
        commitment: impl Into<Option<Commitment>>,
    ) -> CompatResult<RpcResponse<Option<SignatureStatus>>> {
        let target = resolve_commitment(commitment.into().as_ref(), self.commitment())
            .unwrap_or(Commitment::Finalized);
        let confirmation = &self.config().confirmation;
        let lookup = SignatureStatusConfig {
            search_transaction_history: true,
        };

        let start = Instant::now();
        let mut context = None;
        let mut last_status = None;
        let mut state = ConfirmationState::Polling;

        while start.elapsed() < confirmation.timeout {
            let response = self
                .get_signature_statuses(&[signature], Some(lookup))
                .await?;
            context = Some(response.context);
            last_status = response.value.into_iter().next().flatten();

            state = next_state(last_status.as_ref(), &target);
            if state.is_terminal() {
                break;
            }
            sleep(confirmation.poll_interval).await;
        }

        if !state.is_terminal() {
            state = ConfirmationState::TimedOut;
        }
        match state {
            ConfirmationState::Confirmed => {
                debug!("Transaction {} reached {}", signature, target);
            }
            ConfirmationState::Errored => {
                warn!("Transaction {} failed on-chain", signature);
            }
            ConfirmationState::Polling | ConfirmationState::TimedOut => {
                warn!(
                    "Transaction {} not {} after {:?}",
                    signature, target, confirmation.timeout
                );
            }
        }

        Ok(RpcResponse {
            context: context.unwrap_or_else(RpcContext::default),
            value: last_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(confirmations: Option<u64>, confirmation_status: Option<Commitment>) -> SignatureStatus {
        SignatureStatus {
            slot: 10,
            confirmations,
            err: None,
            confirmation_status,
        }
    }

    #[test]
    fn test_missing_status_keeps_polling() {
        assert_eq!(
            next_state(None, &Commitment::Processed),
            ConfirmationState::Polling
        );
    }

    #[test]
    fn test_error_wins_over_commitment() {
        let mut failed = status(None, Some(Commitment::Finalized));
        failed.err = Some(json!({"InstructionError": [0, "Custom"]}));
        assert_eq!(
            next_state(Some(&failed), &Commitment::Processed),
            ConfirmationState::Errored
        );
    }

    #[test]
    fn test_explicit_status_compared_by_priority() {
        let confirmed = status(Some(3), Some(Commitment::Confirmed));
        assert_eq!(
            next_state(Some(&confirmed), &Commitment::Processed),
            ConfirmationState::Confirmed
        );
        assert_eq!(
            next_state(Some(&confirmed), &Commitment::Confirmed),
            ConfirmationState::Confirmed
        );
        assert_eq!(
            next_state(Some(&confirmed), &Commitment::Finalized),
            ConfirmationState::Polling
        );
    }

    #[test]
    fn test_count_only_status() {
        let fresh = status(Some(0), None);
        let voted = status(Some(2), None);
        let rooted = status(None, None);

        assert_eq!(next_state(Some(&fresh), &Commitment::Processed), ConfirmationState::Confirmed);
        assert_eq!(next_state(Some(&fresh), &Commitment::Confirmed), ConfirmationState::Polling);
        assert_eq!(next_state(Some(&voted), &Commitment::Confirmed), ConfirmationState::Confirmed);
        assert_eq!(next_state(Some(&voted), &Commitment::Finalized), ConfirmationState::Polling);
        assert_eq!(next_state(Some(&rooted), &Commitment::Finalized), ConfirmationState::Confirmed);
    }

    #[test]
    fn test_unrecognized_target_never_satisfied() {
        let target = Commitment::Unrecognized("someday".to_string());
        let rooted = status(None, Some(Commitment::Finalized));
        assert_eq!(next_state(Some(&rooted), &target), ConfirmationState::Polling);
        assert_eq!(next_state(Some(&status(None, None)), &target), ConfirmationState::Polling);
    }
}
