use crate::commitment::Commitment;
use std::time::Duration;

/// Poll cadence and budget for signature confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationConfig {
    /// Delay between two status queries
    pub poll_interval: Duration,

    /// Total budget, measured from the first query
    pub timeout: Duration,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(60),
        }
    }
}

/// What `get_program_accounts` does with entries it cannot convert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedAccountPolicy {
    /// Log and skip the entry, return the rest
    #[default]
    Drop,
    /// Fail the whole call
    Fail,
}

/// Configuration for a [`Connection`](crate::Connection)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Default commitment for calls that do not name one
    pub commitment: Option<Commitment>,

    pub confirmation: ConfirmationConfig,

    pub malformed_accounts: MalformedAccountPolicy,
}

impl From<Commitment> for ConnectionConfig {
    fn from(commitment: Commitment) -> Self {
        Self {
            commitment: Some(commitment),
            ..Default::default()
        }
    }
}

impl From<Option<Commitment>> for ConnectionConfig {
    fn from(commitment: Option<Commitment>) -> Self {
        Self {
            commitment,
            ..Default::default()
        }
    }
}

impl From<&str> for ConnectionConfig {
    fn from(raw: &str) -> Self {
        Commitment::normalize(Some(raw)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConnectionConfig::default();
        assert_eq!(config.commitment, None);
        assert_eq!(config.confirmation.poll_interval, Duration::from_millis(500));
        assert_eq!(config.confirmation.timeout, Duration::from_secs(60));
        assert_eq!(config.malformed_accounts, MalformedAccountPolicy::Drop);
    }

    #[test]
    fn test_from_commitment_string() {
        let config = ConnectionConfig::from("recent");
        assert_eq!(config.commitment, Some(Commitment::Confirmed));
        assert_eq!(ConnectionConfig::from("").commitment, None);
    }
}
