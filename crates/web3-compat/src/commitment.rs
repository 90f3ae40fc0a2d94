/*!
# Commitment Model

Normalizes the legacy commitment vocabulary onto the three levels the network
actually tracks and orders them `processed < confirmed < finalized`.
*/

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use std::{convert::Infallible, fmt, str::FromStr};

/// Commitment level after alias normalization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
    /// A value outside the known vocabulary, passed through untouched
    Unrecognized(String),
}

impl Commitment {
    /// Map a raw commitment string onto a canonical level.
    ///
    /// Aliases resolve through the legacy table, canonical names map to
    /// themselves, any other non-empty string passes through as
    /// [`Commitment::Unrecognized`]. Empty or absent input yields `None`.
    pub fn normalize(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        let commitment = match raw {
            "" => return None,
            "processed" | "single" | "singleGossip" => Self::Processed,
            "confirmed" | "recent" => Self::Confirmed,
            "finalized" | "root" | "max" => Self::Finalized,
            other => Self::Unrecognized(other.to_string()),
        };
        Some(commitment)
    }

    /// Rank used for ordering comparisons, `None` for unrecognized levels
    pub fn priority(&self) -> Option<u8> {
        match self {
            Self::Processed => Some(0),
            Self::Confirmed => Some(1),
            Self::Finalized => Some(2),
            Self::Unrecognized(_) => None,
        }
    }

    /// Whether an observed level satisfies `target`. Unrecognized levels never do.
    pub fn satisfies(&self, target: &Commitment) -> bool {
        match (self.priority(), target.priority()) {
            (Some(observed), Some(wanted)) => observed >= wanted,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
            Self::Unrecognized(raw) => raw,
        }
    }
}

/// Pick the commitment for a call: explicit value first, then the connection
/// default. `None` lets the transport apply its own default.
pub fn resolve_commitment(
    explicit: Option<&Commitment>,
    connection_default: Option<&Commitment>,
) -> Option<Commitment> {
    explicit.or(connection_default).cloned()
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = Infallible;

    /// Parses with alias normalization. The empty string becomes
    /// `Unrecognized("")`; use [`Commitment::normalize`] to treat it as absent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(Some(s)).unwrap_or_else(|| Self::Unrecognized(String::new())))
    }
}

impl From<&str> for Commitment {
    fn from(raw: &str) -> Self {
        match raw.parse() {
            Ok(commitment) => commitment,
            Err(never) => match never {},
        }
    }
}

impl From<CommitmentLevel> for Commitment {
    fn from(level: CommitmentLevel) -> Self {
        match level {
            CommitmentLevel::Processed => Self::Processed,
            CommitmentLevel::Confirmed => Self::Confirmed,
            CommitmentLevel::Finalized => Self::Finalized,
        }
    }
}

impl From<CommitmentConfig> for Commitment {
    fn from(config: CommitmentConfig) -> Self {
        config.commitment.into()
    }
}

impl TryFrom<&Commitment> for CommitmentLevel {
    type Error = String;

    fn try_from(commitment: &Commitment) -> Result<Self, Self::Error> {
        match commitment {
            Commitment::Processed => Ok(CommitmentLevel::Processed),
            Commitment::Confirmed => Ok(CommitmentLevel::Confirmed),
            Commitment::Finalized => Ok(CommitmentLevel::Finalized),
            Commitment::Unrecognized(raw) => Err(format!("unrecognized commitment `{raw}`")),
        }
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Commitment::from(raw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let processed = Commitment::Processed.priority().unwrap();
        let confirmed = Commitment::Confirmed.priority().unwrap();
        let finalized = Commitment::Finalized.priority().unwrap();
        assert!(processed < confirmed);
        assert!(confirmed < finalized);
        assert_eq!(Commitment::Unrecognized("fast".into()).priority(), None);
    }

    #[test]
    fn test_alias_table() {
        let cases = [
            ("recent", Commitment::Confirmed),
            ("single", Commitment::Processed),
            ("singleGossip", Commitment::Processed),
            ("root", Commitment::Finalized),
            ("max", Commitment::Finalized),
            ("processed", Commitment::Processed),
            ("confirmed", Commitment::Confirmed),
            ("finalized", Commitment::Finalized),
        ];
        for (raw, expected) in cases {
            assert_eq!(Commitment::normalize(Some(raw)), Some(expected), "{raw}");
        }
    }

    #[test]
    fn test_passthrough_and_absent() {
        assert_eq!(
            Commitment::normalize(Some("optimistic")),
            Some(Commitment::Unrecognized("optimistic".into()))
        );
        assert_eq!(Commitment::normalize(Some("")), None);
        assert_eq!(Commitment::normalize(None), None);
    }

    #[test]
    fn test_resolve_prefers_explicit() {
        let default = Commitment::Finalized;
        assert_eq!(
            resolve_commitment(Some(&Commitment::Processed), Some(&default)),
            Some(Commitment::Processed)
        );
        assert_eq!(resolve_commitment(None, Some(&default)), Some(default));
        assert_eq!(resolve_commitment(None, None), None);
    }

    #[test]
    fn test_satisfies() {
        assert!(Commitment::Finalized.satisfies(&Commitment::Confirmed));
        assert!(Commitment::Confirmed.satisfies(&Commitment::Confirmed));
        assert!(!Commitment::Processed.satisfies(&Commitment::Confirmed));
        assert!(!Commitment::Finalized.satisfies(&Commitment::Unrecognized("x".into())));
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Commitment::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
        let parsed: Commitment = serde_json::from_str("\"singleGossip\"").unwrap();
        assert_eq!(parsed, Commitment::Processed);
    }

    #[test]
    fn test_sdk_level_conversion() {
        assert_eq!(
            Commitment::from(CommitmentConfig::confirmed()),
            Commitment::Confirmed
        );
        assert_eq!(
            CommitmentLevel::try_from(&Commitment::Finalized),
            Ok(CommitmentLevel::Finalized)
        );
        assert!(CommitmentLevel::try_from(&Commitment::Unrecognized("x".into())).is_err());
    }
}
