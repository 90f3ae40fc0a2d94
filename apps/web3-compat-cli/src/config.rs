use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use solana_sdk::signature::{read_keypair_file, Keypair};
use std::path::{Path, PathBuf};
use web3_compat::{Commitment, ConnectionConfig};

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Optional YAML config file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Solana RPC URL
    pub rpc_url: Option<String>,

    /// Default commitment, legacy aliases accepted
    pub commitment: Option<String>,

    /// Path to the fee payer keypair file
    pub keypair_path: Option<PathBuf>,
}

impl CliConfig {
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Command-line values win over file values
    pub fn merge(self, overrides: CliConfig) -> Self {
        Self {
            rpc_url: overrides.rpc_url.or(self.rpc_url),
            commitment: overrides.commitment.or(self.commitment),
            keypair_path: overrides.keypair_path.or(self.keypair_path),
        }
    }

    pub fn rpc_url(&self) -> &str {
        self.rpc_url.as_deref().unwrap_or(DEFAULT_RPC_URL)
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        Commitment::normalize(self.commitment.as_deref()).into()
    }

    pub fn keypair_path(&self) -> CliResult<PathBuf> {
        if let Some(path) = &self.keypair_path {
            return Ok(path.clone());
        }
        let home = std::env::var("HOME").map_err(|_| {
            CliError::InvalidConfig("no keypair path given and HOME is not set".to_string())
        })?;
        Ok(PathBuf::from(home).join(".config/solana/id.json"))
    }

    pub fn load_keypair(&self) -> CliResult<Keypair> {
        let path = self.keypair_path()?;
        read_keypair_file(&path).map_err(|e| CliError::Keypair {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "rpc_url: http://127.0.0.1:8899\ncommitment: recent\nkeypair_path: /tmp/payer.json"
        )
        .unwrap();

        let config = CliConfig::load(file.path()).unwrap();

        assert_eq!(config.rpc_url(), "http://127.0.0.1:8899");
        assert_eq!(
            config.connection_config().commitment,
            Some(Commitment::Confirmed)
        );
        assert_eq!(
            config.keypair_path().unwrap(),
            PathBuf::from("/tmp/payer.json")
        );
    }

    #[test]
    fn test_flags_override_file() {
        let file = CliConfig {
            rpc_url: Some("http://file".to_string()),
            commitment: Some("finalized".to_string()),
            keypair_path: None,
        };
        let flags = CliConfig {
            rpc_url: Some("http://flag".to_string()),
            ..Default::default()
        };

        let merged = file.merge(flags);

        assert_eq!(merged.rpc_url(), "http://flag");
        assert_eq!(merged.commitment.as_deref(), Some("finalized"));
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.rpc_url(), DEFAULT_RPC_URL);
        assert_eq!(config.connection_config().commitment, None);
    }
}
