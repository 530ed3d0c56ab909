//! Configuration for the share ledger

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Well-known key of the reward pool account
pub const DEFAULT_REWARD_POOL_ID: &str = "reward_pool_id";

/// Share ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data directory for RocksDB
    pub data_dir: PathBuf,

    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// RocksDB configuration
    pub rocksdb: RocksDBConfig,

    /// Reward amounts and reward pool
    pub rewards: RewardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/share-ledger"),
            service_name: "share-ledger".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            rocksdb: RocksDBConfig::default(),
            rewards: RewardConfig::default(),
        }
    }
}

/// RocksDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RocksDBConfig {
    /// Write buffer size (MB)
    pub write_buffer_size_mb: usize,

    /// Max write buffers
    pub max_write_buffer_number: i32,

    /// Max background jobs (compaction + flush)
    pub max_background_jobs: i32,

    /// Sync the WAL on every committed write set
    pub sync_writes: bool,

    /// Enable statistics
    pub enable_statistics: bool,
}

impl Default for RocksDBConfig {
    fn default() -> Self {
        Self {
            write_buffer_size_mb: 64,
            max_write_buffer_number: 2,
            max_background_jobs: 2,
            sync_writes: true,
            enable_statistics: false,
        }
    }
}

/// Reward constants shared by every workflow
///
/// Immutable once handed to a contract. The share reward defaults to ten
/// times the listen reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Credited to the sharing user on `completeShare`
    pub share_reward: Decimal,

    /// Credited to each listening user on `completeShare`
    pub listen_reward: Decimal,

    /// Account receiving `shopping` payments
    pub reward_pool_id: String,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            share_reward: Decimal::from(100),
            listen_reward: Decimal::from(10),
            reward_pool_id: DEFAULT_REWARD_POOL_ID.to_string(),
        }
    }
}

impl RewardConfig {
    /// Check the reward pool id is usable as a ledger key
    pub fn validate(&self) -> crate::Result<()> {
        if self.reward_pool_id.is_empty() {
            return Err(crate::Error::Config(
                "reward_pool_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.rewards.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `SHARE_LEDGER_*` environment variables
    pub fn apply_env(&mut self) -> crate::Result<()> {
        if let Ok(data_dir) = std::env::var("SHARE_LEDGER_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(pool) = std::env::var("SHARE_LEDGER_REWARD_POOL_ID") {
            self.rewards.reward_pool_id = pool;
        }

        if let Ok(amount) = std::env::var("SHARE_LEDGER_SHARE_REWARD") {
            self.rewards.share_reward = parse_env_decimal("SHARE_LEDGER_SHARE_REWARD", &amount)?;
        }

        if let Ok(amount) = std::env::var("SHARE_LEDGER_LISTEN_REWARD") {
            self.rewards.listen_reward =
                parse_env_decimal("SHARE_LEDGER_LISTEN_REWARD", &amount)?;
        }

        self.rewards.validate()
    }
}

fn parse_env_decimal(name: &str, value: &str) -> crate::Result<Decimal> {
    value
        .parse::<Decimal>()
        .map_err(|e| crate::Error::Config(format!("{} is not a decimal: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "share-ledger");
        assert_eq!(config.rewards.share_reward, Decimal::from(100));
        assert_eq!(config.rewards.listen_reward, Decimal::from(10));
        assert_eq!(
            config.rewards.share_reward,
            config.rewards.listen_reward * Decimal::from(10)
        );
        assert_eq!(config.rewards.reward_pool_id, DEFAULT_REWARD_POOL_ID);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("share-ledger.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/var/lib/share-ledger"

[rewards]
share_reward = "250.5"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/share-ledger"));
        assert_eq!(config.rewards.share_reward, "250.5".parse::<Decimal>().unwrap());
        assert_eq!(config.rewards.listen_reward, Decimal::from(10));
        assert!(config.rocksdb.sync_writes);
    }

    #[test]
    fn test_empty_reward_pool_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[rewards]\nreward_pool_id = \"\"\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
