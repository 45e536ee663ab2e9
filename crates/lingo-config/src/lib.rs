use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::engine::EngineConfig;
use self::provider::ProviderConfig;
use self::storage::StorageConfig;

pub mod engine;
pub mod provider;
pub mod storage;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub provider: ProviderConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl Config {
    /// Defaults seeded from the environment
    pub fn new() -> Self {
        Config {
            engine: EngineConfig::new(),
            provider: ProviderConfig::new(),
            storage: StorageConfig::new(),
        }
    }

    /// Load a JSON config file; missing fields keep their defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading config from {}", path.display());
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)?;

        // Secrets stay out of config files
        if config.provider.api_key.is_empty() {
            config.provider.api_key = ProviderConfig::new().api_key;
        }

        Ok(config)
    }
}
