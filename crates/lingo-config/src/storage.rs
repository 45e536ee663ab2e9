use std::env;

use serde::{Deserialize, Serialize};

fn default_storage_key() -> String {
    "translation_cache".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the durable store, in-memory only when unset
    pub cache_dir: Option<String>,
    /// Key the serialized cache lives under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl StorageConfig {
    pub fn new() -> Self {
        Self {
            cache_dir: env::var("LINGO_CACHE_DIR").ok(),
            storage_key: default_storage_key(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            storage_key: default_storage_key(),
        }
    }
}
