use std::env;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_provider() -> String {
    "google-v2".to_string()
}

fn default_api_url() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ProviderConfig {
    pub fn new() -> Self {
        let api_key = env::var("LINGO_API_KEY").unwrap_or_default();
        let api_url = env::var("LINGO_API_URL").unwrap_or_else(|_| default_api_url());

        Self {
            api_key,
            api_url,
            ..Self::default()
        }
    }

    /// Remote calls are only attempted with a key configured
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.is_empty()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            api_key: String::new(),
            api_url: default_api_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
