use std::env;
use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_chunk_size() -> usize {
    128
}

fn default_cache_capacity() -> usize {
    500
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_debounce_ms() -> u64 {
    350
}

/// Accepted live-input debounce window
pub const DEBOUNCE_RANGE_MS: RangeInclusive<u64> = 300..=400;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    /// Max texts per remote call
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Max cached translations before FIFO eviction
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Language UI strings are authored in
    #[serde(default = "default_source_language")]
    pub source_language: String,
    /// Display language used at startup and for malformed selections
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Delay before a live-input translation is dispatched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Extra static overrides (JSON) merged over the built-in table
    #[serde(default)]
    pub overrides_path: Option<String>,
}

impl EngineConfig {
    pub fn new() -> Self {
        let debounce_ms = env::var("LINGO_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_debounce_ms);

        let overrides_path = env::var("LINGO_OVERRIDES").ok();

        Self {
            debounce_ms,
            overrides_path,
            ..Self::default()
        }
    }

    /// Debounce delay clamped into `DEBOUNCE_RANGE_MS`
    pub fn debounce_delay(&self) -> Duration {
        let (min, max) = (*DEBOUNCE_RANGE_MS.start(), *DEBOUNCE_RANGE_MS.end());
        let ms = self.debounce_ms.clamp(min, max);
        if ms != self.debounce_ms {
            tracing::warn!(
                "debounce_ms {} outside {}..={}, using {}",
                self.debounce_ms,
                min,
                max,
                ms
            );
        }
        Duration::from_millis(ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            cache_capacity: default_cache_capacity(),
            source_language: default_source_language(),
            default_language: default_language(),
            debounce_ms: default_debounce_ms(),
            overrides_path: None,
        }
    }
}
