use std::path::{Path, PathBuf};

use anyhow::Context;
use lingo_config::Config;

const DEFAULT_CONFIG_FILE: &str = "lingo.json";

/// Resolve the config: explicit path, then `lingo.json` in the working
/// directory, then environment defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return Config::load_from_file(&local)
            .with_context(|| format!("Failed to load config {}", local.display()));
    }

    tracing::info!("No config file found, using environment defaults");
    Ok(Config::new())
}

/// Write the effective config next to the binary's working directory
pub fn write_default_config(path: &Path) -> anyhow::Result<()> {
    let mut config = Config::new();
    // Keys come from the environment, never from disk
    config.provider.api_key.clear();
    std::fs::write(path, serde_json::to_string_pretty(&config)?)?;
    tracing::info!("Wrote default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_config_loads_back() {
        let dir = std::env::temp_dir().join(format!("lingo-app-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("lingo.json");

        write_default_config(&path).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.engine.chunk_size, 128);
        assert_eq!(config.storage.storage_key, "translation_cache");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("lingo-app-definitely-missing.json");
        assert!(load_config(Some(&path)).is_err());
    }
}
