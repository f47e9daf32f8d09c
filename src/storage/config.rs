//! Configuration management

use crate::error::{ReelError, Result};
use crate::types::Config;
use crate::utils::paths::{ensure_dir, get_config_path};
use std::env;
use std::path::Path;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

/// Environment variable that overrides `api_key`
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

/// Load configuration from the default location
pub async fn load_config() -> Result<Config> {
    let mut config = load_config_from(&get_config_path()).await?;
    config.api_key = resolve_api_key(&config.api_key, env::var(API_KEY_ENV).ok());
    Ok(config)
}

/// Load configuration from `path`; missing keys keep their defaults
pub async fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).await?;
    serde_json::from_str(&content)
        .map_err(|e| ReelError::InvalidConfig(format!("{}: {}", path.display(), e)))
}

/// Environment wins over the file when set and non-blank
pub fn resolve_api_key(from_file: &str, from_env: Option<String>) -> String {
    from_env
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| from_file.trim().to_string())
}

/// Save configuration to `path`
pub async fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content).await?;
    Ok(())
}

/// Open config file in editor
pub async fn edit_config(editor: &str) -> Result<()> {
    let config_path = get_config_path();

    // Ensure config file exists
    if !config_path.exists() {
        save_config_to(&config_path, &Config::default()).await?;
    }

    let status = Command::new(editor).arg(&config_path).status().await?;
    if !status.success() {
        return Err(ReelError::InvalidConfig(format!(
            "{} exited with code: {:?}",
            editor,
            status.code()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SelectorType, SortKey};

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).await.unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_key: "k3y".into(),
            default_sort: SortKey::YearDesc,
            selector: SelectorType::Dialoguer,
            editor: "vi".into(),
        };

        save_config_to(&path, &config).await.unwrap();
        assert_eq!(load_config_from(&path).await.unwrap(), config);
    }

    #[tokio::test]
    async fn malformed_file_is_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{\"default_sort\": \"sideways\"}").unwrap();

        let err = load_config_from(&path).await.unwrap_err();
        assert!(matches!(err, ReelError::InvalidConfig(_)));
    }

    #[test]
    fn env_key_overrides_file_key() {
        assert_eq!(resolve_api_key("file", Some("env".into())), "env");
        assert_eq!(resolve_api_key("file", Some("  ".into())), "file");
        assert_eq!(resolve_api_key(" file ", None), "file");
    }
}
