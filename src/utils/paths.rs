//! Path utilities for reel-search
//!
//! Respects XDG Base Directory Specification

use crate::error::Result;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

const APP_NAME: &str = "reel-search";

/// Resolve an XDG base directory: env var, then platform default, then ~/fallback
fn xdg_base(var: &str, platform: Option<PathBuf>, fallback: &str) -> PathBuf {
    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or(platform)
        .unwrap_or_else(|| {
            PathBuf::from(env::var("HOME").unwrap_or_default()).join(fallback)
        })
}

/// Get config directory path
/// Respects XDG_CONFIG_HOME, defaults to ~/.config/reel-search
pub fn get_config_dir() -> PathBuf {
    xdg_base("XDG_CONFIG_HOME", dirs::config_dir(), ".config").join(APP_NAME)
}

/// Get data directory path
/// Respects XDG_DATA_HOME, defaults to ~/.local/share/reel-search
pub fn get_data_dir() -> PathBuf {
    xdg_base("XDG_DATA_HOME", dirs::data_dir(), ".local/share").join(APP_NAME)
}

/// Get config file path
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.json")
}

/// Get key-value store path (holds favorites)
pub fn get_store_path() -> PathBuf {
    get_data_dir().join("store.json")
}

/// Ensure a directory exists
pub async fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    fs::create_dir_all(path).await?;
    Ok(())
}

/// Ensure all required app directories exist
pub async fn ensure_app_dirs() -> Result<()> {
    ensure_dir(get_config_dir()).await?;
    ensure_dir(get_data_dir()).await?;
    Ok(())
}
