//! Common paths for Balze data storage
//!
//! Balze keeps its files under ~/.config/balze/ on all platforms:
//! - config.toml - User configuration and stored session

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the Balze data directory (~/.config/balze/)
pub fn balze_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let balze_dir = home.join(".config").join("balze");
    fs::create_dir_all(&balze_dir).context("Failed to create balze directory")?;
    Ok(balze_dir)
}

/// Get the config file path (~/.config/balze/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(balze_dir()?.join("config.toml"))
}
