//! Default path resolution for the configuration file

use std::path::PathBuf;

/// Returns the default path for the configuration file.
///
/// Uses XDG config directory if available:
/// - Linux: `~/.config/ssdfan/config.toml`
/// - Fallback: `/etc/ssdfan/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("ssdfan")
        .join("config.toml")
}
