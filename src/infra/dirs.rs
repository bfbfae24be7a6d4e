//! Platform-specific directory management
//!
//! Provides the platform config directory that holds `config.toml`.
//! Follows XDG Base Directory Specification on Linux and standard locations on macOS.
//!
//! The `XAPK_CONFIG_DIR` environment variable overrides the default.

use std::env;
use std::path::PathBuf;

use crate::config::defaults::CONFIG_FILE_NAME;

/// Environment variable name for the config directory override
pub const ENV_CONFIG_DIR: &str = "XAPK_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "xapk";

/// Platform-specific directory provider for xapk
#[derive(Debug, Clone)]
pub struct XapkDirs {
    config_dir: PathBuf,
}

impl XapkDirs {
    /// Create a new `XapkDirs` instance
    ///
    /// Checks the environment first, then falls back to the platform default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Use a fixed config directory
    #[must_use]
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/xapk` or `~/.config/xapk`
    /// - macOS: `~/Library/Application Support/xapk`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the settings file path
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    fn resolve_config_dir() -> PathBuf {
        match env::var_os(ENV_CONFIG_DIR) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => Self::platform_config_dir(),
        }
    }

    fn platform_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for XapkDirs {
    fn default() -> Self {
        Self::new()
    }
}
