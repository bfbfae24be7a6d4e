//! User settings
//!
//! Reads optional defaults from `config.toml` in the config directory:
//! the adb location and the install options applied when no flag overrides
//! them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::install::InstallOptions;
use crate::error::ConfigError;
use crate::infra::dirs::XapkDirs;

/// Settings loaded from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// adb settings
    #[serde(default)]
    pub adb: AdbSettings,

    /// Default install options
    #[serde(default)]
    pub install: InstallSettings,
}

/// adb settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdbSettings {
    /// Path to the adb binary
    pub path: Option<PathBuf>,
}

/// Default install options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallSettings {
    pub allow_downgrade: Option<bool>,
    pub allow_test_only: Option<bool>,
    pub grant_runtime_permissions: Option<bool>,
    /// Install timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Install flags given on the command line
///
/// `None` means the flag was not given and the settings value applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOverrides {
    pub allow_downgrade: Option<bool>,
    pub allow_test_only: Option<bool>,
    pub grant_runtime_permissions: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Load settings from the config directory
    pub fn load(dirs: &XapkDirs) -> Result<Self, ConfigError> {
        Self::load_from_path(&dirs.config_path())
    }

    /// Load settings from a specific path
    ///
    /// A missing file yields the defaults; an unreadable or invalid one is an
    /// error.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Effective install options: flags, then settings, then defaults
    #[must_use]
    pub fn install_options(&self, overrides: &InstallOverrides) -> InstallOptions {
        let defaults = InstallOptions::default();
        let install = &self.install;

        InstallOptions {
            allow_downgrade: overrides
                .allow_downgrade
                .or(install.allow_downgrade)
                .unwrap_or(defaults.allow_downgrade),
            allow_test_only: overrides
                .allow_test_only
                .or(install.allow_test_only)
                .unwrap_or(defaults.allow_test_only),
            grant_runtime_permissions: overrides
                .grant_runtime_permissions
                .or(install.grant_runtime_permissions)
                .unwrap_or(defaults.grant_runtime_permissions),
            timeout: overrides
                .timeout_secs
                .or(install.timeout_secs)
                .map_or(defaults.timeout, Duration::from_secs),
        }
    }
}
