//! Android SDK tool lookup
//!
//! Finds the adb binary when it is not given explicitly.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::defaults::ANDROID_HOME_VARIABLE;
use crate::error::DeviceError;

#[cfg(windows)]
const ADB_BINARY: &str = "adb.exe";
#[cfg(not(windows))]
const ADB_BINARY: &str = "adb";

/// Locate adb using the process environment
pub fn locate_adb(explicit: Option<&Path>) -> Result<PathBuf, DeviceError> {
    let android_home = env::var_os(ANDROID_HOME_VARIABLE);
    let path_var = env::var_os("PATH");
    locate_adb_in(
        explicit,
        android_home.as_deref().map(Path::new),
        path_var.as_deref(),
    )
}

/// Locate adb
///
/// Precedence: `explicit`, then `<android_home>/platform-tools/adb` if that
/// file exists, then the first `adb` found on `path_var`. An explicit path is
/// returned as-is; the bridge checks that it exists.
pub fn locate_adb_in(
    explicit: Option<&Path>,
    android_home: Option<&Path>,
    path_var: Option<&OsStr>,
) -> Result<PathBuf, DeviceError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(home) = android_home.filter(|h| !h.as_os_str().is_empty()) {
        let candidate = home.join("platform-tools").join(ADB_BINARY);
        if candidate.is_file() {
            tracing::debug!("Using adb from {}", candidate.display());
            return Ok(candidate);
        }
        tracing::debug!(
            "{} is set but {} does not exist",
            ANDROID_HOME_VARIABLE,
            candidate.display()
        );
    }

    if let Some(path_var) = path_var {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        if let Ok(found) = which::which_in(ADB_BINARY, Some(path_var), cwd) {
            tracing::debug!("Using adb from PATH: {}", found.display());
            return Ok(found);
        }
    }

    Err(DeviceError::AdbNotLocated)
}
