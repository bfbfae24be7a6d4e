//! Install orchestration
//!
//! Stages the splits of an XAPK in a scratch directory and hands them to a
//! [`DeviceBridge`] in a single install call against one device.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::Serialize;
use tempfile::TempDir;

use super::extract::stage_splits;
use crate::config::defaults::DEFAULT_ADB_TIMEOUT;
use crate::error::{DeviceError, XapkError};

/// Options passed to the device for the install call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    /// Permit installing a lower version code than the one on the device
    pub allow_downgrade: bool,
    /// Permit packages marked `testOnly`
    pub allow_test_only: bool,
    /// Grant all runtime permissions at install time
    pub grant_runtime_permissions: bool,
    /// Upper bound for the device install call
    pub timeout: Duration,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            allow_downgrade: false,
            allow_test_only: false,
            grant_runtime_permissions: false,
            timeout: DEFAULT_ADB_TIMEOUT,
        }
    }
}

/// Which device to install on
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TargetSelection {
    /// The device with this serial, whatever else is connected
    Explicit(String),
    /// The only connected device
    #[default]
    Auto,
}

impl TargetSelection {
    /// `Explicit` when a serial is given, `Auto` otherwise
    pub fn from_serial(serial: Option<String>) -> Self {
        serial
            .filter(|s| !s.is_empty())
            .map_or(Self::Auto, Self::Explicit)
    }
}

/// A device as reported by the bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Device serial
    pub serial: String,
    /// Connection state (`device`, `offline`, `unauthorized`, ...)
    pub state: String,
}

impl DeviceInfo {
    /// Whether the device accepts commands
    pub fn is_online(&self) -> bool {
        self.state == "device"
    }
}

/// Access to connected devices
///
/// Device resolution, the install itself and its timeout are entirely the
/// bridge's business; the orchestrator never retries.
pub trait DeviceBridge {
    /// One-time setup with the bridge binary
    fn init(&mut self, adb_path: &Path) -> impl Future<Output = Result<(), DeviceError>>;

    /// List every device the bridge can see
    fn devices(&self) -> impl Future<Output = Result<Vec<DeviceInfo>, DeviceError>>;

    /// Resolve the device to run against
    fn select_device(
        &self,
        target: &TargetSelection,
    ) -> impl Future<Output = Result<DeviceInfo, DeviceError>>;

    /// Install all `apks` on `device` in one call
    fn install_apks(
        &self,
        device: &DeviceInfo,
        apks: &[PathBuf],
        options: &InstallOptions,
    ) -> impl Future<Output = Result<(), DeviceError>>;
}

/// Everything one install invocation needs
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// XAPK archive to install
    pub archive_path: PathBuf,
    /// adb binary handed to the bridge
    pub adb_path: PathBuf,
    /// Target device
    pub target: TargetSelection,
    /// Install options
    pub options: InstallOptions,
}

/// Outcome of a successful install
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    /// Package name from the manifest
    pub package_name: String,
    /// Serial of the device the package went to
    pub device: String,
    /// File names of the installed splits, in install order
    pub apks: Vec<String>,
}

/// Install an XAPK on one device
///
/// The scratch directory is removed on every return path.
pub async fn install_xapk<B: DeviceBridge>(
    bridge: &mut B,
    request: &InstallRequest,
) -> Result<InstallReport, XapkError> {
    bridge.init(&request.adb_path).await?;

    let scratch = TempDir::new().map_err(|source| XapkError::Staging { source })?;
    let (descriptor, apks) = stage_splits(&request.archive_path, scratch.path())?;
    if apks.is_empty() {
        tracing::warn!(
            "Manifest for '{}' lists no split files",
            descriptor.package_name
        );
    }

    let device = bridge.select_device(&request.target).await?;
    tracing::info!(
        "Installing {} APK(s) on {}",
        apks.len(),
        device.serial
    );
    bridge
        .install_apks(&device, &apks, &request.options)
        .await?;

    let apks = apks
        .iter()
        .filter_map(|p| p.strip_prefix(scratch.path()).ok())
        .map(|p| p.display().to_string())
        .collect();

    Ok(InstallReport {
        package_name: descriptor.package_name,
        device: device.serial,
        apks,
    })
}
