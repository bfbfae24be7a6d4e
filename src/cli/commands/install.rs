//! CLI command implementation for `xapk install`

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::output::OutputConfig;
use crate::core::install::{install_xapk, InstallRequest, TargetSelection};
use crate::core::settings::{InstallOverrides, Settings};
use crate::infra::adb::AdbBridge;
use crate::infra::dirs::XapkDirs;
use crate::infra::sdk_tools::locate_adb;

/// Parsed arguments for `xapk install`
#[derive(Debug, Clone)]
pub struct InstallArgs {
    /// XAPK archive
    pub archive: PathBuf,
    /// Explicit adb binary
    pub adb: Option<PathBuf>,
    /// Explicit device serial (flag or `ANDROID_SERIAL`)
    pub device_id: Option<String>,
    /// Install flags from the command line
    pub overrides: InstallOverrides,
}

/// Execute the install command
pub async fn execute(args: InstallArgs, output: &OutputConfig) -> Result<()> {
    let settings = Settings::load(&XapkDirs::new()).context("Failed to load settings")?;

    let adb_path = locate_adb(args.adb.as_deref().or(settings.adb.path.as_deref()))?;
    let request = InstallRequest {
        archive_path: args.archive,
        adb_path,
        target: TargetSelection::from_serial(args.device_id),
        options: settings.install_options(&args.overrides),
    };
    tracing::debug!("Install request: {:?}", request);

    let spinner = output.spinner(&format!("Installing {}", request.archive_path.display()));
    let mut bridge = AdbBridge::new();
    let result = install_xapk(&mut bridge, &request).await;
    spinner.finish_and_clear();

    let report = result.with_context(|| {
        format!("Failed to install {}", request.archive_path.display())
    })?;

    output.success(&format!(
        "Installed {} ({} APKs) on {}",
        report.package_name,
        report.apks.len(),
        report.device
    ));
    output.json(&report)?;
    Ok(())
}
