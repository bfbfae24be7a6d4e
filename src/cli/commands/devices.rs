//! CLI command implementation for `xapk devices`

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::output::OutputConfig;
use crate::core::install::DeviceBridge;
use crate::core::settings::Settings;
use crate::infra::adb::AdbBridge;
use crate::infra::dirs::XapkDirs;
use crate::infra::sdk_tools::locate_adb;

/// Execute the devices command
pub async fn execute(adb: Option<&Path>, output: &OutputConfig) -> Result<()> {
    let settings = Settings::load(&XapkDirs::new()).context("Failed to load settings")?;
    let adb_path = locate_adb(adb.or(settings.adb.path.as_deref()))?;

    let mut bridge = AdbBridge::new();
    bridge.init(&adb_path).await?;
    let devices = bridge.devices().await?;

    output.json(&devices)?;
    if devices.is_empty() {
        output.line("No devices connected");
    }
    for device in &devices {
        output.line(&format!("{}\t{}", device.serial, device.state));
    }
    Ok(())
}
