//! adb-backed device bridge
//!
//! Drives the `adb` binary as a subprocess: `devices` to enumerate,
//! `install`/`install-multiple` to push the staged APKs.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;

use crate::core::install::{DeviceBridge, DeviceInfo, InstallOptions, TargetSelection};
use crate::error::DeviceError;

/// Header line printed by `adb devices`
const DEVICES_HEADER: &str = "List of devices attached";

/// Device bridge that shells out to adb
#[derive(Debug, Clone)]
pub struct AdbBridge {
    adb_path: PathBuf,
}

impl AdbBridge {
    /// Create a bridge; `init` must be called before use
    pub fn new() -> Self {
        Self {
            adb_path: PathBuf::from("adb"),
        }
    }

    /// Path of the adb binary in use
    pub fn adb_path(&self) -> &Path {
        &self.adb_path
    }

    fn describe(&self, args: &[OsString]) -> String {
        let mut command = self.adb_path.display().to_string();
        for arg in args {
            command.push(' ');
            command.push_str(&arg.to_string_lossy());
        }
        command
    }

    async fn run(&self, args: &[OsString]) -> Result<Output, DeviceError> {
        tracing::debug!("Running {}", self.describe(args));
        Command::new(&self.adb_path)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| DeviceError::Spawn {
                command: self.describe(args),
                source,
            })
    }

    async fn run_checked(&self, args: &[OsString]) -> Result<String, DeviceError> {
        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(DeviceError::CommandFailed {
                command: self.describe(args),
                output: combined_output(&output),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for AdbBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceBridge for AdbBridge {
    async fn init(&mut self, adb_path: &Path) -> Result<(), DeviceError> {
        if !adb_path.is_file() {
            return Err(DeviceError::AdbNotFound {
                path: adb_path.to_path_buf(),
            });
        }
        self.adb_path = adb_path.to_path_buf();
        self.run_checked(&[OsString::from("start-server")]).await?;
        Ok(())
    }

    async fn devices(&self) -> Result<Vec<DeviceInfo>, DeviceError> {
        let stdout = self.run_checked(&[OsString::from("devices")]).await?;
        Ok(parse_devices(&stdout))
    }

    async fn select_device(&self, target: &TargetSelection) -> Result<DeviceInfo, DeviceError> {
        let devices = self.devices().await?;
        select_from(&devices, target)
    }

    async fn install_apks(
        &self,
        device: &DeviceInfo,
        apks: &[PathBuf],
        options: &InstallOptions,
    ) -> Result<(), DeviceError> {
        let args = install_args(&device.serial, apks, options);
        tracing::debug!("Running {}", self.describe(&args));

        let child = Command::new(&self.adb_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| DeviceError::Spawn {
                command: self.describe(&args),
                source,
            })?;

        let output = tokio::time::timeout(options.timeout, child.wait_with_output())
            .await
            .map_err(|_| DeviceError::Timeout {
                serial: device.serial.clone(),
                timeout: options.timeout,
            })?
            .map_err(|source| DeviceError::Spawn {
                command: self.describe(&args),
                source,
            })?;

        let text = combined_output(&output);
        if !output.status.success() || reports_failure(&text) {
            return Err(DeviceError::InstallRejected {
                serial: device.serial.clone(),
                output: text,
            });
        }

        tracing::debug!("adb: {}", text);
        Ok(())
    }
}

/// Parse the output of `adb devices`
///
/// Lines before the header and daemon chatter (`* daemon started ...`) are
/// ignored.
pub fn parse_devices(stdout: &str) -> Vec<DeviceInfo> {
    stdout
        .lines()
        .skip_while(|line| !line.starts_with(DEVICES_HEADER))
        .skip(1)
        .filter(|line| !line.starts_with('*'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let serial = fields.next()?;
            let state = fields.next()?;
            Some(DeviceInfo {
                serial: serial.to_string(),
                state: state.to_string(),
            })
        })
        .collect()
}

/// Pick the target device from a device listing
///
/// An explicit serial only has to be present and online; other devices are
/// irrelevant. Auto selection needs exactly one online device.
pub fn select_from(
    devices: &[DeviceInfo],
    target: &TargetSelection,
) -> Result<DeviceInfo, DeviceError> {
    match target {
        TargetSelection::Explicit(serial) => {
            let device = devices
                .iter()
                .find(|d| &d.serial == serial)
                .ok_or_else(|| DeviceError::DeviceNotFound {
                    serial: serial.clone(),
                })?;
            if !device.is_online() {
                return Err(DeviceError::DeviceNotReady {
                    serial: device.serial.clone(),
                    state: device.state.clone(),
                });
            }
            Ok(device.clone())
        }
        TargetSelection::Auto => {
            let online: Vec<&DeviceInfo> = devices.iter().filter(|d| d.is_online()).collect();
            match online.as_slice() {
                [] => Err(DeviceError::NoDevices),
                [device] => Ok((*device).clone()),
                many => Err(DeviceError::MultipleDevices {
                    serials: many.iter().map(|d| d.serial.clone()).collect(),
                }),
            }
        }
    }
}

/// Arguments for installing `apks` on `serial`
///
/// The package is always replaced (`-r`); a single file uses `install`,
/// anything else `install-multiple`.
pub fn install_args(serial: &str, apks: &[PathBuf], options: &InstallOptions) -> Vec<OsString> {
    let subcommand = if apks.len() == 1 {
        "install"
    } else {
        "install-multiple"
    };

    let mut args: Vec<OsString> = vec!["-s".into(), serial.into(), subcommand.into(), "-r".into()];
    if options.allow_downgrade {
        args.push("-d".into());
    }
    if options.allow_test_only {
        args.push("-t".into());
    }
    if options.grant_runtime_permissions {
        args.push("-g".into());
    }
    args.extend(apks.iter().map(|p| p.as_os_str().to_os_string()));
    args
}

fn reports_failure(text: &str) -> bool {
    text.lines()
        .any(|line| line.trim_start().starts_with("Failure"))
}

fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{}\n{}", stdout.trim(), stderr.trim())
        .trim()
        .to_string()
}
