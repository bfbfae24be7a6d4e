//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod devices;
pub mod inspect;
pub mod install;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use super::output::OutputConfig;
use crate::config::defaults::ANDROID_SERIAL_VARIABLE;
use crate::core::settings::InstallOverrides;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install an XAPK on a connected device, replacing any installed version
    ///
    /// All splits listed in the archive's manifest are installed in one
    /// call. If the app is not compatible with the device the install fails.
    Install {
        /// Path to the XAPK archive
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Path to the adb binary (default: config file, $ANDROID_HOME, then PATH)
        #[arg(long, value_name = "PATH")]
        adb: Option<PathBuf>,

        /// Device serial; required when more than one device is connected
        #[arg(short, long, value_name = "SERIAL", env = ANDROID_SERIAL_VARIABLE)]
        device_id: Option<String>,

        /// Allow installing a lower version than the one on the device
        #[arg(long, overrides_with = "no_allow_downgrade")]
        allow_downgrade: bool,

        /// Refuse downgrades even if the config file allows them
        #[arg(long, overrides_with = "allow_downgrade")]
        no_allow_downgrade: bool,

        /// Allow packages marked as test-only
        #[arg(long, overrides_with = "no_allow_test_only")]
        allow_test_only: bool,

        /// Refuse test-only packages even if the config file allows them
        #[arg(long, overrides_with = "allow_test_only")]
        no_allow_test_only: bool,

        /// Grant all runtime permissions at install time
        #[arg(long, overrides_with = "no_grant_runtime_permissions")]
        grant_runtime_permissions: bool,

        /// Do not grant runtime permissions even if the config file does
        #[arg(long, overrides_with = "grant_runtime_permissions")]
        no_grant_runtime_permissions: bool,

        /// Install timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Show the package and splits described by an XAPK's manifest
    Inspect {
        /// Path to the XAPK archive
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
    },

    /// List devices visible to adb
    Devices {
        /// Path to the adb binary (default: config file, $ANDROID_HOME, then PATH)
        #[arg(long, value_name = "PATH")]
        adb: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self, output: &OutputConfig) -> Result<()> {
        match self {
            Self::Install {
                archive,
                adb,
                device_id,
                allow_downgrade,
                no_allow_downgrade,
                allow_test_only,
                no_allow_test_only,
                grant_runtime_permissions,
                no_grant_runtime_permissions,
                timeout,
            } => {
                let args = install::InstallArgs {
                    archive,
                    adb,
                    device_id,
                    overrides: InstallOverrides {
                        allow_downgrade: switch(allow_downgrade, no_allow_downgrade),
                        allow_test_only: switch(allow_test_only, no_allow_test_only),
                        grant_runtime_permissions: switch(
                            grant_runtime_permissions,
                            no_grant_runtime_permissions,
                        ),
                        timeout_secs: timeout,
                    },
                };
                install::execute(args, output).await
            }
            Self::Inspect { archive } => inspect::execute(&archive, output),
            Self::Devices { adb } => devices::execute(adb.as_deref(), output).await,
        }
    }
}

/// Collapse a `--flag`/`--no-flag` pair; `None` when neither was given
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}
