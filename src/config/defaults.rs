//! Default configuration values

use std::time::Duration;

/// Default bound for a device install call (10 minutes)
pub const DEFAULT_ADB_TIMEOUT: Duration = Duration::from_secs(600);

/// Environment variable pointing at the Android SDK
pub const ANDROID_HOME_VARIABLE: &str = "ANDROID_HOME";

/// Environment variable selecting the target device serial
pub const ANDROID_SERIAL_VARIABLE: &str = "ANDROID_SERIAL";

/// Name of the settings file in the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
