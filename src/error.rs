//! Error types for xapk
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Archive and manifest errors
///
/// Everything that can go wrong between opening the XAPK and having the
/// split files staged on disk.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Archive could not be opened as a zip file
    #[error("Failed to open archive '{path}': {source}")]
    Open {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    /// Archive has no manifest entry
    #[error("Archive does not contain '{name}'")]
    ManifestMissing { name: String },

    /// Manifest bytes are not a JSON document
    #[error("Failed to parse manifest: {source}")]
    ManifestUnparseable { source: serde_json::Error },

    /// Manifest is valid JSON but its top level is not an object
    #[error("Manifest is not a JSON object (found {found})")]
    ManifestNotObject { found: &'static str },

    /// Manifest references a file the archive does not contain
    #[error("Split '{file}' is listed in the manifest but missing from the archive")]
    SplitMissing { file: String },

    /// Manifest references a file that would land outside the scratch directory
    #[error("Refusing to extract '{file}': path escapes the staging directory")]
    UnsafeEntryPath { file: String },

    /// Zip entry could not be read
    #[error("Failed to read archive entry '{name}': {source}")]
    Entry {
        name: String,
        source: zip::result::ZipError,
    },

    /// IO error while reading or writing
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Device bridge errors
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Configured adb binary does not exist
    #[error("adb binary not found at '{path}'")]
    AdbNotFound { path: PathBuf },

    /// No adb binary given and none could be located
    #[error(
        "Unable to determine the location of adb. Use --adb, or set ANDROID_HOME or PATH"
    )]
    AdbNotLocated,

    /// adb could not be started
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// adb exited unsuccessfully for a non-install command
    #[error("'{command}' failed: {output}")]
    CommandFailed { command: String, output: String },

    /// Auto-selection found nothing
    #[error("No connected devices found")]
    NoDevices,

    /// Auto-selection found more than one device
    #[error(
        "More than one device connected ({}). Use --device-id or ANDROID_SERIAL to pick one",
        serials.join(", ")
    )]
    MultipleDevices { serials: Vec<String> },

    /// Explicit serial is not connected
    #[error("Device '{serial}' is not connected")]
    DeviceNotFound { serial: String },

    /// Explicit serial is connected but not usable
    #[error("Device '{serial}' is not ready (state: {state})")]
    DeviceNotReady { serial: String, state: String },

    /// The device refused the install
    #[error("Installation on '{serial}' failed: {output}")]
    InstallRejected { serial: String, output: String },

    /// The install did not finish in time
    #[error("Installation on '{serial}' timed out after {}s", timeout.as_secs())]
    Timeout { serial: String, timeout: Duration },
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: String, error: String },
}

/// Top-level xapk error type
#[derive(Error, Debug)]
pub enum XapkError {
    /// Archive error
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Device error
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Config error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Scratch directory could not be created
    #[error("Failed to create staging directory: {source}")]
    Staging { source: std::io::Error },
}
