//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests: a scratch
//! workspace, XAPK fixture builders and a scripted stand-in for adb.

#![allow(dead_code)]

use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Shell script that impersonates adb
///
/// Every invocation is appended to `adb.log` next to the script. `devices`
/// prints `$FAKE_ADB_DEVICES` under the usual header. Install calls log
/// `staged <name>` for each APK argument that exists on disk, then fail if
/// `$FAKE_ADB_INSTALL_FAILURE` is set.
pub const FAKE_ADB: &str = r#"#!/bin/sh
log="$(dirname "$0")/adb.log"
echo "$*" >> "$log"
case "$1" in
  start-server) exit 0 ;;
  devices)
    echo "List of devices attached"
    printf '%s' "${FAKE_ADB_DEVICES:-}"
    exit 0 ;;
esac
for arg in "$@"; do
  case "$arg" in
    *.apk) if [ -f "$arg" ]; then echo "staged $(basename "$arg")" >> "$log"; fi ;;
  esac
done
if [ -n "$FAKE_ADB_INSTALL_FAILURE" ]; then
  echo "Failure [$FAKE_ADB_INSTALL_FAILURE]"
  exit 1
fi
echo "Success"
"#;

/// Test workspace context
///
/// Creates a temporary directory holding fixture archives, an isolated
/// config directory and (on request) a fake adb.
pub struct TestWorkspace {
    /// Temporary directory for the test
    pub dir: TempDir,
}

impl TestWorkspace {
    /// Create a new workspace in a temporary directory
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        dir.child("config").create_dir_all().expect("Failed to create config dir");
        Self { dir }
    }

    /// Get the path to the workspace directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Write an XAPK built from `(name, contents)` entries
    pub fn create_xapk(&self, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
        let child = self.dir.child(name);
        child
            .write_binary(&build_archive(entries))
            .expect("Failed to write archive");
        child.path().to_path_buf()
    }

    /// Write the user settings file
    pub fn write_config(&self, content: &str) {
        self.dir
            .child("config/config.toml")
            .write_str(content)
            .expect("Failed to write config");
    }

    /// Install the fake adb script and return its path
    #[cfg(unix)]
    pub fn install_fake_adb(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        self.dir
            .child("sdk/platform-tools")
            .create_dir_all()
            .expect("Failed to create platform-tools");
        let adb = self.dir.child("sdk/platform-tools/adb");
        adb.write_str(FAKE_ADB).expect("Failed to write fake adb");
        std::fs::set_permissions(adb.path(), std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake adb executable");
        adb.path().to_path_buf()
    }

    /// Lines the fake adb logged so far
    pub fn adb_log(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("sdk/platform-tools/adb.log"))
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    /// Build a command for the xapk binary with an isolated environment
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_xapk"));
        cmd.current_dir(self.dir.path());
        cmd.env("XAPK_CONFIG_DIR", self.dir.path().join("config"));
        cmd.env_remove("ANDROID_SERIAL");
        cmd.env_remove("ANDROID_HOME");
        cmd.env_remove("RUST_LOG");
        cmd.env_remove("FAKE_ADB_DEVICES");
        cmd.env_remove("FAKE_ADB_INSTALL_FAILURE");
        cmd
    }

    /// Run the xapk binary with `args`
    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute xapk")
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an in-memory zip from `(name, contents)` pairs, in order
pub fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer.write_all(contents).expect("Failed to write zip entry");
    }
    writer
        .finish()
        .expect("Failed to finish zip archive")
        .into_inner()
}

/// Two-split manifest used by most scenarios
pub const TWO_SPLIT_MANIFEST: &str = r#"{"package_name":"com.example.app","split_apks":[{"id":"base","file":"base.apk"},{"id":"config.en","file":"config.en.apk"}]}"#;

/// Write the standard two-split XAPK
pub fn two_split_xapk(workspace: &TestWorkspace) -> PathBuf {
    workspace.create_xapk(
        "app.xapk",
        &[
            ("manifest.json", TWO_SPLIT_MANIFEST.as_bytes()),
            ("base.apk", b"base apk bytes"),
            ("config.en.apk", b"config apk bytes"),
            ("icon.png", b"png"),
        ],
    )
}

/// Device listing in `adb devices` format
pub fn device_list(devices: &[(&str, &str)]) -> String {
    devices
        .iter()
        .map(|(serial, state)| format!("{serial}\t{state}\n"))
        .collect()
}

/// Lossy stdout
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Lossy stderr
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Path as a `&str` for argument lists
pub fn arg(path: &Path) -> &str {
    path.to_str().expect("Test paths are UTF-8")
}
