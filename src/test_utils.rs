//! Test utilities
//!
//! Proptest generators, fixture archive builders and a recording
//! [`DeviceBridge`] stand-in.

use std::cell::RefCell;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use crate::core::install::{DeviceBridge, DeviceInfo, InstallOptions, TargetSelection};
use crate::error::DeviceError;
use crate::infra::adb::select_from;

pub mod generators {
    use proptest::prelude::*;
    use serde_json::Value;

    /// Generate an arbitrary JSON document with short, colliding keys
    pub fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            (-1.0e6f64..1.0e6).prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                proptest::collection::btree_map("[a-c]", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
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

/// Manifest JSON for a package and its `(id, file)` splits
pub fn manifest_json(package_name: &str, splits: &[(&str, &str)]) -> String {
    let splits: Vec<_> = splits
        .iter()
        .map(|(id, file)| serde_json::json!({ "id": id, "file": file }))
        .collect();
    serde_json::json!({ "package_name": package_name, "split_apks": splits }).to_string()
}

/// A call made on [`MockBridge`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    Init(PathBuf),
    Devices,
    Select(TargetSelection),
    Install(String),
}

/// An install call recorded by [`MockBridge`]
#[derive(Debug, Clone)]
pub struct RecordedInstall {
    pub serial: String,
    pub apks: Vec<PathBuf>,
    pub options: InstallOptions,
    /// Whether every staged file was on disk when the install ran
    pub staged_files_existed: bool,
}

/// Recording device bridge with a fixed device list
#[derive(Debug, Default)]
pub struct MockBridge {
    devices: Vec<DeviceInfo>,
    reject_installs: bool,
    calls: RefCell<Vec<BridgeCall>>,
    installs: RefCell<Vec<RecordedInstall>>,
}

impl MockBridge {
    /// Bridge with these serials connected and online
    pub fn with_devices(serials: &[&str]) -> Self {
        Self {
            devices: serials
                .iter()
                .map(|s| DeviceInfo {
                    serial: (*s).to_string(),
                    state: "device".to_string(),
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Make every install call fail
    pub fn rejecting_installs(mut self) -> Self {
        self.reject_installs = true;
        self
    }

    pub fn calls(&self) -> Vec<BridgeCall> {
        self.calls.borrow().clone()
    }

    pub fn installs(&self) -> Vec<RecordedInstall> {
        self.installs.borrow().clone()
    }
}

impl DeviceBridge for MockBridge {
    async fn init(&mut self, adb_path: &Path) -> Result<(), DeviceError> {
        self.calls
            .borrow_mut()
            .push(BridgeCall::Init(adb_path.to_path_buf()));
        Ok(())
    }

    async fn devices(&self) -> Result<Vec<DeviceInfo>, DeviceError> {
        self.calls.borrow_mut().push(BridgeCall::Devices);
        Ok(self.devices.clone())
    }

    async fn select_device(&self, target: &TargetSelection) -> Result<DeviceInfo, DeviceError> {
        self.calls
            .borrow_mut()
            .push(BridgeCall::Select(target.clone()));
        select_from(&self.devices, target)
    }

    async fn install_apks(
        &self,
        device: &DeviceInfo,
        apks: &[PathBuf],
        options: &InstallOptions,
    ) -> Result<(), DeviceError> {
        self.calls
            .borrow_mut()
            .push(BridgeCall::Install(device.serial.clone()));
        self.installs.borrow_mut().push(RecordedInstall {
            serial: device.serial.clone(),
            apks: apks.to_vec(),
            options: *options,
            staged_files_existed: apks.iter().all(|p| p.is_file()),
        });

        if self.reject_installs {
            return Err(DeviceError::InstallRejected {
                serial: device.serial.clone(),
                output: "Failure [INSTALL_FAILED_UPDATE_INCOMPATIBLE]".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_manifest_json_shape() {
        let json = manifest_json("com.example.app", &[("base", "base.apk")]);
        assert_eq!(
            json,
            r#"{"package_name":"com.example.app","split_apks":[{"id":"base","file":"base.apk"}]}"#
        );
    }

    #[test]
    fn test_build_archive_preserves_entries() {
        let bytes = build_archive(&[("a.apk", b"a"), ("dir/b.apk", b"bb")]);
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<_> = archive.file_names().collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"dir/b.apk"));
    }

    proptest! {
        #[test]
        fn test_json_value_generator_serializes(doc in json_value()) {
            let text = serde_json::to_string(&doc).unwrap();
            prop_assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
        }
    }
}
