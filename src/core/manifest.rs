//! XAPK manifest parsing
//!
//! An XAPK carries a `manifest.json` at the archive root naming the package
//! and the split APK entries that make up one installation.

use serde::Serialize;
use serde_json::Value;
use std::io::{Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

use super::document::{get_list, get_str};
use crate::error::ArchiveError;

/// Name of the manifest entry inside every XAPK
pub const MANIFEST_NAME: &str = "manifest.json";

/// One split listed in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitEntry {
    /// Split identifier (`base`, `config.en`, ...)
    pub id: String,
    /// Entry name of the split's APK inside the archive; may be empty
    #[serde(rename = "file")]
    pub archive_path: String,
}

/// Package described by an XAPK manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    /// Application package name, used for messages only
    pub package_name: String,
    /// Splits in manifest order
    pub splits: Vec<SplitEntry>,
}

impl PackageDescriptor {
    /// Build a descriptor from a parsed manifest document
    ///
    /// Missing or mistyped fields fall back to empty values; this never fails.
    pub fn from_value(doc: &Value) -> Self {
        let package_name = get_str(doc, "", &["package_name"]).to_string();
        let splits = get_list(doc, &[], &["split_apks"])
            .iter()
            .map(|split| SplitEntry {
                id: get_str(split, "", &["id"]).to_string(),
                archive_path: get_str(split, "", &["file"]).to_string(),
            })
            .collect();

        Self {
            package_name,
            splits,
        }
    }

    /// Parse manifest bytes
    ///
    /// The top level must be a JSON object; fields below it are read
    /// leniently by [`Self::from_value`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArchiveError> {
        let doc: Value = serde_json::from_slice(bytes)
            .map_err(|source| ArchiveError::ManifestUnparseable { source })?;
        if !doc.is_object() {
            return Err(ArchiveError::ManifestNotObject {
                found: json_type_name(&doc),
            });
        }
        Ok(Self::from_value(&doc))
    }

    /// Splits that name a file to install
    ///
    /// Entries with an empty file name contribute nothing and are skipped.
    pub fn installable_splits(&self) -> impl Iterator<Item = &SplitEntry> {
        self.splits.iter().filter(|s| !s.archive_path.is_empty())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Locate and parse the manifest inside an opened archive
pub fn read_manifest<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<PackageDescriptor, ArchiveError> {
    let mut entry = archive.by_name(MANIFEST_NAME).map_err(|e| match e {
        ZipError::FileNotFound => ArchiveError::ManifestMissing {
            name: MANIFEST_NAME.to_string(),
        },
        source => ArchiveError::Entry {
            name: MANIFEST_NAME.to_string(),
            source,
        },
    })?;

    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|source| ArchiveError::Io {
            path: MANIFEST_NAME.into(),
            source,
        })?;

    let descriptor = PackageDescriptor::from_slice(&bytes)?;
    tracing::info!("Install package {}", descriptor.package_name);
    Ok(descriptor)
}
