//! Split extraction
//!
//! Copies the APK entries named by a [`PackageDescriptor`] out of the XAPK
//! into a staging directory, producing the ordered list of files to install.

use std::fs::{self, File};
use std::io::{self, Read, Seek, Write};
use std::path::{Component, Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

use super::manifest::{read_manifest, PackageDescriptor};
use crate::error::ArchiveError;

/// An opened XAPK archive
///
/// The underlying file handle is released when this value is dropped.
pub struct XapkArchive<R = File> {
    archive: ZipArchive<R>,
}

impl XapkArchive<File> {
    /// Open an XAPK from disk
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let archive = ZipArchive::new(file).map_err(|source| ArchiveError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { archive })
    }
}

impl<R: Read + Seek> XapkArchive<R> {
    /// Wrap an already opened zip archive
    pub fn from_zip(archive: ZipArchive<R>) -> Self {
        Self { archive }
    }

    /// Whether the archive has an entry called `name`
    pub fn contains(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read the package manifest
    pub fn manifest(&mut self) -> Result<PackageDescriptor, ArchiveError> {
        read_manifest(&mut self.archive)
    }

    /// Extract every installable split into `output_dir`
    ///
    /// Files are written under their archive names, replacing anything
    /// already there. Splits with an empty file name are skipped. The first
    /// missing or unsafe entry aborts extraction; files written before it are
    /// left in place.
    pub fn extract_splits(
        &mut self,
        descriptor: &PackageDescriptor,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, ArchiveError> {
        let mut paths = Vec::new();

        for split in descriptor.installable_splits() {
            let name = split.archive_path.as_str();
            validate_entry_name(name)?;

            let mut entry = self.archive.by_name(name).map_err(|e| match e {
                ZipError::FileNotFound => ArchiveError::SplitMissing {
                    file: name.to_string(),
                },
                source => ArchiveError::Entry {
                    name: name.to_string(),
                    source,
                },
            })?;

            let dest = output_dir.join(name);
            copy_entry(&mut entry, &dest)?;
            tracing::debug!("Extracted split '{}' to {}", split.id, dest.display());
            paths.push(dest);
        }

        Ok(paths)
    }
}

/// Open `archive_path`, read its manifest and extract its splits
///
/// The archive is closed before this returns.
pub fn stage_splits(
    archive_path: &Path,
    output_dir: &Path,
) -> Result<(PackageDescriptor, Vec<PathBuf>), ArchiveError> {
    let mut archive = XapkArchive::open(archive_path)?;
    let descriptor = archive.manifest()?;
    let paths = archive.extract_splits(&descriptor, output_dir)?;
    Ok((descriptor, paths))
}

fn copy_entry(reader: &mut impl Read, dest: &Path) -> Result<(), ArchiveError> {
    let io_err = |source: io::Error| ArchiveError::Io {
        path: dest.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut file = File::create(dest).map_err(io_err)?;
    io::copy(reader, &mut file).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    Ok(())
}

/// Reject entry names that would escape the output directory
fn validate_entry_name(name: &str) -> Result<(), ArchiveError> {
    let path = Path::new(name);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });

    if escapes {
        return Err(ArchiveError::UnsafeEntryPath {
            file: name.to_string(),
        });
    }
    Ok(())
}
