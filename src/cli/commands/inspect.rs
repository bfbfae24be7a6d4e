//! CLI command implementation for `xapk inspect`

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::cli::output::{status, OutputConfig};
use crate::core::extract::XapkArchive;
use crate::core::manifest::SplitEntry;

/// One split as reported by `inspect`
#[derive(Debug, Serialize)]
struct SplitReport<'a> {
    #[serde(flatten)]
    entry: &'a SplitEntry,
    present: bool,
}

#[derive(Debug, Serialize)]
struct InspectReport<'a> {
    package_name: &'a str,
    splits: Vec<SplitReport<'a>>,
}

/// Execute the inspect command
pub fn execute(archive_path: &Path, output: &OutputConfig) -> Result<()> {
    let mut archive = XapkArchive::open(archive_path)
        .with_context(|| format!("Failed to inspect {}", archive_path.display()))?;
    let descriptor = archive
        .manifest()
        .with_context(|| format!("Failed to inspect {}", archive_path.display()))?;

    let report = InspectReport {
        package_name: &descriptor.package_name,
        splits: descriptor
            .splits
            .iter()
            .map(|entry| SplitReport {
                entry,
                present: !entry.archive_path.is_empty() && archive.contains(&entry.archive_path),
            })
            .collect(),
    };

    output.json(&report)?;

    output.line(&format!("Package: {}", report.package_name));
    output.line(&format!("Splits: {}", report.splits.len()));
    for split in &report.splits {
        let entry = split.entry;
        let line = if entry.archive_path.is_empty() {
            format!("  {} (no file, skipped)", entry.id)
        } else if split.present {
            format!("  {} {}", entry.id, entry.archive_path)
        } else {
            format!(
                "  {} {} {} missing from archive",
                status::WARNING,
                entry.id,
                entry.archive_path
            )
        };
        output.line(&line);
    }

    Ok(())
}
