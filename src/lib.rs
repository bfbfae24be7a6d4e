//! xapk - Install XAPK split-package archives onto Android devices
//!
//! An XAPK is a zip holding a base APK, its split APKs and a
//! `manifest.json` naming them. This crate reads the manifest, stages the
//! splits in a scratch directory and installs them in one adb call.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Manifest, extraction and install orchestration
//! - [`infra`] - Infrastructure layer (adb subprocess, SDK lookup, directories)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
