//! Core business logic module
//!
//! # Submodules
//!
//! - [`document`] - Path lookups over untyped JSON documents
//! - [`manifest`] - XAPK manifest parsing
//! - [`extract`] - Split extraction into a staging directory
//! - [`install`] - Install orchestration and the device bridge interface
//! - [`settings`] - User settings (`config.toml`)

pub mod document;
pub mod extract;
pub mod install;
pub mod manifest;
pub mod settings;
