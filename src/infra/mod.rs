//! Infrastructure layer
//!
//! Handles the side effects that live outside the archive: the adb
//! subprocess, SDK tool lookup, and platform directories.

pub mod adb;
pub mod dirs;
pub mod sdk_tools;
