//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying progress spinners,
//! status-prefixed messages and errors to the user.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use tracing_subscriber::EnvFilter;

/// Spinner currently drawn on stderr, if any
static ACTIVE_SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn set_active_spinner(spinner: Option<ProgressBar>) {
    *ACTIVE_SPINNER
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = spinner;
}

/// stderr writer for log lines
///
/// While a [`Spinner`] is running the line is printed with the spinner
/// suspended, so the two never share a terminal row.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let active = ACTIVE_SPINNER
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match active {
            Some(spinner) => spinner.suspend(|| io::stderr().write_all(buf))?,
            None => io::stderr().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// A running spinner, cleared when finished or dropped
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    fn start(bar: ProgressBar) -> Self {
        set_active_spinner(Some(bar.clone()));
        Self { bar }
    }

    /// Whether the spinner draws anything
    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    /// Stop and erase the spinner
    pub fn finish_and_clear(self) {
        drop(self);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
        set_active_spinner(None);
    }
}

/// How the user asked output to look
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Suppress everything but errors
    pub quiet: bool,
    /// Machine-readable output on stdout
    pub json: bool,
    /// Verbosity level (0 = default, 1 = info, 2+ = debug)
    pub verbose: u8,
}

impl OutputConfig {
    /// Create an output configuration from the global flags
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Log filter for these flags; `RUST_LOG` takes precedence when set
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }

    fn default_directive(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn,xapk=info",
            1 => "info",
            _ => "debug",
        }
    }

    /// Install the tracing subscriber
    pub fn init_tracing(&self) {
        tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(LogWriter::default)
            .with_target(false)
            .without_time()
            .init();
    }

    /// Spinner for a long-running step, hidden in quiet or JSON mode
    ///
    /// Log lines emitted while it runs are printed above it.
    pub fn spinner(&self, message: &str) -> Spinner {
        if self.quiet || self.json {
            return Spinner::start(ProgressBar::hidden());
        }
        Spinner::start(create_spinner(message))
    }

    /// Print a success line (suppressed in quiet and JSON mode)
    pub fn success(&self, message: &str) {
        if !self.quiet && !self.json {
            println!("{} {}", status::SUCCESS, message);
        }
    }

    /// Print a plain line (suppressed in quiet and JSON mode)
    pub fn line(&self, message: &str) {
        if !self.quiet && !self.json {
            println!("{message}");
        }
    }

    /// Print `value` as pretty JSON when JSON output is on
    pub fn json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        Ok(())
    }
}

/// Create a spinner for operations with unknown duration
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Print an error and its causes to stderr
///
/// Causes already spelled out in the message above them are not repeated.
pub fn display_error(error: &anyhow::Error) {
    let mut shown = error.to_string();
    eprintln!("{} Error: {}", status::ERROR, shown);

    for cause in error.chain().skip(1) {
        let text = cause.to_string();
        if shown.contains(&text) {
            continue;
        }
        eprintln!("  caused by: {text}");
        shown = text;
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";
}
