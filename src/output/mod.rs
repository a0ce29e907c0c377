//! Listing rendering and diagnostic output for sls.
//!
//! This module provides:
//! - Category colors resolved from configuration ([`theme`])
//! - Entry, summary and deleted-section lines ([`render`])
//! - Verbosity-aware diagnostics on stderr (quiet, normal, verbose)

pub mod render;
pub mod theme;

use colored::Colorize;
use std::sync::atomic::{AtomicU8, Ordering};

pub use render::{RenderOptions, RenderedLine, Renderer, SummaryStats};
pub use theme::{Category, Style, Theme};

/// Verbosity level for diagnostic messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Only warnings and errors.
    Quiet = 0,
    /// Default level.
    Normal = 1,
    /// Also show verbose messages.
    Verbose = 2,
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Prints a success message in green (respects quiet mode).
pub fn success(message: &str) {
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    eprintln!("{}", message.green());
}

/// Prints an error behind a bold red `Error:` (always shown).
pub fn error(message: &str) {
    eprintln!("{} {message}", "Error:".red().bold());
}

/// Prints a warning behind a bold yellow `Warning:` (always shown).
pub fn warning(message: &str) {
    eprintln!("{} {message}", "Warning:".yellow().bold());
}

/// Prints a verbose message (only in verbose mode).
pub fn verbose(message: &str) {
    if get_verbosity() != Verbosity::Verbose {
        return;
    }
    eprintln!("{}", message.dimmed());
}
