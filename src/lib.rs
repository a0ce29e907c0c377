#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Line widths and byte counters are bounded
#![allow(clippy::float_arithmetic)] // Required for scaled sizes and percentages
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # scmls - Directory Listing with Version-Control Status
//!
//! `sls` lists directories the way a classic `dir` listing does, annotated
//! with the working-copy status reported by Subversion, Mercurial or Git,
//! per-file descriptions from `descript.ion`, and symbolic link targets.
//!
//! ## Features
//!
//! - **SCM status**: the nearest `.svn`, `.hg` or `.git` ancestor selects the
//!   backend; its status output is normalized into one table, renames included
//! - **Descriptions**: `descript.ion` files, cached per directory
//! - **Layout**: timestamp, size, attribute letters, elided names and a
//!   dashed leader to right-aligned metadata
//! - **Paging**: an interactive pause after every screen
//!
//! ## Architecture
//!
//! - [`scm`]: Manager detection and status parsing
//! - [`scanner`]: Directory enumeration, attributes and sorting
//! - [`meta`]: Description sources
//! - [`layout`]: Width budgets, elision and leaders
//! - [`output`]: Coloring and line rendering
//! - [`commands`]: The listing driver and configuration updates
//! - [`config`]: Configuration parsing and validation
//! - [`utils`]: Terminal, partition, formatting and pager helpers
//!
//! ## Example Usage
//!
//! ```no_run
//! use clap::Parser;
//! use scmls::ListingContext;
//! use scmls::cli::Cli;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = ListingContext::new()?;
//! let cli = Cli::parse_from(["sls", "src"]);
//! scmls::commands::list::execute(&ctx, &cli)?;
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Listing driver and configuration updates.
pub mod commands;

/// Configuration parsing, validation, and management.
pub mod config;

/// Name budgets, elision and metadata leaders.
pub mod layout;

/// Per-entry description sources.
pub mod meta;

/// Line rendering, colors and diagnostics.
pub mod output;

/// Directory enumeration, attributes and sorting.
pub mod scanner;

/// Version-control detection and status normalization.
pub mod scm;

/// Utility functions and helpers.
pub mod utils;

#[cfg(test)]
mod test_utils;

use anyhow::Result;
use std::path::PathBuf;

/// Current version of the sls binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Settings shared by every listing task.
///
/// # Fields
///
/// - `config_path`: Path to the configuration file
/// - `config`: Loaded configuration settings
/// - `no_pager`: Whether to disable the interactive pager
/// - `non_interactive`: Never wait on the terminal
///
/// # Examples
///
/// ```no_run
/// use scmls::ListingContext;
///
/// # fn main() -> anyhow::Result<()> {
/// // Context with the default configuration path
/// let ctx = ListingContext::new()?;
///
/// // Context with a custom configuration (for testing)
/// let ctx = ListingContext::new_explicit("/tmp/sls/config.toml".into())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ListingContext {
    /// Path to the configuration file.
    pub config_path: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,

    /// Whether to disable the interactive pager.
    pub no_pager: bool,

    /// Whether to run in non-interactive mode (no key reads).
    /// Used primarily for testing to prevent stdin reads.
    pub non_interactive: bool,
}

impl ListingContext {
    /// Creates a context by loading the configuration from the default path.
    ///
    /// Unknown configuration fields are reported as warnings.
    ///
    /// # Errors
    /// Returns an error if the configuration directory cannot be determined
    /// or the configuration file cannot be parsed.
    pub fn new() -> Result<Self> {
        let config_path = config::Config::default_path()?;
        let config = config::Config::load(&config_path)?;

        let validator = config::validator::ConfigValidator::new();
        if let Err(e) = validator.validate_config_file(&config_path) {
            output::warning(&format!("Configuration validation failed: {e}"));
        }

        Ok(Self {
            config_path,
            config,
            no_pager: false,
            non_interactive: false,
        })
    }

    /// Creates a context with an explicit configuration path and the pager
    /// disabled.
    ///
    /// # Errors
    /// Returns an error if the configuration file cannot be parsed.
    pub fn new_explicit(config_path: PathBuf) -> Result<Self> {
        let config = config::Config::load(&config_path)?;
        Ok(Self {
            config_path,
            config,
            no_pager: true,
            non_interactive: true,
        })
    }

    /// Creates a context around an in-memory configuration.
    #[must_use]
    pub fn with_config(config: config::Config) -> Self {
        Self {
            config_path: PathBuf::new(),
            config,
            no_pager: false,
            non_interactive: false,
        }
    }
}
