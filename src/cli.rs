//! Command-line interface definitions for sls.
//!
//! The argument structure is shared between the main binary and build tools
//! (like xtask) for man page generation.
//!
//! Note: Field-level documentation is provided via clap attributes, so we
//! allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use crate::config::FormatConfig;
use crate::scanner::SortOrder;
use clap::Parser;
use clap_complete::Shell;

/// Main CLI structure for sls.
#[derive(Parser, Debug)]
#[command(
    name = "sls",
    version = crate::VERSION,
    about = "Directory listing with version-control status and file descriptions",
    long_about = "Lists directories with svn/hg/git status codes, descript.ion descriptions, \
                  symlink targets and an interactive pager"
)]
pub struct Cli {
    /// Directories or file patterns to list (default: current directory)
    pub paths: Vec<String>,

    /// List files before directories
    #[arg(short = 'F', long)]
    pub file_first: bool,

    /// Hide hidden entries
    #[arg(short = 'H', long)]
    pub hide_hidden: bool,

    /// Hide system entries
    #[arg(short = 'S', long)]
    pub hide_system: bool,

    /// Do not show symbolic link targets
    #[arg(short = 'L', long)]
    pub hide_links: bool,

    /// Do not show file descriptions
    #[arg(short = 'D', long)]
    pub hide_metadata: bool,

    /// Show sizes as exact byte counts
    #[arg(short = 'x', long)]
    pub expand_sizes: bool,

    /// Sort by modification time, oldest first
    #[arg(short = 'm', long)]
    pub ascending: bool,

    /// Sort by modification time, newest first
    #[arg(short = 'M', long)]
    pub descending: bool,

    /// Persist a setting (`key=value` or `key:value`) and exit
    #[arg(long = "config", value_name = "KEY=VALUE", value_parser = parse_setting)]
    pub settings: Vec<(String, String)>,

    /// Disable the interactive pager
    #[arg(long, help = "Disable pager output")]
    pub no_pager: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Sort order requested by the flags.
    #[must_use]
    pub const fn sort_order(&self, format: &FormatConfig) -> SortOrder {
        SortOrder::from_flags(self.ascending, self.descending, self.file_first || format.file_first)
    }

    /// Folds the display switches into the configured format; flags only
    /// ever turn options on.
    pub fn apply_to(&self, format: &mut FormatConfig) {
        format.file_first |= self.file_first;
        format.hide_hidden |= self.hide_hidden;
        format.hide_system |= self.hide_system;
        format.hide_links |= self.hide_links;
        format.hide_metadata |= self.hide_metadata;
        if self.expand_sizes {
            format.compact_sizes = false;
        }
    }
}

/// Splits `key=value` or `key:value`.
fn parse_setting(raw: &str) -> Result<(String, String), String> {
    let split = match (raw.find('='), raw.find(':')) {
        (Some(eq), Some(colon)) => eq.min(colon),
        (Some(at), None) | (None, Some(at)) => at,
        (None, None) => return Err(format!("expected key=value, got '{raw}'")),
    };

    let key = raw[..split].trim();
    let value = raw[split + 1..].trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
