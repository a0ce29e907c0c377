//! Terminal, filesystem and formatting helpers.
//!
//! # Submodules
//!
//! - [`formatters`]: Size, count and timestamp formatting
//! - [`pager`]: Interactive line pager

/// Size, count and timestamp formatting
pub mod formatters;
/// Interactive line pager
pub mod pager;

use anyhow::{Context, Result};
use crossterm::tty::IsTty;
use std::io;
use std::path::Path;
use tracing::debug;

/// Rows assumed when the terminal size cannot be queried.
pub const FALLBACK_ROWS: usize = 24;

/// Columns assumed when the terminal size cannot be queried.
pub const FALLBACK_COLS: usize = 80;

/// Terminal size as `(rows, cols)`, falling back to 24x80.
#[must_use]
pub fn terminal_dimensions() -> (usize, usize) {
    match crossterm::terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => (usize::from(rows), usize::from(cols)),
        Ok(_) | Err(_) => {
            debug!("Terminal size unavailable, using {FALLBACK_ROWS}x{FALLBACK_COLS}");
            (FALLBACK_ROWS, FALLBACK_COLS)
        }
    }
}

/// Whether ANSI colors should be emitted on stdout.
#[must_use]
pub fn color_capable() -> bool {
    std::env::var_os("NO_COLOR").is_none() && io::stdout().is_tty()
}

/// Space figures of the partition holding a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartitionInfo {
    /// Bytes available to the current user.
    pub available_bytes: u64,
    /// Size of the partition.
    pub total_bytes: u64,
    /// Allocation unit used to round file sizes.
    pub allocation_granularity: u64,
}

impl PartitionInfo {
    /// Queries the partition containing `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the filesystem statistics cannot be read.
    pub fn for_path(path: &Path) -> Result<Self> {
        let stats = fs4::statvfs(path)
            .with_context(|| format!("Failed to query free space for {}", path.display()))?;

        Ok(Self {
            available_bytes: stats.available_space(),
            total_bytes: stats.total_space(),
            allocation_granularity: stats.allocation_granularity(),
        })
    }

    /// Available space as a percentage of the partition size.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn available_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.available_bytes as f64 / self.total_bytes as f64 * 100.0
    }
}
