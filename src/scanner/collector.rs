use super::attributes::{AttributeAdapter, AttributeFlags, DirectoryEntry, NativeAttributes};
use anyhow::{Context, Result};
use glob::Pattern;
use std::path::Path;
use tracing::{Level, debug, span, trace};

/// Visibility filters applied after pattern matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectOptions {
    /// Drop entries carrying [`AttributeFlags::HIDDEN`].
    pub hide_hidden: bool,
    /// Drop entries carrying [`AttributeFlags::SYSTEM`].
    pub hide_system: bool,
}

/// Entries of one directory, partitioned by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    /// Non-directory entries in enumeration order.
    pub files: Vec<DirectoryEntry>,
    /// Directory entries in enumeration order.
    pub dirs: Vec<DirectoryEntry>,
    /// Sum of file sizes.
    pub file_bytes: u64,
    /// Sum of file sizes rounded up to the allocation granularity.
    pub allocated_bytes: u64,
}

impl Collected {
    /// Bytes allocated beyond the files' actual sizes.
    #[must_use]
    pub const fn slack_bytes(&self) -> u64 {
        self.allocated_bytes.saturating_sub(self.file_bytes)
    }
}

/// Enumerates a directory and filters it by patterns and visibility.
#[derive(Debug, Clone, Default)]
pub struct EntryCollector<A = NativeAttributes> {
    /// Source of entry names and attributes.
    adapter: A,
    /// Visibility filters.
    options: CollectOptions,
}

impl EntryCollector<NativeAttributes> {
    /// Collector over the real filesystem.
    #[must_use]
    pub const fn new(options: CollectOptions) -> Self {
        Self {
            adapter: NativeAttributes,
            options,
        }
    }
}

impl<A: AttributeAdapter> EntryCollector<A> {
    /// Collector over a custom attribute adapter.
    pub const fn with_adapter(adapter: A, options: CollectOptions) -> Self {
        Self { adapter, options }
    }

    /// Collects the entries of `directory` matching any of `patterns`.
    ///
    /// `allocation_granularity` is the filesystem's allocation unit used to
    /// compute [`Collected::allocated_bytes`]; 0 leaves it at 0.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid, the directory cannot be
    /// read, or a matched entry cannot be inspected.
    pub fn collect(
        &self,
        directory: &Path,
        patterns: &[String],
        allocation_granularity: u64,
    ) -> Result<Collected> {
        let span = span!(
            Level::DEBUG,
            "collect_entries",
            directory = %directory.display(),
            ?patterns
        );
        let _guard = span.enter();

        let compiled = compile_patterns(patterns)?;
        let names = self.adapter.list_directory(directory)?;

        let mut collected = Collected::default();
        for name in names {
            if !compiled.iter().any(|p| p.matches(&name)) {
                continue;
            }

            let entry = self.adapter.stat_entry(&directory.join(&name))?;
            if self.is_filtered(entry.attributes) {
                trace!(name, "Filtered by visibility");
                continue;
            }

            if entry.is_directory {
                collected.dirs.push(entry);
            } else {
                collected.file_bytes = collected.file_bytes.saturating_add(entry.size_bytes);
                collected.allocated_bytes = collected
                    .allocated_bytes
                    .saturating_add(allocated_size(entry.size_bytes, allocation_granularity));
                collected.files.push(entry);
            }
        }

        debug!(
            files = collected.files.len(),
            dirs = collected.dirs.len(),
            bytes = collected.file_bytes,
            "Directory collected"
        );
        Ok(collected)
    }

    fn is_filtered(&self, attributes: AttributeFlags) -> bool {
        (self.options.hide_hidden && attributes.contains(AttributeFlags::HIDDEN))
            || (self.options.hide_system && attributes.contains(AttributeFlags::SYSTEM))
    }
}

/// Compiles shell-style patterns, failing on the first invalid one.
///
/// # Errors
///
/// Returns an error naming the first pattern that does not parse.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid pattern: {p}")))
        .collect()
}

/// Rounds `size` up to a multiple of `granularity`.
#[must_use]
pub const fn allocated_size(size: u64, granularity: u64) -> u64 {
    if granularity == 0 {
        return 0;
    }
    size.div_ceil(granularity).saturating_mul(granularity)
}
