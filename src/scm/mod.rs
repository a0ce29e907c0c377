//! Version-control status detection and normalization.
//!
//! A directory may be managed by Subversion, Mercurial or Git. The resolver
//! walks up from the directory looking for the manager's marker directory,
//! runs that manager's status command in the directory, and normalizes the
//! output into a [`ScmStatus`]:
//!
//! - [`ScmStatus::entries`] annotates entries that still exist on disk
//! - [`ScmStatus::deleted`] describes entries that were deleted or renamed
//!   away and therefore no longer show up in a directory scan
//!
//! Every status path is rolled up to its top-level component, so a change
//! inside `src/` is reported once, on `src/` itself.
//!
//! Resolution never fails: a missing executable or a failing status command
//! degrades to [`ScmManager::None`] and the listing goes on without SCM
//! columns.

/// Status command execution seam.
pub mod command;
/// Git porcelain status parsing.
pub mod git;
/// Mercurial status parsing.
pub mod mercurial;
/// Subversion status parsing.
pub mod subversion;

pub use command::{ProcessCommand, StatusCommand};

use bitflags::bitflags;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span, warn};

/// Version-control system managing a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScmManager {
    /// Not under version control (or the manager could not be queried).
    #[default]
    None,
    /// Subversion working copy (`.svn`).
    Subversion,
    /// Mercurial repository (`.hg`).
    Mercurial,
    /// Git repository or worktree (`.git`).
    Git,
}

impl ScmManager {
    /// Managers in detection priority order.
    pub const DETECTION_ORDER: [Self; 3] = [Self::Subversion, Self::Mercurial, Self::Git];

    /// Name of the marker entry identifying a managed directory.
    #[must_use]
    pub const fn marker(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Subversion => Some(".svn"),
            Self::Mercurial => Some(".hg"),
            Self::Git => Some(".git"),
        }
    }

    /// Executable used to query status.
    #[must_use]
    pub const fn program(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Subversion => Some("svn"),
            Self::Mercurial => Some("hg"),
            Self::Git => Some("git"),
        }
    }

    /// Arguments for a quiet, non-recursive status of the current directory.
    #[must_use]
    pub const fn status_args(self) -> &'static [&'static str] {
        match self {
            Self::None => &[],
            Self::Subversion => &["status", "-q", "."],
            Self::Mercurial => &["status", "-C", "-q", "."],
            Self::Git => &["status", "--porcelain", "-uno", "."],
        }
    }
}

impl fmt::Display for ScmManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Subversion => "subversion",
            Self::Mercurial => "mercurial",
            Self::Git => "git",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Normalized change state of a status entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StatusBits: u8 {
        /// Removed from the working copy.
        const DELETED = 1 << 0;
        /// Moved here from another path.
        const RENAMED = 1 << 1;
        /// Scheduled for addition.
        const ADDED = 1 << 2;
        /// Content changed.
        const MODIFIED = 1 << 3;
    }
}

/// Normalized status of a single path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScmEntry {
    /// Status codes as displayed in the SCM column.
    pub codes: String,
    /// Normalized change bits.
    pub bits: StatusBits,
    /// Path this entry was tracked under before a rename.
    pub renamed_from: Option<String>,
}

impl ScmEntry {
    /// Creates an entry with the given codes and bits.
    #[must_use]
    pub fn new(codes: impl Into<String>, bits: StatusBits) -> Self {
        Self {
            codes: codes.into(),
            bits,
            renamed_from: None,
        }
    }

    /// Creates a rename record pointing back at the original path.
    #[must_use]
    pub fn renamed(codes: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            codes: codes.into(),
            bits: StatusBits::RENAMED,
            renamed_from: Some(original.into()),
        }
    }
}

/// Normalized status table for one directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScmStatus {
    /// Detected manager.
    pub manager: ScmManager,
    /// Longest status code seen, used to align the SCM column.
    pub code_column_width: usize,
    /// Status of entries present on disk, keyed by top-level name.
    pub entries: BTreeMap<String, ScmEntry>,
    /// Deleted or renamed-away entries, keyed by current (or target) name.
    pub deleted: BTreeMap<String, ScmEntry>,
}

impl ScmStatus {
    /// Empty status for the given manager.
    #[must_use]
    pub fn empty(manager: ScmManager) -> Self {
        Self {
            manager,
            ..Self::default()
        }
    }

    /// Whether listing lines should reserve an SCM code column.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.entries.is_empty() || !self.deleted.is_empty()
    }

    /// Status of a live entry.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&ScmEntry> {
        self.entries.get(name)
    }

    /// Original name of a live entry that was renamed.
    #[must_use]
    pub fn renamed_from(&self, name: &str) -> Option<&str> {
        self.entries.get(name)?;
        self.deleted
            .get(name)
            .and_then(|e| e.renamed_from.as_deref())
            .filter(|original| !original.is_empty())
    }

    /// Deleted entries in key order, excluding rename records.
    pub fn deletions(&self) -> impl Iterator<Item = (&String, &ScmEntry)> {
        self.deleted
            .iter()
            .filter(|(_, e)| e.bits.contains(StatusBits::DELETED))
    }

    /// Raises the code column width to cover `codes`.
    pub(crate) fn observe_codes(&mut self, codes: &str) {
        self.code_column_width = self.code_column_width.max(codes.chars().count());
    }

    /// Records a live entry; entries without bits are dropped.
    pub(crate) fn insert_entry(&mut self, key: String, entry: ScmEntry) {
        if !entry.bits.is_empty() {
            self.entries.insert(key, entry);
        }
    }
}

/// Rolls a status path up to its top-level component.
///
/// `src/lib.rs` becomes `src/`; `README.md` is returned unchanged. Both `/`
/// and `\` are treated as separators.
#[must_use]
pub fn top_level_key(path: &str) -> String {
    let path = path.trim();
    match path.split_once(['/', '\\']) {
        Some((head, _)) => format!("{head}/"),
        None => path.to_string(),
    }
}

/// Finds the manager controlling `directory` by walking up to the root.
#[must_use]
pub fn detect_manager(directory: &Path) -> ScmManager {
    let start = absolute_path(directory);

    for ancestor in start.ancestors() {
        for manager in ScmManager::DETECTION_ORDER {
            if let Some(marker) = manager.marker()
                && ancestor.join(marker).exists()
            {
                debug!(%manager, root = %ancestor.display(), "SCM marker found");
                return manager;
            }
        }
    }

    ScmManager::None
}

fn absolute_path(directory: &Path) -> PathBuf {
    directory
        .canonicalize()
        .or_else(|_| std::path::absolute(directory))
        .unwrap_or_else(|_| directory.to_path_buf())
}

/// Parses status output for `manager` into a normalized table.
#[must_use]
pub fn parse_status(manager: ScmManager, output: &str) -> ScmStatus {
    match manager {
        ScmManager::None => ScmStatus::default(),
        ScmManager::Subversion => subversion::parse(output),
        ScmManager::Mercurial => mercurial::parse(output),
        ScmManager::Git => git::parse(output),
    }
}

/// Detects and queries the version-control system for a directory.
#[derive(Debug, Clone, Default)]
pub struct ScmStatusResolver<R = ProcessCommand> {
    /// Runs the manager's status command.
    runner: R,
}

impl ScmStatusResolver<ProcessCommand> {
    /// Creates a resolver that spawns the real VCS executables.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            runner: ProcessCommand,
        }
    }
}

impl<R: StatusCommand> ScmStatusResolver<R> {
    /// Creates a resolver with a custom status command runner.
    pub const fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// Resolves the SCM status of `directory`.
    ///
    /// Never fails: when no manager is found, or its status command cannot be
    /// run, an empty status with [`ScmManager::None`] is returned.
    pub fn resolve(&self, directory: &Path) -> ScmStatus {
        let span = span!(Level::DEBUG, "scm_resolve", directory = %directory.display());
        let _guard = span.enter();

        let manager = detect_manager(directory);
        if manager == ScmManager::None {
            debug!("Directory is not under version control");
            return ScmStatus::default();
        }

        match self.runner.run(manager, directory) {
            Ok(output) => {
                let status = parse_status(manager, &output);
                debug!(
                    %manager,
                    entries = status.entries.len(),
                    deleted = status.deleted.len(),
                    width = status.code_column_width,
                    "SCM status parsed"
                );
                status
            }
            Err(e) => {
                warn!(%manager, error = %e, "SCM status unavailable, listing without it");
                ScmStatus::default()
            }
        }
    }
}
