use super::attributes::DirectoryEntry;
use super::collector::Collected;
use std::borrow::Borrow;

/// Order in which a directory's entries are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Collection order, directories and files grouped.
    Grouped {
        /// List files before directories.
        files_first: bool,
    },
    /// By modification time.
    Modified {
        /// Oldest first when true, newest first otherwise.
        ascending: bool,
    },
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Grouped { files_first: false }
    }
}

impl SortOrder {
    /// Picks the order from the sort switches; ascending wins if both are set.
    #[must_use]
    pub const fn from_flags(ascending: bool, descending: bool, files_first: bool) -> Self {
        if ascending {
            Self::Modified { ascending: true }
        } else if descending {
            Self::Modified { ascending: false }
        } else {
            Self::Grouped { files_first }
        }
    }

    /// Whether entries keep their grouped collection order.
    #[must_use]
    pub const fn is_grouped(self) -> bool {
        matches!(self, Self::Grouped { .. })
    }
}

/// Sorts entries by modification time; ties keep no particular order.
#[must_use]
pub fn sort_by_modified<E: Borrow<DirectoryEntry>>(mut entries: Vec<E>, ascending: bool) -> Vec<E> {
    if ascending {
        entries.sort_unstable_by(|a, b| a.borrow().modified_at.cmp(&b.borrow().modified_at));
    } else {
        entries.sort_unstable_by(|a, b| b.borrow().modified_at.cmp(&a.borrow().modified_at));
    }
    entries
}

/// Lists the collected entries in the requested order.
#[must_use]
pub fn order_entries(collected: &Collected, order: SortOrder) -> Vec<&DirectoryEntry> {
    match order {
        SortOrder::Grouped { files_first: false } => {
            collected.dirs.iter().chain(&collected.files).collect()
        }
        SortOrder::Grouped { files_first: true } => {
            collected.files.iter().chain(&collected.dirs).collect()
        }
        SortOrder::Modified { ascending } => {
            let all = collected.dirs.iter().chain(&collected.files).collect();
            sort_by_modified(all, ascending)
        }
    }
}
