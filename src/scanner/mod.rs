//! Directory enumeration, attribute normalization and ordering.

/// Normalized entry descriptors and the OS attribute adapter.
pub mod attributes;

/// Pattern and visibility filtering of a directory's entries.
pub mod collector;

/// Entry ordering.
pub mod sort;

pub use attributes::{AttributeAdapter, AttributeFlags, DirectoryEntry, NativeAttributes};
pub use collector::{CollectOptions, Collected, EntryCollector};
pub use sort::{SortOrder, order_entries, sort_by_modified};
