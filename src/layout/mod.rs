//! Fitting listing lines into the terminal width.
//!
//! A line is `[scm column] prefix name [leader metadata]`. The name gets
//! whatever the prefix leaves of the width minus [`LINE_MARGIN`]; long names
//! are elided in the middle. Side metadata is right-aligned behind a dashed
//! leader when it fits, and dropped when it does not.
//!
//! All lengths are counted in characters.

use crate::scanner::{AttributeFlags, DirectoryEntry};
use crate::utils::formatters::{format_size_field, format_timestamp};

/// Columns kept free at the end of every line.
pub const LINE_MARGIN: usize = 4;

/// Marker inserted where an elided name was shortened.
pub const ELLIPSIS: &str = "...";

/// Length in characters.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Characters left for the name after a prefix of `prefix_len`.
#[must_use]
pub const fn name_budget(cols: usize, prefix_len: usize) -> usize {
    cols.saturating_sub(prefix_len).saturating_sub(LINE_MARGIN)
}

/// Shortens `name` to `remaining` characters by cutting out its middle.
///
/// Names that fit are returned unchanged. Otherwise the name is split in
/// half and characters are dropped alternately from the start of the right
/// half and the end of the left half until both halves plus [`ELLIPSIS`]
/// fit in `remaining`.
///
/// ```
/// use scmls::layout::elide;
///
/// assert_eq!(elide("short.txt", 20), "short.txt");
/// assert_eq!(elide("abcdefghij", 7), "ab...ij");
/// ```
#[must_use]
pub fn elide(name: &str, remaining: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= remaining {
        return name.to_string();
    }
    if remaining < ELLIPSIS.len() {
        return ELLIPSIS[..remaining].to_string();
    }

    let budget = remaining - ELLIPSIS.len();
    let (mut left, mut right) = chars.split_at(chars.len() / 2);
    let mut from_right = true;

    while left.len() + right.len() > budget {
        if (from_right && !right.is_empty()) || left.is_empty() {
            right = &right[1..];
        } else {
            left = &left[..left.len() - 1];
        }
        from_right = !from_right;
    }

    let mut out = String::with_capacity(remaining * 4);
    out.extend(left);
    out.push_str(ELLIPSIS);
    out.extend(right);
    out
}

/// Dash count of the leader placing `metadata_len` characters at the right
/// edge, or `None` when the metadata does not fit.
#[must_use]
pub const fn leader_width(line_len: usize, metadata_len: usize, cols: usize) -> Option<usize> {
    let needed = line_len + metadata_len + LINE_MARGIN;
    if needed < cols {
        Some(cols - needed)
    } else {
        None
    }
}

/// The dashed leader, `" ----> "`.
#[must_use]
pub fn leader(dashes: usize) -> String {
    format!(" {}> ", "-".repeat(dashes))
}

/// Name shown for an entry, annotated with its original name after a rename.
#[must_use]
pub fn display_name(name: &str, renamed_from: Option<&str>) -> String {
    match renamed_from {
        Some(original) => format!("{name} [née {original}]"),
        None => name.to_string(),
    }
}

/// Width-dependent line layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    /// Terminal width.
    pub cols: usize,
    /// Scaled sizes instead of exact byte counts.
    pub compact_sizes: bool,
    /// Elide names longer than the budget.
    pub elide_names: bool,
}

impl LineLayout {
    /// Fixed prefix: timestamp, size field and attribute string, each
    /// followed by a space.
    #[must_use]
    pub fn prefix(&self, entry: &DirectoryEntry) -> String {
        format!(
            "{} {} {} ",
            format_timestamp(&entry.modified_at),
            format_size_field(entry.size_bytes, entry.is_directory, self.compact_sizes),
            entry.attributes.display_string()
        )
    }

    /// Length of every prefix produced by [`LineLayout::prefix`].
    #[must_use]
    pub const fn prefix_len(&self) -> usize {
        let size = if self.compact_sizes {
            crate::utils::formatters::COMPACT_SIZE_WIDTH
        } else {
            crate::utils::formatters::EXPANDED_SIZE_WIDTH
        };
        // "MM/DD/YY HH:MM:SS" plus three separating spaces
        17 + 1 + size + 1 + AttributeFlags::DISPLAY_WIDTH + 1
    }

    /// Fits `name` after a prefix of `used` characters.
    #[must_use]
    pub fn fit_name(&self, name: &str, used: usize) -> String {
        if self.elide_names {
            elide(name, name_budget(self.cols, used))
        } else {
            name.to_string()
        }
    }
}
