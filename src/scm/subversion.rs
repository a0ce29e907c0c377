//! Parser for `svn status -q .`
//!
//! Subversion prints seven status columns, a space and the path. A move
//! shows up as an add with history and a delete, each followed by an
//! indented note. Paths are sorted, so either half may come first:
//!
//! ```text
//! A  +    bob.py
//!         > moved from reset.py
//! D       reset.py
//!         > moved to bob.py
//! ```

use super::{ScmEntry, ScmManager, ScmStatus, StatusBits, top_level_key};
use std::collections::HashMap;
use tracing::trace;

/// Number of status columns in `svn status` output.
const CODE_COLUMNS: usize = 7;

/// Prefix of the note naming the source of a move.
const MOVED_FROM: &str = "> moved from ";

/// Prefix of the note naming the target of a move.
const MOVED_TO: &str = "> moved to ";

/// Parses Subversion status output.
#[must_use]
pub fn parse(output: &str) -> ScmStatus {
    let mut status = ScmStatus::empty(ScmManager::Subversion);
    // original path -> path it was moved to
    let mut renamed_to: HashMap<String, String> = HashMap::new();
    let mut previous_added: Option<String> = None;
    let mut previous_deleted: Option<String> = None;

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }

        let (Some(columns), Some(payload)) = (line.get(..CODE_COLUMNS), line.get(CODE_COLUMNS..))
        else {
            trace!(line, "Skipping malformed svn status line");
            continue;
        };
        let codes = columns.trim_end();
        let payload = payload.trim();
        if payload.is_empty() {
            trace!(line, "Skipping svn status line without a path");
            continue;
        }

        status.observe_codes(codes);

        if codes.is_empty() {
            if let Some(added) = previous_added.take()
                && let Some(original) = payload.strip_prefix(MOVED_FROM)
                && let Some(entry) = status.entries.get_mut(&added)
                && entry.bits.contains(StatusBits::ADDED)
            {
                entry.bits.remove(StatusBits::ADDED);
                entry.bits.insert(StatusBits::RENAMED);
                renamed_to.insert(top_level_key(original), added);
            }
            if let Some(original) = previous_deleted.take()
                && let Some(target) = payload.strip_prefix(MOVED_TO)
            {
                let current = top_level_key(target);
                if current != original
                    && let Some(record) = status.deleted.remove(&original)
                {
                    status
                        .deleted
                        .insert(current, ScmEntry::renamed(record.codes, original));
                }
            }
            continue;
        }
        previous_added = None;
        previous_deleted = None;

        let key = top_level_key(payload);
        match codes.chars().next() {
            Some('D') => {
                if let Some(current) = renamed_to.get(&key) {
                    status
                        .deleted
                        .insert(current.clone(), ScmEntry::renamed(codes, key));
                } else {
                    status
                        .deleted
                        .insert(key.clone(), ScmEntry::new(codes, StatusBits::DELETED));
                    previous_deleted = Some(key);
                }
            }
            Some('R') => {
                status.insert_entry(key, ScmEntry::new(codes, StatusBits::RENAMED));
            }
            Some('A') => {
                status.insert_entry(key.clone(), ScmEntry::new(codes, StatusBits::ADDED));
                previous_added = Some(key);
            }
            Some('M') => {
                status.insert_entry(key, ScmEntry::new(codes, StatusBits::MODIFIED));
            }
            _ => {}
        }
    }

    status
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVE: &str = "A  +    bob.py\n        > moved from reset.py\n\
                        D       reset.py\n        > moved to bob.py\n";

    #[test]
    fn test_move_becomes_rename() {
        let status = parse(MOVE);

        assert_eq!(status.entries.len(), 1);
        assert_eq!(status.entries["bob.py"].bits, StatusBits::RENAMED);
        assert_eq!(status.entries["bob.py"].codes, "A  +");

        let record = &status.deleted["bob.py"];
        assert_eq!(record.bits, StatusBits::RENAMED);
        assert_eq!(record.renamed_from.as_deref(), Some("reset.py"));
        assert!(!status.deleted.contains_key("reset.py"));
        assert_eq!(status.code_column_width, 4);
    }

    #[test]
    fn test_move_with_old_name_listed_first() {
        let status = parse(
            "D       a.py\n        > moved to z.py\nA  +    z.py\n        > moved from a.py\n",
        );

        assert!(!status.deleted.contains_key("a.py"));
        let record = &status.deleted["z.py"];
        assert_eq!(record.bits, StatusBits::RENAMED);
        assert_eq!(record.codes, "D");
        assert_eq!(status.renamed_from("z.py"), Some("a.py"));
        assert_eq!(status.entries["z.py"].bits, StatusBits::RENAMED);
        assert_eq!(status.deletions().count(), 0);
    }

    #[test]
    fn test_plain_delete() {
        let status = parse("D       old.c\nM       main.c\n");
        assert_eq!(status.deleted["old.c"].bits, StatusBits::DELETED);
        assert_eq!(status.deleted["old.c"].codes, "D");
        assert_eq!(status.entries["main.c"].bits, StatusBits::MODIFIED);
    }

    #[test]
    fn test_property_column_modification() {
        // property-only change: first column blank, second column 'M'
        let status = parse(" M      dir\n");
        assert!(status.entries.is_empty());
        assert_eq!(status.code_column_width, 2);
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let status = parse("D\nM    \nA       ok.c\n");
        assert_eq!(status.entries.len(), 1);
        assert!(status.deleted.is_empty());
    }
}
