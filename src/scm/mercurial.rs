//! Parser for `hg status -C -q .`
//!
//! Each line is a status letter, a space and the path. With `-C` an added
//! file that was copied or moved is followed by an indented line naming its
//! source; Mercurial reports the source itself as `R` (removed).

use super::{ScmEntry, ScmManager, ScmStatus, StatusBits, top_level_key};
use std::collections::HashMap;
use tracing::trace;

/// Parses Mercurial status output.
#[must_use]
pub fn parse(output: &str) -> ScmStatus {
    let mut status = ScmStatus::empty(ScmManager::Mercurial);
    // original path -> path it was moved to
    let mut renamed_to: HashMap<String, String> = HashMap::new();
    let mut previous_added: Option<String> = None;

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }

        let Some(code_end) = line.find(' ') else {
            trace!(line, "Skipping malformed hg status line");
            continue;
        };
        let codes = &line[..code_end];
        let payload = line[code_end..].trim();
        if payload.is_empty() {
            trace!(line, "Skipping hg status line without a path");
            continue;
        }

        status.observe_codes(codes);
        let key = top_level_key(payload);

        if codes.is_empty() {
            // copy source: the add just above was really a rename
            if let Some(added) = previous_added.take()
                && let Some(entry) = status.entries.get_mut(&added)
                && entry.bits.contains(StatusBits::ADDED)
            {
                entry.bits.remove(StatusBits::ADDED);
                entry.bits.insert(StatusBits::RENAMED);
                renamed_to.insert(key, added);
            }
            continue;
        }
        previous_added = None;

        match codes.chars().next() {
            Some('R') => {
                // Mercurial's "removed" is displayed with the common deletion code
                let normalized = format!("D{}", &codes[1..]);
                if let Some(current) = renamed_to.get(&key) {
                    status
                        .deleted
                        .insert(current.clone(), ScmEntry::renamed(normalized, key));
                } else {
                    status
                        .deleted
                        .insert(key, ScmEntry::new(normalized, StatusBits::DELETED));
                }
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
