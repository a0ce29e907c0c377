//! Parser for `git status --porcelain -uno .`
//!
//! Porcelain lines carry two status columns (index, worktree), a space and
//! the path. Renames read `R  old -> new`.

use super::{ScmEntry, ScmManager, ScmStatus, StatusBits, top_level_key};
use tracing::trace;

/// Number of status columns in porcelain output.
const CODE_COLUMNS: usize = 2;

/// Separator between the old and new path of a rename.
const RENAME_ARROW: &str = " -> ";

/// Parses porcelain status output.
#[must_use]
pub fn parse(output: &str) -> ScmStatus {
    let mut status = ScmStatus::empty(ScmManager::Git);

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }

        let (Some(codes), Some(payload)) = (line.get(..CODE_COLUMNS), line.get(CODE_COLUMNS..))
        else {
            trace!(line, "Skipping malformed git status line");
            continue;
        };
        let payload = payload.trim();
        if payload.is_empty() {
            trace!(line, "Skipping git status line without a path");
            continue;
        }

        status.observe_codes(codes);

        let mut columns = codes.chars();
        let index = columns.next().unwrap_or(' ');
        let worktree = columns.next().unwrap_or(' ');

        if index == 'R' {
            let Some((original, current)) = payload.split_once(RENAME_ARROW) else {
                trace!(line, "Rename without an arrow");
                continue;
            };
            let original = unquote(original);
            let key = top_level_key(unquote(current));
            if original.is_empty() {
                continue;
            }
            status
                .deleted
                .insert(key.clone(), ScmEntry::renamed(codes, original));
            status.insert_entry(key, ScmEntry::new(codes, StatusBits::RENAMED));
            continue;
        }

        let key = top_level_key(unquote(payload));

        // only a staged deletion removes the path from the listing
        if index == 'D' {
            status
                .deleted
                .insert(key, ScmEntry::new(codes, StatusBits::DELETED));
            continue;
        }

        let mut bits = StatusBits::empty();
        if index == 'A' {
            bits |= StatusBits::ADDED;
        } else if index == 'M' || worktree == 'M' {
            bits |= StatusBits::MODIFIED;
        } else if worktree == 'D' {
            bits |= StatusBits::DELETED;
        }
        status.insert_entry(key, ScmEntry::new(codes, bits));
    }

    status
}

/// Strips the double quotes git puts around paths with unusual characters.
fn unquote(path: &str) -> &str {
    let path = path.trim();
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
}
