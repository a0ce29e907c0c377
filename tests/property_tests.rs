use chrono::{Local, TimeZone};
use proptest::prelude::*;
use scmls::layout::{ELLIPSIS, char_len, elide};
use scmls::scanner::{AttributeFlags, DirectoryEntry, sort_by_modified};
use scmls::scm::{ScmManager, StatusBits, parse_status, top_level_key};

fn entry(name: &str, seconds: i64) -> DirectoryEntry {
    DirectoryEntry {
        name: name.to_string(),
        modified_at: Local
            .timestamp_opt(1_600_000_000 + seconds, 0)
            .single()
            .expect("valid timestamp"),
        size_bytes: 0,
        attributes: AttributeFlags::empty(),
        is_directory: false,
        symlink_target: None,
    }
}

fn git_codes() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["M ", " M", "MM", "A ", "AM", "AD", "D ", " D"])
}

fn svn_line() -> impl Strategy<Value = (String, String)> {
    ("[MAD]", "[ +CL]{6}", "[a-z]{1,8}").prop_map(|(first, rest, name)| {
        let columns = format!("{first}{rest}");
        (format!("{columns} {name}"), columns.trim_end().to_string())
    })
}

proptest! {
    #[test]
    fn test_elision_respects_budget(name in "[a-zA-Z0-9_.é-]{0,60}", remaining in 0usize..80) {
        let elided = elide(&name, remaining);

        if char_len(&name) <= remaining {
            prop_assert_eq!(&elided, &name);
        } else {
            prop_assert_eq!(char_len(&elided), remaining);
            if remaining >= ELLIPSIS.len() {
                prop_assert!(elided.contains(ELLIPSIS));
            }
        }

        // eliding again changes nothing
        prop_assert_eq!(elide(&elided, remaining), elided);
    }

    #[test]
    fn test_sort_orders_by_mtime(
        stamps in prop::collection::vec(0i64..100_000, 0..40),
        ascending: bool,
    ) {
        let entries: Vec<DirectoryEntry> = stamps
            .iter()
            .enumerate()
            .map(|(i, s)| entry(&format!("f{i}"), *s))
            .collect();

        let sorted = sort_by_modified(entries.clone(), ascending);

        for pair in sorted.windows(2) {
            if ascending {
                prop_assert!(pair[0].modified_at <= pair[1].modified_at);
            } else {
                prop_assert!(pair[0].modified_at >= pair[1].modified_at);
            }
        }

        let mut before: Vec<_> = entries.iter().map(|e| e.name.clone()).collect();
        let mut after: Vec<_> = sorted.iter().map(|e| e.name.clone()).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn test_svn_column_width_is_longest_code(lines in prop::collection::vec(svn_line(), 1..20)) {
        let output: String = lines.iter().map(|(line, _)| format!("{line}\n")).collect();
        let status = parse_status(ScmManager::Subversion, &output);

        let widest = lines
            .iter()
            .map(|(_, codes)| codes.chars().count())
            .max()
            .unwrap_or(0);
        prop_assert_eq!(status.code_column_width, widest);
        for entry in status.entries.values() {
            prop_assert!(!entry.bits.is_empty());
        }
    }

    #[test]
    fn test_git_entries_have_bits(
        lines in prop::collection::vec((git_codes(), "[a-z]{1,8}(/[a-z]{1,8})?"), 1..20)
    ) {
        let output: String = lines
            .iter()
            .map(|(codes, path)| format!("{codes} {path}\n"))
            .collect();
        let status = parse_status(ScmManager::Git, &output);

        prop_assert_eq!(status.code_column_width, 2);
        for (key, entry) in &status.entries {
            prop_assert!(!entry.bits.is_empty());
            prop_assert!(!key.contains('/') || key.ends_with('/'));
        }

        // only a staged deletion lands in the deleted table
        let staged: Vec<String> = lines
            .iter()
            .filter(|(codes, _)| codes.starts_with('D'))
            .map(|(_, path)| top_level_key(path))
            .collect();
        for (key, entry) in &status.deleted {
            prop_assert_eq!(entry.bits, StatusBits::DELETED);
            prop_assert!(staged.contains(key));
        }
    }
}
