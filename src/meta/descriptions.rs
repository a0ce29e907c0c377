use std::collections::HashMap;
use tracing::trace;

/// Parses the contents of a `descript.ion` file.
///
/// Each line is either `name description` or, for names containing spaces,
/// `"name" description` (single quotes work too). Lines without a name, or
/// with an unterminated quote, are skipped. Later lines win.
#[must_use]
pub fn parse_descriptions(content: &str) -> HashMap<String, String> {
    let mut descriptions = HashMap::new();

    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line) {
            Some((name, text)) => {
                descriptions.insert(name.to_string(), text.to_string());
            }
            None => trace!(line, "Skipping malformed description line"),
        }
    }

    descriptions
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let first = line.chars().next()?;
    let (name, text) = if first == '"' || first == '\'' {
        let rest = &line[1..];
        let end = rest.find(first)?;
        (&rest[..end], rest[end + 1..].trim_start())
    } else {
        line.split_once(' ')?
    };

    if name.is_empty() {
        return None;
    }
    Some((name, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquoted_names() {
        let parsed = parse_descriptions("notes.md Meeting notes\nlib.rs Crate root\n");
        assert_eq!(parsed["notes.md"], "Meeting notes");
        assert_eq!(parsed["lib.rs"], "Crate root");
    }

    #[test]
    fn test_quoted_names() {
        let parsed =
            parse_descriptions("\"with space.txt\"   Quarterly figures\n'single q' Other\n");
        assert_eq!(parsed["with space.txt"], "Quarterly figures");
        assert_eq!(parsed["single q"], "Other");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let parsed = parse_descriptions(
            "no_description_here\n\"unterminated name\n\"\" empty name\n\nok.txt fine\r\n",
        );
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["ok.txt"], "fine");
    }

    #[test]
    fn test_later_lines_win() {
        let parsed = parse_descriptions("a old\na new\n");
        assert_eq!(parsed["a"], "new");
    }
}
