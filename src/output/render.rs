//! Entry, deleted-section, summary and header lines.
//!
//! Every function here returns finished [`RenderedLine`]s; nothing is
//! written until the pager receives them.

use super::theme::{Category, Theme};
use crate::layout::{LineLayout, char_len, display_name, leader, leader_width};
use crate::scanner::DirectoryEntry;
use crate::scm::ScmStatus;
use crate::utils::PartitionInfo;
use crate::utils::formatters::{format_count, format_number};
use std::path::{MAIN_SEPARATOR, Path};

/// Width the byte figures of a summary are right-aligned to.
const SUMMARY_WIDTH: usize = 20;

/// Marker line opening the deleted-entries section.
const DELETED_SEPARATOR: &str = " -----------------";

/// One finished output line; each occupies one pager row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedLine {
    /// Final, possibly colorized, text.
    pub text: String,
}

impl RenderedLine {
    /// Wraps finished text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// An empty line.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Pager rows taken by the line.
    #[must_use]
    pub const fn rows(&self) -> usize {
        1
    }
}

/// Display switches that shape every entry line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Width and size settings.
    pub layout: LineLayout,
    /// Do not show `@target` for symbolic links.
    pub hide_links: bool,
    /// Do not show descriptions.
    pub hide_metadata: bool,
}

/// Per-task figures printed below the entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryStats {
    /// Listed files.
    pub files: usize,
    /// Listed directories.
    pub dirs: usize,
    /// Bytes listed so far, across tasks.
    pub total_bytes: u64,
    /// Bytes allocated for this task's files.
    pub allocated_bytes: u64,
    /// Allocated bytes beyond this task's file sizes.
    pub slack_bytes: u64,
}

/// Turns entries and status tables into colorized lines.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    /// Category styles.
    theme: &'a Theme,
    /// Display switches.
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer.
    #[must_use]
    pub const fn new(theme: &'a Theme, options: RenderOptions) -> Self {
        Self { theme, options }
    }

    /// Renders one entry line.
    ///
    /// `description` is the entry's metadata text, if any; symlink targets
    /// are shown when there is none.
    #[must_use]
    pub fn render_entry(
        &self,
        entry: &DirectoryEntry,
        scm: &ScmStatus,
        description: Option<&str>,
    ) -> RenderedLine {
        let layout = self.options.layout;
        let (scm_width, scm_column) = self.scm_column(&entry.name, scm);

        let prefix = layout.prefix(entry);
        let used = scm_width + char_len(&prefix);
        let name = display_name(&entry.name, scm.renamed_from(&entry.name));

        let mut body = prefix;
        body.push_str(&layout.fit_name(&name, used));

        let mut tail = String::new();
        if let Some((metadata, category)) = self.side_metadata(entry, description)
            && let Some(dashes) =
                leader_width(scm_width + char_len(&body), char_len(&metadata), layout.cols)
        {
            body.push_str(&leader(dashes));
            tail = self.theme.paint(category, &metadata);
        }

        let body = if entry.is_directory {
            self.theme.paint(Category::Directories, &body)
        } else if let Some(ext) = entry.extension() {
            self.theme.paint(Category::Extension(&ext), &body)
        } else {
            body
        };

        RenderedLine::new(format!("{scm_column}{body}{tail}"))
    }

    /// Text shown right of the name and the category it is painted with.
    ///
    /// A non-empty description wins; a symbolic link without one shows its
    /// target as `@target` unless links are hidden.
    fn side_metadata(
        &self,
        entry: &DirectoryEntry,
        description: Option<&str>,
    ) -> Option<(String, Category<'static>)> {
        if self.options.hide_metadata {
            return None;
        }
        if let Some(text) = description.filter(|d| !d.is_empty()) {
            return Some((text.to_string(), Category::Description));
        }
        if self.options.hide_links {
            return None;
        }
        entry
            .symlink_target
            .as_ref()
            .map(|target| (format!("@{}", target.display()), Category::Symlink))
    }

    /// Lines for tracked entries deleted from disk, introduced by a
    /// separator; empty when there are none.
    #[must_use]
    pub fn render_deleted(&self, scm: &ScmStatus) -> Vec<RenderedLine> {
        let width = scm.code_column_width;
        let mut lines = Vec::new();

        for (name, entry) in scm.deletions() {
            if lines.is_empty() {
                lines.push(RenderedLine::new(format!(
                    "{}{DELETED_SEPARATOR}",
                    " ".repeat(width)
                )));
            }
            let codes = self.theme.colorize_codes(&format!("{:<width$}", entry.codes));
            lines.push(RenderedLine::new(format!("{codes} {name}")));
        }
        lines
    }

    /// The SCM code column and its width in characters.
    ///
    /// Present only while the status has any changes; entries without a
    /// status get a blank column.
    #[must_use]
    pub fn scm_column(&self, name: &str, scm: &ScmStatus) -> (usize, String) {
        if !scm.has_changes() {
            return (0, String::new());
        }

        let width = scm.code_column_width;
        let codes = scm.entry(name).map_or("", |e| e.codes.as_str());
        let padded = format!("{codes:<width$}");
        let column_width = char_len(&padded) + 1;
        (column_width, format!("{} ", self.theme.colorize_codes(&padded)))
    }

    /// Summary lines: counts and sizes, then free space.
    #[must_use]
    pub fn render_summary(
        &self,
        stats: &SummaryStats,
        partition: Option<&PartitionInfo>,
    ) -> Vec<RenderedLine> {
        let expand = !self.options.layout.compact_sizes;
        let mut lines = Vec::with_capacity(2);

        if stats.files == 0 && stats.dirs == 0 {
            lines.push(RenderedLine::new(format!(
                "{}0 bytes in 0 files and 0 dirs",
                " ".repeat(SUMMARY_WIDTH)
            )));
        } else {
            let mut line = format!(
                "{} in",
                format_number(stats.total_bytes, SUMMARY_WIDTH, expand)
            );
            if stats.files > 0 {
                line.push(' ');
                line.push_str(&format_count(stats.files, "file"));
            }
            if stats.dirs > 0 {
                if stats.files > 0 {
                    line.push_str(" and");
                }
                line.push(' ');
                line.push_str(&format_count(stats.dirs, "dir"));
            }
            if stats.files > 0
                && partition.is_some_and(|p| p.allocation_granularity > 0)
            {
                let slack = format!("{} slack", format_number(stats.slack_bytes, 0, expand));
                line.push_str(&format!(
                    " / {} allocated ({})",
                    format_number(stats.allocated_bytes, 0, expand),
                    self.theme.paint(Category::Description, &slack)
                ));
            }
            lines.push(RenderedLine::new(line));
        }

        if let Some(partition) = partition {
            lines.push(RenderedLine::new(format!(
                "{} free of {} ({:.1}%)",
                format_number(partition.available_bytes, SUMMARY_WIDTH, expand),
                format_number(partition.total_bytes, 0, expand),
                partition.available_percent()
            )));
        }
        lines
    }
}

/// Task header, ` Directory of <dir>/<patterns>`.
#[must_use]
pub fn render_header(directory: &Path, patterns: &[String]) -> RenderedLine {
    let mut shown = patterns.join(",");
    if patterns.len() > 1 {
        shown = format!("[{shown}]");
    }

    let directory = directory.display().to_string();
    let separator = if directory.ends_with(MAIN_SEPARATOR) {
        String::new()
    } else {
        MAIN_SEPARATOR.to_string()
    };
    RenderedLine::new(format!(" Directory of {directory}{separator}{shown}"))
}

/// Lines separating two task listings.
#[must_use]
pub fn render_task_separator(cols: usize) -> Vec<RenderedLine> {
    vec![
        RenderedLine::blank(),
        RenderedLine::new(format!("|{}|", "-".repeat(cols.saturating_sub(3)))),
        RenderedLine::blank(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::AttributeFlags;
    use crate::scm::{ScmEntry, ScmManager, StatusBits};
    use crate::test_utils::fixtures::entry_at;
    use std::path::PathBuf;

    fn options(cols: usize) -> RenderOptions {
        RenderOptions {
            layout: LineLayout {
                cols,
                compact_sizes: true,
                elide_names: true,
            },
            hide_links: false,
            hide_metadata: false,
        }
    }

    fn git_status() -> ScmStatus {
        let mut status = ScmStatus::empty(ScmManager::Git);
        status.code_column_width = 2;
        status
            .entries
            .insert("new.txt".to_string(), ScmEntry::new("R ", StatusBits::RENAMED));
        status
            .deleted
            .insert("new.txt".to_string(), ScmEntry::renamed("R ", "old.txt"));
        status
            .deleted
            .insert("gone.rs".to_string(), ScmEntry::new("D ", StatusBits::DELETED));
        status
    }

    #[test]
    fn test_plain_entry_line() {
        let theme = Theme::plain();
        let renderer = Renderer::new(&theme, options(80));
        let entry = entry_at("readme.md", 0);

        let line = renderer.render_entry(&entry, &ScmStatus::default(), None);
        assert!(line.text.ends_with(" -------- readme.md"));
        assert!(line.text.contains("   1.50 KiB "));
        assert_eq!(line.rows(), 1);
    }

    #[test]
    fn test_scm_column_and_rename_annotation() {
        let theme = Theme::plain();
        let renderer = Renderer::new(&theme, options(100));
        let status = git_status();

        let renamed = renderer.render_entry(&entry_at("new.txt", 0), &status, None);
        assert!(renamed.text.starts_with("R  "));
        assert!(renamed.text.ends_with("new.txt [née old.txt]"));

        let untouched = renderer.render_entry(&entry_at("other.txt", 0), &status, None);
        assert!(untouched.text.starts_with("   "));
    }

    #[test]
    fn test_description_gets_leader() {
        let theme = Theme::plain();
        let renderer = Renderer::new(&theme, options(80));
        let line =
            renderer.render_entry(&entry_at("a.txt", 0), &ScmStatus::default(), Some("Notes"));

        assert!(line.text.ends_with("> Notes"));
        assert!(line.text.contains("a.txt ---"));
        assert_eq!(char_len(&line.text), 79);
    }

    #[test]
    fn test_metadata_dropped_when_it_does_not_fit() {
        let theme = Theme::plain();
        let renderer = Renderer::new(&theme, options(60));
        let long = "d".repeat(40);
        let line =
            renderer.render_entry(&entry_at("a.txt", 0), &ScmStatus::default(), Some(&long));
        assert!(!line.text.contains("> "));
        assert!(line.text.ends_with("a.txt"));
    }

    #[test]
    fn test_symlink_target_is_fallback_metadata() {
        let theme = Theme::plain();
        let mut entry = entry_at("link", 0);
        entry.attributes = AttributeFlags::REPARSE_POINT;
        entry.symlink_target = Some(PathBuf::from("/opt/target"));

        let status = ScmStatus::default();
        let shown = Renderer::new(&theme, options(80)).render_entry(&entry, &status, None);
        assert!(shown.text.ends_with("> @/opt/target"));

        let mut hidden_links = options(80);
        hidden_links.hide_links = true;
        let hidden = Renderer::new(&theme, hidden_links).render_entry(&entry, &status, None);
        assert!(hidden.text.ends_with("link"));

        let described =
            Renderer::new(&theme, options(80)).render_entry(&entry, &status, Some("Shortcut"));
        assert!(described.text.ends_with("> Shortcut"));
    }

    #[test]
    fn test_hide_metadata_skips_description() {
        let theme = Theme::plain();
        let mut opts = options(80);
        opts.hide_metadata = true;
        let mut entry = entry_at("a.txt", 0);
        entry.symlink_target = Some(PathBuf::from("/opt/target"));

        let renderer = Renderer::new(&theme, opts);
        let line = renderer.render_entry(&entry, &ScmStatus::default(), Some("Notes"));
        assert!(line.text.ends_with("a.txt"));
        assert!(!line.text.contains('@'));
    }

    #[test]
    fn test_empty_description_falls_back_to_link_target() {
        let theme = Theme::plain();
        let mut entry = entry_at("link", 0);
        entry.symlink_target = Some(PathBuf::from("/opt/target"));

        let renderer = Renderer::new(&theme, options(80));
        let line = renderer.render_entry(&entry, &ScmStatus::default(), Some(""));
        assert!(line.text.ends_with("> @/opt/target"));
    }

    #[test]
    fn test_long_names_are_elided_to_width() {
        let theme = Theme::plain();
        let renderer = Renderer::new(&theme, options(60));
        let name = format!("{}.txt", "n".repeat(80));
        let line = renderer.render_entry(&entry_at(&name, 0), &ScmStatus::default(), None);
        assert_eq!(char_len(&line.text), 56);
        assert!(line.text.contains("..."));
    }

    #[test]
    fn test_deleted_section() {
        let theme = Theme::plain();
        let renderer = Renderer::new(&theme, options(80));
        let lines = renderer.render_deleted(&git_status());

        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["   -----------------", "D  gone.rs"]);
        assert!(renderer.render_deleted(&ScmStatus::default()).is_empty());
    }

    #[test]
    fn test_summary_lines() {
        let theme = Theme::plain();
        let renderer = Renderer::new(&theme, options(80));
        let partition = PartitionInfo {
            available_bytes: 1024,
            total_bytes: 4096,
            allocation_granularity: 4096,
        };
        let stats = SummaryStats {
            files: 2,
            dirs: 1,
            total_bytes: 3072,
            allocated_bytes: 8192,
            slack_bytes: 5120,
        };

        let lines = renderer.render_summary(&stats, Some(&partition));
        assert_eq!(
            lines[0].text,
            "                3.00 KiB in 2 files and 1 dir / 8.00 KiB allocated (5.00 KiB slack)"
        );
        assert_eq!(lines[1].text, "                1.00 KiB free of 4.00 KiB (25.0%)");
    }

    #[test]
    fn test_empty_summary() {
        let theme = Theme::plain();
        let renderer = Renderer::new(&theme, options(80));
        let lines = renderer.render_summary(&SummaryStats::default(), None);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].text,
            "                    0 bytes in 0 files and 0 dirs"
        );
    }

    #[test]
    fn test_header_and_separator() {
        let header = render_header(Path::new("/tmp/work"), &["*".to_string()]);
        assert_eq!(header.text, format!(" Directory of /tmp/work{MAIN_SEPARATOR}*"));

        let patterns = ["*.rs".to_string(), "*.md".to_string()];
        let merged = render_header(Path::new("/tmp"), &patterns);
        assert!(merged.text.ends_with("[*.rs,*.md]"));

        let separator = render_task_separator(10);
        assert_eq!(separator[1].text, "|-------|");
        assert_eq!(separator.len(), 3);
    }
}
