//! Category colors for listing text.
//!
//! Every piece of a line belongs to a [`Category`]; the [`Theme`] maps the
//! category's configuration key to a [`Style`]. Unstyled categories print as
//! plain text.

use crate::config::{ColorSpec, validator::parse_color};
use colored::{Color, ColoredString, Colorize};
use std::collections::HashMap;
use tracing::warn;

/// Semantic category of a piece of listing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category<'a> {
    /// Description text from the metadata source.
    Description,
    /// `@target` of a symbolic link.
    Symlink,
    /// Directory lines.
    Directories,
    /// One SCM status letter.
    ScmCode(char),
    /// File lines with this extension (lower-case, no dot).
    Extension(&'a str),
}

impl Category<'_> {
    /// Configuration key of the category.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Description => "description".to_string(),
            Self::Symlink => "symlink".to_string(),
            Self::Directories => "directories".to_string(),
            Self::ScmCode(code) => format!("scm.{code}"),
            Self::Extension(ext) => ext.to_lowercase(),
        }
    }
}

/// Resolved foreground, background and weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color.
    pub fore: Option<Color>,
    /// Background color.
    pub back: Option<Color>,
    /// Bold weight.
    pub bold: bool,
}

impl Style {
    /// Foreground-only style.
    #[must_use]
    pub const fn fore(color: Color) -> Self {
        Self {
            fore: Some(color),
            back: None,
            bold: false,
        }
    }

    /// Same style in bold.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Resolves a configured color spec; unknown names are left unset.
    #[must_use]
    pub fn from_spec(spec: &ColorSpec) -> Self {
        let resolve = |name: &str| {
            if name.is_empty() {
                return None;
            }
            parse_color(name)
                .inspect_err(|e| warn!(error = %e, "Ignoring color"))
                .ok()
        };

        Self {
            fore: resolve(&spec.fore),
            back: spec.back.as_deref().and_then(resolve),
            bold: spec.bold,
        }
    }

    /// Applies the style to `text`.
    #[must_use]
    pub fn paint(&self, text: &str) -> ColoredString {
        let mut painted = text.normal();
        if let Some(fore) = self.fore {
            painted = painted.color(fore);
        }
        if let Some(back) = self.back {
            painted = painted.on_color(back);
        }
        if self.bold {
            painted = painted.bold();
        }
        painted
    }
}

/// Category to style table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Styles keyed by [`Category::key`].
    styles: HashMap<String, Style>,
}

impl Default for Theme {
    fn default() -> Self {
        let styles = [
            ("description", Style::fore(Color::Yellow)),
            ("symlink", Style::fore(Color::Cyan).bold()),
            ("directories", Style::fore(Color::Magenta).bold()),
            ("scm.A", Style::fore(Color::Green)),
            ("scm.M", Style::fore(Color::Yellow)),
            ("scm.D", Style::fore(Color::Red)),
            ("scm.R", Style::fore(Color::Cyan)),
        ]
        .into_iter()
        .map(|(key, style)| (key.to_string(), style))
        .collect();

        Self { styles }
    }
}

impl Theme {
    /// Theme without any styles; everything renders plain.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            styles: HashMap::new(),
        }
    }

    /// Default styles overridden by the configured colors.
    pub fn from_config<'a>(colors: impl IntoIterator<Item = (&'a String, &'a ColorSpec)>) -> Self {
        let mut theme = Self::default();
        for (key, spec) in colors {
            theme.styles.insert(normalize_key(key), Style::from_spec(spec));
        }
        theme
    }

    /// Style of a category, if one is configured.
    #[must_use]
    pub fn style(&self, category: Category<'_>) -> Option<&Style> {
        self.styles.get(&category.key())
    }

    /// Paints `text` in the category's style; a miss leaves it plain.
    #[must_use]
    pub fn paint(&self, category: Category<'_>, text: &str) -> String {
        match self.style(category) {
            Some(style) => style.paint(text).to_string(),
            None => text.to_string(),
        }
    }

    /// Colors each status letter of an SCM code column by its own category.
    #[must_use]
    pub fn colorize_codes(&self, codes: &str) -> String {
        let mut out = String::with_capacity(codes.len());
        for code in codes.chars() {
            if code == ' ' {
                out.push(code);
                continue;
            }
            match self.style(Category::ScmCode(code)) {
                Some(style) => out.push_str(&style.paint(&code.to_string()).to_string()),
                None => out.push(code),
            }
        }
        out
    }
}

/// Extensions are case-insensitive; `scm.` letters are kept as written.
fn normalize_key(key: &str) -> String {
    if key.starts_with("scm.") {
        key.to_string()
    } else {
        key.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn force_colors() {
        colored::control::set_override(true);
    }

    #[test]
    fn test_category_keys() {
        assert_eq!(Category::Description.key(), "description");
        assert_eq!(Category::ScmCode('M').key(), "scm.M");
        assert_eq!(Category::Extension("RS").key(), "rs");
    }

    #[test]
    fn test_defaults_and_misses() {
        let theme = Theme::default();
        assert!(theme.style(Category::Directories).is_some());
        assert!(theme.style(Category::ScmCode('A')).is_some());
        assert!(theme.style(Category::ScmCode('?')).is_none());
        assert!(theme.style(Category::Extension("rs")).is_none());
        assert_eq!(theme.paint(Category::Extension("rs"), "main.rs"), "main.rs");
    }

    #[test]
    fn test_config_overrides_defaults() {
        let mut colors = BTreeMap::new();
        colors.insert(
            "RS".to_string(),
            ColorSpec {
                fore: "red".to_string(),
                back: None,
                bold: true,
            },
        );
        colors.insert(
            "scm.M".to_string(),
            ColorSpec {
                fore: "blue".to_string(),
                back: Some("white".to_string()),
                bold: false,
            },
        );

        let theme = Theme::from_config(&colors);
        assert_eq!(
            theme.style(Category::Extension("rs")),
            Some(&Style::fore(Color::Red).bold())
        );
        assert_eq!(
            theme.style(Category::ScmCode('M')),
            Some(&Style {
                fore: Some(Color::Blue),
                back: Some(Color::White),
                bold: false,
            })
        );
    }

    #[test]
    fn test_colorize_codes_keeps_spaces_plain() {
        force_colors();
        let theme = Theme::default();
        let colored = theme.colorize_codes("M ");
        assert!(colored.contains("\u{1b}["));
        assert!(colored.ends_with(' '));
        assert_eq!(Theme::plain().colorize_codes("A  +"), "A  +");
    }

    #[test]
    fn test_paint_applies_ansi() {
        force_colors();
        let painted = Theme::default().paint(Category::Description, "notes");
        assert!(painted.contains("notes"));
        assert!(painted.starts_with("\u{1b}["));
    }
}
