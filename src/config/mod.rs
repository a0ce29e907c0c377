/// TOML reading.
pub mod parser;
/// Color and unknown-field checks.
pub mod validator;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "SCMLS_CONFIG_PATH";

/// Configuration file location relative to the user's config directory.
pub const DEFAULT_CONFIG_FILE: &str = "scmls/config.toml";

/// Persistent settings, read from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Listing switches from the `[format]` table.
    #[serde(default)]
    pub format: FormatConfig,

    /// Color overrides keyed by category (`directories`, `scm.M`, `rs`, ...)
    #[serde(default)]
    pub colors: BTreeMap<String, ColorSpec>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Display switches; command-line flags can only turn them on.
#[serde(default)]
pub struct FormatConfig {
    /// List files before directories.
    pub file_first: bool,
    /// Skip entries carrying the hidden attribute.
    pub hide_hidden: bool,
    /// Skip entries carrying the system attribute.
    pub hide_system: bool,
    /// Do not show `@target` for symbolic links.
    pub hide_links: bool,
    /// Do not show descriptions or link targets.
    pub hide_metadata: bool,
    /// Scaled sizes (`1.50 KiB`) instead of exact byte counts.
    pub compact_sizes: bool,
    /// Shorten names that do not fit the line.
    pub elide_long_names: bool,
    /// Pause after every screen on a terminal.
    pub auto_more: bool,
}

/// Color and weight of one category.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ColorSpec {
    /// Foreground color name; empty keeps the terminal default.
    #[serde(default)]
    pub fore: String,
    /// Background color name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    /// Bold text.
    #[serde(default)]
    pub bold: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            file_first: false,
            hide_hidden: false,
            hide_system: false,
            hide_links: false,
            hide_metadata: false,
            compact_sizes: true,
            elide_long_names: true,
            auto_more: true,
        }
    }
}

impl FormatConfig {
    /// Names of the `[format]` keys.
    pub const KEYS: [&'static str; 8] = [
        "file_first",
        "hide_hidden",
        "hide_system",
        "hide_links",
        "hide_metadata",
        "compact_sizes",
        "elide_long_names",
        "auto_more",
    ];

    fn field_mut(&mut self, name: &str) -> Option<&mut bool> {
        Some(match name {
            "file_first" => &mut self.file_first,
            "hide_hidden" => &mut self.hide_hidden,
            "hide_system" => &mut self.hide_system,
            "hide_links" => &mut self.hide_links,
            "hide_metadata" => &mut self.hide_metadata,
            "compact_sizes" => &mut self.compact_sizes,
            "elide_long_names" => &mut self.elide_long_names,
            "auto_more" => &mut self.auto_more,
            _ => return None,
        })
    }
}

impl Config {
    /// Resolves the configuration file path.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the user's configuration
    /// directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        let base = dirs::config_dir().context("Could not find configuration directory")?;
        Ok(base.join(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from a file; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot read or parse the configuration file
    /// - Configuration file contains invalid TOML
    /// - A color name is not recognized
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        parser::parse_config_file(path)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot write to the file
    /// - TOML serialization fails
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        file.write_all(toml_str.as_bytes())?;
        Ok(())
    }

    /// Set a configuration value by key
    ///
    /// Keys are `format.<name>` or `colors.<category>.<fore|back|bold>`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key format is invalid or unknown
    /// - The value is invalid for the key (e.g., unknown color name)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let Some(parsed) = parse_key(key) else {
            bail!("Invalid configuration key: {key}");
        };

        match parsed {
            ConfigKey::Format(name) => {
                let Some(slot) = self.format.field_mut(&name) else {
                    bail!("Unknown configuration key: {key}");
                };
                *slot = parse_bool(value)?;
            }
            ConfigKey::Color { category, field } => match field.as_str() {
                "fore" => {
                    validator::parse_color(value)?;
                    self.colors.entry(category).or_default().fore = value.to_string();
                }
                "back" => {
                    validator::parse_color(value)?;
                    self.colors.entry(category).or_default().back = Some(value.to_string());
                }
                "bold" => {
                    let bold = parse_bool(value)?;
                    self.colors.entry(category).or_default().bold = bold;
                }
                _ => bail!("Unknown configuration key: {key}"),
            },
        }
        Ok(())
    }
}

/// A parsed configuration key.
#[derive(Debug, PartialEq, Eq)]
enum ConfigKey {
    /// `format.<name>`, with the name in snake case.
    Format(String),
    /// `colors.<category>.<field>`.
    Color {
        /// Category key, may itself contain dots (`scm.M`).
        category: String,
        /// `fore`, `back` or `bold`.
        field: String,
    },
}

/// Splits a dotted key, accepting `color.` for `colors.` and camelCase
/// format names (`format.hideHidden`).
fn parse_key(key: &str) -> Option<ConfigKey> {
    if let Some(name) = key.strip_prefix("format.") {
        if name.contains('.') || name.is_empty() {
            return None;
        }
        return Some(ConfigKey::Format(snake_case(name)));
    }

    let rest = key
        .strip_prefix("colors.")
        .or_else(|| key.strip_prefix("color."))?;
    let (category, field) = rest.rsplit_once('.')?;
    if category.is_empty() {
        return None;
    }
    Some(ConfigKey::Color {
        category: category.to_string(),
        field: field.to_string(),
    })
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    if out == "hide_meta_data" {
        out = "hide_metadata".to_string();
    }
    out
}

fn parse_bool(value: &str) -> Result<bool> {
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid boolean: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults_without_writing() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");

        let config = Config::load(&path)?;
        assert_eq!(config, Config::default());
        assert!(config.format.compact_sizes);
        assert!(config.format.elide_long_names);
        assert!(config.format.auto_more);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_set_round_trips_through_save() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("format.file_first", "true")?;
        config.set("colors.scm.M.fore", "blue")?;
        config.set("colors.scm.M.bold", "true")?;
        config.save(&path)?;

        let loaded = Config::load(&path)?;
        assert!(loaded.format.file_first);
        assert_eq!(loaded.colors["scm.M"].fore, "blue");
        assert!(loaded.colors["scm.M"].bold);
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_legacy_key_spellings() -> Result<()> {
        let mut config = Config::default();
        config.set("format.hideHidden", "true")?;
        config.set("format.hideMetaData", "true")?;
        config.set("color.rs.fore", "red")?;

        assert!(config.format.hide_hidden);
        assert!(config.format.hide_metadata);
        assert_eq!(config.colors["rs"].fore, "red");
        Ok(())
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set("format.nope", "true").is_err());
        assert!(config.set("format.file_first", "yes").is_err());
        assert!(config.set("colors.rs.fore", "chartreuse-ish").is_err());
        assert!(config.set("colors.rs.weight", "heavy").is_err());
        assert!(config.set("nonsense", "1").is_err());
    }
}
