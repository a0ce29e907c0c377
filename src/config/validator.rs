use super::{Config, FormatConfig};
use anyhow::{Result, anyhow, bail};
use colored::{Color, Colorize};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

/// Fields allowed inside a `[colors.<category>]` table.
const COLOR_FIELDS: [&str; 3] = ["fore", "back", "bold"];

/// Parses a color name such as `red` or `bright blue`.
///
/// # Errors
///
/// Returns an error if the name is not a known color.
pub fn parse_color(name: &str) -> Result<Color> {
    Color::from_str(name.trim()).map_err(|()| anyhow!("Unknown color: {name}"))
}

/// Checks every configured color name.
///
/// # Errors
///
/// Returns an error naming the first category with an unknown color.
pub fn validate_colors(config: &Config) -> Result<()> {
    for (category, spec) in &config.colors {
        if !spec.fore.is_empty() && parse_color(&spec.fore).is_err() {
            bail!("Unknown color '{}' for colors.{category}.fore", spec.fore);
        }
        if let Some(back) = &spec.back
            && parse_color(back).is_err()
        {
            bail!("Unknown color '{back}' for colors.{category}.back");
        }
    }
    Ok(())
}

/// Warns about configuration fields that have no effect
pub struct ConfigValidator {
    /// Set of valid configuration fields
    known_fields: HashSet<String>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let known_fields = FormatConfig::KEYS
            .iter()
            .map(|key| format!("format.{key}"))
            .collect();

        Self { known_fields }
    }

    /// Lists the unknown fields of a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn unknown_fields(&self, config_path: &Path) -> Result<Vec<String>> {
        if !config_path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(config_path)?;
        let parsed: toml::Value = toml::from_str(&content)?;

        let mut unknown = Vec::new();
        if let toml::Value::Table(root) = &parsed {
            for (section, value) in root {
                match (section.as_str(), value) {
                    ("colors", toml::Value::Table(categories)) => {
                        for (category, spec) in categories {
                            let prefix = format!("colors.{category}");
                            Self::check_color_spec(spec, &prefix, &mut unknown);
                        }
                    }
                    ("format", toml::Value::Table(fields)) => {
                        for key in fields.keys() {
                            let full_key = format!("format.{key}");
                            if !self.known_fields.contains(&full_key) {
                                unknown.push(full_key);
                            }
                        }
                    }
                    _ => unknown.push(section.clone()),
                }
            }
        }
        Ok(unknown)
    }

    /// Validate a configuration file and warn about unknown fields
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn validate_config_file(&self, config_path: &Path) -> Result<()> {
        let unknown = self.unknown_fields(config_path)?;

        if !unknown.is_empty() {
            eprintln!("{}", "Configuration warnings:".yellow().bold());
            for field in &unknown {
                eprintln!("  Unknown configuration field: {}", field.yellow());
            }
            eprintln!();
        }

        Ok(())
    }

    /// Checks the fields of one `[colors.<category>]` table
    fn check_color_spec(value: &toml::Value, prefix: &str, unknown: &mut Vec<String>) {
        if let toml::Value::Table(map) = value {
            for key in map.keys() {
                if !COLOR_FIELDS.contains(&key.as_str()) {
                    unknown.push(format!("{prefix}.{key}"));
                }
            }
        } else {
            unknown.push(prefix.to_string());
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
