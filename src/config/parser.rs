use super::{Config, validator};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{Level, debug, span};

pub fn parse_config_file(path: &Path) -> Result<Config> {
    let span = span!(Level::DEBUG, "load_config", path = %path.display());
    let _guard = span.enter();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config_str(&content)?;

    debug!(
        colors = config.colors.len(),
        auto_more = config.format.auto_more,
        "Configuration loaded"
    );
    Ok(config)
}

pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse TOML config")?;

    // Validate and return validation errors directly without wrapping
    validator::validate_colors(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_valid_config() {
        let toml_content = r#"
[format]
file_first = true
compact_sizes = false

[colors.rs]
fore = "red"
bold = true

[colors."scm.M"]
fore = "blue"
back = "white"
"#;

        let config = parse_config_str(toml_content).unwrap();
        assert!(config.format.file_first);
        assert!(!config.format.compact_sizes);
        assert!(config.format.auto_more);
        assert_eq!(config.colors["rs"].fore, "red");
        assert!(config.colors["rs"].bold);
        assert_eq!(config.colors["scm.M"].back.as_deref(), Some("white"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_malformed_toml() {
        let malformed = r"
[format
file_first = true
";
        let result = parse_config_str(malformed);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse TOML")
        );
    }

    #[test]
    fn test_parse_rejects_unknown_color() {
        let result = parse_config_str("[colors.md]\nfore = \"ultraviolet\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[format]\nhide_hidden = true\n")?;

        let config = parse_config_file(&path)?;
        assert!(config.format.hide_hidden);
        Ok(())
    }
}
