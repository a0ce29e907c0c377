use crate::ListingContext;
use crate::output;
use anyhow::{Context, Result};

/// Applies `key=value` settings to the configuration and saves it.
///
/// Nothing is written unless every setting is valid.
///
/// # Errors
///
/// Returns an error if:
/// - A key is unknown or a value is invalid for its key
/// - Failed to save configuration
pub fn execute(ctx: &mut ListingContext, settings: &[(String, String)]) -> Result<()> {
    let mut updated = ctx.config.clone();
    for (key, value) in settings {
        updated
            .set(key, value)
            .with_context(|| format!("Cannot set {key} = {value}"))?;
        output::verbose(&format!("Set {key} = {value}"));
    }

    updated.save(&ctx.config_path)?;
    ctx.config = updated;
    output::success("Configuration successfully updated!");
    Ok(())
}
