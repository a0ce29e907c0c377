use crate::ListingContext;
use crossterm::tty::IsTty;
use std::env;
use tracing::{Level, debug, span};

/// Prompt shown while waiting for the continuation key.
pub const DEFAULT_PROMPT: &str = "Press SPACE key to continue...";

/// Configuration for pager behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerConfig {
    /// Whether output pauses at all.
    pub enabled: bool,
    /// Terminal rows; a pause comes after `rows - 1` lines.
    pub rows: usize,
    /// Continuation prompt.
    pub prompt: String,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rows: crate::utils::FALLBACK_ROWS,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl PagerConfig {
    /// Create pager configuration from the listing context.
    ///
    /// Paging needs `auto_more`, an interactive stdout, and no
    /// `--no-pager` or `NO_PAGER` override.
    #[must_use]
    pub fn from_context(ctx: &ListingContext, rows: usize) -> Self {
        let span = span!(Level::DEBUG, "resolve_pager_config", rows);
        let _guard = span.enter();

        let enabled = ctx.config.format.auto_more
            && !ctx.no_pager
            && !ctx.non_interactive
            && env::var_os("NO_PAGER").is_none()
            && std::io::stdout().is_tty();

        debug!(enabled, "Pager config resolved");

        Self {
            enabled,
            rows,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_no_pager_flag_disables() {
        let mut ctx = ListingContext::with_config(Config::default());
        ctx.no_pager = true;
        assert!(!PagerConfig::from_context(&ctx, 40).enabled);
    }

    #[test]
    fn test_auto_more_off_disables() {
        let mut config = Config::default();
        config.format.auto_more = false;
        let ctx = ListingContext::with_config(config);
        let pager = PagerConfig::from_context(&ctx, 40);
        assert!(!pager.enabled);
        assert_eq!(pager.rows, 40);
        assert_eq!(pager.prompt, DEFAULT_PROMPT);
    }
}
