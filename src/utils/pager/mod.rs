/// Pager configuration structures.
mod config;
/// Terminal key source.
mod keys;
/// Paging writer and its state machine.
mod writer;

pub use config::{DEFAULT_PROMPT, PagerConfig};
pub use keys::TerminalKeys;
pub use writer::{KeyPress, KeySource, Pager, PagerState};

use std::io::{self, BufWriter, Stdout, Write};
use tracing::{Level, debug, span};

/// Builder for creating a Pager with custom configuration
pub struct PagerBuilder {
    /// Configuration for the pager, if specified.
    config: Option<PagerConfig>,
    /// Force pager to be disabled regardless of other settings.
    force_disabled: bool,
}

impl PagerBuilder {
    /// Creates a new pager builder with default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: None,
            force_disabled: false,
        }
    }

    /// Sets the pager configuration.
    #[must_use]
    pub fn config(mut self, config: PagerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Force the pager to be disabled regardless of configuration.
    #[must_use]
    pub const fn force_disabled(mut self, disabled: bool) -> Self {
        self.force_disabled = disabled;
        self
    }

    /// Builds a pager over any writer and key source.
    pub fn build_with<W: Write, K: KeySource>(self, out: W, keys: K) -> Pager<W, K> {
        let mut config = self.config.unwrap_or_default();
        config.enabled &= !self.force_disabled;

        let span = span!(Level::DEBUG, "pager_init", enabled = config.enabled, rows = config.rows);
        let _guard = span.enter();
        if config.enabled {
            debug!("Pausing after every screen");
        } else {
            debug!("Using direct output (no pager)");
        }

        Pager::new(out, keys, config)
    }

    /// Builds a pager on buffered stdout reading keys from the terminal.
    #[must_use]
    pub fn build(self) -> Pager<BufWriter<Stdout>, TerminalKeys> {
        self.build_with(
            BufWriter::with_capacity(64 * 1024, io::stdout()),
            TerminalKeys::new(),
        )
    }
}

impl Default for PagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
