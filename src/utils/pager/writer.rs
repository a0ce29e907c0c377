use super::PagerConfig;
use anyhow::{Context, Result};
use std::io::Write;
use tracing::{debug, info};

/// Where the pager is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Lines pass through.
    Streaming,
    /// Waiting on a key after a full screen.
    Paused,
    /// Interrupted; every further line is dropped.
    Done,
}

/// A key read while paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    /// Show the next screen.
    Continue,
    /// Stop the whole listing.
    Interrupt,
    /// Any other key; keep waiting.
    Other,
}

/// Blocking source of key presses.
pub trait KeySource {
    /// Waits for the next key.
    ///
    /// # Errors
    ///
    /// Returns an error if the input device cannot be read.
    fn next_key(&mut self) -> Result<KeyPress>;
}

/// Line writer that pauses after every screenful.
pub struct Pager<W: Write, K: KeySource> {
    /// Destination of lines and prompts.
    out: W,
    /// Keys consulted while paused.
    keys: K,
    /// Rows, prompt and whether paging is on.
    config: PagerConfig,
    /// Lines written since the last pause.
    lines_since_pause: usize,
    /// Current state.
    state: PagerState,
}

impl<W: Write, K: KeySource> Pager<W, K> {
    /// Creates a pager writing to `out`.
    pub const fn new(out: W, keys: K, config: PagerConfig) -> Self {
        Self {
            out,
            keys,
            config,
            lines_since_pause: 0,
            state: PagerState::Streaming,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PagerState {
        self.state
    }

    /// Lines per screen before a pause.
    #[must_use]
    pub fn page_height(&self) -> usize {
        self.config.rows.saturating_sub(1).max(1)
    }

    /// Writes one line, pausing once a screen is full.
    ///
    /// Returns [`PagerState::Done`] once interrupted; the line is then
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or reading a key fails.
    pub fn write_line(&mut self, line: &str) -> Result<PagerState> {
        if self.state == PagerState::Done {
            return Ok(PagerState::Done);
        }

        writeln!(self.out, "{line}").context("Failed to write listing line")?;
        self.lines_since_pause += 1;

        if self.config.enabled && self.lines_since_pause >= self.page_height() {
            self.pause()?;
        }
        Ok(self.state)
    }

    /// Prompts and blocks until a continuation or interrupt key.
    fn pause(&mut self) -> Result<()> {
        self.state = PagerState::Paused;
        write!(self.out, "{}\r", self.config.prompt)?;
        self.out.flush()?;

        loop {
            match self.keys.next_key()? {
                KeyPress::Continue => {
                    self.clear_prompt()?;
                    self.lines_since_pause = 0;
                    self.state = PagerState::Streaming;
                    return Ok(());
                }
                KeyPress::Interrupt => {
                    self.clear_prompt()?;
                    info!("Listing interrupted at pager prompt");
                    self.state = PagerState::Done;
                    return Ok(());
                }
                KeyPress::Other => debug!("Ignoring key while paused"),
            }
        }
    }

    /// Blanks out the prompt line.
    fn clear_prompt(&mut self) -> Result<()> {
        let blank = " ".repeat(self.config.prompt.chars().count());
        write!(self.out, "{blank}\r")?;
        Ok(())
    }

    /// Flushes buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be flushed.
    pub fn finish(&mut self) -> Result<()> {
        self.out.flush().context("Failed to flush output")
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedKeys {
        keys: VecDeque<KeyPress>,
        reads: usize,
    }

    impl ScriptedKeys {
        fn new(keys: &[KeyPress]) -> Self {
            Self {
                keys: keys.iter().copied().collect(),
                reads: 0,
            }
        }
    }

    impl KeySource for ScriptedKeys {
        fn next_key(&mut self) -> Result<KeyPress> {
            self.reads += 1;
            Ok(self.keys.pop_front().unwrap_or(KeyPress::Interrupt))
        }
    }

    fn config(enabled: bool, rows: usize) -> PagerConfig {
        PagerConfig {
            enabled,
            rows,
            prompt: "MORE".to_string(),
        }
    }

    #[test]
    fn test_pauses_after_every_screen() -> Result<()> {
        let keys = ScriptedKeys::new(&[KeyPress::Continue, KeyPress::Continue]);
        let mut pager = Pager::new(Vec::new(), keys, config(true, 5));

        for i in 0..9 {
            assert_eq!(pager.write_line(&format!("line {i}"))?, PagerState::Streaming);
        }
        assert_eq!(pager.keys.reads, 2);

        let text = String::from_utf8(pager.into_inner())?;
        assert_eq!(text.matches("MORE\r").count(), 2);
        let fourth = text.find("line 3").unwrap_or(usize::MAX);
        let prompt = text.find("MORE").unwrap_or(0);
        assert!(fourth < prompt);
        Ok(())
    }

    #[test]
    fn test_other_keys_keep_waiting() -> Result<()> {
        let keys = ScriptedKeys::new(&[KeyPress::Other, KeyPress::Other, KeyPress::Continue]);
        let mut pager = Pager::new(Vec::new(), keys, config(true, 2));

        assert_eq!(pager.write_line("one")?, PagerState::Streaming);
        assert_eq!(pager.keys.reads, 3);
        Ok(())
    }

    #[test]
    fn test_interrupt_stops_output() -> Result<()> {
        let keys = ScriptedKeys::new(&[KeyPress::Interrupt]);
        let mut pager = Pager::new(Vec::new(), keys, config(true, 3));

        pager.write_line("a")?;
        assert_eq!(pager.write_line("b")?, PagerState::Done);
        assert_eq!(pager.write_line("c")?, PagerState::Done);
        assert_eq!(pager.state(), PagerState::Done);

        let text = String::from_utf8(pager.into_inner())?;
        assert!(text.contains('b'));
        assert!(!text.contains('c'));
        Ok(())
    }

    #[test]
    fn test_disabled_pager_never_pauses() -> Result<()> {
        let mut pager = Pager::new(Vec::new(), ScriptedKeys::new(&[]), config(false, 2));
        for _ in 0..50 {
            assert_eq!(pager.write_line("x")?, PagerState::Streaming);
        }
        assert_eq!(pager.keys.reads, 0);
        assert_eq!(String::from_utf8(pager.into_inner())?.lines().count(), 50);
        Ok(())
    }

    #[test]
    fn test_tiny_terminal_still_pages() {
        let pager = Pager::new(Vec::new(), ScriptedKeys::new(&[]), config(true, 0));
        assert_eq!(pager.page_height(), 1);
    }
}
