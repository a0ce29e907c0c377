use super::writer::{KeyPress, KeySource};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::debug;

/// Reads single key presses from the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl TerminalKeys {
    /// Creates a terminal key source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<KeyPress> {
        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read().context("Failed to read key event")? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                return Ok(classify(key));
            }
        }
    }
}

/// Maps a key event onto the pager's actions.
fn classify(key: KeyEvent) -> KeyPress {
    match key.code {
        KeyCode::Char(' ') => KeyPress::Continue,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyPress::Interrupt,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => KeyPress::Interrupt,
        _ => KeyPress::Other,
    }
}

/// Keeps the terminal in raw mode while alive.
struct RawModeGuard;

impl RawModeGuard {
    /// Switches raw mode on.
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw terminal mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            debug!(error = %e, "Failed to restore terminal mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_keys() {
        let press = |code, modifiers| KeyEvent::new(code, modifiers);

        assert_eq!(classify(press(KeyCode::Char(' '), KeyModifiers::NONE)), KeyPress::Continue);
        assert_eq!(
            classify(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyPress::Interrupt
        );
        assert_eq!(classify(press(KeyCode::Char('q'), KeyModifiers::NONE)), KeyPress::Interrupt);
        assert_eq!(classify(press(KeyCode::Esc, KeyModifiers::NONE)), KeyPress::Interrupt);
        assert_eq!(classify(press(KeyCode::Char('c'), KeyModifiers::NONE)), KeyPress::Other);
        assert_eq!(classify(press(KeyCode::Enter, KeyModifiers::NONE)), KeyPress::Other);
    }
}
