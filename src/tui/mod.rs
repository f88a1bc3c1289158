//! # Terminal Visualization Module
//!
//! Owns the terminal for the lifetime of the program: raw mode, the
//! alternate screen, and the ratatui terminal handle live here.
//!
//! The [`Visualizer`] is constructed once before the main loop and passed
//! by reference into each render call; there is no lazily-created global
//! surface. Restoring the terminal is guaranteed on all exit paths by an
//! explicit [`Visualizer::close`] plus a `Drop` fallback, so a fatal error
//! never leaves the shell in raw mode.

pub mod picker;
pub mod render;

use std::io::{stdout, Stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind, KeyCode, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio_serial::SerialPortInfo;

use crate::controller::InputState;
use crate::error::Result;

/// Terminal handle type used throughout the TUI
pub(crate) type Term = Terminal<CrosstermBackend<Stdout>>;

/// Session details shown in the status bar
///
/// Owned and updated by the main loop; the visualizer itself keeps no state
/// between frames beyond the terminal handle.
#[derive(Debug, Clone, Default)]
pub struct SessionStatus {
    pub controller: String,
    pub port: String,
    pub frames_sent: u64,
    pub last_telemetry: Option<Vec<f64>>,
}

/// Live terminal visualization of the controller state
pub struct Visualizer {
    terminal: Term,
    restored: bool,
}

impl Visualizer {
    /// Set up the terminal and build the visualizer
    ///
    /// Enables raw mode and enters the alternate screen. Must be paired
    /// with [`Visualizer::close`]; `Drop` covers early-error paths.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the terminal cannot be configured.
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            restored: false,
        })
    }

    /// Render one frame of the visualization
    ///
    /// Full redraw every call: stick markers for the first two (and, when
    /// present, next two) axes, a row of button squares along the bottom,
    /// and the status bar.
    pub fn render(&mut self, state: &InputState, status: &SessionStatus) -> Result<()> {
        self.terminal.draw(|frame| render::render(frame, state, status))?;
        Ok(())
    }

    /// Drain pending terminal events, reporting whether a close was requested
    ///
    /// `q`, `Esc`, and Ctrl-C key presses are close requests (with raw mode
    /// active, Ctrl-C arrives as a key event rather than SIGINT). All other
    /// events are discarded.
    pub fn poll_close_request(&mut self) -> Result<bool> {
        let mut close = false;

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && is_close_key(&key) {
                    close = true;
                }
            }
        }

        Ok(close)
    }

    /// Run the modal port-selection dialog
    ///
    /// Blocks until the user confirms a port or cancels. See
    /// [`picker::pick_port`].
    pub fn pick_port(&mut self, ports: &[SerialPortInfo]) -> Result<SerialPortInfo> {
        picker::pick_port(&mut self.terminal, ports)
    }

    /// Restore the terminal
    ///
    /// Leaves the alternate screen and disables raw mode. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if !self.restored {
            disable_raw_mode()?;
            stdout().execute(LeaveAlternateScreen)?;
            self.restored = true;
        }
        Ok(())
    }
}

impl Drop for Visualizer {
    fn drop(&mut self) {
        // Errors during restore are unreportable at this point
        let _ = self.close();
    }
}

/// Whether a key press asks the program to exit
fn is_close_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_q_is_close_key() {
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(is_close_key(&key));
    }

    #[test]
    fn test_esc_is_close_key() {
        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(is_close_key(&key));
    }

    #[test]
    fn test_ctrl_c_is_close_key() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_close_key(&key));
    }

    #[test]
    fn test_plain_c_is_not_close_key() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(!is_close_key(&key));
    }

    #[test]
    fn test_other_keys_are_not_close_keys() {
        for code in [KeyCode::Enter, KeyCode::Up, KeyCode::Char('x')] {
            let key = KeyEvent::new(code, KeyModifiers::NONE);
            assert!(!is_close_key(&key));
        }
    }
}
