//! Terminal setup and RAII restoration for the taskboard TUI.
//!
//! [`Tui`] enters raw mode and the alternate screen on creation and restores
//! the terminal when dropped. [`install_panic_hook`] covers the case where a
//! panic unwinds before the drop handler runs.
//!
//! # Example
//!
//! ```ignore
//! use taskboard_client::tui::{install_panic_hook, Tui};
//!
//! install_panic_hook();
//! let mut tui = Tui::new()?;
//! tui.draw(|frame| { /* render */ })?;
//! ```

use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::error::TuiError;

/// Installs a panic hook that restores the terminal before the panic message
/// is printed.
///
/// Call once at startup, before creating a [`Tui`]. Restoration errors are
/// ignored since the terminal may already be in a bad state.
pub fn install_panic_hook() {
    let previous_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        previous_hook(panic_info);
    }));
}

/// Ratatui terminal that restores the shell on drop.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl Tui {
    /// Enables raw mode, enters the alternate screen and hides the cursor.
    ///
    /// # Errors
    ///
    /// Returns `TuiError::TerminalInit` if any step fails. Steps already
    /// taken are undone before returning.
    pub fn new() -> Result<Self, TuiError> {
        enable_raw_mode().map_err(TuiError::TerminalInit)?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(TuiError::TerminalInit(e));
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(t) => t,
            Err(e) => {
                let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
                let _ = disable_raw_mode();
                return Err(TuiError::TerminalInit(e));
            }
        };

        Ok(Self {
            terminal,
            restored: false,
        })
    }

    /// Draws one frame.
    ///
    /// # Errors
    ///
    /// Returns `TuiError::Render` if the frame cannot be flushed.
    pub fn draw<F>(&mut self, f: F) -> Result<(), TuiError>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f).map_err(TuiError::Render)?;
        Ok(())
    }

    /// Restores the terminal. Later calls, and the drop handler, do nothing.
    ///
    /// # Errors
    ///
    /// Returns `TuiError::Render` if the terminal cannot be restored.
    pub fn restore(&mut self) -> Result<(), TuiError> {
        if !take_restore(&mut self.restored) {
            return Ok(());
        }

        execute!(io::stdout(), Show, LeaveAlternateScreen).map_err(TuiError::Render)?;
        disable_raw_mode().map_err(TuiError::Render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if take_restore(&mut self.restored) {
            let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

/// Marks the terminal as restored. Returns `true` only the first time, when
/// the cleanup still has to run.
fn take_restore(restored: &mut bool) -> bool {
    !std::mem::replace(restored, true)
}

impl std::fmt::Debug for Tui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tui")
            .field("restored", &self.restored)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Creating a `Tui` needs a real terminal, so these tests cover the
    // restore bookkeeping and the panic hook only.

    #[test]
    fn tui_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Tui>();
    }

    #[test]
    fn restore_runs_cleanup_once() {
        let mut restored = false;

        assert!(take_restore(&mut restored), "first restore cleans up");
        assert!(restored);
        assert!(!take_restore(&mut restored), "second restore is a no-op");
        assert!(!take_restore(&mut restored), "drop after restore is a no-op");
    }

    #[test]
    fn install_panic_hook_can_be_chained() {
        install_panic_hook();
        install_panic_hook();

        // Put back the default hook so later test panics skip the terminal reset.
        let _ = panic::take_hook();
    }
}
