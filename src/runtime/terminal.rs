use std::io;

use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use tracing::warn;

type Restore = fn() -> io::Result<()>;

/// Raw mode plus the alternate screen, undone exactly once: by `restore`, or
/// on drop when setup fails halfway or the run bails out with `?`.
pub struct TerminalGuard {
    restore: Option<Restore>,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self::with_restore(restore_terminal);
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }

    fn with_restore(restore: Restore) -> Self {
        Self {
            restore: Some(restore),
        }
    }

    pub fn restore(&mut self) -> io::Result<()> {
        match self.restore.take() {
            Some(restore) => restore(),
            None => Ok(()),
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}

/// Put the terminal back before the default hook prints a panic message.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}
