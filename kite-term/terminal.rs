//! Raw mode and alternate screen, held for the lifetime of [`Terminal`].

use std::{
  io::{
    self,
    Stdout,
    Write,
  },
  panic::{
    set_hook,
    take_hook,
  },
};

use crossterm::{
  cursor::{
    MoveTo,
    Show,
  },
  execute,
  terminal::{
    self,
    Clear,
    ClearType,
    EnterAlternateScreen,
    LeaveAlternateScreen,
    disable_raw_mode,
    enable_raw_mode,
  },
};
use eyre::{
  Result,
  WrapErr,
};

pub struct Terminal {
  stdout: Stdout,
}

impl Terminal {
  /// Switches the terminal to raw mode. The previous state comes back when
  /// the value is dropped, or when the process panics.
  pub fn new() -> Result<Self> {
    let current_hook = take_hook();
    set_hook(Box::new(move |panic_info| {
      let _ = Self::terminate();
      current_hook(panic_info);
    }));

    enable_raw_mode().wrap_err("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).wrap_err("failed to enter the alternate screen")?;
    log::debug!("terminal in raw mode");
    Ok(Self { stdout })
  }

  /// Terminal dimensions as `(rows, cols)`.
  pub fn size() -> Result<(usize, usize)> {
    let (cols, rows) = terminal::size().wrap_err("failed to query the terminal size")?;
    Ok((rows as usize, cols as usize))
  }

  /// Writes a complete frame in one go.
  pub fn draw(&mut self, frame: &[u8]) -> Result<()> {
    self.stdout.write_all(frame)?;
    self.stdout.flush()?;
    Ok(())
  }

  fn terminate() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(
      stdout,
      Clear(ClearType::All),
      MoveTo(0, 0),
      Show,
      LeaveAlternateScreen
    )?;
    disable_raw_mode()
  }
}

impl Drop for Terminal {
  fn drop(&mut self) {
    if let Err(err) = Self::terminate() {
      log::error!("failed to restore the terminal: {err}");
    }
  }
}
