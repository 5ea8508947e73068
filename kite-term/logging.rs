use std::path::Path;

use eyre::{
  Result,
  WrapErr,
};
use log::LevelFilter;

pub fn level_for(verbosity: u8) -> LevelFilter {
  match verbosity {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

/// Sends log records to `log_file`. The terminal belongs to the editor, so
/// nothing is ever logged to stdout or stderr.
pub fn setup_logging(verbosity: u8, log_file: &Path) -> Result<()> {
  let file = fern::log_file(log_file)
    .wrap_err_with(|| format!("failed to open log file {}", log_file.display()))?;

  fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ))
    })
    .level(level_for(verbosity))
    .chain(file)
    .apply()
    .wrap_err("failed to install the logger")?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn verbosity_levels() {
    assert_eq!(level_for(0), LevelFilter::Warn);
    assert_eq!(level_for(1), LevelFilter::Info);
    assert_eq!(level_for(2), LevelFilter::Debug);
    assert_eq!(level_for(7), LevelFilter::Trace);
  }
}
