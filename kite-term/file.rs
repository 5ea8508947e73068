use std::{
  fs::{
    self,
    OpenOptions,
  },
  io::{
    self,
    Write,
  },
  path::Path,
};

use eyre::{
  Result,
  WrapErr,
};

/// Contents of `path`, or `None` when it does not exist yet.
pub fn load(path: &Path) -> Result<Option<Vec<u8>>> {
  match fs::read(path) {
    Ok(bytes) => {
      log::info!("loaded {} ({} bytes)", path.display(), bytes.len());
      Ok(Some(bytes))
    },
    Err(err) if err.kind() == io::ErrorKind::NotFound => {
      log::info!("{} does not exist, starting a new file", path.display());
      Ok(None)
    },
    Err(err) => Err(err).wrap_err_with(|| format!("failed to open {}", path.display())),
  }
}

/// Replaces the contents of `path` with `bytes`, creating it with mode 0644.
pub fn save(path: &Path, bytes: &[u8]) -> io::Result<()> {
  let mut options = OpenOptions::new();
  options.write(true).create(true).truncate(true);
  #[cfg(unix)]
  {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o644);
  }

  let mut file = options.open(path)?;
  file.write_all(bytes)?;
  file.flush()?;
  log::info!("wrote {} bytes to {}", bytes.len(), path.display());
  Ok(())
}
