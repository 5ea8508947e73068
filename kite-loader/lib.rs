//! Where kite keeps its files, and how configuration layers are combined.

use std::{
  path::{
    Path,
    PathBuf,
  },
  sync::OnceLock,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};
use eyre::{
  Result,
  WrapErr,
};

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

const APP_DIR: &str = "kite";

/// Directory holding a project's local overrides.
pub const WORKSPACE_DIR: &str = ".kite";

pub fn initialize_config_file(specified_file: Option<PathBuf>) {
  let config_file = specified_file.unwrap_or_else(default_config_file);
  CONFIG_FILE.set(config_file).ok();
}

pub fn initialize_log_file(specified_file: Option<PathBuf>) {
  let log_file = specified_file.unwrap_or_else(default_log_file);
  ensure_parent_dir(&log_file);
  LOG_FILE.set(log_file).ok();
}

pub fn config_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("KITE_CONFIG_DIR") {
    return expand_tilde(Path::new(&dir));
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.config_dir().join(APP_DIR),
    Err(err) => fallback_dir(err),
  }
}

pub fn cache_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("KITE_CACHE_DIR") {
    return expand_tilde(Path::new(&dir));
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.cache_dir().join(APP_DIR),
    Err(err) => fallback_dir(err),
  }
}

fn fallback_dir(err: impl std::fmt::Display) -> PathBuf {
  log::warn!("no home directory ({err}), using the temp dir");
  std::env::temp_dir().join(APP_DIR)
}

pub fn config_file() -> PathBuf {
  CONFIG_FILE.get_or_init(default_config_file).clone()
}

pub fn log_file() -> PathBuf {
  LOG_FILE
    .get_or_init(|| {
      let path = default_log_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

/// `.kite/config.toml` below the current directory.
pub fn workspace_config_file() -> PathBuf {
  let cwd = std::env::current_dir().unwrap_or_default();
  workspace_config_file_in(cwd)
}

pub fn workspace_config_file_in(dir: impl AsRef<Path>) -> PathBuf {
  dir.as_ref().join(WORKSPACE_DIR).join("config.toml")
}

pub fn default_log_file() -> PathBuf {
  cache_dir().join("kite.log")
}

fn default_config_file() -> PathBuf {
  config_dir().join("config.toml")
}

/// Reads a TOML document. A missing file is `Ok(None)`, a malformed one an
/// error naming the file.
pub fn read_toml(path: &Path) -> Result<Option<toml::Value>> {
  let text = match std::fs::read_to_string(path) {
    Ok(text) => text,
    Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
    Err(err) => return Err(err).wrap_err_with(|| format!("failed to read {}", path.display())),
  };
  let table: toml::Table =
    toml::from_str(&text).wrap_err_with(|| format!("failed to parse {}", path.display()))?;
  log::debug!("loaded config layer {}", path.display());
  Ok(Some(toml::Value::Table(table)))
}

/// Reads every existing file in `paths` and merges them in order, later files
/// winning. No files at all gives an empty table.
pub fn merged_config<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<toml::Value> {
  let mut merged = toml::Value::Table(toml::Table::new());
  for path in paths {
    if let Some(layer) = read_toml(path.as_ref())? {
      merged = overlay(merged, layer, 3);
    }
  }
  Ok(merged)
}

/// User config merged with the workspace one.
pub fn user_config() -> Result<toml::Value> {
  merged_config([config_file(), workspace_config_file()])
}

/// Lays `upper` over `base`. Tables are combined key by key and arrays merge
/// entries that share a `name`, for `depth` levels. Anything else, or anything
/// deeper, is taken from `upper` as is.
pub fn overlay(base: toml::Value, upper: toml::Value, depth: usize) -> toml::Value {
  use toml::Value;

  if depth == 0 {
    return upper;
  }
  match (base, upper) {
    (Value::Table(base), Value::Table(upper)) => Value::Table(overlay_table(base, upper, depth - 1)),
    (Value::Array(base), Value::Array(upper)) => Value::Array(overlay_named(base, upper, depth - 1)),
    (_, upper) => upper,
  }
}

fn overlay_table(mut base: toml::Table, upper: toml::Table, depth: usize) -> toml::Table {
  for (key, value) in upper {
    let value = match base.remove(&key) {
      Some(old) => overlay(old, value, depth),
      None => value,
    };
    base.insert(key, value);
  }
  base
}

fn entry_name(entry: &toml::Value) -> Option<&str> {
  entry.get("name").and_then(toml::Value::as_str)
}

/// A `[[language]]` entry whose name is already present updates that entry
/// where it stands; unnamed or new entries are appended.
fn overlay_named(mut base: Vec<toml::Value>, upper: Vec<toml::Value>, depth: usize) -> Vec<toml::Value> {
  for entry in upper {
    let slot = entry_name(&entry).and_then(|name| {
      base
        .iter()
        .position(|old| entry_name(old) == Some(name))
    });
    match slot {
      Some(index) => {
        let old = std::mem::replace(&mut base[index], toml::Value::Boolean(false));
        base[index] = overlay(old, entry, depth);
      },
      None => base.push(entry),
    }
  }
  base
}

fn expand_tilde(path: &Path) -> PathBuf {
  match path.strip_prefix("~") {
    Ok(rest) => {
      etcetera::home_dir()
        .map(|home| home.join(rest))
        .unwrap_or_else(|_| path.to_path_buf())
    },
    Err(_) => path.to_path_buf(),
  }
}

pub fn ensure_parent_dir(path: &Path) {
  if let Some(parent) = path.parent()
    && !parent.exists()
  {
    std::fs::create_dir_all(parent).ok();
  }
}
