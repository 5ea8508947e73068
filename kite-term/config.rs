//! User configuration: `config.toml` from the config directory merged with
//! the workspace `.kite/config.toml`.

use std::time::Duration;

use eyre::{
  Result,
  WrapErr,
};
use kite_lib::syntax::{
  LanguageConfig,
  Registry,
};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  pub editor:   EditorConfig,
  pub language: Vec<LanguageConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EditorConfig {
  /// Seconds a status message stays on screen.
  pub message_timeout: u64,
  pub welcome_banner:  bool,
  /// Milliseconds to wait for the rest of an escape sequence.
  pub escape_timeout:  u64,
}

impl Default for EditorConfig {
  fn default() -> Self {
    Self {
      message_timeout: 5,
      welcome_banner:  true,
      escape_timeout:  50,
    }
  }
}

impl EditorConfig {
  pub fn message_timeout(&self) -> Duration {
    Duration::from_secs(self.message_timeout)
  }

  pub fn escape_timeout(&self) -> Duration {
    Duration::from_millis(self.escape_timeout)
  }
}

impl Config {
  pub fn from_value(value: toml::Value) -> Result<Self> {
    value.try_into().wrap_err("invalid configuration")
  }

  /// Loads and merges every config layer. Missing files mean defaults.
  pub fn load() -> Result<Self> {
    let value = kite_loader::user_config()?;
    Self::from_value(value)
  }

  /// Built-in languages plus the configured ones.
  pub fn registry(&self) -> Result<Registry> {
    Registry::with_languages(self.language.iter().cloned()).wrap_err("invalid [[language]] entry")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(text: &str) -> Result<Config> {
    Config::from_value(toml::Value::Table(toml::from_str(text).unwrap()))
  }

  #[test]
  fn empty_config_is_default() {
    let config = parse("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.editor.message_timeout(), Duration::from_secs(5));
    assert_eq!(config.editor.escape_timeout(), Duration::from_millis(50));
    assert!(config.editor.welcome_banner);
  }

  #[test]
  fn editor_section_is_partial() {
    let config = parse("[editor]\nwelcome-banner = false").unwrap();
    assert!(!config.editor.welcome_banner);
    assert_eq!(config.editor.message_timeout, 5);
  }

  #[test]
  fn unknown_keys_are_rejected() {
    assert!(parse("[editor]\ntab-width = 4").is_err());
    assert!(parse("theme = \"dark\"").is_err());
  }

  #[test]
  fn languages_extend_the_registry() {
    let config = parse(
      r#"
      [[language]]
      name = "lua"
      extensions = ["lua"]
      comment = "--"
      keywords = ["local", "end"]
      types = ["nil"]
      "#,
    )
    .unwrap();
    let registry = config.registry().unwrap();
    assert_eq!(registry.for_extension("lua").name(), "lua");
    assert_eq!(registry.for_extension("c").name(), "c");
  }

  #[test]
  fn invalid_language_is_an_error() {
    let config = parse("[[language]]\nname = \"x\"\nextensions = []").unwrap();
    assert!(config.registry().is_err());
  }
}
