//! Syntax profiles and the registry that picks one for a file name.
//!
//! A [`Profile`] is the whole of what the highlighter knows about a language:
//! a line-comment marker and an ordered keyword list where every keyword is
//! either a primary (control flow) keyword or an alternate one (types,
//! constants). Profiles are immutable once built; the [`Registry`] hands out
//! shared references keyed by file extension.

use std::{
  collections::HashMap,
  path::Path,
  sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordClass {
  Primary,
  Alternate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
  text:  Box<[u8]>,
  class: KeywordClass,
}

impl Keyword {
  pub fn new(text: impl AsRef<[u8]>, class: KeywordClass) -> Self {
    Self {
      text: text.as_ref().into(),
      class,
    }
  }

  pub fn text(&self) -> &[u8] {
    &self.text
  }

  pub fn class(&self) -> KeywordClass {
    self.class
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
  name:           String,
  is_highlighted: bool,
  comment:        Box<[u8]>,
  keywords:       Vec<Keyword>,
}

impl Profile {
  pub const PLAIN_NAME: &'static str = "text";

  /// Profile used for files without a recognized extension. Highlighting is
  /// disabled, there is no comment marker and no keyword.
  pub fn plain() -> Self {
    Self {
      name:           Self::PLAIN_NAME.to_string(),
      is_highlighted: false,
      comment:        Box::default(),
      keywords:       Vec::new(),
    }
  }

  pub fn new(
    name: impl Into<String>,
    comment: impl AsRef<[u8]>,
    keywords: impl IntoIterator<Item = Keyword>,
  ) -> Self {
    Self {
      name:           name.into(),
      is_highlighted: true,
      comment:        comment.as_ref().into(),
      keywords:       keywords.into_iter().collect(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_highlighted(&self) -> bool {
    self.is_highlighted
  }

  /// Marker starting a comment that runs to the end of the line. Empty when
  /// the language has none.
  pub fn comment_marker(&self) -> &[u8] {
    &self.comment
  }

  pub fn keywords(&self) -> &[Keyword] {
    &self.keywords
  }
}

impl Default for Profile {
  fn default() -> Self {
    Self::plain()
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LanguageError {
  #[error("language definition has an empty name")]
  EmptyName,
  #[error("language `{0}` does not list any file extension")]
  NoExtensions(String),
  #[error("language `{0}` lists an empty extension")]
  EmptyExtension(String),
  #[error("language `{0}` lists an empty keyword")]
  EmptyKeyword(String),
}

/// User facing language definition, as found in `[[language]]` tables of the
/// configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LanguageConfig {
  pub name:       String,
  pub extensions: Vec<String>,
  #[serde(default)]
  pub comment:    String,
  #[serde(default)]
  pub keywords:   Vec<String>,
  /// Keywords painted with the alternate keyword color.
  #[serde(default)]
  pub types:      Vec<String>,
}

impl LanguageConfig {
  fn validate(&self) -> Result<(), LanguageError> {
    if self.name.trim().is_empty() {
      return Err(LanguageError::EmptyName);
    }
    if self.extensions.is_empty() {
      return Err(LanguageError::NoExtensions(self.name.clone()));
    }
    if self
      .extensions
      .iter()
      .any(|ext| ext.trim_start_matches('.').is_empty())
    {
      return Err(LanguageError::EmptyExtension(self.name.clone()));
    }
    if self
      .keywords
      .iter()
      .chain(self.types.iter())
      .any(String::is_empty)
    {
      return Err(LanguageError::EmptyKeyword(self.name.clone()));
    }
    Ok(())
  }

  fn profile(&self) -> Profile {
    let keywords = self
      .keywords
      .iter()
      .map(|kw| Keyword::new(kw, KeywordClass::Primary))
      .chain(
        self
          .types
          .iter()
          .map(|kw| Keyword::new(kw, KeywordClass::Alternate)),
      );
    Profile::new(self.name.clone(), &self.comment, keywords)
  }
}

struct Builtin {
  name:       &'static str,
  extensions: &'static [&'static str],
  comment:    &'static str,
  keywords:   &'static [&'static str],
  types:      &'static [&'static str],
}

impl Builtin {
  fn config(&self) -> LanguageConfig {
    let owned = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
    LanguageConfig {
      name:       self.name.to_string(),
      extensions: owned(self.extensions),
      comment:    self.comment.to_string(),
      keywords:   owned(self.keywords),
      types:      owned(self.types),
    }
  }
}

const BUILTINS: &[Builtin] = &[
  Builtin {
    name:       "c",
    extensions: &["c", "h"],
    comment:    "//",
    keywords:   &[
      "switch", "if", "while", "for", "break", "continue", "return", "else", "struct", "union",
      "typedef", "static", "enum", "class", "case",
    ],
    types:      &[
      "int", "long", "double", "float", "char", "unsigned", "signed", "void",
    ],
  },
  Builtin {
    name:       "go",
    extensions: &["go"],
    comment:    "//",
    keywords:   &[
      "break",
      "case",
      "chan",
      "const",
      "continue",
      "default",
      "defer",
      "else",
      "fallthrough",
      "for",
      "func",
      "go",
      "goto",
      "if",
      "import",
      "interface",
      "map",
      "package",
      "range",
      "return",
      "select",
      "struct",
      "switch",
      "type",
      "var",
    ],
    types:      &[
      "bool",
      "string",
      "int",
      "int8",
      "int16",
      "int32",
      "int64",
      "uint",
      "uint8",
      "uint16",
      "uint32",
      "uint64",
      "byte",
      "rune",
      "float32",
      "float64",
      "complex64",
      "complex128",
      "uintptr",
    ],
  },
  Builtin {
    name:       "python",
    extensions: &["py"],
    comment:    "#",
    keywords:   &[
      "as", "assert", "break", "continue", "del", "elif", "else", "except", "finally", "for",
      "from", "if", "import", "pass", "raise", "return", "try", "while", "with", "yield",
    ],
    types:      &[
      "False", "None", "True", "and", "class", "def", "global", "in", "is", "lambda",
      "nonlocal", "not", "or",
    ],
  },
  Builtin {
    name:       "rust",
    extensions: &["rs"],
    comment:    "//",
    keywords:   &[
      "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
      "extern", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
      "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "type",
      "unsafe", "use", "where", "while",
    ],
    types:      &[
      "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32",
      "i64", "i128", "isize", "f32", "f64", "String", "Vec", "Option", "Result", "Some", "None",
      "Ok", "Err", "true", "false",
    ],
  },
];

/// Maps file extensions to syntax profiles.
#[derive(Debug, Clone)]
pub struct Registry {
  languages:    Vec<Arc<Profile>>,
  extensions:   Vec<Vec<String>>,
  by_extension: HashMap<String, usize>,
  plain:        Arc<Profile>,
}

impl Default for Registry {
  fn default() -> Self {
    Self::builtin()
  }
}

impl Registry {
  /// Registry holding only the plain profile.
  pub fn empty() -> Self {
    Self {
      languages:    Vec::new(),
      extensions:   Vec::new(),
      by_extension: HashMap::new(),
      plain:        Arc::new(Profile::plain()),
    }
  }

  pub fn builtin() -> Self {
    let mut registry = Self::empty();
    for builtin in BUILTINS {
      // Built-in definitions are known to be valid.
      let config = builtin.config();
      registry.push(config.profile(), &config.extensions);
    }
    registry
  }

  /// Built-in languages extended (or replaced, when the name matches) by the
  /// given definitions.
  pub fn with_languages(
    configs: impl IntoIterator<Item = LanguageConfig>,
  ) -> Result<Self, LanguageError> {
    let mut registry = Self::builtin();
    for config in configs {
      registry.insert(config)?;
    }
    Ok(registry)
  }

  pub fn insert(&mut self, config: LanguageConfig) -> Result<(), LanguageError> {
    config.validate()?;
    let profile = config.profile();
    match self
      .languages
      .iter()
      .position(|existing| existing.name() == profile.name())
    {
      Some(idx) => {
        log::debug!("replacing language profile `{}`", profile.name());
        self.languages[idx] = Arc::new(profile);
        self.extensions[idx] = normalize_extensions(&config.extensions);
        self.reindex();
      },
      None => {
        log::debug!("adding language profile `{}`", profile.name());
        self.push(profile, &config.extensions);
      },
    }
    Ok(())
  }

  fn push(&mut self, profile: Profile, extensions: &[String]) {
    self.languages.push(Arc::new(profile));
    self.extensions.push(normalize_extensions(extensions));
    self.reindex();
  }

  fn reindex(&mut self) {
    self.by_extension.clear();
    for (idx, extensions) in self.extensions.iter().enumerate() {
      for ext in extensions {
        self.by_extension.insert(ext.clone(), idx);
      }
    }
  }

  pub fn plain(&self) -> Arc<Profile> {
    self.plain.clone()
  }

  pub fn languages(&self) -> impl Iterator<Item = &Profile> {
    self.languages.iter().map(Arc::as_ref)
  }

  pub fn for_extension(&self, extension: &str) -> Arc<Profile> {
    let extension = extension.trim_start_matches('.');
    self
      .by_extension
      .get(extension)
      .map(|&idx| self.languages[idx].clone())
      .unwrap_or_else(|| self.plain())
  }

  /// Profile for the text after the last `.` of the file name. A dotfile
  /// such as `.py` counts as having that extension.
  pub fn for_path(&self, path: impl AsRef<Path>) -> Arc<Profile> {
    path
      .as_ref()
      .file_name()
      .and_then(|name| name.to_str())
      .and_then(|name| name.rsplit_once('.'))
      .map(|(_, ext)| self.for_extension(ext))
      .unwrap_or_else(|| self.plain())
  }
}

fn normalize_extensions(extensions: &[String]) -> Vec<String> {
  extensions
    .iter()
    .map(|ext| ext.trim_start_matches('.').to_string())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lua() -> LanguageConfig {
    LanguageConfig {
      name:       "lua".into(),
      extensions: vec![".lua".into()],
      comment:    "--".into(),
      keywords:   vec!["if".into(), "then".into(), "end".into()],
      types:      vec!["nil".into()],
    }
  }

  #[test]
  fn picks_profile_by_extension() {
    let registry = Registry::builtin();
    assert_eq!(registry.for_path("main.c").name(), "c");
    assert_eq!(registry.for_path("include/main.h").name(), "c");
    assert_eq!(registry.for_path("main.go").name(), "go");
    assert_eq!(registry.for_path("script.py").name(), "python");
    assert_eq!(registry.for_path("lib.rs").name(), "rust");
    assert!(registry.for_path("lib.rs").is_highlighted());
  }

  #[test]
  fn dotfile_name_is_its_extension() {
    let registry = Registry::builtin();
    assert_eq!(registry.for_path(".py").name(), "python");
    assert_eq!(registry.for_path("src/.rs").name(), "rust");
    assert!(!registry.for_path("main.").is_highlighted());
    assert!(!registry.for_path("dir.c/Makefile").is_highlighted());
  }

  #[test]
  fn unknown_extension_is_plain() {
    let registry = Registry::builtin();
    for path in ["notes.txt", "Makefile", "", "archive.tar.gz", "MAIN.C"] {
      let profile = registry.for_path(path);
      assert!(!profile.is_highlighted(), "{path}");
      assert!(profile.comment_marker().is_empty());
      assert!(profile.keywords().is_empty());
    }
  }

  #[test]
  fn keyword_classes() {
    let registry = Registry::builtin();
    let c = registry.for_extension("c");
    let class_of = |text: &str| {
      c.keywords()
        .iter()
        .find(|kw| kw.text() == text.as_bytes())
        .map(Keyword::class)
    };
    assert_eq!(class_of("while"), Some(KeywordClass::Primary));
    assert_eq!(class_of("int"), Some(KeywordClass::Alternate));
    assert_eq!(class_of("main"), None);
  }

  #[test]
  fn user_language_is_added() {
    let registry = Registry::with_languages([lua()]).unwrap();
    let profile = registry.for_path("init.lua");
    assert_eq!(profile.name(), "lua");
    assert_eq!(profile.comment_marker(), b"--");
    assert_eq!(profile.keywords().len(), 4);
    assert_eq!(profile.keywords()[3].class(), KeywordClass::Alternate);
  }

  #[test]
  fn user_language_replaces_builtin_by_name() {
    let python = LanguageConfig {
      name:       "python".into(),
      extensions: vec!["pyw".into()],
      comment:    "#".into(),
      keywords:   vec!["def".into()],
      types:      Vec::new(),
    };
    let registry = Registry::with_languages([python]).unwrap();
    assert_eq!(registry.for_path("a.pyw").name(), "python");
    // the replaced definition no longer claims `py`
    assert!(!registry.for_path("a.py").is_highlighted());
    assert_eq!(registry.languages().count(), BUILTINS.len());
  }

  #[test]
  fn invalid_languages_are_rejected() {
    let mut config = lua();
    config.name = " ".into();
    assert_eq!(
      Registry::with_languages([config]).unwrap_err(),
      LanguageError::EmptyName
    );

    let mut config = lua();
    config.extensions.clear();
    assert_eq!(
      Registry::with_languages([config]).unwrap_err(),
      LanguageError::NoExtensions("lua".into())
    );

    let mut config = lua();
    config.extensions.push(".".into());
    assert_eq!(
      Registry::with_languages([config]).unwrap_err(),
      LanguageError::EmptyExtension("lua".into())
    );

    let mut config = lua();
    config.types.push(String::new());
    assert_eq!(
      Registry::with_languages([config]).unwrap_err(),
      LanguageError::EmptyKeyword("lua".into())
    );
  }
}
