//! Single pass, per-line syntax classification.
//!
//! [`highlight_line`] walks a line once from left to right and assigns every
//! byte a [`Highlight`]. There is no state carried between lines, so a line
//! can be reclassified on its own after every edit.

use crate::syntax::{
  KeywordClass,
  Profile,
};

/// Classification of a single byte.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Highlight {
  #[default]
  None,
  Number,
  String,
  Comment,
  Keyword,
  KeywordAlt,
}

impl Highlight {
  /// SGR parameter used to paint this class.
  pub const fn sgr(self) -> u8 {
    match self {
      Self::None => 0,
      Self::Number => 34,
      Self::String => 32,
      Self::Comment => 36,
      Self::Keyword => 35,
      Self::KeywordAlt => 33,
    }
  }
}

impl From<KeywordClass> for Highlight {
  fn from(class: KeywordClass) -> Self {
    match class {
      KeywordClass::Primary => Self::Keyword,
      KeywordClass::Alternate => Self::KeywordAlt,
    }
  }
}

pub const DELIMITERS: &[u8] = b",.()+-/*=~%<>[]; \t\n\r";

#[inline]
pub fn is_delimiter(byte: u8) -> bool {
  DELIMITERS.contains(&byte)
}

/// `true` when `rest` starts with `word` and the word is not the prefix of a
/// longer identifier.
fn starts_with_word(rest: &[u8], word: &[u8]) -> bool {
  rest.starts_with(word)
    && rest
      .get(word.len())
      .is_none_or(|&next| is_delimiter(next))
}

/// Classifies every byte of `text`. The result always has `text.len()`
/// entries.
pub fn highlight_line(text: &[u8], profile: &Profile) -> Vec<Highlight> {
  let mut highlights = vec![Highlight::None; text.len()];
  let comment = profile.comment_marker();

  let mut new_word = true;
  // Opening quote of the string literal we are in, 0 outside of strings.
  let mut in_string = 0u8;
  let mut i = 0;

  while i < text.len() {
    let byte = text[i];
    let rest = &text[i..];

    if in_string == 0 && !comment.is_empty() && rest.starts_with(comment) {
      highlights[i..].fill(Highlight::Comment);
      break;
    }

    if in_string != 0 {
      highlights[i] = Highlight::String;
      if byte == b'\\' && i + 1 < text.len() {
        highlights[i + 1] = Highlight::String;
        i += 2;
        continue;
      }
      if byte == in_string {
        in_string = 0;
      }
      i += 1;
      continue;
    }

    if byte == b'"' || byte == b'\'' {
      in_string = byte;
      highlights[i] = Highlight::String;
      i += 1;
      continue;
    }

    if new_word && rest.starts_with(b"0x") {
      let end = rest[2..]
        .iter()
        .position(|&b| is_delimiter(b))
        .map_or(text.len(), |len| i + 2 + len);
      if text[i + 2..end].iter().all(u8::is_ascii_hexdigit) {
        highlights[i..end].fill(Highlight::Number);
        new_word = false;
        i = end;
        continue;
      }
    }

    let prev = if i > 0 {
      highlights[i - 1]
    } else {
      Highlight::None
    };

    if (byte.is_ascii_digit() && (new_word || prev == Highlight::Number))
      || (byte == b'.' && prev == Highlight::Number)
    {
      highlights[i] = Highlight::Number;
    } else if new_word {
      let keyword = profile
        .keywords()
        .iter()
        .find(|keyword| starts_with_word(rest, keyword.text()));
      if let Some(keyword) = keyword {
        let len = keyword.text().len();
        highlights[i..i + len].fill(keyword.class().into());
        new_word = is_delimiter(text[i + len - 1]);
        i += len;
        continue;
      }
    }

    new_word = is_delimiter(byte);
    i += 1;
  }

  highlights
}

#[cfg(test)]
mod tests {
  use quickcheck::quickcheck;

  use super::*;
  use crate::syntax::Registry;

  fn c() -> std::sync::Arc<Profile> {
    Registry::builtin().for_extension("c")
  }

  /// Compact rendering of a classification: one char per byte.
  fn classes(text: &str, profile: &Profile) -> String {
    highlight_line(text.as_bytes(), profile)
      .into_iter()
      .map(|hl| {
        match hl {
          Highlight::None => '.',
          Highlight::Number => 'n',
          Highlight::String => 's',
          Highlight::Comment => 'c',
          Highlight::Keyword => 'k',
          Highlight::KeywordAlt => 't',
        }
      })
      .collect()
  }

  #[test]
  fn c_declaration_with_hex_and_comment() {
    let text = "int x = 0x1A; // note";
    assert_eq!(classes(text, &c()), "ttt.....nnnn..ccccccc");
  }

  #[test]
  fn comment_swallows_everything_after_marker() {
    assert_eq!(classes("// if \"x\" 12", &c()), "cccccccccccc");
    assert_eq!(classes("a//", &c()), ".cc");
  }

  #[test]
  fn comment_marker_inside_string_is_string() {
    assert_eq!(classes("\"//\" x", &c()), "ssss..");
  }

  #[test]
  fn strings_and_escapes() {
    assert_eq!(classes(r#"'a\'b' c"#, &c()), "ssssss..");
    assert_eq!(classes(r#""\"" 1"#, &c()), "ssss.n");
    // unterminated string runs to the end of the line
    assert_eq!(classes("\"abc", &c()), "ssss");
    // a trailing backslash has nothing to escape
    assert_eq!(classes("\"a\\", &c()), "sss");
  }

  #[test]
  fn numbers_extend_from_word_start() {
    assert_eq!(classes("12 3.14 x1 1.", &c()), "nn.nnnn....nn");
    assert_eq!(classes("a12", &c()), "...");
    assert_eq!(classes("(42)", &c()), ".nn.");
  }

  #[test]
  fn invalid_hex_is_not_a_number_run() {
    assert_eq!(classes("0xfg", &c()), "n...");
    assert_eq!(classes("0xff+1", &c()), "nnnn.n");
    assert_eq!(classes("x0xff", &c()), ".....");
  }

  #[test]
  fn keywords_match_whole_words_only() {
    assert_eq!(classes("if iffy", &c()), "kk.....");
    assert_eq!(classes("return;", &c()), "kkkkkk.");
    assert_eq!(classes("(char)c", &c()), ".tttt..");
    assert_eq!(classes("myint", &c()), ".....");
    assert_eq!(classes("int_t", &c()), ".....");
  }

  #[test]
  fn keyword_at_end_of_line() {
    assert_eq!(classes("x = void", &c()), "....tttt");
  }

  #[test]
  fn plain_profile_still_classifies_literals() {
    let plain = Profile::plain();
    assert_eq!(classes("if 12 // \"s\"", &plain), "...nn....sss");
  }

  #[test]
  fn python_comment_marker() {
    let py = Registry::builtin().for_extension("py");
    assert_eq!(classes("def f(): # hi", &py), "ttt......cccc");
  }

  quickcheck! {
    fn classification_is_as_long_as_the_text(text: Vec<u8>) -> bool {
      highlight_line(&text, &c()).len() == text.len()
    }

    fn comment_tail_is_entirely_comment(prefix: String, tail: String) -> bool {
      let prefix: String = prefix.chars().filter(|ch| !matches!(ch, '"' | '\'' | '/')).collect();
      let line = format!("{prefix}//{tail}");
      let highlights = highlight_line(line.as_bytes(), &c());
      highlights[prefix.len()..].iter().all(|&hl| hl == Highlight::Comment)
    }
  }
}
