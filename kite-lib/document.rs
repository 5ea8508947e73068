//! Line buffer of an open file.
//!
//! A [`Document`] is an ordered list of [`Line`]s. Every line carries its
//! bytes and a parallel classification produced by
//! [`highlight_line`](crate::highlight::highlight_line). The classification
//! is recomputed synchronously by every operation that touches a line, so
//! `line.highlight().len() == line.text().len()` holds at all times.
//!
//! Edit operations take the cursor by `&mut` and leave it where the edit
//! puts it. Requests that make no sense at the current position (deleting at
//! the start of the buffer, deleting past the last line) are no-ops and
//! report `false`.

use std::{
  borrow::Cow,
  path::{
    Path,
    PathBuf,
  },
  sync::Arc,
};

use crate::{
  highlight::{
    Highlight,
    highlight_line,
  },
  position::Position,
  syntax::Profile,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
  text:      Vec<u8>,
  highlight: Vec<Highlight>,
}

impl Line {
  fn new(text: Vec<u8>, profile: &Profile) -> Self {
    let highlight = highlight_line(&text, profile);
    Self { text, highlight }
  }

  pub fn text(&self) -> &[u8] {
    &self.text
  }

  pub fn highlight(&self) -> &[Highlight] {
    &self.highlight
  }

  pub fn len(&self) -> usize {
    self.text.len()
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  fn rehighlight(&mut self, profile: &Profile) {
    self.highlight = highlight_line(&self.text, profile);
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DocumentFlags {
  /// Edited since the last load or save.
  pub modified: bool,
  /// Never written to disk.
  pub new_file: bool,
}

#[derive(Debug, Clone)]
pub struct Document {
  lines:   Vec<Line>,
  path:    Option<PathBuf>,
  profile: Arc<Profile>,
  flags:   DocumentFlags,
}

impl Default for Document {
  fn default() -> Self {
    Self::new(Arc::new(Profile::plain()))
  }
}

impl Document {
  /// An empty, unnamed buffer.
  pub fn new(profile: Arc<Profile>) -> Self {
    Self {
      lines: Vec::new(),
      path: None,
      profile,
      flags: DocumentFlags {
        modified: false,
        new_file: true,
      },
    }
  }

  /// Builds a clean document from file contents. Lines are split on `\n`
  /// and lose any trailing `\r`; a final newline does not start a new line.
  pub fn from_bytes(bytes: &[u8], profile: Arc<Profile>) -> Self {
    let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
    if lines.last().is_some_and(|last| last.is_empty()) {
      lines.pop();
    }

    let lines = lines
      .into_iter()
      .map(|line| {
        let end = line
          .iter()
          .rposition(|&b| b != b'\r')
          .map_or(0, |idx| idx + 1);
        Line::new(line[..end].to_vec(), &profile)
      })
      .collect();

    Self {
      lines,
      path: None,
      profile,
      flags: DocumentFlags::default(),
    }
  }

  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  pub fn set_path(&mut self, path: impl Into<PathBuf>) {
    self.path = Some(path.into());
  }

  /// File name shown to the user.
  pub fn display_name(&self) -> Cow<'_, str> {
    match &self.path {
      Some(path) => path.to_string_lossy(),
      None => Cow::Borrowed("[No Name]"),
    }
  }

  pub fn profile(&self) -> &Arc<Profile> {
    &self.profile
  }

  /// Switches the syntax profile and reclassifies every line.
  pub fn set_profile(&mut self, profile: Arc<Profile>) {
    log::debug!(
      "switching `{}` to profile `{}`",
      self.display_name(),
      profile.name()
    );
    self.profile = profile;
    for line in &mut self.lines {
      line.rehighlight(&self.profile);
    }
  }

  pub fn flags(&self) -> DocumentFlags {
    self.flags
  }

  pub fn is_modified(&self) -> bool {
    self.flags.modified
  }

  pub fn mark_saved(&mut self) {
    self.flags.modified = false;
    self.flags.new_file = false;
  }

  /// Number of lines in the buffer.
  pub fn used_rows(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn lines(&self) -> &[Line] {
    &self.lines
  }

  pub fn line(&self, row: usize) -> Option<&Line> {
    self.lines.get(row)
  }

  /// Length of line `row`, 0 past the last line.
  pub fn line_len(&self, row: usize) -> usize {
    self.lines.get(row).map_or(0, Line::len)
  }

  /// Inserts a line before `index`. `index == used_rows()` appends; anything
  /// larger is ignored.
  pub fn insert_line(&mut self, index: usize, text: impl Into<Vec<u8>>) -> bool {
    if index > self.lines.len() {
      return false;
    }
    self
      .lines
      .insert(index, Line::new(text.into(), &self.profile));
    self.flags.modified = true;
    true
  }

  /// Inserts `byte` at the cursor and moves the cursor past it. A cursor
  /// parked below the last line first gets an empty line to type into.
  pub fn insert_char(&mut self, cursor: &mut Position, byte: u8) {
    if cursor.row >= self.lines.len() {
      cursor.row = self.lines.len();
      self.insert_line(cursor.row, Vec::new());
    }

    let line = &mut self.lines[cursor.row];
    let col = cursor.col.min(line.len());
    line.text.insert(col, byte);
    line.rehighlight(&self.profile);
    cursor.col = col + 1;
    self.flags.modified = true;
  }

  /// Breaks the line at the cursor. The cursor moves to the start of the new
  /// line.
  pub fn split_line(&mut self, cursor: &mut Position) {
    let row = cursor.row.min(self.lines.len());
    let col = cursor.col.min(self.line_len(row));

    if col == 0 {
      self.insert_line(row, Vec::new());
    } else {
      let line = &mut self.lines[row];
      let tail = line.text.split_off(col);
      line.rehighlight(&self.profile);
      self.insert_line(row + 1, tail);
    }

    *cursor = Position::new(row + 1, 0);
  }

  /// Removes the byte before the cursor, joining the line onto the previous
  /// one when the cursor is at column 0.
  pub fn delete_char(&mut self, cursor: &mut Position) -> bool {
    if cursor.row >= self.lines.len() {
      return false;
    }
    let col = cursor.col.min(self.lines[cursor.row].len());

    if col > 0 {
      let line = &mut self.lines[cursor.row];
      line.text.remove(col - 1);
      line.rehighlight(&self.profile);
      cursor.col = col - 1;
    } else if cursor.row > 0 {
      let line = self.lines.remove(cursor.row);
      let above = &mut self.lines[cursor.row - 1];
      *cursor = Position::new(cursor.row - 1, above.len());
      above.text.extend_from_slice(&line.text);
      above.rehighlight(&self.profile);
    } else {
      return false;
    }

    self.flags.modified = true;
    true
  }

  /// Removes the byte under the cursor, joining the next line when the
  /// cursor is at the end of its line.
  pub fn delete_forward(&mut self, cursor: &mut Position) -> bool {
    if cursor.row >= self.lines.len() {
      return false;
    }
    let len = self.lines[cursor.row].len();

    let mut next = if cursor.col < len {
      Position::new(cursor.row, cursor.col + 1)
    } else if cursor.row + 1 < self.lines.len() {
      Position::new(cursor.row + 1, 0)
    } else {
      return false;
    };

    let deleted = self.delete_char(&mut next);
    *cursor = next;
    deleted
  }

  /// Every line followed by a single `\n`.
  pub fn serialize(&self) -> Vec<u8> {
    let len = self.lines.iter().map(|line| line.len() + 1).sum();
    let mut out = Vec::with_capacity(len);
    for line in &self.lines {
      out.extend_from_slice(&line.text);
      out.push(b'\n');
    }
    out
  }
}
