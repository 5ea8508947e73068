//! Cursor movement over a [`Document`].
//!
//! Moves never fail: a move that would leave the buffer is a no-op, and after
//! every move the column is clamped to the length of the line the cursor
//! lands on.
//!
//! # Usage
//!
//! ```
//! use kite_lib::{
//!   document::Document,
//!   movement::{Direction, move_cursor},
//!   position::Position,
//! };
//!
//! let doc = Document::from_bytes(b"ab\nc", Default::default());
//! let mut cursor = Position::new(0, 2);
//!
//! // Right at the end of a line wraps to the next one.
//! move_cursor(&doc, &mut cursor, Direction::Right);
//! assert_eq!(cursor, Position::new(1, 0));
//! ```

use crate::{
  document::Document,
  position::Position,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
  Up,
  Down,
  Left,
  Right,
}

pub fn move_cursor(doc: &Document, cursor: &mut Position, direction: Direction) {
  let rows = doc.used_rows();

  match direction {
    Direction::Up => {
      cursor.row = cursor.row.saturating_sub(1);
    },
    Direction::Down => {
      if cursor.row + 1 < rows {
        cursor.row += 1;
      }
    },
    Direction::Left => {
      if cursor.col > 0 {
        cursor.col -= 1;
      } else if cursor.row > 0 {
        cursor.row -= 1;
        cursor.col = doc.line_len(cursor.row);
      }
    },
    Direction::Right => {
      if cursor.row < rows {
        if cursor.col < doc.line_len(cursor.row) {
          cursor.col += 1;
        } else if cursor.row + 1 < rows {
          *cursor = Position::new(cursor.row + 1, 0);
        }
      }
    },
  }

  cursor.col = cursor.col.min(doc.line_len(cursor.row));
}

/// Repeats a vertical move `rows` times, so a page jump stops at the same
/// boundaries as single steps do.
pub fn move_page(doc: &Document, cursor: &mut Position, direction: Direction, rows: usize) {
  for _ in 0..rows {
    move_cursor(doc, cursor, direction);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn doc(text: &str) -> Document {
    Document::from_bytes(text.as_bytes(), Default::default())
  }

  #[test]
  fn vertical_moves_stop_at_boundaries() {
    let doc = doc("a\nb\nc");
    let mut cursor = Position::zero();
    move_cursor(&doc, &mut cursor, Direction::Up);
    assert_eq!(cursor, Position::zero());

    move_cursor(&doc, &mut cursor, Direction::Down);
    move_cursor(&doc, &mut cursor, Direction::Down);
    move_cursor(&doc, &mut cursor, Direction::Down);
    assert_eq!(cursor, Position::new(2, 0));
  }

  #[test]
  fn column_is_clamped_to_shorter_line() {
    let doc = doc("long line\nab");
    let mut cursor = Position::new(0, 9);
    move_cursor(&doc, &mut cursor, Direction::Down);
    assert_eq!(cursor, Position::new(1, 2));
  }

  #[test]
  fn left_wraps_to_end_of_previous_line() {
    let doc = doc("abc\nd");
    let mut cursor = Position::new(1, 0);
    move_cursor(&doc, &mut cursor, Direction::Left);
    assert_eq!(cursor, Position::new(0, 3));

    let mut cursor = Position::zero();
    move_cursor(&doc, &mut cursor, Direction::Left);
    assert_eq!(cursor, Position::zero());
  }

  #[test]
  fn right_wraps_to_start_of_next_line() {
    let doc = doc("ab\nc");
    let mut cursor = Position::new(0, 1);
    move_cursor(&doc, &mut cursor, Direction::Right);
    assert_eq!(cursor, Position::new(0, 2));
    move_cursor(&doc, &mut cursor, Direction::Right);
    assert_eq!(cursor, Position::new(1, 0));
    move_cursor(&doc, &mut cursor, Direction::Right);
    move_cursor(&doc, &mut cursor, Direction::Right);
    assert_eq!(cursor, Position::new(1, 1));
  }

  #[test]
  fn moves_in_empty_buffer_are_noops() {
    let doc = Document::default();
    let mut cursor = Position::zero();
    for direction in [
      Direction::Up,
      Direction::Down,
      Direction::Left,
      Direction::Right,
    ] {
      move_cursor(&doc, &mut cursor, direction);
      assert_eq!(cursor, Position::zero());
    }
  }

  #[test]
  fn page_moves_never_overshoot() {
    let doc = doc("1\n2\n3\n4\n5");
    let mut cursor = Position::new(1, 0);
    move_page(&doc, &mut cursor, Direction::Down, 10);
    assert_eq!(cursor, Position::new(4, 0));
    move_page(&doc, &mut cursor, Direction::Up, 2);
    assert_eq!(cursor, Position::new(2, 0));
    move_page(&doc, &mut cursor, Direction::Up, 10);
    assert_eq!(cursor, Position::new(0, 0));
  }
}
