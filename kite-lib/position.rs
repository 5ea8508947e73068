/// A point in a document: `row` indexes the line, `col` is a byte offset into
/// that line. Both start at 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
  pub row: usize,
  pub col: usize,
}

impl Position {
  pub fn new(row: usize, col: usize) -> Self {
    Self { row, col }
  }

  pub const fn zero() -> Self {
    Self { row: 0, col: 0 }
  }

  /// Offset of `self` from `origin`, clamped at 0 on each axis.
  pub const fn saturating_sub(self, origin: Self) -> Self {
    Self {
      row: self.row.saturating_sub(origin.row),
      col: self.col.saturating_sub(origin.col),
    }
  }
}
