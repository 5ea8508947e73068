use crate::position::Position;

/// Number of text rows and columns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Size {
  pub rows: usize,
  pub cols: usize,
}

impl Size {
  pub const fn new(rows: usize, cols: usize) -> Self {
    Self { rows, cols }
  }
}

/// Window into the document.
///
/// `size` is the text area (the terminal minus the status and message rows),
/// `offset` the document position shown in the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
  pub size:   Size,
  pub offset: Position,
}

impl ViewState {
  /// Rows taken by the status line and the message line.
  pub const RESERVED_ROWS: usize = 2;

  pub fn new(size: Size) -> Self {
    Self {
      size:   Size::new(size.rows.max(1), size.cols.max(1)),
      offset: Position::zero(),
    }
  }

  /// View for a terminal of the given dimensions.
  pub fn for_terminal(rows: usize, cols: usize) -> Self {
    Self::new(Size::new(rows.saturating_sub(Self::RESERVED_ROWS), cols))
  }

  /// Moves `offset` by the least amount that puts `cursor` back inside the
  /// view.
  pub fn scroll(&mut self, cursor: Position) {
    let Size { rows, cols } = self.size;

    if cursor.row < self.offset.row {
      self.offset.row = cursor.row;
    } else if cursor.row >= self.offset.row + rows {
      self.offset.row = cursor.row + 1 - rows;
    }

    if cursor.col < self.offset.col {
      self.offset.col = cursor.col;
    } else if cursor.col >= self.offset.col + cols {
      self.offset.col = cursor.col + 1 - cols;
    }
  }

  /// Cursor position relative to the top-left corner of the view.
  pub fn screen_position(&self, cursor: Position) -> Position {
    cursor.saturating_sub(self.offset)
  }
}
