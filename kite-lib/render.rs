//! Rendering - turns the editor state into one terminal frame.
//!
//! The whole screen is written into a single buffer and flushed at once, so
//! the terminal never shows a half drawn frame. Colors are only switched when
//! the classification changes between two bytes.

use std::{
  fmt,
  io::{
    self,
    Write,
  },
};

use crossterm::{
  Command,
  cursor::{
    Hide,
    MoveTo,
    Show,
  },
  queue,
  terminal::{
    Clear,
    ClearType,
  },
};

use crate::{
  NAME,
  VERSION,
  document::Document,
  highlight::Highlight,
  position::Position,
  view::ViewState,
};

const INVERSE: u8 = 7;
const GREEN: u8 = 32;
const CYAN: u8 = 36;

/// Select Graphic Rendition with a single parameter, `ESC [ n m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sgr(pub u8);

impl Sgr {
  pub const RESET: Sgr = Sgr(0);
}

impl Command for Sgr {
  fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
    write!(f, "\x1b[{}m", self.0)
  }

  #[cfg(windows)]
  fn execute_winapi(&self) -> io::Result<()> {
    Ok(())
  }
}

/// Everything a frame shows.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
  pub document: &'a Document,
  pub view:     ViewState,
  pub cursor:   Position,
  /// Text of the message row, already filtered for expiry.
  pub message:  Option<&'a str>,
  /// Show the banner when the document is empty.
  pub welcome:  bool,
}

impl Frame<'_> {
  pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
    queue!(out, Hide, MoveTo(0, 0))?;
    self.draw_rows(out)?;
    self.draw_status(out)?;
    self.draw_message(out)?;

    let screen = self.view.screen_position(self.cursor);
    queue!(out, MoveTo(screen.col as u16, screen.row as u16), Show)?;
    Ok(())
  }

  pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    self.render(&mut out)?;
    Ok(out)
  }

  fn draw_rows(&self, out: &mut impl Write) -> io::Result<()> {
    let doc = self.document;
    let rows = self.view.size.rows;
    let banner = if self.welcome && doc.is_empty() {
      welcome_lines()
    } else {
      Vec::new()
    };
    let banner_start = rows / 3;

    for screen_row in 0..rows {
      let row = self.view.offset.row + screen_row;
      match doc.line(row) {
        Some(_) => self.draw_line(out, row)?,
        None => {
          let banner_line = screen_row
            .checked_sub(banner_start)
            .and_then(|idx| banner.get(idx));
          match banner_line {
            Some(line) => self.draw_centered(out, line)?,
            None => out.write_all(b"~")?,
          }
        },
      }
      queue!(out, Clear(ClearType::UntilNewLine))?;
      out.write_all(b"\r\n")?;
    }
    Ok(())
  }

  fn draw_line(&self, out: &mut impl Write, row: usize) -> io::Result<()> {
    let Some(line) = self.document.line(row) else {
      return Ok(());
    };
    let start = self.view.offset.col.min(line.len());
    let end = (self.view.offset.col + self.view.size.cols).min(line.len());
    let text = &line.text()[start..end];

    if !self.document.profile().is_highlighted() {
      return write_visible(out, text);
    }

    let highlights = &line.highlight()[start..end];
    let mut current = Highlight::None;
    let mut run_start = 0;
    while run_start < text.len() {
      let class = highlights[run_start];
      let run_len = highlights[run_start..]
        .iter()
        .take_while(|&&hl| hl == class)
        .count();
      if class != current {
        queue!(out, Sgr(class.sgr()))?;
        current = class;
      }
      write_visible(out, &text[run_start..run_start + run_len])?;
      run_start += run_len;
    }
    if current != Highlight::None {
      queue!(out, Sgr::RESET)?;
    }
    Ok(())
  }

  fn draw_centered(&self, out: &mut impl Write, line: &BannerLine) -> io::Result<()> {
    let cols = self.view.size.cols;
    let text: String = line.text.chars().take(cols).collect();
    let mut padding = (cols - text.chars().count()) / 2;
    if padding > 0 {
      out.write_all(b"~")?;
      padding -= 1;
    }
    out.write_all(" ".repeat(padding).as_bytes())?;
    queue!(out, Sgr(line.sgr))?;
    out.write_all(text.as_bytes())?;
    queue!(out, Sgr::RESET)?;
    Ok(())
  }

  fn draw_status(&self, out: &mut impl Write) -> io::Result<()> {
    let doc = self.document;
    let cols = self.view.size.cols;

    let flags = doc.flags();
    let marker = if flags.new_file {
      " [New File]"
    } else if flags.modified {
      " (modified)"
    } else {
      ""
    };
    let name: String = doc.display_name().chars().take(20).collect();
    let left = format!("{name}{marker}");

    let row = if doc.is_empty() { 0 } else { self.cursor.row + 1 };
    let right = format!(
      "{} | row: {}, col: {}",
      doc.profile().name(),
      row,
      self.cursor.col + 1
    );

    let left_len = left.chars().count();
    let right_len = right.chars().count();
    let status = if left_len + right_len < cols {
      format!("{left}{}{right}", " ".repeat(cols - left_len - right_len))
    } else {
      let mut status: String = left.chars().take(cols).collect();
      let len = status.chars().count();
      status.push_str(&" ".repeat(cols - len));
      status
    };

    queue!(out, Sgr(INVERSE))?;
    out.write_all(status.as_bytes())?;
    queue!(out, Sgr::RESET)?;
    out.write_all(b"\r\n")?;
    Ok(())
  }

  fn draw_message(&self, out: &mut impl Write) -> io::Result<()> {
    queue!(out, Clear(ClearType::UntilNewLine))?;
    if let Some(message) = self.message {
      let text: String = message.chars().take(self.view.size.cols).collect();
      out.write_all(text.as_bytes())?;
    }
    Ok(())
  }
}

/// Writes document bytes so that each takes exactly one column: tabs show as
/// a space, other control bytes as `?`.
fn write_visible(out: &mut impl Write, text: &[u8]) -> io::Result<()> {
  if !text.iter().any(|b| b.is_ascii_control()) {
    return out.write_all(text);
  }
  let visible: Vec<u8> = text
    .iter()
    .map(|&b| {
      match b {
        b'\t' => b' ',
        _ if b.is_ascii_control() => b'?',
        _ => b,
      }
    })
    .collect();
  out.write_all(&visible)
}

struct BannerLine {
  text: String,
  sgr:  u8,
}

fn welcome_lines() -> Vec<BannerLine> {
  vec![
    BannerLine {
      text: format!("{NAME} editor -- version {VERSION}"),
      sgr:  CYAN,
    },
    BannerLine {
      text: String::new(),
      sgr:  Sgr::RESET.0,
    },
    BannerLine {
      text: "Ctrl-S save | Ctrl-Q quit".to_string(),
      sgr:  GREEN,
    },
  ]
}
