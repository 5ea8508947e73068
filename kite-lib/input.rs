//! Terminal key decoding.
//!
//! A raw terminal delivers plain bytes for ordinary keys and short escape
//! sequences for arrows and function keys. [`read_key`] runs a small state
//! machine over a [`ByteSource`] and turns one such unit into a [`Key`].
//! Sequences it does not know, or that end early, come out as
//! [`Key::Escape`] and never leak into the document as garbage characters.

use std::io;

pub const ESC: u8 = 0x1b;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
  /// An ordinary byte: printable characters and control codes alike.
  Byte(u8),
  /// A lone escape, or a sequence that was not understood.
  Escape,
  Up,
  Down,
  Left,
  Right,
  Delete,
  PageUp,
  PageDown,
}

impl Key {
  /// Control-modified letter, `ctrl(b'q')` is what Ctrl-Q sends.
  pub const fn ctrl(letter: u8) -> Key {
    Key::Byte(letter & 0x1f)
  }
}

/// Where key bytes come from.
pub trait ByteSource {
  /// Blocks until the next byte is available.
  fn read_byte(&mut self) -> io::Result<u8>;

  /// Reads up to `buf.len()` bytes that follow right away, returning how many
  /// arrived. Zero means nothing is pending.
  fn read_pending(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl ByteSource for &[u8] {
  fn read_byte(&mut self) -> io::Result<u8> {
    let (&byte, rest) = self
      .split_first()
      .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;
    *self = rest;
    Ok(byte)
  }

  fn read_pending(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    let len = buf.len().min(self.len());
    let (head, rest) = self.split_at(len);
    buf[..len].copy_from_slice(head);
    *self = rest;
    Ok(len)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
  Normal,
  EscapeSeen,
  /// `ESC [` and a digit in `1..=8`, waiting for the closing `~`.
  CsiDigitSeen(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
  Next(State),
  Emit(Key),
}

fn on_first_byte(byte: u8) -> Step {
  if byte == ESC {
    Step::Next(State::EscapeSeen)
  } else {
    Step::Emit(Key::Byte(byte))
  }
}

fn on_escape_pair(pair: Option<[u8; 2]>) -> Step {
  match pair {
    Some([b'[', b'A']) => Step::Emit(Key::Up),
    Some([b'[', b'B']) => Step::Emit(Key::Down),
    Some([b'[', b'C']) => Step::Emit(Key::Right),
    Some([b'[', b'D']) => Step::Emit(Key::Left),
    Some([b'[', digit @ b'1'..=b'8']) => Step::Next(State::CsiDigitSeen(digit)),
    _ => Step::Emit(Key::Escape),
  }
}

fn on_csi_final(digit: u8, last: Option<u8>) -> Step {
  let key = match (digit, last) {
    (b'3', Some(b'~')) => Key::Delete,
    (b'5', Some(b'~')) => Key::PageUp,
    (b'6', Some(b'~')) => Key::PageDown,
    _ => Key::Escape,
  };
  Step::Emit(key)
}

/// Reads exactly one key from `source`.
///
/// Only the first byte blocks. The rest of an escape sequence must already be
/// pending; whatever is missing turns the sequence into [`Key::Escape`].
pub fn read_key<S: ByteSource + ?Sized>(source: &mut S) -> io::Result<Key> {
  let mut state = State::Normal;
  loop {
    let step = match state {
      State::Normal => on_first_byte(source.read_byte()?),
      State::EscapeSeen => {
        let mut pair = [0u8; 2];
        let read = source.read_pending(&mut pair)?;
        on_escape_pair((read == pair.len()).then_some(pair))
      },
      State::CsiDigitSeen(digit) => {
        let mut last = [0u8; 1];
        let read = source.read_pending(&mut last)?;
        on_csi_final(digit, (read == 1).then_some(last[0]))
      },
    };

    match step {
      Step::Next(next) => state = next,
      Step::Emit(key) => {
        log::trace!("decoded key {key:?}");
        return Ok(key);
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn decode_all(mut bytes: &[u8]) -> Vec<Key> {
    let mut keys = Vec::new();
    while !bytes.is_empty() {
      keys.push(read_key(&mut bytes).unwrap());
    }
    keys
  }

  #[test]
  fn plain_bytes() {
    assert_eq!(decode_all(b"a\r\x7f"), [
      Key::Byte(b'a'),
      Key::Byte(b'\r'),
      Key::Byte(0x7f)
    ]);
    assert_eq!(Key::ctrl(b'q'), Key::Byte(0x11));
    assert_eq!(Key::ctrl(b's'), Key::Byte(0x13));
  }

  #[test]
  fn arrows() {
    assert_eq!(decode_all(b"\x1b[A\x1b[B\x1b[C\x1b[D"), [
      Key::Up,
      Key::Down,
      Key::Right,
      Key::Left
    ]);
  }

  #[test]
  fn tilde_sequences() {
    assert_eq!(decode_all(b"\x1b[3~\x1b[5~\x1b[6~"), [
      Key::Delete,
      Key::PageUp,
      Key::PageDown
    ]);
  }

  #[test]
  fn unmapped_sequences_are_swallowed() {
    assert_eq!(decode_all(b"\x1b[2~x"), [Key::Escape, Key::Byte(b'x')]);
    assert_eq!(decode_all(b"\x1b[8~x"), [Key::Escape, Key::Byte(b'x')]);
    assert_eq!(decode_all(b"\x1b[3xy"), [Key::Escape, Key::Byte(b'y')]);
    assert_eq!(decode_all(b"\x1b[Zq"), [Key::Escape, Key::Byte(b'q')]);
    assert_eq!(decode_all(b"\x1bOPq"), [Key::Escape, Key::Byte(b'q')]);
  }

  #[test]
  fn digits_outside_one_to_eight_do_not_consume_more() {
    assert_eq!(decode_all(b"\x1b[9x"), [Key::Escape, Key::Byte(b'x')]);
    assert_eq!(decode_all(b"\x1b[9~"), [Key::Escape, Key::Byte(b'~')]);
    assert_eq!(decode_all(b"\x1b[0~q"), [
      Key::Escape,
      Key::Byte(b'~'),
      Key::Byte(b'q')
    ]);
  }

  #[test]
  fn truncated_sequences_become_escape() {
    assert_eq!(decode_all(b"\x1b"), [Key::Escape]);
    assert_eq!(decode_all(b"\x1b["), [Key::Escape]);
    assert_eq!(decode_all(b"\x1b[5"), [Key::Escape]);
  }

  #[test]
  fn end_of_input_is_an_error() {
    let mut bytes: &[u8] = b"";
    let err = read_key(&mut bytes).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
  }
}
