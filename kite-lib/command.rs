//! Editor command types and the fixed key bindings that produce them.

use crate::{
  input::Key,
  movement::Direction,
};

const CTRL_H: u8 = b'h' & 0x1f;
const CTRL_Q: u8 = b'q' & 0x1f;
const CTRL_S: u8 = b's' & 0x1f;
const TAB: u8 = b'\t';
const ENTER: u8 = b'\r';
const BACKSPACE: u8 = 0x7f;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  InsertByte(u8),
  InsertNewline,
  DeleteBackward,
  DeleteForward,
  Move(Direction),
  Page(Direction),
  Save,
  Quit,
}

/// Command bound to `key`, if any. Escape and unbound control codes map to
/// nothing.
pub fn command_for_key(key: Key) -> Option<Command> {
  let command = match key {
    Key::Up => Command::Move(Direction::Up),
    Key::Down => Command::Move(Direction::Down),
    Key::Left => Command::Move(Direction::Left),
    Key::Right => Command::Move(Direction::Right),
    Key::PageUp => Command::Page(Direction::Up),
    Key::PageDown => Command::Page(Direction::Down),
    Key::Delete => Command::DeleteForward,
    Key::Escape => return None,
    Key::Byte(byte) => {
      match byte {
        CTRL_Q => Command::Quit,
        CTRL_S => Command::Save,
        CTRL_H | BACKSPACE => Command::DeleteBackward,
        ENTER => Command::InsertNewline,
        TAB => Command::InsertByte(byte),
        _ if byte.is_ascii_control() => return None,
        _ => Command::InsertByte(byte),
      }
    },
  };
  Some(command)
}
