//! Single line input shown in the message row.
//!
//! A [`Prompt`] only edits its own input; the owner feeds it keys through the
//! regular decoder and acts on the returned [`PromptEvent`]. An optional hook
//! runs after every key with mutable access to the owner, which is how a
//! caller reacts to input while it is being typed.

use crate::input::Key;

pub type PromptHook<C> = fn(&mut C, &[u8], Key);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
  Pending,
  Confirmed(Vec<u8>),
  Cancelled,
}

pub struct Prompt<C> {
  label: String,
  input: Vec<u8>,
  hook:  Option<PromptHook<C>>,
}

impl<C> Prompt<C> {
  pub fn new(label: impl Into<String>) -> Self {
    Self {
      label: label.into(),
      input: Vec::new(),
      hook:  None,
    }
  }

  pub fn with_hook(mut self, hook: PromptHook<C>) -> Self {
    self.hook = Some(hook);
    self
  }

  pub fn input(&self) -> &[u8] {
    &self.input
  }

  pub fn hook(&self) -> Option<PromptHook<C>> {
    self.hook
  }

  /// Text for the message row, e.g. `Save as: "main.c"`.
  pub fn line(&self) -> String {
    format!("{}: {:?}", self.label, String::from_utf8_lossy(&self.input))
  }

  pub fn handle_key(&mut self, key: Key) -> PromptEvent {
    match key {
      Key::Escape => PromptEvent::Cancelled,
      Key::Delete | Key::Byte(0x7f) | Key::Byte(0x08) => {
        self.input.pop();
        PromptEvent::Pending
      },
      Key::Byte(b'\r') if !self.input.is_empty() => PromptEvent::Confirmed(self.input.clone()),
      Key::Byte(byte) if byte == b' ' || byte.is_ascii_graphic() || !byte.is_ascii() => {
        self.input.push(byte);
        PromptEvent::Pending
      },
      _ => PromptEvent::Pending,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn feed(prompt: &mut Prompt<()>, bytes: &[u8]) -> PromptEvent {
    let mut event = PromptEvent::Pending;
    for &byte in bytes {
      event = prompt.handle_key(Key::Byte(byte));
    }
    event
  }

  #[test]
  fn typing_and_confirming() {
    let mut prompt = Prompt::new("Save as");
    assert_eq!(feed(&mut prompt, b"main.c"), PromptEvent::Pending);
    assert_eq!(prompt.line(), "Save as: \"main.c\"");
    assert_eq!(
      prompt.handle_key(Key::Byte(b'\r')),
      PromptEvent::Confirmed(b"main.c".to_vec())
    );
  }

  #[test]
  fn enter_on_empty_input_keeps_prompting() {
    let mut prompt: Prompt<()> = Prompt::new("Save as");
    assert_eq!(prompt.handle_key(Key::Byte(b'\r')), PromptEvent::Pending);
  }

  #[test]
  fn backspace_and_control_bytes() {
    let mut prompt = Prompt::new("Save as");
    feed(&mut prompt, b"ab\x7f\x01c");
    assert_eq!(prompt.input(), b"ac");
    prompt.handle_key(Key::Delete);
    prompt.handle_key(Key::Byte(0x08));
    prompt.handle_key(Key::Byte(0x08));
    assert!(prompt.input().is_empty());
    prompt.handle_key(Key::Up);
    assert!(prompt.input().is_empty());
  }

  #[test]
  fn escape_cancels() {
    let mut prompt = Prompt::new("Save as");
    feed(&mut prompt, b"x");
    assert_eq!(prompt.handle_key(Key::Escape), PromptEvent::Cancelled);
  }

  #[test]
  fn hook_is_kept() {
    fn count(calls: &mut usize, _input: &[u8], _key: Key) {
      *calls += 1;
    }
    let prompt = Prompt::new("Find").with_hook(count);
    let mut calls = 0;
    let hook = prompt.hook().unwrap();
    hook(&mut calls, prompt.input(), Key::Byte(b'a'));
    assert_eq!(calls, 1);
  }
}
