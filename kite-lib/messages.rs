use std::time::{
  Duration,
  Instant,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
  Info,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
  pub level:        MessageLevel,
  pub text:         String,
  pub published_at: Instant,
}

/// The single transient message shown below the status line.
///
/// Expiry is checked when the message is looked at; nothing is scheduled.
#[derive(Debug, Clone)]
pub struct MessageCenter {
  active:  Option<Message>,
  timeout: Duration,
}

impl Default for MessageCenter {
  fn default() -> Self {
    Self::with_timeout(DEFAULT_TIMEOUT)
  }
}

impl MessageCenter {
  pub fn with_timeout(timeout: Duration) -> Self {
    Self {
      active: None,
      timeout,
    }
  }

  pub fn publish(&mut self, level: MessageLevel, text: impl Into<String>) {
    let text = text.into();
    if level == MessageLevel::Error {
      log::warn!("{text}");
    }
    self.active = Some(Message {
      level,
      text,
      published_at: Instant::now(),
    });
  }

  pub fn info(&mut self, text: impl Into<String>) {
    self.publish(MessageLevel::Info, text);
  }

  pub fn error(&mut self, text: impl Into<String>) {
    self.publish(MessageLevel::Error, text);
  }

  pub fn clear(&mut self) {
    self.active = None;
  }

  /// Last published message, expired or not.
  pub fn active(&self) -> Option<&Message> {
    self.active.as_ref()
  }

  pub fn visible_at(&self, now: Instant) -> Option<&Message> {
    self
      .active
      .as_ref()
      .filter(|message| now.saturating_duration_since(message.published_at) < self.timeout)
  }

  pub fn visible(&self) -> Option<&Message> {
    self.visible_at(Instant::now())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn message_expires_after_timeout() {
    let mut messages = MessageCenter::with_timeout(Duration::from_secs(5));
    messages.info("Ctrl-Q to quit");
    let published = messages.active().unwrap().published_at;

    assert_eq!(
      messages.visible_at(published).map(|m| m.text.as_str()),
      Some("Ctrl-Q to quit")
    );
    assert!(
      messages
        .visible_at(published + Duration::from_secs(4))
        .is_some()
    );
    assert!(
      messages
        .visible_at(published + Duration::from_secs(5))
        .is_none()
    );
    // expired messages are still remembered
    assert!(messages.active().is_some());
  }

  #[test]
  fn publishing_replaces_the_message() {
    let mut messages = MessageCenter::default();
    messages.info("first");
    messages.error("second");
    let active = messages.visible().unwrap();
    assert_eq!(active.text, "second");
    assert_eq!(active.level, MessageLevel::Error);

    messages.clear();
    assert!(messages.visible().is_none());
  }
}
