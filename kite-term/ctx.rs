//! Editor session: the document, the cursor and everything around them.

use std::{
  io,
  path::{
    Path,
    PathBuf,
  },
  sync::Arc,
};

use eyre::Result;
use kite_lib::{
  command::{
    Command,
    command_for_key,
  },
  document::Document,
  input::Key,
  messages::MessageCenter,
  movement::{
    move_cursor,
    move_page,
  },
  position::Position,
  prompt::{
    Prompt,
    PromptEvent,
  },
  render::Frame,
  syntax::{
    Profile,
    Registry,
  },
  view::ViewState,
};

use crate::{
  config::Config,
  file,
};

const QUIT_HINT: &str = "Ctrl-Q to quit";
const SAVE_HINT: &str = "Ctrl-S to save";
const QUIT_WARNING: &str = "There are unsaved changes, press Ctrl-Q again to force quit.";

/// Save-as prompt in progress, with the profile to restore on cancel.
struct SaveAs {
  prompt:           Prompt<Ctx>,
  previous_profile: Arc<Profile>,
}

pub struct Ctx {
  pub document:    Document,
  pub cursor:      Position,
  pub view:        ViewState,
  pub registry:    Registry,
  pub messages:    MessageCenter,
  pub should_quit: bool,
  welcome_banner:  bool,
  quit_armed:      bool,
  save_as:         Option<SaveAs>,
}

impl Ctx {
  /// Session with an empty, unnamed buffer for a terminal of `rows` x `cols`.
  pub fn new(config: &Config, registry: Registry, rows: usize, cols: usize) -> Self {
    let mut messages = MessageCenter::with_timeout(config.editor.message_timeout());
    messages.info(QUIT_HINT);

    Self {
      document: Document::new(registry.plain()),
      cursor: Position::zero(),
      view: ViewState::for_terminal(rows, cols),
      registry,
      messages,
      should_quit: false,
      welcome_banner: config.editor.welcome_banner,
      quit_armed: false,
      save_as: None,
    }
  }

  /// Opens `path`. A file that does not exist yet becomes a new, named
  /// buffer.
  pub fn open(&mut self, path: &Path) -> Result<()> {
    let profile = self.registry.for_path(path);
    let mut document = match file::load(path)? {
      Some(bytes) => Document::from_bytes(&bytes, profile),
      None => Document::new(profile),
    };
    document.set_path(path);
    log::info!(
      "opened {} with profile {}",
      path.display(),
      document.profile().name()
    );

    self.document = document;
    self.cursor = Position::zero();
    self.view.offset = Position::zero();
    Ok(())
  }

  pub fn resize(&mut self, rows: usize, cols: usize) {
    let offset = self.view.offset;
    self.view = ViewState::for_terminal(rows, cols);
    self.view.offset = offset;
  }

  pub fn is_prompting(&self) -> bool {
    self.save_as.is_some()
  }

  pub fn handle_key(&mut self, key: Key) {
    if self.save_as.is_some() {
      self.handle_prompt_key(key);
      return;
    }
    if let Some(command) = command_for_key(key) {
      self.execute(command);
    }
  }

  pub fn execute(&mut self, command: Command) {
    if command != Command::Quit {
      self.quit_armed = false;
    }

    let doc = &mut self.document;
    let cursor = &mut self.cursor;
    let changed = match command {
      Command::InsertByte(byte) => {
        doc.insert_char(cursor, byte);
        true
      },
      Command::InsertNewline => {
        doc.split_line(cursor);
        true
      },
      Command::DeleteBackward => doc.delete_char(cursor),
      Command::DeleteForward => doc.delete_forward(cursor),
      Command::Move(direction) => {
        move_cursor(doc, cursor, direction);
        false
      },
      Command::Page(direction) => {
        move_page(doc, cursor, direction, self.view.size.rows);
        false
      },
      Command::Save => {
        self.save();
        false
      },
      Command::Quit => {
        self.quit();
        false
      },
    };

    if changed {
      self.messages.info(SAVE_HINT);
    }
  }

  fn quit(&mut self) {
    if self.document.is_modified() && !self.quit_armed {
      self.quit_armed = true;
      self.messages.error(QUIT_WARNING);
      return;
    }
    log::info!("quitting");
    self.should_quit = true;
  }

  fn save(&mut self) {
    match self.document.path().map(Path::to_path_buf) {
      Some(path) => self.write_to(&path),
      None => self.start_save_as(),
    }
  }

  fn start_save_as(&mut self) {
    let prompt = Prompt::new("Save as (ESC to cancel)").with_hook(preview_profile);
    self.save_as = Some(SaveAs {
      prompt,
      previous_profile: self.document.profile().clone(),
    });
  }

  fn handle_prompt_key(&mut self, key: Key) {
    let Some(mut save_as) = self.save_as.take() else {
      return;
    };
    let event = save_as.prompt.handle_key(key);
    if let Some(hook) = save_as.prompt.hook() {
      hook(self, save_as.prompt.input(), key);
    }

    match event {
      PromptEvent::Pending => self.save_as = Some(save_as),
      PromptEvent::Confirmed(input) => {
        let path = PathBuf::from(String::from_utf8_lossy(&input).into_owned());
        let profile = self.registry.for_path(&path);
        self.document.set_profile(profile);
        self.document.set_path(&path);
        self.write_to(&path);
      },
      PromptEvent::Cancelled => {
        self.document.set_profile(save_as.previous_profile);
        self.messages.info("Did not save");
      },
    }
  }

  fn write_to(&mut self, path: &Path) {
    let bytes = self.document.serialize();
    match file::save(path, &bytes) {
      Ok(()) => {
        self.document.mark_saved();
        self
          .messages
          .info(format!("File saved. {} bytes written", bytes.len()));
      },
      Err(err) => self.messages.error(format!("Can't save! I/O error: {err}")),
    }
  }

  /// Text of the message row: the prompt while one is open, otherwise the
  /// current message if it has not expired.
  pub fn message_line(&self) -> Option<String> {
    match &self.save_as {
      Some(save_as) => Some(save_as.prompt.line()),
      None => {
        self
          .messages
          .visible()
          .map(|message| message.text.clone())
      },
    }
  }

  /// Scrolls the cursor into view and renders the frame.
  pub fn render(&mut self) -> io::Result<Vec<u8>> {
    self.view.scroll(self.cursor);
    let message = self.message_line();
    let frame = Frame {
      document: &self.document,
      view:     self.view,
      cursor:   self.cursor,
      message:  message.as_deref(),
      welcome:  self.welcome_banner,
    };
    frame.to_bytes()
  }
}

/// Re-highlights the buffer with the profile the typed name would select.
fn preview_profile(ctx: &mut Ctx, input: &[u8], _key: Key) {
  let name = String::from_utf8_lossy(input);
  let profile = ctx.registry.for_path(&*name);
  if profile.name() != ctx.document.profile().name() {
    log::debug!("save-as preview switches to {}", profile.name());
    ctx.document.set_profile(profile);
  }
}
