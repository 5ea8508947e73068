//! Core of the kite editor: a byte-oriented line buffer, its syntax
//! classification, the cursor/viewport model, the terminal key decoder and the
//! frame renderer. Nothing in here touches files or the terminal directly.

pub mod command;
pub mod document;
pub mod highlight;
pub mod input;
pub mod messages;
pub mod movement;
pub mod position;
pub mod prompt;
pub mod render;
pub mod syntax;
pub mod view;

pub const NAME: &str = "kite";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
