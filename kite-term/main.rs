//! kite: a small terminal text editor.

mod config;
mod ctx;
mod file;
mod logging;
mod terminal;
mod tty;

use std::path::PathBuf;

use clap::{
  ArgAction,
  Parser,
};
use eyre::{
  Result,
  WrapErr,
};
use kite_lib::input::read_key;

use crate::{
  config::Config,
  ctx::Ctx,
  terminal::Terminal,
  tty::TtyInput,
};

#[derive(Debug, Parser)]
#[command(name = kite_lib::NAME, version = kite_lib::VERSION, about = "A small terminal text editor")]
struct Cli {
  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  config_file: Option<PathBuf>,

  /// File to open
  file: Option<PathBuf>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  kite_loader::initialize_log_file(cli.log_file);
  kite_loader::initialize_config_file(cli.config_file);
  logging::setup_logging(cli.verbosity, &kite_loader::log_file())?;
  log::info!("{} {} starting", kite_lib::NAME, kite_lib::VERSION);

  let config = Config::load()?;
  let registry = config.registry()?;
  let (rows, cols) = Terminal::size()?;

  let mut ctx = Ctx::new(&config, registry, rows, cols);
  if let Some(path) = &cli.file {
    ctx.open(path)?;
  }

  let mut input = TtyInput::stdin(config.editor.escape_timeout());
  let mut terminal = Terminal::new()?;

  while !ctx.should_quit {
    let (rows, cols) = Terminal::size()?;
    ctx.resize(rows, cols);
    terminal.draw(&ctx.render()?)?;

    let key = read_key(&mut input).wrap_err("failed to read from the terminal")?;
    ctx.handle_key(key);
  }

  log::info!("bye");
  Ok(())
}
