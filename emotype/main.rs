//! Line-oriented typing simulator.
//!
//! Reads stdin line by line, replays each line as keystrokes through a
//! typing session and prints the corrected result. A deterministic
//! stand-in for an interactive host, and the quickest way to try out a
//! settings file:
//!
//! ```text
//! $ echo 'good morning :) have a nice day :smile:' | emotype
//! good morning 🙂 have a nice day 😄
//! ```

use std::{
  io::{
    self,
    BufRead,
  },
  path::PathBuf,
};

use clap::Parser;
use emotype_core::{
  KeyEvent,
  SurfaceId,
};

use crate::{
  config::{
    Overrides,
    Settings,
  },
  hub::MatcherHub,
  session::Session,
};

mod config;
mod dictionary;
mod hub;
mod reload;
mod session;

#[derive(Parser, Debug)]
#[command(name = "emotype", about, long_about = None, version)]
struct Cli {
  /// Load settings from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  config_file: Option<PathBuf>,

  /// Watch the settings file and apply changes live
  #[arg(long = "watch", requires = "config_file")]
  watch: bool,

  /// Disable emoticon replacement
  #[arg(long = "no-emoticons")]
  no_emoticons: bool,

  /// Disable shortcode replacement
  #[arg(long = "no-shortcodes")]
  no_shortcodes: bool,

  /// Disable shortcode autocompletion
  #[arg(long = "no-autocomplete")]
  no_autocomplete: bool,
}

impl Cli {
  fn overrides(&self) -> Overrides {
    Overrides {
      no_emoticons:    self.no_emoticons,
      no_shortcodes:   self.no_shortcodes,
      no_autocomplete: self.no_autocomplete,
    }
  }
}

fn main() -> anyhow::Result<()> {
  env_logger::init();
  let cli = Cli::parse();

  let mut settings = Settings::load(cli.config_file.as_deref())?;
  cli.overrides().apply(&mut settings);

  let hub = MatcherHub::new();
  hub.publish(dictionary::compile_snapshot(&settings));

  let _watcher = match &cli.config_file {
    Some(path) if cli.watch => Some(reload::watch(path.clone(), hub.clone(), cli.overrides())?),
    _ => None,
  };

  let stdin = io::stdin();
  for (index, line) in stdin.lock().lines().enumerate() {
    let line = line?;
    println!("{}", replay(&hub, SurfaceId(index as u64), &line)?);
  }

  Ok(())
}

/// Replay one line as keystrokes, sealing the end with Enter so a
/// trailing trigger still gets corrected, and return the buffer
/// without that final line break.
fn replay(hub: &MatcherHub, surface_id: SurfaceId, line: &str) -> anyhow::Result<String> {
  let mut session = Session::new(hub.clone(), surface_id);
  for ch in line.chars() {
    session.key_press(&KeyEvent::char(ch))?;
  }
  session.key_press(&KeyEvent::enter())?;

  let mut corrected = session.contents();
  if corrected.ends_with('\n') {
    corrected.pop();
  }
  Ok(corrected)
}
