//! Live settings reload.
//!
//! Watches the directory holding the user settings file (editors
//! usually replace the file rather than write it in place) and, on a
//! relevant change, reloads the settings, recompiles the dictionaries
//! and publishes a fresh snapshot. Any failure along the way is logged
//! and leaves the previous snapshot serving keystrokes.

use std::path::{
  Path,
  PathBuf,
};

use anyhow::Context;
use emotype_core::Error;
use notify::{
  Event,
  EventKind,
  RecommendedWatcher,
  RecursiveMode,
  Watcher,
};

use crate::{
  config::{
    Overrides,
    Settings,
  },
  dictionary,
  hub::MatcherHub,
};

/// Keeps the underlying watcher alive; dropping it stops the watch.
pub struct ConfigWatcher {
  _watcher: RecommendedWatcher,
}

pub fn watch(path: PathBuf, hub: MatcherHub, overrides: Overrides) -> anyhow::Result<ConfigWatcher> {
  let dir = path
    .parent()
    .filter(|parent| !parent.as_os_str().is_empty())
    .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

  let settings_file = path.clone();
  let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
    match result {
      Ok(event) => {
        let relevant = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
          && event.paths.iter().any(|p| p.ends_with(
            settings_file
              .file_name()
              .unwrap_or(settings_file.as_os_str()),
          ));
        if !relevant {
          return;
        }
        if let Err(err) = reapply(&settings_file, &hub, overrides) {
          log::warn!("settings reload failed, keeping previous snapshot: {err:#}");
        }
      },
      Err(err) => {
        // The watch channel itself broke; corrections keep running on
        // the last published snapshot.
        log::warn!("settings watch error: {}", Error::Transport(err.to_string()));
      },
    }
  })
  .context("couldn't create the settings watcher")?;

  watcher
    .watch(&dir, RecursiveMode::NonRecursive)
    .map_err(|err| Error::Transport(err.to_string()))
    .with_context(|| format!("couldn't watch {}", dir.display()))?;

  log::info!("watching {} for settings changes", path.display());
  Ok(ConfigWatcher { _watcher: watcher })
}

fn reapply(path: &Path, hub: &MatcherHub, overrides: Overrides) -> anyhow::Result<()> {
  let mut settings = Settings::load(Some(path))?;
  overrides.apply(&mut settings);

  let generation = hub.publish(dictionary::compile_snapshot(&settings));
  log::info!(
    "applied settings change from {} (generation {generation})",
    path.display()
  );
  Ok(())
}
