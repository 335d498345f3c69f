//! Settings: embedded defaults folded together with an optional user
//! TOML file. The user file only needs the keys it wants to change;
//! everything else keeps its built-in value.

use std::path::Path;

use anyhow::Context;
use emotype_core::MatcherSettings;
use serde::{
  Deserialize,
  Serialize,
};

/// Built-in defaults, compiled into the binary.
const DEFAULT_SETTINGS: &str = include_str!("default.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Settings {
  pub autocorrect:  Autocorrect,
  pub autocomplete: Autocomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Autocorrect {
  pub emoticons:  bool,
  pub shortcodes: bool,
}

impl Default for Autocorrect {
  fn default() -> Self {
    Self {
      emoticons:  true,
      shortcodes: true,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Autocomplete {
  pub shortcodes: bool,
}

impl Default for Autocomplete {
  fn default() -> Self {
    Self { shortcodes: true }
  }
}

impl Settings {
  /// Load settings, folding the user file (if any) over the embedded
  /// defaults.
  pub fn load(user_file: Option<&Path>) -> anyhow::Result<Self> {
    let defaults: toml::Value =
      toml::from_str(DEFAULT_SETTINGS).context("built-in default settings are invalid")?;

    let merged = match user_file {
      Some(path) if path.exists() => {
        let raw = std::fs::read_to_string(path)
          .with_context(|| format!("couldn't read settings from {}", path.display()))?;
        let user: toml::Value = toml::from_str(&raw)
          .with_context(|| format!("couldn't parse settings in {}", path.display()))?;
        merge_toml_values(defaults, user, 2)
      },
      _ => defaults,
    };

    merged
      .try_into()
      .context("settings file has an unexpected shape")
  }

  #[must_use]
  pub fn matcher_settings(&self) -> MatcherSettings {
    MatcherSettings {
      emoticons:    self.autocorrect.emoticons,
      shortcodes:   self.autocorrect.shortcodes,
      autocomplete: self.autocomplete.shortcodes,
    }
  }
}

/// Command-line switches that win over whatever the settings file says.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
  pub no_emoticons:    bool,
  pub no_shortcodes:   bool,
  pub no_autocomplete: bool,
}

impl Overrides {
  pub fn apply(self, settings: &mut Settings) {
    if self.no_emoticons {
      settings.autocorrect.emoticons = false;
    }
    if self.no_shortcodes {
      settings.autocorrect.shortcodes = false;
    }
    if self.no_autocomplete {
      settings.autocomplete.shortcodes = false;
    }
  }
}

/// Merge two TOML documents, merging values from `right` onto `left`.
///
/// `merge_depth` sets the nesting depth up to which tables are merged
/// key by key instead of overridden whole.
fn merge_toml_values(left: toml::Value, right: toml::Value, merge_depth: usize) -> toml::Value {
  use toml::Value;

  match (left, right) {
    (Value::Table(mut left_map), Value::Table(right_map)) if merge_depth > 0 => {
      for (rname, rvalue) in right_map {
        match left_map.remove(&rname) {
          Some(lvalue) => {
            let merged_value = merge_toml_values(lvalue, rvalue, merge_depth - 1);
            left_map.insert(rname, merged_value);
          },
          None => {
            left_map.insert(rname, rvalue);
          },
        }
      }
      Value::Table(left_map)
    },
    // Catch everything else we didn't handle, and use the right value
    (_, value) => value,
  }
}
