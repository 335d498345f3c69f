//! The replacement dictionaries.
//!
//! Two sources feed the trigger map: a built-in emoticon table and a
//! shortcode dataset embedded as JSON and parsed once at startup. Both
//! are immutable for the lifetime of the process; settings only decide
//! which of them participate in a compiled snapshot.

use std::{
  collections::HashMap,
  sync::LazyLock,
};

use emotype_core::{
  CompiledMatcher,
  compile,
  merge_sources,
};

use crate::config::Settings;

/// Classic text emoticons and their glyphs.
static BUILTIN_EMOTICONS: &[(&str, &str)] = &[
  (":)", "🙂"),
  (":-)", "🙂"),
  (":(", "🙁"),
  (":-(", "🙁"),
  (":D", "😀"),
  (":-D", "😀"),
  (";)", "😉"),
  (";-)", "😉"),
  (":P", "😛"),
  (":-P", "😛"),
  (":O", "😮"),
  (":-O", "😮"),
  (":|", "😐"),
  (":-|", "😐"),
  (":/", "😕"),
  (":-/", "😕"),
  (":'(", "😢"),
  (":*", "😘"),
  (":-*", "😘"),
  ("B)", "😎"),
  ("B-)", "😎"),
  ("xD", "😆"),
  ("XD", "😆"),
  ("^^", "😊"),
  ("<3", "❤️"),
  ("</3", "💔"),
  ("(y)", "👍"),
  ("(n)", "👎"),
];

const SHORTCODE_DATA: &str = include_str!("assets/shortcodes.json");

static SHORTCODES: LazyLock<HashMap<String, String>> = LazyLock::new(|| {
  match serde_json::from_str(SHORTCODE_DATA) {
    Ok(map) => map,
    Err(err) => {
      // The dataset ships inside the binary; failing to parse it is a
      // packaging bug, but typing must keep working without it.
      log::error!("embedded shortcode dataset is invalid: {err}");
      HashMap::new()
    },
  }
});

#[must_use]
pub fn emoticons() -> HashMap<String, String> {
  BUILTIN_EMOTICONS
    .iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

#[must_use]
pub fn shortcodes() -> &'static HashMap<String, String> {
  &SHORTCODES
}

/// Merge the sources the settings ask for and compile them into a
/// fresh snapshot.
#[must_use]
pub fn compile_snapshot(settings: &Settings) -> CompiledMatcher {
  let map = merge_sources(&emoticons(), shortcodes(), settings.matcher_settings());
  compile(&map, settings.autocomplete.shortcodes)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Overrides;

  #[test]
  fn shortcode_dataset_parses_and_is_well_formed() {
    let codes = shortcodes();
    assert!(codes.len() > 50);
    for (key, value) in codes {
      assert!(key.starts_with(':') && key.ends_with(':'), "bad key {key:?}");
      assert!(!value.is_empty());
    }
    assert_eq!(codes[":grinning:"], "😀");
    assert_eq!(codes[":+1:"], "👍");
  }

  #[test]
  fn default_snapshot_carries_both_sources() {
    let matcher = compile_snapshot(&Settings::default());
    assert!(matcher.triggers().find_suffix("hi :)").is_some());
    assert!(matcher.triggers().find_suffix("hi :grinning:").is_some());
    assert!(matcher.autocomplete);
  }

  #[test]
  fn disabling_a_source_removes_its_triggers() {
    let mut settings = Settings::default();
    Overrides {
      no_emoticons: true,
      ..Default::default()
    }
    .apply(&mut settings);

    let matcher = compile_snapshot(&settings);
    assert!(matcher.triggers().find_suffix("hi :)").is_none());
    assert!(matcher.triggers().find_suffix("hi :grinning:").is_some());
  }

  #[test]
  fn disabled_shortcodes_leave_completion_with_nothing_to_offer() {
    let mut settings = Settings::default();
    settings.autocorrect.shortcodes = false;

    let matcher = compile_snapshot(&settings);
    assert!(matcher.autocomplete);
    assert_eq!(matcher.shortcode_completions(":").count(), 0);
  }
}
