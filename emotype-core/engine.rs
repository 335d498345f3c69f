//! The per-keystroke matching engine.
//!
//! Pure function of a compiled matcher snapshot and the text to the
//! left of the caret: it never mutates anything, it only decides. The
//! caller applies the decision through the controller.
//!
//! The central trick is the two-window check. The first window ends one
//! character before the caret and excludes the key just typed: a
//! trigger matching there was completed by the previous character, and
//! the key just typed is the delimiter sealing it. The second window
//! (the probe) includes the just-typed character and is used to detect
//! that the apparent trigger is really the prefix of a longer one still
//! being typed, in which case nothing fires. Only backward-looking
//! text is ever consulted; there is no lookahead.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use ropey::RopeSlice;

use crate::{
  compile::CompiledMatcher,
  keys::KeyClass,
};

/// A partially typed shortcode: a colon followed by at least one
/// character of the shortcode class, running to the end of the window.
static SHORTCODE_PARTIAL: Lazy<Regex> =
  Lazy::new(|| Regex::new(":[a-z0-9+_-]+$").unwrap());

/// What the engine wants done to the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
  /// Leave the text alone.
  None,
  /// Delete `delete_count` characters before the caret, then insert
  /// `insert` there. `delete_count == 0` is a pure completion.
  Replace {
    delete_count: usize,
    insert:       String,
  },
}

/// Evaluate one qualifying keystroke.
///
/// `text` is the surface content after the keystroke's default effect,
/// `caret` the char-index caret position after that effect. The caller
/// has already classified the key; events with modifiers held never
/// reach this function.
#[must_use]
pub fn evaluate(
  matcher: &CompiledMatcher,
  text: RopeSlice,
  caret: usize,
  key: KeyClass,
) -> Decision {
  let longest = matcher.longest;
  if longest == 0 || caret == 0 || caret > text.len_chars() {
    return Decision::None;
  }

  // Window ending one character before the caret: has a trigger just
  // been completed by the character before the one just typed?
  let window_start = caret.saturating_sub(longest + 1);
  let window: Cow<str> = text.slice(window_start..caret - 1).into();

  if let Some(matched) = matcher.triggers().find_suffix(&window) {
    // Re-check with the just-typed character included. If the longer
    // window reveals a competing trigger or an antipattern, the user
    // is still mid-way through something else: hold off.
    let probe_start = caret.saturating_sub(longest);
    let probe: Cow<str> = text.slice(probe_start..caret).into();

    if matcher.antipatterns().find_suffix(&probe).is_some() {
      return Decision::None;
    }
    if let Some(rival) = matcher.triggers().find_suffix(&probe) {
      // Asymmetric on purpose: with a short window the original match
      // survives only when strictly earlier than the rival; once the
      // window is saturated, an equal start keeps it. Pinned by the
      // ambiguous-trigger tests.
      let survives = if caret <= longest {
        matched.start < rival.start
      } else {
        matched.start <= rival.start
      };
      if !survives {
        return Decision::None;
      }
    }

    let Some(replacement) = matcher.replacement(matched.pattern) else {
      // Trigger set and replacement map are built from the same keys;
      // a miss here means a corrupt snapshot, so do nothing.
      log::warn!("trigger {:?} has no replacement in snapshot", matched.pattern);
      return Decision::None;
    };

    // The just-typed character is the delimiter and gets reinserted
    // after the replacement; Enter reinserts a line break.
    let delimiter: Cow<str> = match key {
      KeyClass::Enter => Cow::Borrowed("\n"),
      KeyClass::Char(_) | KeyClass::Unidentified => text.slice(caret - 1..caret).into(),
    };

    return Decision::Replace {
      delete_count: matched.pattern.chars().count() + 1,
      insert:       format!("{replacement}{delimiter}"),
    };
  }

  if matcher.autocomplete {
    return autocomplete(matcher, text, caret);
  }

  Decision::None
}

/// Single-candidate shortcode completion.
///
/// Fires only when exactly one configured shortcode extends the typed
/// partial, and only once the partial is long enough to be deliberate
/// (more than two characters, or the unique candidate is itself only
/// three characters long).
fn autocomplete(matcher: &CompiledMatcher, text: RopeSlice, caret: usize) -> Decision {
  let window_start = caret.saturating_sub(matcher.longest.saturating_sub(1));
  if window_start >= caret {
    return Decision::None;
  }
  let window: Cow<str> = text.slice(window_start..caret).into();

  let Some(partial) = SHORTCODE_PARTIAL.find(&window) else {
    return Decision::None;
  };
  let partial = partial.as_str();

  let mut candidates = matcher.shortcode_completions(partial);
  let Some(candidate) = candidates.next() else {
    return Decision::None;
  };
  if candidates.next().is_some() {
    // Ambiguous: completing would be a guess.
    return Decision::None;
  }

  if partial.chars().count() > 2 || candidate.chars().count() == 3 {
    Decision::Replace {
      delete_count: 0,
      insert:       candidate[partial.len()..].to_string(),
    }
  } else {
    Decision::None
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use ropey::Rope;

  use super::*;
  use crate::compile::compile;

  fn matcher(pairs: &[(&str, &str)], autocomplete: bool) -> CompiledMatcher {
    let map: HashMap<String, String> = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    compile(&map, autocomplete)
  }

  /// Evaluate as if `ch` was just typed at the end of `text`.
  fn after_typing(m: &CompiledMatcher, text: &str, ch: char) -> Decision {
    let rope = Rope::from_str(text);
    let key = if ch == '\n' {
      KeyClass::Enter
    } else {
      KeyClass::Char(ch)
    };
    evaluate(m, rope.slice(..), rope.len_chars(), key)
  }

  #[test]
  fn empty_matcher_never_fires() {
    let m = matcher(&[], true);
    assert_eq!(after_typing(&m, "anything :) ", ' '), Decision::None);
  }

  #[test]
  fn caret_at_start_is_a_no_op() {
    let m = matcher(&[(":)", "🙂")], false);
    let rope = Rope::from_str("text");
    assert_eq!(
      evaluate(&m, rope.slice(..), 0, KeyClass::Char('x')),
      Decision::None
    );
  }

  #[test]
  fn space_after_trigger_replaces_and_reinserts_delimiter() {
    let m = matcher(&[(":)", "🙂")], false);
    assert_eq!(after_typing(&m, "hi :) ", ' '), Decision::Replace {
      delete_count: 3,
      insert:       "🙂 ".to_string(),
    });
  }

  #[test]
  fn enter_reinserts_a_line_break() {
    let m = matcher(&[(":)", "🙂")], false);
    assert_eq!(after_typing(&m, "hi :)\n", '\n'), Decision::Replace {
      delete_count: 3,
      insert:       "🙂\n".to_string(),
    });
  }

  #[test]
  fn trigger_without_delimiter_does_not_fire() {
    let m = matcher(&[(":)", "🙂")], false);
    // The ")" completes the trigger but nothing has sealed it yet.
    assert_eq!(after_typing(&m, "hi :)", ')'), Decision::None);
  }

  #[test]
  fn mid_word_trigger_still_fires_on_delimiter() {
    let m = matcher(&[("<3", "❤️")], false);
    assert_eq!(after_typing(&m, "u <3 ", ' '), Decision::Replace {
      delete_count: 3,
      insert:       "❤️ ".to_string(),
    });
  }

  #[test]
  fn longer_trigger_wins_over_embedded_shorter_one() {
    let m = matcher(&[(":-)", "🙂"), (":-)))", "😂")], false);
    // Typing ":-)))": at ":-))" + ")" the short trigger looks sealed,
    // but the antipattern ":-))" suppresses it.
    assert_eq!(after_typing(&m, ":-))", ')'), Decision::None);
    // Finishing the long trigger and sealing it fires the long one.
    assert_eq!(after_typing(&m, ":-))) ", ' '), Decision::Replace {
      delete_count: 6,
      insert:       "😂 ".to_string(),
    });
  }

  #[test]
  fn short_trigger_alone_fires_normally() {
    let m = matcher(&[(":-)", "🙂")], false);
    assert_eq!(after_typing(&m, ":-) ", ' '), Decision::Replace {
      delete_count: 4,
      insert:       "🙂 ".to_string(),
    });
  }

  #[test]
  fn overlapping_pair_never_fires_mid_typing() {
    // Nothing may fire at any point while "(yy)" is being typed.
    let m = matcher(&[("(y)", "👍"), ("(yy)", "🙌")], false);
    let mut text = String::new();
    for ch in "(yy)".chars() {
      text.push(ch);
      assert_eq!(
        after_typing(&m, &text, ch),
        Decision::None,
        "spurious fire after typing {text:?}"
      );
    }
    assert_eq!(after_typing(&m, "(yy) ", ' '), Decision::Replace {
      delete_count: 5,
      insert:       "🙌 ".to_string(),
    });
  }

  #[test]
  fn short_variant_fires_when_long_one_absent() {
    let m = matcher(&[("(y)", "👍")], false);
    assert_eq!(after_typing(&m, "(y) ", ' '), Decision::Replace {
      delete_count: 4,
      insert:       "👍 ".to_string(),
    });
  }

  #[test]
  fn probe_rival_with_equal_start_suppresses_in_short_window() {
    // caret <= longest: an equal-start rival in the probe defeats the
    // original match (strict '<' required to survive).
    let m = matcher(&[("ab", "1"), ("ab)", "2")], false);
    // Typing "ab)": window "ab" matches, probe "ab)" matches at the
    // same start. caret (3) <= longest (3): suppressed.
    assert_eq!(after_typing(&m, "ab)", ')'), Decision::None);
    // Sealing the longer trigger now fires it.
    assert_eq!(after_typing(&m, "ab) ", ' '), Decision::Replace {
      delete_count: 4,
      insert:       "2 ".to_string(),
    });
  }

  #[test]
  fn shortcode_completion_requires_a_unique_candidate() {
    let m = matcher(&[(":grin:", "😁"), (":grinning:", "😀")], true);
    assert_eq!(after_typing(&m, ":grin", 'n'), Decision::None);
    assert_eq!(after_typing(&m, ":grinn", 'n'), Decision::Replace {
      delete_count: 0,
      insert:       "ing:".to_string(),
    });
  }

  #[test]
  fn shortcode_completion_respects_minimum_length() {
    let m = matcher(&[(":grinning:", "😀")], true);
    // Partial ":g" has two chars: too short even though unique.
    assert_eq!(after_typing(&m, ":g", 'g'), Decision::None);
    assert_eq!(after_typing(&m, ":gr", 'r'), Decision::Replace {
      delete_count: 0,
      insert:       "inning:".to_string(),
    });
  }

  #[test]
  fn three_char_shortcode_completes_from_two_char_partial() {
    let m = matcher(&[(":o:", "⭕")], true);
    assert_eq!(after_typing(&m, ":o", 'o'), Decision::Replace {
      delete_count: 0,
      insert:       ":".to_string(),
    });
  }

  #[test]
  fn autocomplete_disabled_means_no_completion() {
    let m = matcher(&[(":grinning:", "😀")], false);
    assert_eq!(after_typing(&m, ":grinn", 'n'), Decision::None);
  }

  #[test]
  fn suppressed_trigger_does_not_fall_through_to_completion() {
    // A window match that the probe suppresses must yield None, not a
    // completion attempt.
    let m = matcher(&[(":-)", "🙂"), (":-)))", "😂"), (":grinning:", "😀")], true);
    assert_eq!(after_typing(&m, ":-))", ')'), Decision::None);
  }
}
