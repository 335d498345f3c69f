//! Trigger-map compilation.
//!
//! Turns a raw trigger→replacement mapping into an immutable
//! [`CompiledMatcher`] snapshot: the longest-trigger length, a
//! suffix-matching automaton over the triggers, a second automaton over
//! derived antipatterns, and a prefix index of the shortcode subset.
//!
//! Compilation is total: any input, including the empty map, produces a
//! well-formed matcher. Snapshots are rebuilt whole on every settings
//! change and swapped in atomically; they are never patched in place.

use std::collections::{
  BTreeMap,
  HashMap,
};

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;

/// A full `:shortcode:` token: colon-bounded run of the shortcode
/// character class, nothing else.
static SHORTCODE_KEY: Lazy<Regex> =
  Lazy::new(|| Regex::new("^:[a-z0-9+_-]+:$").unwrap());

/// Per-source toggles plus the autocompletion switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherSettings {
  /// Replace emoticon/symbol triggers like `:)` or `(y)`.
  pub emoticons:    bool,
  /// Replace full `:shortcode:` tokens.
  pub shortcodes:   bool,
  /// Offer single-candidate completion for partial shortcodes.
  pub autocomplete: bool,
}

impl Default for MatcherSettings {
  fn default() -> Self {
    Self {
      emoticons:    true,
      shortcodes:   true,
      autocomplete: true,
    }
  }
}

/// Merge the configured sources into one trigger map.
///
/// Merge order is fixed: emoticons first, shortcodes second, so the
/// shortcode source wins on a key collision.
#[must_use]
pub fn merge_sources(
  emoticons: &HashMap<String, String>,
  shortcodes: &HashMap<String, String>,
  settings: MatcherSettings,
) -> HashMap<String, String> {
  let mut map = HashMap::new();
  if settings.emoticons {
    map.extend(
      emoticons
        .iter()
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.clone(), value.clone())),
    );
  }
  if settings.shortcodes {
    map.extend(
      shortcodes
        .iter()
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.clone(), value.clone())),
    );
  }
  map
}

/// A suffix match: the subject string ends with `pattern`, whose first
/// character sits at char index `start` within the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixMatch<'a> {
  pub start:   usize,
  pub pattern: &'a str,
}

/// Pattern-set suffix oracle: "does the subject end with one of these
/// strings, and which one?"
///
/// Patterns are opaque literals. The automaton replaces the obvious
/// escaped-alternation regex so matching stays linear in the subject
/// regardless of how many triggers are configured.
#[derive(Debug, Clone)]
pub struct SuffixSet {
  automaton: Option<AhoCorasick>,
  patterns:  Vec<String>,
}

impl SuffixSet {
  /// Build the oracle. Duplicates are removed; pattern order does not
  /// affect match results.
  #[must_use]
  pub fn new(mut patterns: Vec<String>) -> Self {
    patterns.sort();
    patterns.dedup();
    patterns.retain(|p| !p.is_empty());

    let automaton = if patterns.is_empty() {
      None
    } else {
      match AhoCorasick::new(&patterns) {
        Ok(ac) => Some(ac),
        Err(err) => {
          // A set too large for the automaton builder degrades to a
          // matcher that never fires, not to a crash.
          log::error!("failed to build suffix automaton: {err}");
          None
        },
      }
    };

    Self { automaton, patterns }
  }

  /// The longest pattern that is a suffix of `subject`, if any.
  ///
  /// Among matches ending at the end of the subject the one with the
  /// smallest start index is the longest, so that is the one reported.
  #[must_use]
  pub fn find_suffix<'s>(&'s self, subject: &str) -> Option<SuffixMatch<'s>> {
    let automaton = self.automaton.as_ref()?;

    let mut best: Option<(usize, usize)> = None;
    for mat in automaton.find_overlapping_iter(subject) {
      if mat.end() != subject.len() {
        continue;
      }
      match best {
        Some((start, _)) if start <= mat.start() => {},
        _ => best = Some((mat.start(), mat.pattern().as_usize())),
      }
    }

    best.map(|(byte_start, pattern_idx)| {
      SuffixMatch {
        start:   subject[..byte_start].chars().count(),
        pattern: &self.patterns[pattern_idx],
      }
    })
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.patterns.is_empty()
  }

  /// The deduplicated pattern set, sorted.
  #[must_use]
  pub fn patterns(&self) -> &[String] {
    &self.patterns
  }
}

/// Immutable matcher snapshot. Derived in full from a trigger map and
/// settings; holds everything the per-keystroke path needs.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
  /// Longest trigger, in chars. Zero means the matcher never fires.
  pub longest:      usize,
  /// Whether shortcode autocompletion is on.
  pub autocomplete: bool,
  triggers:     SuffixSet,
  antipatterns: SuffixSet,
  replacements: HashMap<String, String>,
  shortcodes:   BTreeMap<String, String>,
}

impl CompiledMatcher {
  /// A matcher that never fires, for hosts that have not received any
  /// configuration yet.
  #[must_use]
  pub fn empty() -> Self {
    compile(&HashMap::new(), false)
  }

  #[must_use]
  pub fn triggers(&self) -> &SuffixSet {
    &self.triggers
  }

  #[must_use]
  pub fn antipatterns(&self) -> &SuffixSet {
    &self.antipatterns
  }

  /// Replacement text for a matched trigger.
  #[must_use]
  pub fn replacement(&self, trigger: &str) -> Option<&str> {
    self.replacements.get(trigger).map(String::as_str)
  }

  /// All full shortcode tokens starting with `partial`, in lexical
  /// order.
  pub fn shortcode_completions<'s>(
    &'s self,
    partial: &'s str,
  ) -> impl Iterator<Item = &'s str> + 's {
    self
      .shortcodes
      .range(partial.to_string()..)
      .take_while(move |(key, _)| key.starts_with(partial))
      .map(|(key, _)| key.as_str())
  }
}

/// Compile a merged trigger map into a matcher snapshot.
#[must_use]
pub fn compile(map: &HashMap<String, String>, autocomplete: bool) -> CompiledMatcher {
  let longest = map.keys().map(|key| key.chars().count()).max().unwrap_or(0);

  let triggers = SuffixSet::new(map.keys().cloned().collect());
  let antipatterns = SuffixSet::new(derive_antipatterns(map));

  let shortcodes = map
    .iter()
    .filter(|(key, _)| SHORTCODE_KEY.is_match(key))
    .map(|(key, value)| (key.clone(), value.clone()))
    .collect();

  CompiledMatcher {
    longest,
    autocomplete,
    triggers,
    antipatterns,
    replacements: map.clone(),
    shortcodes,
  }
}

/// Derive the "do not fire yet" set.
///
/// While a longer trigger `x` is being typed character by character,
/// the caret can pass through a state where a different, shorter
/// trigger `y` embedded in `x` looks complete and would fire a spurious
/// correction. For the leftmost such embedded `y` (ties broken toward
/// the longer `y`), the prefix of `x` that stops one character short of
/// completion is recorded as an antipattern: matching it means "more of
/// `x` is likely coming, hold off".
fn derive_antipatterns(map: &HashMap<String, String>) -> Vec<String> {
  let mut antipatterns = Vec::new();

  for x in map.keys() {
    let x_chars = x.chars().count();
    let mut occurrence_start = x_chars;
    let mut occurrence_len = 0;

    for y in map.keys() {
      if x == y {
        continue;
      }
      let Some(byte_idx) = x.find(y.as_str()) else {
        continue;
      };
      let char_idx = x[..byte_idx].chars().count();
      let y_chars = y.chars().count();
      if char_idx < occurrence_start {
        occurrence_start = char_idx;
        occurrence_len = y_chars;
      } else if char_idx == occurrence_start && y_chars > occurrence_len {
        occurrence_len = y_chars;
      }
    }

    if occurrence_len == 0 {
      continue;
    }
    let tail = x_chars - (occurrence_start + occurrence_len);
    if tail > 1 {
      // Drop the last `tail - 1` characters of `x`.
      let keep = x_chars - (tail - 1);
      let byte_end = x
        .char_indices()
        .nth(keep)
        .map_or(x.len(), |(byte_idx, _)| byte_idx);
      antipatterns.push(x[..byte_end].to_string());
    }
  }

  antipatterns.sort();
  antipatterns.dedup();
  antipatterns
}
