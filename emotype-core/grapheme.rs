//! User-perceived character counting over a `Rope`'s text contents.
//!
//! Deletion counts must be measured in grapheme clusters, not chars:
//! an emoji assembled from a base codepoint plus variation selectors
//! and zero-width joiners is one unit to the person typing, and
//! removing "one emoji" has to remove the whole cluster.

use std::borrow::Cow;

use ropey::RopeSlice;
use unicode_segmentation::UnicodeSegmentation;

/// Number of grapheme clusters in `text`.
#[must_use]
pub fn cluster_count(text: &str) -> usize {
  text.graphemes(true).count()
}

/// Char index of the grapheme boundary `n` clusters before `char_idx`.
///
/// Clamps at the start of the slice, like the cursor would.
#[must_use]
pub fn nth_prev_cluster_boundary(slice: RopeSlice, char_idx: usize, n: usize) -> usize {
  debug_assert!(char_idx <= slice.len_chars());
  if n == 0 {
    return char_idx;
  }

  let text: Cow<str> = slice.into();
  let target_byte = byte_of_char(&text, char_idx);

  let mut boundaries: Vec<usize> = Vec::new();
  for (byte_idx, _) in text.grapheme_indices(true) {
    if byte_idx >= target_byte {
      break;
    }
    boundaries.push(byte_idx);
  }
  let boundary = boundaries.iter().rev().nth(n - 1).copied().unwrap_or(0);

  text[..boundary].chars().count()
}

fn byte_of_char(text: &str, char_idx: usize) -> usize {
  text
    .char_indices()
    .nth(char_idx)
    .map_or(text.len(), |(byte_idx, _)| byte_idx)
}
