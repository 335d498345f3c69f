//! Decision application and the one-shot undo.
//!
//! The controller is the only code that mutates a surface. After a
//! replacement it records just enough to reverse that single action:
//! what went in, what came out, which surface, and where the caret
//! ended up. The record lives in a single slot that is consumed by the
//! very next backspace check, making "undo exactly once" structural
//! rather than a matter of remembering to clear variables.

use crate::{
  engine::Decision,
  error::Result,
  grapheme,
  surface::{
    Surface,
    SurfaceId,
  },
};

/// Everything needed to reverse one applied correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCorrection {
  pub surface:     SurfaceId,
  /// Text the correction inserted.
  pub inserted:    String,
  /// The exact text the correction removed.
  pub removed:     String,
  /// Caret position right after the correction was applied.
  pub caret_after: usize,
}

/// Single-slot store for the last correction. Taking the record out is
/// the only way to read it.
#[derive(Debug, Default)]
pub struct UndoSlot(Option<LastCorrection>);

impl UndoSlot {
  #[must_use]
  pub fn new() -> Self {
    Self(None)
  }

  pub fn record(&mut self, correction: LastCorrection) {
    self.0 = Some(correction);
  }

  /// Consume the slot unconditionally. One-shot: after this call the
  /// slot is empty no matter what the caller does with the record.
  pub fn take(&mut self) -> Option<LastCorrection> {
    self.0.take()
  }

  #[must_use]
  pub fn is_armed(&self) -> bool {
    self.0.is_some()
  }
}

/// Outcome of a backspace undo check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoCheck {
  /// The backspace was consumed by the undo; its default effect must
  /// be suppressed.
  Consumed,
  /// Ordinary backspace; the caller applies its default effect.
  NotApplicable,
}

/// Apply a replacement decision at the surface's caret.
///
/// Deletes `delete_count` chars before the caret, inserts the
/// replacement, moves the caret after it, and returns the record for
/// the undo slot. `Decision::None` and zero-effect inputs return
/// `Ok(None)`. On a mutation failure no text has been changed.
pub fn apply(surface: &mut dyn Surface, decision: &Decision) -> Result<Option<LastCorrection>> {
  let Decision::Replace {
    delete_count,
    insert,
  } = decision
  else {
    return Ok(None);
  };

  let caret = surface.caret();
  if *delete_count > caret {
    // The engine only ever asks to delete text it has seen inside its
    // window; anything else means caller and surface disagree.
    log::warn!("replacement wants {delete_count} chars but caret is at {caret}");
    return Ok(None);
  }

  let start = caret - delete_count;
  let removed: String = surface.text().slice(start..caret).into();

  surface.remove(start..caret)?;
  surface.insert(start, insert)?;

  let caret_after = start + insert.chars().count();
  surface.set_caret(caret_after);

  log::debug!("autocorrect: {removed:?} replaced with {insert:?}");

  Ok(Some(LastCorrection {
    surface: surface.id(),
    inserted: insert.clone(),
    removed,
    caret_after,
  }))
}

/// Check whether a plain backspace at the current caret should undo the
/// last correction, and perform the undo if so.
///
/// The slot is consumed either way: a second consecutive backspace is
/// always an ordinary backspace. The undo deletes the inserted text as
/// whole user-perceived characters and puts the removed text back,
/// restoring the pre-correction state exactly.
pub fn check_undo(slot: &mut UndoSlot, surface: &mut dyn Surface) -> Result<UndoCheck> {
  let Some(last) = slot.take() else {
    return Ok(UndoCheck::NotApplicable);
  };

  if last.surface != surface.id() || surface.caret() != last.caret_after {
    return Ok(UndoCheck::NotApplicable);
  }

  let clusters = grapheme::cluster_count(&last.inserted);
  let start = grapheme::nth_prev_cluster_boundary(surface.text(), last.caret_after, clusters);

  surface.remove(start..last.caret_after)?;
  surface.insert(start, &last.removed)?;
  surface.set_caret(start + last.removed.chars().count());

  log::debug!(
    "undo autocorrect: {:?} replaced with {:?}",
    last.inserted,
    last.removed
  );

  Ok(UndoCheck::Consumed)
}
