//! The typing session: a surface, its undo slot, and the key handlers
//! that connect them to the engine.
//!
//! Two entry points mirror how hosts deliver keystrokes. `key_down`
//! runs before the key's default effect and owns the backspace path,
//! where the one-shot undo must win over ordinary deletion. `key_press`
//! runs the default effect of a text-producing key and then lets the
//! engine look at the result.

use emotype_core::{
  KeyClass,
  KeyEvent,
  Result,
  RopeSurface,
  Surface,
  SurfaceId,
  UndoCheck,
  UndoSlot,
  apply,
  check_undo,
  classify,
  evaluate,
  grapheme,
};

use crate::hub::MatcherHub;

pub struct Session {
  hub:     MatcherHub,
  surface: RopeSurface,
  slot:    UndoSlot,
}

impl Session {
  #[must_use]
  pub fn new(hub: MatcherHub, surface_id: SurfaceId) -> Self {
    Self {
      hub,
      surface: RopeSurface::new(surface_id),
      slot: UndoSlot::new(),
    }
  }

  /// Handle a key before its default effect. Returns `true` when the
  /// event was consumed (the undo fired) and the default effect must
  /// be suppressed.
  pub fn key_down(&mut self, event: &KeyEvent) -> Result<bool> {
    if !event.is_plain_backspace() {
      return Ok(false);
    }
    if check_undo(&mut self.slot, &mut self.surface)? == UndoCheck::Consumed {
      return Ok(true);
    }

    // Ordinary backspace: delete one user-perceived character.
    let caret = self.surface.caret();
    if caret > 0 {
      let start = grapheme::nth_prev_cluster_boundary(self.surface.text(), caret, 1);
      self.surface.remove(start..caret)?;
    }
    Ok(false)
  }

  /// Apply a text-producing key's default effect, then evaluate.
  ///
  /// Events the classifier rejects (modifier chords, navigation) do
  /// nothing at all. A hub without a published snapshot yet leaves the
  /// typed text in place uncorrected.
  pub fn key_press(&mut self, event: &KeyEvent) -> Result<()> {
    let Some(class) = classify(event) else {
      return Ok(());
    };

    let caret = self.surface.caret();
    match class {
      KeyClass::Char(ch) => self.surface.insert(caret, ch.encode_utf8(&mut [0; 4]))?,
      KeyClass::Enter => self.surface.insert(caret, "\n")?,
      // The host already applied whatever effect the key had; we only
      // get to look at the buffer.
      KeyClass::Unidentified => {},
    }

    let Some(matcher) = self.hub.current() else {
      return Ok(());
    };

    let decision = evaluate(&matcher, self.surface.text(), self.surface.caret(), class);
    if let Some(record) = apply(&mut self.surface, &decision)? {
      self.slot.record(record);
    }
    Ok(())
  }

  #[must_use]
  pub fn contents(&self) -> String {
    self.surface.contents()
  }

  #[must_use]
  pub fn caret(&self) -> usize {
    self.surface.caret()
  }
}
