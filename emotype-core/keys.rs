//! Keystroke classification.
//!
//! The engine only ever reacts to keys whose default effect is exactly
//! one inserted character, a line break, or a key the host could not
//! resolve but that still has a single effect. Everything else,
//! including any chord with ctrl/alt/super held, is ignored.

/// Logical key value as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
  /// A key producing a single character.
  Char(char),
  Enter,
  Backspace,
  /// Dead keys, IME intermediates and anything the host could not
  /// resolve to a logical value.
  Unidentified,
  /// Modifier-only presses, function keys, navigation keys.
  Other,
}

/// A key-down style event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
  pub code:   Key,
  pub shift:  bool,
  pub ctrl:   bool,
  pub alt:    bool,
  pub super_: bool,
}

impl KeyEvent {
  pub fn char(ch: char) -> Self {
    Self {
      code:   Key::Char(ch),
      shift:  false,
      ctrl:   false,
      alt:    false,
      super_: false,
    }
  }

  pub fn enter() -> Self {
    Self {
      code:   Key::Enter,
      shift:  false,
      ctrl:   false,
      alt:    false,
      super_: false,
    }
  }

  pub fn backspace() -> Self {
    Self {
      code:   Key::Backspace,
      shift:  false,
      ctrl:   false,
      alt:    false,
      super_: false,
    }
  }

  /// Whether a non-shift modifier is held. Shift is deliberately not
  /// counted: it is how capitals and many punctuation characters are
  /// typed in the first place.
  pub fn has_modifiers(&self) -> bool {
    self.ctrl || self.alt || self.super_
  }

  /// Whether this event is a plain backspace, the only key that can
  /// trigger the one-shot undo.
  pub fn is_plain_backspace(&self) -> bool {
    self.code == Key::Backspace && !self.has_modifiers()
  }
}

/// Classification of an event the engine is willing to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
  /// A single visible character was inserted.
  Char(char),
  /// A line break was inserted.
  Enter,
  /// The host could not name the key, but its effect was a single
  /// insertion; the inserted text is read back from the surface.
  Unidentified,
}

/// Classify an event for the matching engine. `None` means the event
/// must not be evaluated at all.
pub fn classify(event: &KeyEvent) -> Option<KeyClass> {
  if event.has_modifiers() {
    return None;
  }
  match event.code {
    Key::Char(ch) => Some(KeyClass::Char(ch)),
    Key::Enter => Some(KeyClass::Enter),
    Key::Unidentified => Some(KeyClass::Unidentified),
    Key::Backspace | Key::Other => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn modifier_chords_are_never_evaluated() {
    let mut event = KeyEvent::char('a');
    event.ctrl = true;
    assert_eq!(classify(&event), None);

    let mut event = KeyEvent::enter();
    event.alt = true;
    assert_eq!(classify(&event), None);
  }

  #[test]
  fn shift_alone_does_not_disqualify() {
    let mut event = KeyEvent::char('D');
    event.shift = true;
    assert_eq!(classify(&event), Some(KeyClass::Char('D')));
  }

  #[test]
  fn backspace_and_navigation_are_not_evaluated() {
    assert_eq!(classify(&KeyEvent::backspace()), None);
    let event = KeyEvent {
      code:   Key::Other,
      shift:  false,
      ctrl:   false,
      alt:    false,
      super_: false,
    };
    assert_eq!(classify(&event), None);
  }

  #[test]
  fn unresolved_keys_still_classify() {
    let event = KeyEvent {
      code:   Key::Unidentified,
      shift:  false,
      ctrl:   false,
      alt:    false,
      super_: false,
    };
    assert_eq!(classify(&event), Some(KeyClass::Unidentified));
  }

  #[test]
  fn ctrl_backspace_is_not_a_plain_backspace() {
    let mut event = KeyEvent::backspace();
    assert!(event.is_plain_backspace());
    event.ctrl = true;
    assert!(!event.is_plain_backspace());
  }
}
