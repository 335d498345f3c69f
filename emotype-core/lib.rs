//! Core autocorrection engine: trigger compilation, per-keystroke
//! matching, and mutation with one-shot undo.
//!
//! The crate is host-agnostic. It never performs I/O and never owns an
//! event loop; a host feeds it key events and an editable surface and
//! applies the decisions it returns. The hot path is two automaton
//! probes over a caret-bounded window, so per-keystroke work is
//! constant regardless of how many triggers are configured.

pub mod compile;
pub mod controller;
pub mod engine;
pub mod error;
pub mod grapheme;
pub mod keys;
pub mod surface;

pub use compile::{
  CompiledMatcher,
  MatcherSettings,
  SuffixSet,
  compile,
  merge_sources,
};
pub use controller::{
  LastCorrection,
  UndoCheck,
  UndoSlot,
  apply,
  check_undo,
};
pub use engine::{
  Decision,
  evaluate,
};
pub use error::{
  Error,
  Result,
};
pub use keys::{
  Key,
  KeyClass,
  KeyEvent,
  classify,
};
pub use surface::{
  FrozenSurface,
  RopeSurface,
  Surface,
  SurfaceId,
};
