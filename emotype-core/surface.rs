//! The editable-surface contract.
//!
//! The engine never learns what a surface really is; it only needs a
//! caret, char-indexed text access, and range-based mutation. Hosts
//! with richer internal representations adapt themselves to this
//! trait. A surface that cannot mutate must fail with
//! [`Error::MutationUnsupported`] before touching any text.

use std::ops::Range;

use ropey::{
  Rope,
  RopeSlice,
};

use crate::error::{
  Error,
  Result,
};

/// Non-owning identifier for a surface. The controller stores this,
/// never the surface itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

pub trait Surface {
  fn id(&self) -> SurfaceId;

  /// Caret position as a char index into the text.
  fn caret(&self) -> usize;

  fn set_caret(&mut self, at: usize);

  fn text(&self) -> RopeSlice<'_>;

  /// Remove the chars in `range`. Implementations must either remove
  /// the whole range and notify their observers, or fail without
  /// mutating.
  fn remove(&mut self, range: Range<usize>) -> Result<()>;

  /// Insert `text` at char index `at`, notifying observers on success.
  fn insert(&mut self, at: usize, text: &str) -> Result<()>;

  fn len_chars(&self) -> usize {
    self.text().len_chars()
  }
}

/// Rope-backed flat text buffer, the shipped surface implementation.
///
/// Change observers registered with [`RopeSurface::observe`] run after
/// every successful mutation so dependent state stays consistent, the
/// same job the input-event dispatch does for a DOM field.
pub struct RopeSurface {
  id:        SurfaceId,
  rope:      Rope,
  caret:     usize,
  observers: Vec<Box<dyn FnMut(&Rope)>>,
}

impl RopeSurface {
  #[must_use]
  pub fn new(id: SurfaceId) -> Self {
    Self {
      id,
      rope: Rope::new(),
      caret: 0,
      observers: Vec::new(),
    }
  }

  #[must_use]
  pub fn with_text(id: SurfaceId, text: &str) -> Self {
    let rope = Rope::from_str(text);
    let caret = rope.len_chars();
    Self {
      id,
      rope,
      caret,
      observers: Vec::new(),
    }
  }

  pub fn observe(&mut self, observer: impl FnMut(&Rope) + 'static) {
    self.observers.push(Box::new(observer));
  }

  #[must_use]
  pub fn contents(&self) -> String {
    self.rope.to_string()
  }

  fn notify(&mut self) {
    for observer in &mut self.observers {
      observer(&self.rope);
    }
  }
}

impl Surface for RopeSurface {
  fn id(&self) -> SurfaceId {
    self.id
  }

  fn caret(&self) -> usize {
    self.caret
  }

  fn set_caret(&mut self, at: usize) {
    self.caret = at.min(self.rope.len_chars());
  }

  fn text(&self) -> RopeSlice<'_> {
    self.rope.slice(..)
  }

  fn remove(&mut self, range: Range<usize>) -> Result<()> {
    if range.start > range.end || range.end > self.rope.len_chars() {
      return Err(Error::MutationUnsupported);
    }
    self.rope.remove(range.clone());
    if self.caret > range.end {
      self.caret -= range.end - range.start;
    } else if self.caret > range.start {
      self.caret = range.start;
    }
    self.notify();
    Ok(())
  }

  fn insert(&mut self, at: usize, text: &str) -> Result<()> {
    if at > self.rope.len_chars() {
      return Err(Error::MutationUnsupported);
    }
    self.rope.insert(at, text);
    if self.caret >= at {
      self.caret += text.chars().count();
    }
    self.notify();
    Ok(())
  }
}

/// A surface whose text can be read but never changed. Exists so the
/// hard-failure path of the controller can be exercised: mutation
/// attempts fail up front and the text is provably untouched.
pub struct FrozenSurface {
  id:    SurfaceId,
  rope:  Rope,
  caret: usize,
}

impl FrozenSurface {
  #[must_use]
  pub fn with_text(id: SurfaceId, text: &str) -> Self {
    let rope = Rope::from_str(text);
    let caret = rope.len_chars();
    Self { id, rope, caret }
  }

  #[must_use]
  pub fn contents(&self) -> String {
    self.rope.to_string()
  }
}

impl Surface for FrozenSurface {
  fn id(&self) -> SurfaceId {
    self.id
  }

  fn caret(&self) -> usize {
    self.caret
  }

  fn set_caret(&mut self, at: usize) {
    self.caret = at.min(self.rope.len_chars());
  }

  fn text(&self) -> RopeSlice<'_> {
    self.rope.slice(..)
  }

  fn remove(&mut self, _range: Range<usize>) -> Result<()> {
    Err(Error::MutationUnsupported)
  }

  fn insert(&mut self, _at: usize, _text: &str) -> Result<()> {
    Err(Error::MutationUnsupported)
  }
}
