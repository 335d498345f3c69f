//! Snapshot publication.
//!
//! The hub owns the one process-wide matcher snapshot. Writers publish
//! whole snapshots; readers load whatever is current at the start of a
//! keystroke and keep using it for that keystroke even if a newer one
//! lands mid-flight. A missed change notification is harmless: the
//! next publish or pull observes the latest snapshot anyway.

use std::sync::{
  Arc,
  atomic::{
    AtomicU64,
    Ordering,
  },
};

use arc_swap::ArcSwapOption;
use emotype_core::{
  CompiledMatcher,
  Error,
};

#[derive(Clone, Default)]
pub struct MatcherHub {
  inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
  snapshot:   ArcSwapOption<CompiledMatcher>,
  generation: AtomicU64,
}

impl MatcherHub {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace the current snapshot and return the new generation.
  ///
  /// Publishing is idempotent in effect: the same inputs compile to an
  /// equivalent snapshot, so republishing after a possibly-lost change
  /// notification can only converge.
  pub fn publish(&self, matcher: CompiledMatcher) -> u64 {
    self.inner.snapshot.store(Some(Arc::new(matcher)));
    let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
    log::info!("published matcher snapshot, generation {generation}");
    generation
  }

  /// The current snapshot, if any has been published. Late joiners
  /// pull instead of waiting for a push.
  #[must_use]
  pub fn current(&self) -> Option<Arc<CompiledMatcher>> {
    self.inner.snapshot.load_full()
  }

  /// Like [`MatcherHub::current`], but an absent snapshot is an error
  /// the caller can propagate.
  pub fn require(&self) -> emotype_core::Result<Arc<CompiledMatcher>> {
    self.current().ok_or(Error::ConfigurationAbsent)
  }

  #[must_use]
  pub fn generation(&self) -> u64 {
    self.inner.generation.load(Ordering::Relaxed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fresh_hub_has_no_snapshot() {
    let hub = MatcherHub::new();
    assert!(hub.current().is_none());
    assert_eq!(hub.require().unwrap_err(), Error::ConfigurationAbsent);
    assert_eq!(hub.generation(), 0);
  }

  #[test]
  fn publish_bumps_the_generation_and_replaces_the_snapshot() {
    let hub = MatcherHub::new();
    assert_eq!(hub.publish(CompiledMatcher::empty()), 1);
    assert_eq!(hub.publish(CompiledMatcher::empty()), 2);
    assert_eq!(hub.generation(), 2);
    assert!(hub.require().is_ok());
  }

  #[test]
  fn clones_share_the_same_snapshot() {
    let hub = MatcherHub::new();
    let reader = hub.clone();
    hub.publish(CompiledMatcher::empty());
    assert!(reader.current().is_some());
    assert_eq!(reader.generation(), 1);
  }
}
