use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures local to the autocorrection core.
///
/// None of these are fatal to a host: the intended reaction to every
/// variant is "no autocorrect happens", never an error surfaced to the
/// person typing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// The engine was asked to act before any compiled matcher snapshot
  /// was received.
  #[error("no compiled matcher has been received yet")]
  ConfigurationAbsent,

  /// The editable surface exposes no usable mutation primitive. The
  /// controller guarantees no text was touched when this is returned.
  #[error("surface does not support text mutation")]
  MutationUnsupported,

  /// Snapshot delivery failed. Callers recover by retrying or by
  /// pulling the current snapshot; the keystroke path keeps operating
  /// on its last-known matcher.
  #[error("matcher delivery failed: {0}")]
  Transport(String),
}
