//! Error type for the reconciliation scheduler.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No chat has been activated yet. Expected before first activation; the
  /// publish step is skipped.
  #[error("no channel target configured")]
  NoChannelTarget,

  #[error("presence query failed: {0}")]
  Query(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("publish failed: {0}")]
  Publish(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn query(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Query(Box::new(e))
  }

  pub fn publish(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Publish(Box::new(e))
  }

  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
