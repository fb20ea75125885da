//! File-backed roster with a bounded cache.
//!
//! The roster file is a JSON array of
//! `{"steam_id": "...", "display_name": "..."}` objects, in display order.
//! Edits to the file take effect on the next forced load or once the cache
//! expires; no restart is needed.

use std::{
  io,
  path::PathBuf,
  time::{Duration, Instant},
};

use gameboard_core::{player::Identity, roster::Roster};
use thiserror::Error;

/// How long a loaded roster is served before the file is read again.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Error)]
enum ReadError {
  #[error("roster file {0:?} not found")]
  Missing(PathBuf),

  #[error("failed to read roster file: {0}")]
  Io(#[from] io::Error),

  #[error("malformed roster file: {0}")]
  Parse(#[from] serde_json::Error),
}

/// A [`Roster`] read from a JSON file.
pub struct FileRoster {
  path:       PathBuf,
  ttl:        Duration,
  cache:      Vec<Identity>,
  /// When the file was last read, successfully or not.
  checked_at: Option<Instant>,
}

impl FileRoster {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path:       path.into(),
      ttl:        DEFAULT_CACHE_TTL,
      cache:      Vec::new(),
      checked_at: None,
    }
  }

  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  fn read(&self) -> Result<Vec<Identity>, ReadError> {
    let bytes = match std::fs::read(&self.path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(ReadError::Missing(self.path.clone()));
      }
      Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_slice(&bytes)?)
  }

  fn is_stale(&self) -> bool {
    self.checked_at.is_none_or(|at| at.elapsed() > self.ttl)
  }
}

impl Roster for FileRoster {
  fn load(&mut self, force: bool) -> Vec<Identity> {
    if !(force || self.is_stale()) {
      return self.cache.clone();
    }

    self.checked_at = Some(Instant::now());
    match self.read() {
      Ok(roster) => {
        tracing::info!(players = roster.len(), path = ?self.path, "roster reloaded");
        self.cache = roster;
      }
      Err(e @ ReadError::Missing(_)) => {
        tracing::error!(error = %e, "tracking nobody");
        self.cache.clear();
      }
      Err(e) => {
        tracing::error!(error = %e, "keeping previous roster");
      }
    }
    self.cache.clone()
  }
}
