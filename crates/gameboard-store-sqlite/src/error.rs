//! Error type for `gameboard-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] gameboard_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("malformed setting {key:?}: {value:?}")]
  MalformedSetting { key: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
