//! Error type for `gameboard-steam`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not a Steam id: {0:?}")]
  InvalidSteamId(String),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Steam API returned {0}")]
  Status(reqwest::StatusCode),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
