//! Error type for `gameboard-telegram`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The Bot API answered `"ok": false`.
  #[error("Telegram API error {code:?}: {description}")]
  Api { code: Option<i64>, description: String },

  #[error("Telegram API reported success without a result")]
  MissingResult,
}

impl Error {
  /// The edit target no longer exists.
  pub fn is_message_not_found(&self) -> bool {
    match self {
      Self::Api { description, .. } => {
        description.contains("message to edit not found")
          || description.contains("MESSAGE_ID_INVALID")
      }
      _ => false,
    }
  }

  /// The edit was rejected only because the text is unchanged.
  pub fn is_message_not_modified(&self) -> bool {
    matches!(self, Self::Api { description, .. } if description.contains("message is not modified"))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
