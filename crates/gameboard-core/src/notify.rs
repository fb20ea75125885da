//! The `Notifier` trait: how text reaches the chat.

use std::future::Future;

use crate::channel::{ChatId, MessageId};

/// Result of trying to edit a message in place.
///
/// Edit failures are values rather than errors so callers can branch on each
/// case explicitly; every non-[`EditOutcome::Edited`] outcome means "send a
/// new message instead".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
  Edited,
  /// The message no longer exists (deleted, or the id is stale).
  NotFound,
  /// Any other failure, including markup the chat service rejected.
  Failed(String),
}

/// Outbound messaging for the one configured chat.
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Post a new message and return its id.
  fn send<'a>(
    &'a self,
    chat: ChatId,
    text: &'a str,
  ) -> impl Future<Output = Result<MessageId, Self::Error>> + Send + 'a;

  /// Replace the text of an existing message.
  fn edit<'a>(
    &'a self,
    chat: ChatId,
    message_id: MessageId,
    text: &'a str,
  ) -> impl Future<Output = EditOutcome> + Send + 'a;
}
