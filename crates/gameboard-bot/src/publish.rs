//! Delivery of rendered text to the configured chat.

use gameboard_core::{
  channel::{ChatId, MessageId, SummaryHandle},
  notify::{EditOutcome, Notifier},
  store::StateStore,
};

use crate::{Error, Result};

/// How a summary reached the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publication {
  /// The existing summary message was edited in place.
  Edited(SummaryHandle),
  /// A new summary message was posted and the stored handle now points at it.
  Posted(SummaryHandle),
}

impl Publication {
  pub fn handle(&self) -> SummaryHandle {
    match self {
      Self::Edited(handle) | Self::Posted(handle) => *handle,
    }
  }
}

async fn require_target<S: StateStore>(store: &S) -> Result<ChatId> {
  store
    .channel_target()
    .await
    .map_err(Error::store)?
    .ok_or(Error::NoChannelTarget)
}

/// Show `text` as the live summary.
///
/// Edits the stored summary message when it belongs to the current target.
/// Anything else (no handle, a handle left over from another chat, or an edit
/// that did not go through) posts a new message and replaces the handle, so
/// a stale handle heals itself on the next refresh.
pub async fn publish_summary<S, N>(store: &S, notifier: &N, text: &str) -> Result<Publication>
where
  S: StateStore,
  N: Notifier,
{
  let chat = require_target(store).await?;

  if let Some(handle) = store.summary_handle().await.map_err(Error::store)? {
    if handle.chat == chat {
      match notifier.edit(chat, handle.message_id, text).await {
        EditOutcome::Edited => return Ok(Publication::Edited(handle)),
        EditOutcome::NotFound => {
          tracing::info!(message_id = %handle.message_id, "summary message is gone; posting a new one");
        }
        EditOutcome::Failed(reason) => {
          tracing::warn!(message_id = %handle.message_id, %reason, "summary edit failed; posting a new one");
        }
      }
    } else {
      tracing::info!(old = %handle.chat, new = %chat, "channel target changed; posting a new summary");
    }
  }

  let message_id = notifier.send(chat, text).await.map_err(Error::publish)?;
  let handle = SummaryHandle { chat, message_id };
  store.set_summary_handle(handle).await.map_err(Error::store)?;
  Ok(Publication::Posted(handle))
}

/// Post `text` as a standalone message to the current target.
pub async fn send_notification<S, N>(store: &S, notifier: &N, text: &str) -> Result<MessageId>
where
  S: StateStore,
  N: Notifier,
{
  let chat = require_target(store).await?;
  notifier.send(chat, text).await.map_err(Error::publish)
}
