//! The `StateStore` trait.
//!
//! Implemented by storage backends (e.g. `gameboard-store-sqlite`). The
//! scheduler is the only writer of player rows and of the summary handle; the
//! channel target is written by the activation action.

use std::future::Future;

use crate::{
  channel::{ChatId, SummaryHandle},
  player::{Identity, PlayerId, PlayerState, PlayerStateUpdate},
};

/// Durable storage for the two singletons and the per-player rows.
pub trait StateStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Singletons ────────────────────────────────────────────────────────

  /// The chat all output goes to, if one has been activated.
  fn channel_target(
    &self,
  ) -> impl Future<Output = Result<Option<ChatId>, Self::Error>> + Send + '_;

  /// Replace the channel target. Any previous target is discarded.
  fn set_channel_target(
    &self,
    chat: ChatId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The live summary message, if one has been published.
  fn summary_handle(
    &self,
  ) -> impl Future<Output = Result<Option<SummaryHandle>, Self::Error>> + Send + '_;

  /// Replace the summary handle. At most one handle exists afterwards.
  fn set_summary_handle(
    &self,
    handle: SummaryHandle,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Players ───────────────────────────────────────────────────────────

  /// Insert a row for every roster identity that has none yet. Existing rows
  /// are left untouched.
  fn seed_players(
    &self,
    roster: Vec<Identity>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The durable row for `id`. Returns `None` if no row exists.
  fn player_state(
    &self,
    id: PlayerId,
  ) -> impl Future<Output = Result<Option<PlayerState>, Self::Error>> + Send + '_;

  /// Record the latest observed activity and status for a player, creating
  /// the row if needed.
  fn upsert_player_state(
    &self,
    update: PlayerStateUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All player rows, including orphans no longer on the roster.
  fn list_player_states(
    &self,
  ) -> impl Future<Output = Result<Vec<PlayerState>, Self::Error>> + Send + '_;
}
