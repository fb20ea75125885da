//! [`SqliteStore`] — the SQLite implementation of [`StateStore`].

use std::path::Path;

use gameboard_core::{
  channel::{ChatId, MessageId, SummaryHandle},
  player::{Identity, PlayerId, PlayerState, PlayerStateUpdate},
  store::StateStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{RawPlayerState, decode_chat_id, encode_chat_id, encode_status},
  schema::{CHANNEL_TARGET_KEY, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Gameboard state backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every call
/// runs on the connection's own thread, so writes are serialized.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn conn_for_tests(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

// ─── StateStore impl ─────────────────────────────────────────────────────────

impl StateStore for SqliteStore {
  type Error = Error;

  // ── Singletons ────────────────────────────────────────────────────────────

  async fn channel_target(&self) -> Result<Option<ChatId>> {
    let raw: Option<String> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM settings WHERE key = ?1",
              rusqlite::params![CHANNEL_TARGET_KEY],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(decode_chat_id).transpose()
  }

  async fn set_channel_target(&self, chat: ChatId) -> Result<()> {
    let value = encode_chat_id(chat);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO settings (key, value) VALUES (?1, ?2)
           ON CONFLICT (key) DO UPDATE SET value = excluded.value",
          rusqlite::params![CHANNEL_TARGET_KEY, value],
        )?;
        Ok(())
      })
      .await?;

    tracing::info!(%chat, "channel target saved");
    Ok(())
  }

  async fn summary_handle(&self) -> Result<Option<SummaryHandle>> {
    let handle = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT chat_id, message_id FROM summary_message WHERE slot = 1",
              [],
              |row| {
                Ok(SummaryHandle {
                  chat:       ChatId(row.get(0)?),
                  message_id: MessageId(row.get(1)?),
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(handle)
  }

  async fn set_summary_handle(&self, handle: SummaryHandle) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO summary_message (slot, chat_id, message_id) VALUES (1, ?1, ?2)
           ON CONFLICT (slot) DO UPDATE
             SET chat_id = excluded.chat_id, message_id = excluded.message_id",
          rusqlite::params![handle.chat.0, handle.message_id.0],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Players ───────────────────────────────────────────────────────────────

  async fn seed_players(&self, roster: Vec<Identity>) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO players (player_id, display_name) VALUES (?1, ?2)",
          )?;
          for identity in &roster {
            stmt.execute(rusqlite::params![identity.id.as_str(), identity.display_name])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn player_state(&self, id: PlayerId) -> Result<Option<PlayerState>> {
    let raw: Option<RawPlayerState> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM players WHERE player_id = ?1",
          RawPlayerState::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id.0], RawPlayerState::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPlayerState::into_state).transpose()
  }

  async fn upsert_player_state(&self, update: PlayerStateUpdate) -> Result<()> {
    let status = encode_status(update.status);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO players (player_id, last_activity_id, last_activity_name, last_status)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (player_id) DO UPDATE SET
             last_activity_id   = excluded.last_activity_id,
             last_activity_name = excluded.last_activity_name,
             last_status        = excluded.last_status",
          rusqlite::params![
            update.id.0,
            update.activity_id,
            update.activity_name,
            status,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_player_states(&self) -> Result<Vec<PlayerState>> {
    let raws: Vec<RawPlayerState> = self
      .conn
      .call(|conn| {
        let sql = format!(
          "SELECT {} FROM players ORDER BY player_id",
          RawPlayerState::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawPlayerState::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlayerState::into_state).collect()
  }
}
