//! Conversions between domain types and the plain values stored in SQLite.

use gameboard_core::{
  channel::ChatId,
  player::{OnlineStatus, PlayerId, PlayerState},
};

use crate::{Error, Result, schema::CHANNEL_TARGET_KEY};

pub fn encode_chat_id(chat: ChatId) -> String { chat.0.to_string() }

pub fn decode_chat_id(s: String) -> Result<ChatId> {
  s.trim()
    .parse()
    .map(ChatId)
    .map_err(|_| Error::MalformedSetting { key: CHANNEL_TARGET_KEY, value: s })
}

pub fn encode_status(status: OnlineStatus) -> &'static str { status.as_str() }

/// A row of the `players` table before validation.
pub struct RawPlayerState {
  pub player_id:          String,
  pub display_name:       Option<String>,
  pub last_activity_id:   Option<String>,
  pub last_activity_name: Option<String>,
  pub last_status:        Option<String>,
  pub total_playtime:     i64,
}

impl RawPlayerState {
  pub const COLUMNS: &'static str = "player_id, display_name, last_activity_id, \
                                     last_activity_name, last_status, total_playtime";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      player_id:          row.get(0)?,
      display_name:       row.get(1)?,
      last_activity_id:   row.get(2)?,
      last_activity_name: row.get(3)?,
      last_status:        row.get(4)?,
      total_playtime:     row.get(5)?,
    })
  }

  pub fn into_state(self) -> Result<PlayerState> {
    let last_status = self
      .last_status
      .as_deref()
      .map(str::parse::<OnlineStatus>)
      .transpose()?;

    Ok(PlayerState {
      id: PlayerId(self.player_id),
      display_name: self.display_name,
      last_activity_id: self.last_activity_id,
      last_activity_name: self.last_activity_name,
      last_status,
      total_playtime: self.total_playtime,
    })
  }
}
