//! Tracked identities and what is observed about them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Identity ────────────────────────────────────────────────────────────────

/// The stable external account id of a tracked player (a Steam id in
/// decimal form). Deserializes from either a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for PlayerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.pad(&self.0) }
}

impl<'de> Deserialize<'de> for PlayerId {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
      Text(String),
      Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
      Raw::Text(id) => Self(id),
      Raw::Number(id) => Self(id.to_string()),
    })
  }
}

/// A roster entry: an account reference plus the name shown in messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  #[serde(rename = "steam_id")]
  pub id:           PlayerId,
  pub display_name: String,
}

impl Identity {
  pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
    Self { id: PlayerId::new(id), display_name: display_name.into() }
  }
}

// ─── Presence ────────────────────────────────────────────────────────────────

/// Coarse online state reported by the presence source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnlineStatus {
  Online,
  Offline,
  /// The source could not determine the status (network or parse failure).
  Error,
}

impl OnlineStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Online => "online",
      Self::Offline => "offline",
      Self::Error => "error",
    }
  }
}

impl fmt::Display for OnlineStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OnlineStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "online" => Ok(Self::Online),
      "offline" => Ok(Self::Offline),
      "error" => Ok(Self::Error),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

/// One fresh observation of a player, produced on every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
  pub status:        OnlineStatus,
  pub activity_id:   Option<String>,
  pub activity_name: Option<String>,
}

impl Presence {
  pub fn offline() -> Self {
    Self { status: OnlineStatus::Offline, activity_id: None, activity_name: None }
  }

  pub fn online() -> Self {
    Self { status: OnlineStatus::Online, activity_id: None, activity_name: None }
  }

  pub fn error() -> Self {
    Self { status: OnlineStatus::Error, activity_id: None, activity_name: None }
  }

  pub fn playing(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      status:        OnlineStatus::Online,
      activity_id:   Some(id.into()),
      activity_name: Some(name.into()),
    }
  }
}

// ─── Persisted state ─────────────────────────────────────────────────────────

/// The durable last-known record for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
  pub id:                 PlayerId,
  pub display_name:       Option<String>,
  pub last_activity_id:   Option<String>,
  pub last_activity_name: Option<String>,
  pub last_status:        Option<OnlineStatus>,
  /// Reserved. The column exists in the durable schema but nothing computes
  /// or writes it; it always reads as zero for rows written by this crate.
  pub total_playtime:     i64,
}

/// Input to [`crate::store::StateStore::upsert_player_state`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStateUpdate {
  pub id:            PlayerId,
  pub activity_id:   Option<String>,
  pub activity_name: Option<String>,
  pub status:        OnlineStatus,
}

impl PlayerStateUpdate {
  pub fn from_presence(id: PlayerId, presence: &Presence) -> Self {
    Self {
      id,
      activity_id: presence.activity_id.clone(),
      activity_name: presence.activity_name.clone(),
      status: presence.status,
    }
  }
}
