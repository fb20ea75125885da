//! Steam Web API presence source.
//!
//! Implements [`PresenceSource`] over `ISteamUser/GetPlayerSummaries`. One
//! request per player; failures are folded into [`Presence::error`] so a
//! single bad lookup never poisons a whole tick.

pub mod error;

use std::time::Duration;

use gameboard_core::{
  player::{OnlineStatus, PlayerId, Presence},
  presence::PresenceSource,
};
use reqwest::Client;
use serde::Deserialize;

pub use error::{Error, Result};

/// Default public endpoint of the Steam Web API.
pub const DEFAULT_BASE_URL: &str = "https://api.steampowered.com";

/// Connection settings for the Steam Web API.
#[derive(Debug, Clone)]
pub struct SteamConfig {
  pub base_url: String,
  pub api_key:  String,
  /// Upper bound for a single lookup, connect to last byte.
  pub timeout:  Duration,
}

impl SteamConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_owned(),
      api_key:  api_key.into(),
      timeout:  Duration::from_secs(10),
    }
  }
}

// ─── Wire format ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SummariesEnvelope {
  response: SummariesResponse,
}

#[derive(Debug, Deserialize)]
struct SummariesResponse {
  #[serde(default)]
  players: Vec<PlayerSummary>,
}

#[derive(Debug, Deserialize)]
struct PlayerSummary {
  /// 0 is offline; every other value (busy, away, snooze, ...) counts as
  /// online.
  #[serde(default)]
  personastate:  u8,
  gameid:        Option<String>,
  gameextrainfo: Option<String>,
}

impl From<PlayerSummary> for Presence {
  fn from(summary: PlayerSummary) -> Self {
    let status = if summary.personastate == 0 {
      OnlineStatus::Offline
    } else {
      OnlineStatus::Online
    };
    Self {
      status,
      activity_id: summary.gameid,
      activity_name: summary.gameextrainfo,
    }
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async client for player summaries.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SteamClient {
  client: Client,
  config: SteamConfig,
}

impl SteamClient {
  pub fn new(config: SteamConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/ISteamUser/GetPlayerSummaries/v2/",
      self.config.base_url.trim_end_matches('/')
    )
  }

  /// `GET /ISteamUser/GetPlayerSummaries/v2/?steamids=<id>`
  ///
  /// An empty `players` list (unknown or private profile) is reported as
  /// offline.
  pub async fn fetch(&self, id: &PlayerId) -> Result<Presence> {
    let resp = self
      .client
      .get(self.url())
      .query(&[("key", self.config.api_key.as_str()), ("steamids", id.as_str())])
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Status(resp.status()));
    }

    let envelope: SummariesEnvelope = resp.json().await?;
    Ok(
      envelope
        .response
        .players
        .into_iter()
        .next()
        .map(Presence::from)
        .unwrap_or_else(Presence::offline),
    )
  }
}

fn is_steam_id(id: &PlayerId) -> bool {
  !id.as_str().is_empty() && id.as_str().bytes().all(|b| b.is_ascii_digit())
}

impl PresenceSource for SteamClient {
  type Error = Error;

  async fn query(&self, id: &PlayerId) -> Result<Option<Presence>> {
    if !is_steam_id(id) {
      return Err(Error::InvalidSteamId(id.to_string()));
    }

    match self.fetch(id).await {
      Ok(presence) => Ok(Some(presence)),
      Err(e) => {
        tracing::error!(player = %id, error = %e, "Steam API lookup failed");
        Ok(Some(Presence::error()))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
  };

  use super::*;

  const PATH: &str = "/ISteamUser/GetPlayerSummaries/v2/";

  async fn client(server: &MockServer) -> SteamClient {
    let mut config = SteamConfig::new("test-key");
    config.base_url = server.uri();
    config.timeout = Duration::from_secs(2);
    SteamClient::new(config).unwrap()
  }

  fn player(id: &str) -> PlayerId { PlayerId::new(id) }

  #[tokio::test]
  async fn playing_player_reports_game() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path(PATH))
      .and(query_param("key", "test-key"))
      .and(query_param("steamids", "76561198000000001"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "response": { "players": [{
          "steamid": "76561198000000001",
          "personaname": "alice",
          "personastate": 1,
          "gameid": "570",
          "gameextrainfo": "Dota 2"
        }]}
      })))
      .mount(&server)
      .await;

    let presence = client(&server)
      .await
      .query(&player("76561198000000001"))
      .await
      .unwrap()
      .unwrap();
    assert_eq!(presence, Presence::playing("570", "Dota 2"));
  }

  #[tokio::test]
  async fn any_nonzero_persona_state_is_online() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path(PATH))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "response": { "players": [{ "personastate": 3 }] }
      })))
      .mount(&server)
      .await;

    let presence = client(&server).await.fetch(&player("1")).await.unwrap();
    assert_eq!(presence, Presence::online());
  }

  #[tokio::test]
  async fn unknown_player_is_offline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path(PATH))
      .respond_with(
        ResponseTemplate::new(200).set_body_json(json!({ "response": { "players": [] } })),
      )
      .mount(&server)
      .await;

    let presence = client(&server).await.query(&player("1")).await.unwrap();
    assert_eq!(presence, Some(Presence::offline()));
  }

  #[tokio::test]
  async fn server_error_maps_to_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path(PATH))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let presence = client(&server).await.query(&player("1")).await.unwrap();
    assert_eq!(presence, Some(Presence::error()));
  }

  #[tokio::test]
  async fn malformed_body_maps_to_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path(PATH))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
      .mount(&server)
      .await;

    let presence = client(&server).await.query(&player("1")).await.unwrap();
    assert_eq!(presence, Some(Presence::error()));
  }

  #[tokio::test]
  async fn slow_response_times_out_as_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path(PATH))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(json!({ "response": { "players": [] } }))
          .set_delay(Duration::from_secs(5)),
      )
      .mount(&server)
      .await;

    let presence = client(&server).await.query(&player("1")).await.unwrap();
    assert_eq!(presence, Some(Presence::error()));
  }

  #[tokio::test]
  async fn non_numeric_id_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    let result = client(&server).await.query(&player("alice")).await;
    assert!(matches!(result, Err(Error::InvalidSteamId(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
  }
}
