//! Telegram Bot API notifier.
//!
//! Implements [`Notifier`] with `sendMessage` and `editMessageText`. All text
//! is sent with the legacy `Markdown` parse mode; callers are responsible for
//! escaping user-supplied fragments.

pub mod error;

use std::time::Duration;

use gameboard_core::{
  channel::{ChatId, MessageId},
  notify::{EditOutcome, Notifier},
};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned, de::IgnoredAny};

pub use error::{Error, Result};

/// Default public endpoint of the Telegram Bot API.
pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

const PARSE_MODE: &str = "Markdown";

/// Connection settings for the Bot API.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
  pub base_url: String,
  pub token:    String,
  pub timeout:  Duration,
}

impl TelegramConfig {
  pub fn new(token: impl Into<String>) -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_owned(),
      token:    token.into(),
      timeout:  Duration::from_secs(30),
    }
  }
}

// ─── Wire format ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
  ok:          bool,
  result:      Option<T>,
  error_code:  Option<i64>,
  description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
  message_id: i64,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
  chat_id:    i64,
  text:       &'a str,
  parse_mode: &'a str,
}

#[derive(Debug, Serialize)]
struct EditMessageText<'a> {
  chat_id:    i64,
  message_id: i64,
  text:       &'a str,
  parse_mode: &'a str,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async Bot API client bound to one bot token.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct TelegramNotifier {
  client: Client,
  config: TelegramConfig,
}

impl TelegramNotifier {
  pub fn new(config: TelegramConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, method: &str) -> String {
    format!(
      "{}/bot{}/{}",
      self.config.base_url.trim_end_matches('/'),
      self.config.token,
      method
    )
  }

  /// `POST /bot<token>/<method>` with a JSON body.
  ///
  /// Error responses carry a JSON body too, so the HTTP status is not checked
  /// separately; `ok` decides.
  async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
  where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
  {
    let resp: ApiResponse<T> = self
      .client
      .post(self.url(method))
      .json(body)
      .send()
      .await?
      .json()
      .await?;

    if !resp.ok {
      return Err(Error::Api {
        code:        resp.error_code,
        description: resp.description.unwrap_or_default(),
      });
    }
    resp.result.ok_or(Error::MissingResult)
  }
}

impl Notifier for TelegramNotifier {
  type Error = Error;

  async fn send(&self, chat: ChatId, text: &str) -> Result<MessageId> {
    let sent: SentMessage = self
      .call("sendMessage", &SendMessage { chat_id: chat.0, text, parse_mode: PARSE_MODE })
      .await?;
    Ok(MessageId(sent.message_id))
  }

  async fn edit(&self, chat: ChatId, message_id: MessageId, text: &str) -> EditOutcome {
    let body = EditMessageText {
      chat_id: chat.0,
      message_id: message_id.0,
      text,
      parse_mode: PARSE_MODE,
    };

    match self.call::<_, IgnoredAny>("editMessageText", &body).await {
      Ok(_) => EditOutcome::Edited,
      Err(e) if e.is_message_not_modified() => EditOutcome::Edited,
      Err(e) if e.is_message_not_found() => EditOutcome::NotFound,
      Err(e) => {
        tracing::debug!(%chat, %message_id, error = %e, "editMessageText failed");
        EditOutcome::Failed(e.to_string())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
  };

  use super::*;

  async fn notifier(server: &MockServer) -> TelegramNotifier {
    let mut config = TelegramConfig::new("123:abc");
    config.base_url = server.uri();
    TelegramNotifier::new(config).unwrap()
  }

  fn api_error(description: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
      "ok": false,
      "error_code": 400,
      "description": description,
    }))
  }

  #[tokio::test]
  async fn send_returns_message_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/bot123:abc/sendMessage"))
      .and(body_partial_json(json!({
        "chat_id": -100,
        "text": "*hi*",
        "parse_mode": "Markdown",
      })))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": { "message_id": 77, "chat": { "id": -100 } },
      })))
      .expect(1)
      .mount(&server)
      .await;

    let id = notifier(&server).await.send(ChatId(-100), "*hi*").await.unwrap();
    assert_eq!(id, MessageId(77));
  }

  #[tokio::test]
  async fn send_surfaces_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/bot123:abc/sendMessage"))
      .respond_with(api_error("Forbidden: bot was kicked from the group chat"))
      .mount(&server)
      .await;

    let err = notifier(&server).await.send(ChatId(1), "x").await.unwrap_err();
    assert!(matches!(err, Error::Api { code: Some(400), .. }), "{err}");
  }

  #[tokio::test]
  async fn edit_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/bot123:abc/editMessageText"))
      .and(body_partial_json(json!({ "chat_id": 1, "message_id": 5 })))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": { "message_id": 5 },
      })))
      .mount(&server)
      .await;

    let outcome = notifier(&server).await.edit(ChatId(1), MessageId(5), "x").await;
    assert_eq!(outcome, EditOutcome::Edited);
  }

  #[tokio::test]
  async fn edit_of_deleted_message_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/bot123:abc/editMessageText"))
      .respond_with(api_error("Bad Request: message to edit not found"))
      .mount(&server)
      .await;

    let outcome = notifier(&server).await.edit(ChatId(1), MessageId(5), "x").await;
    assert_eq!(outcome, EditOutcome::NotFound);
  }

  #[tokio::test]
  async fn unchanged_text_counts_as_edited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/bot123:abc/editMessageText"))
      .respond_with(api_error(
        "Bad Request: message is not modified: specified new message content and reply markup are exactly the same",
      ))
      .mount(&server)
      .await;

    let outcome = notifier(&server).await.edit(ChatId(1), MessageId(5), "x").await;
    assert_eq!(outcome, EditOutcome::Edited);
  }

  #[tokio::test]
  async fn markup_rejection_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/bot123:abc/editMessageText"))
      .respond_with(api_error("Bad Request: can't parse entities: Can't find end of the entity"))
      .mount(&server)
      .await;

    let outcome = notifier(&server).await.edit(ChatId(1), MessageId(5), "*x").await;
    assert!(matches!(outcome, EditOutcome::Failed(reason) if reason.contains("can't parse entities")));
  }
}
