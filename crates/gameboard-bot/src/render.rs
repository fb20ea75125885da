//! Message text for the summary board and change notifications.
//!
//! Output uses Telegram's legacy Markdown. Player and game names are
//! untrusted, so they only ever appear through [`bold`], which cannot produce
//! unbalanced markup.

use std::time::Duration;

use chrono::NaiveTime;
use gameboard_core::player::{OnlineStatus, Presence};

const RULE: &str = "━━━━━━━━━━━━━━━━━━";

/// Error label for a player whose presence source reported `error`.
pub const FETCH_FAILED: &str = "failed to fetch data";

/// Error label for a player whose lookup failed outright.
pub const LOOKUP_FAILED: &str = "critical error";

// ─── Classification ──────────────────────────────────────────────────────────

/// What the board shows for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardStatus {
  Playing(String),
  Online,
  Offline,
  Error(String),
}

impl BoardStatus {
  /// An activity name wins over whatever status was reported alongside it.
  pub fn classify(presence: &Presence) -> Self {
    if let Some(name) = &presence.activity_name {
      return Self::Playing(name.clone());
    }
    match presence.status {
      OnlineStatus::Online => Self::Online,
      OnlineStatus::Offline => Self::Offline,
      OnlineStatus::Error => Self::Error(FETCH_FAILED.to_owned()),
    }
  }
}

/// One row of the summary board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
  pub display_name: String,
  pub status:       BoardStatus,
}

// ─── Markup ──────────────────────────────────────────────────────────────────

/// Escape text placed outside any entity.
pub fn escape_markdown(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    if matches!(c, '_' | '*' | '`' | '[') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

/// Wrap `text` in a bold entity.
///
/// Legacy Markdown has no escapes inside an entity, so a literal `*` would
/// close it early; it is replaced with the asterisk operator.
pub fn bold(text: &str) -> String { format!("*{}*", text.replace('*', "∗")) }

fn describe_period(period: Duration) -> String {
  let secs = period.as_secs();
  match secs {
    60 => "1 minute".to_owned(),
    s if s % 60 == 0 => format!("{} minutes", s / 60),
    1 => "1 second".to_owned(),
    s => format!("{s} seconds"),
  }
}

// ─── Documents ───────────────────────────────────────────────────────────────

/// Render the whole board, one block per entry, in the order given.
pub fn render_summary(
  entries: &[BoardEntry],
  generated_at: NaiveTime,
  next_update: Duration,
) -> String {
  let mut text = format!(
    "🎮 *GAME BOARD* | Updated {}\n{RULE}\n",
    generated_at.format("%H:%M")
  );

  for entry in entries {
    let (icon, line) = match &entry.status {
      BoardStatus::Playing(game) => ("🟠", format!("In game: {}", bold(game))),
      BoardStatus::Online => ("🟢", "Online".to_owned()),
      BoardStatus::Offline => ("🔴", "Offline".to_owned()),
      BoardStatus::Error(label) => ("⚠️", format!("Error: {}", escape_markdown(label))),
    };
    text.push_str(&format!("{icon} {}\n└─ {line}\n\n", bold(&entry.display_name)));
  }

  text.push_str(RULE);
  text.push('\n');
  text.push_str(&format!("Next update in {}", describe_period(next_update)));
  text
}

/// Which way an activity transition went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
  Started,
  Stopped,
}

/// Render a one-line activity notification.
pub fn render_notification(player: &str, activity: &str, change: Change) -> String {
  let verb = match change {
    Change::Started => "started",
    Change::Stopped => "stopped",
  };
  format!("🎮 {} {verb} {}", bold(player), bold(activity))
}
