//! Runtime configuration, read from `config.toml` and `GAMEBOARD_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

use crate::scheduler::Timing;

/// Top-level bot configuration.
///
/// The API credentials default to empty so administrative subcommands can run
/// without them; `gameboard run` refuses to start while either is empty.
#[derive(Deserialize, Clone)]
pub struct BotConfig {
  #[serde(default)]
  pub steam_api_key:      String,
  #[serde(default)]
  pub telegram_token:     String,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  #[serde(default = "default_roster_path")]
  pub roster_path:        PathBuf,
  #[serde(default = "default_steam_base_url")]
  pub steam_base_url:     String,
  #[serde(default = "default_telegram_base_url")]
  pub telegram_base_url:  String,
  #[serde(default)]
  pub schedule:           ScheduleConfig,
}

/// Periods, start delays and timeouts, all in seconds.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ScheduleConfig {
  pub summary_period_secs:      u64,
  pub summary_first_delay_secs: u64,
  pub change_period_secs:       u64,
  pub change_first_delay_secs:  u64,
  pub presence_timeout_secs:    u64,
  pub roster_cache_secs:        u64,
}

impl Default for ScheduleConfig {
  fn default() -> Self {
    Self {
      summary_period_secs:      600,
      summary_first_delay_secs: 10,
      change_period_secs:       60,
      change_first_delay_secs:  5,
      presence_timeout_secs:    10,
      roster_cache_secs:        300,
    }
  }
}

impl ScheduleConfig {
  /// Timer settings for the scheduler. Periods are clamped to at least one
  /// second.
  pub fn timing(&self) -> Timing {
    let period = |secs: u64| Duration::from_secs(secs.max(1));
    Timing {
      summary_period:      period(self.summary_period_secs),
      summary_first_delay: Duration::from_secs(self.summary_first_delay_secs),
      change_period:       period(self.change_period_secs),
      change_first_delay:  Duration::from_secs(self.change_first_delay_secs),
    }
  }

  pub fn presence_timeout(&self) -> Duration { Duration::from_secs(self.presence_timeout_secs) }

  pub fn roster_cache_ttl(&self) -> Duration { Duration::from_secs(self.roster_cache_secs) }
}

fn default_store_path() -> PathBuf { PathBuf::from("gameboard.db") }

fn default_roster_path() -> PathBuf { PathBuf::from("players.json") }

fn default_steam_base_url() -> String { gameboard_steam::DEFAULT_BASE_URL.to_owned() }

fn default_telegram_base_url() -> String { gameboard_telegram::DEFAULT_BASE_URL.to_owned() }

impl BotConfig {
  /// Layer the optional TOML file at `path` under `GAMEBOARD_*` variables.
  /// Nested keys use a double underscore, e.g.
  /// `GAMEBOARD_SCHEDULE__SUMMARY_PERIOD_SECS`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("GAMEBOARD")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();

    let cfg = BotConfig::load(&path).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("gameboard.db"));
    assert_eq!(cfg.roster_path, PathBuf::from("players.json"));
    assert_eq!(cfg.schedule, ScheduleConfig::default());

    let timing = cfg.schedule.timing();
    assert_eq!(timing.summary_period, Duration::from_secs(600));
    assert_eq!(timing.change_first_delay, Duration::from_secs(5));
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
      &path,
      r#"
steam_api_key = "k"
telegram_token = "t"
store_path = "/var/lib/gameboard/state.db"

[schedule]
change_period_secs = 30
summary_period_secs = 0
"#,
    )
    .unwrap();

    let cfg = BotConfig::load(&path).unwrap();
    assert_eq!(cfg.steam_api_key, "k");
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/gameboard/state.db"));
    assert_eq!(cfg.schedule.change_period_secs, 30);
    assert_eq!(cfg.schedule.roster_cache_secs, 300);
    assert_eq!(cfg.schedule.timing().summary_period, Duration::from_secs(1));
  }
}
