//! gameboard binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! state store, and either runs the scheduler or performs one administrative
//! action against the store.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use gameboard_bot::{BotConfig, Scheduler, roster::FileRoster};
use gameboard_core::{channel::ChatId, roster::Roster, store::StateStore};
use gameboard_steam::{SteamClient, SteamConfig};
use gameboard_store_sqlite::SqliteStore;
use gameboard_telegram::{TelegramConfig, TelegramNotifier};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Steam presence board for a Telegram chat")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Poll presence and keep the chat updated until interrupted.
  Run,
  /// Make `chat_id` the single destination for all output.
  Activate {
    #[arg(long, allow_hyphen_values = true)]
    chat_id: i64,
  },
  /// Print the stored channel target, summary handle and player rows.
  Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = BotConfig::load(&cli.config).context("failed to read configuration")?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  match cli.command {
    Command::Run => run(cfg, store).await,
    Command::Activate { chat_id } => {
      store
        .set_channel_target(ChatId(chat_id))
        .await
        .context("failed to save channel target")?;
      println!("Output will go to chat {chat_id}.");
      Ok(())
    }
    Command::Status => status(&store).await,
  }
}

async fn run(cfg: BotConfig, store: SqliteStore) -> anyhow::Result<()> {
  if cfg.steam_api_key.is_empty() {
    bail!("steam_api_key is not configured");
  }
  if cfg.telegram_token.is_empty() {
    bail!("telegram_token is not configured");
  }

  let mut roster = FileRoster::new(&cfg.roster_path).with_ttl(cfg.schedule.roster_cache_ttl());
  store
    .seed_players(roster.load(false))
    .await
    .context("failed to seed player rows")?;

  let presence = SteamClient::new(SteamConfig {
    base_url: cfg.steam_base_url.clone(),
    api_key:  cfg.steam_api_key.clone(),
    timeout:  cfg.schedule.presence_timeout(),
  })
  .context("failed to build Steam client")?;

  let mut telegram = TelegramConfig::new(cfg.telegram_token.clone());
  telegram.base_url = cfg.telegram_base_url.clone();
  let notifier = TelegramNotifier::new(telegram).context("failed to build Telegram client")?;

  if store.channel_target().await?.is_none() {
    tracing::warn!("no channel target yet; run `gameboard activate --chat-id <id>`");
  }

  let scheduler = Scheduler::new(
    Arc::new(store),
    Arc::new(presence),
    Arc::new(notifier),
    roster,
    cfg.schedule.timing(),
  );

  tokio::select! {
    _ = scheduler.run() => {}
    res = tokio::signal::ctrl_c() => {
      res.context("failed to listen for shutdown signal")?;
      tracing::info!("shutting down");
    }
  }
  Ok(())
}

async fn status(store: &SqliteStore) -> anyhow::Result<()> {
  match store.channel_target().await? {
    Some(chat) => println!("channel target: {chat}"),
    None => println!("channel target: (none)"),
  }
  match store.summary_handle().await? {
    Some(handle) => println!("summary message: {} in chat {}", handle.message_id, handle.chat),
    None => println!("summary message: (none)"),
  }

  let players = store.list_player_states().await?;
  println!("players: {}", players.len());
  for p in players {
    println!(
      "  {:<20} {:<16} {:<8} {}",
      p.id,
      p.display_name.as_deref().unwrap_or("-"),
      p.last_status.map_or("-", |s| s.as_str()),
      p.last_activity_name.as_deref().unwrap_or("-"),
    );
  }
  Ok(())
}
