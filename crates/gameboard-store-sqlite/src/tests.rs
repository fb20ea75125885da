//! Integration tests for `SqliteStore` against an in-memory database.

use gameboard_core::{
  channel::{ChatId, MessageId, SummaryHandle},
  player::{Identity, OnlineStatus, PlayerId, PlayerStateUpdate},
  store::StateStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn update(
  id: &str,
  activity: Option<(&str, &str)>,
  status: OnlineStatus,
) -> PlayerStateUpdate {
  PlayerStateUpdate {
    id:            PlayerId::new(id),
    activity_id:   activity.map(|(id, _)| id.to_owned()),
    activity_name: activity.map(|(_, name)| name.to_owned()),
    status,
  }
}

// ─── Channel target ──────────────────────────────────────────────────────────

#[tokio::test]
async fn channel_target_absent_until_set() {
  let s = store().await;
  assert_eq!(s.channel_target().await.unwrap(), None);

  s.set_channel_target(ChatId(-100123)).await.unwrap();
  assert_eq!(s.channel_target().await.unwrap(), Some(ChatId(-100123)));
}

#[tokio::test]
async fn setting_channel_target_replaces_previous() {
  let s = store().await;
  s.set_channel_target(ChatId(1)).await.unwrap();
  s.set_channel_target(ChatId(2)).await.unwrap();

  assert_eq!(s.channel_target().await.unwrap(), Some(ChatId(2)));
}

// ─── Summary handle ──────────────────────────────────────────────────────────

#[tokio::test]
async fn summary_handle_is_a_singleton() {
  let s = store().await;
  assert_eq!(s.summary_handle().await.unwrap(), None);

  let first = SummaryHandle { chat: ChatId(7), message_id: MessageId(10) };
  let second = SummaryHandle { chat: ChatId(7), message_id: MessageId(11) };
  s.set_summary_handle(first).await.unwrap();
  s.set_summary_handle(second).await.unwrap();

  assert_eq!(s.summary_handle().await.unwrap(), Some(second));

  let rows: i64 = s
    .conn_for_tests()
    .call(|conn| {
      Ok(conn.query_row("SELECT COUNT(*) FROM summary_message", [], |r| r.get(0))?)
    })
    .await
    .unwrap();
  assert_eq!(rows, 1);
}

// ─── Players ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn player_state_missing_returns_none() {
  let s = store().await;
  let state = s.player_state(PlayerId::new("404")).await.unwrap();
  assert!(state.is_none());
}

#[tokio::test]
async fn seed_inserts_blank_rows_with_display_names() {
  let s = store().await;
  s.seed_players(vec![Identity::new("1", "Alice"), Identity::new("2", "Bob")])
    .await
    .unwrap();

  let alice = s.player_state(PlayerId::new("1")).await.unwrap().unwrap();
  assert_eq!(alice.display_name.as_deref(), Some("Alice"));
  assert_eq!(alice.last_activity_name, None);
  assert_eq!(alice.last_status, None);
  assert_eq!(alice.total_playtime, 0);
}

#[tokio::test]
async fn seed_does_not_overwrite_existing_rows() {
  let s = store().await;
  s.seed_players(vec![Identity::new("1", "Alice")]).await.unwrap();
  s.upsert_player_state(update("1", Some(("570", "Dota 2")), OnlineStatus::Online))
    .await
    .unwrap();

  s.seed_players(vec![Identity::new("1", "Alicia")]).await.unwrap();

  let alice = s.player_state(PlayerId::new("1")).await.unwrap().unwrap();
  assert_eq!(alice.display_name.as_deref(), Some("Alice"));
  assert_eq!(alice.last_activity_name.as_deref(), Some("Dota 2"));
}

#[tokio::test]
async fn upsert_creates_then_overwrites() {
  let s = store().await;

  s.upsert_player_state(update("1", Some(("570", "Dota 2")), OnlineStatus::Online))
    .await
    .unwrap();
  let row = s.player_state(PlayerId::new("1")).await.unwrap().unwrap();
  assert_eq!(row.last_activity_id.as_deref(), Some("570"));
  assert_eq!(row.last_status, Some(OnlineStatus::Online));

  s.upsert_player_state(update("1", None, OnlineStatus::Offline))
    .await
    .unwrap();
  let row = s.player_state(PlayerId::new("1")).await.unwrap().unwrap();
  assert_eq!(row.last_activity_id, None);
  assert_eq!(row.last_activity_name, None);
  assert_eq!(row.last_status, Some(OnlineStatus::Offline));
}

#[tokio::test]
async fn list_includes_orphaned_rows() {
  let s = store().await;
  s.seed_players(vec![Identity::new("1", "Alice")]).await.unwrap();
  s.upsert_player_state(update("9", None, OnlineStatus::Error))
    .await
    .unwrap();

  let all = s.list_player_states().await.unwrap();
  let ids: Vec<_> = all.iter().map(|p| p.id.as_str()).collect();
  assert_eq!(ids, ["1", "9"]);
  assert_eq!(all[1].last_status, Some(OnlineStatus::Error));
}

#[tokio::test]
async fn state_survives_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("gameboard.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.set_channel_target(ChatId(42)).await.unwrap();
    s.upsert_player_state(update("1", Some(("730", "Counter-Strike 2")), OnlineStatus::Online))
      .await
      .unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.channel_target().await.unwrap(), Some(ChatId(42)));
  let row = s.player_state(PlayerId::new("1")).await.unwrap().unwrap();
  assert_eq!(row.last_activity_name.as_deref(), Some("Counter-Strike 2"));
}
