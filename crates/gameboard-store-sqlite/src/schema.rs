//! SQL schema for the Gameboard SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Singleton values keyed by name (currently only the channel target).
CREATE TABLE IF NOT EXISTS settings (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- One row per tracked player. Rows for players removed from the roster are
-- kept.
CREATE TABLE IF NOT EXISTS players (
    player_id          TEXT PRIMARY KEY,
    display_name       TEXT,
    last_activity_id   TEXT,
    last_activity_name TEXT,
    last_status        TEXT,            -- 'online' | 'offline' | 'error'
    total_playtime     INTEGER NOT NULL DEFAULT 0   -- reserved, never written
);

-- The live summary message. The CHECK keeps it a singleton.
CREATE TABLE IF NOT EXISTS summary_message (
    slot       INTEGER PRIMARY KEY CHECK (slot = 1),
    chat_id    INTEGER NOT NULL,
    message_id INTEGER NOT NULL
);

PRAGMA user_version = 1;
";

/// `settings.key` holding the channel target.
pub const CHANNEL_TARGET_KEY: &str = "chat_id";
