//! Core types and collaborator traits for the Gameboard presence tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! scheduler in `gameboard-bot` depends only on the traits defined here; the
//! Steam, Telegram and SQLite crates provide the concrete implementations.

pub mod channel;
pub mod error;
pub mod notify;
pub mod player;
pub mod presence;
pub mod roster;
pub mod store;

pub use error::{Error, Result};
