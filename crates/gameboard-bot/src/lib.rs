//! Gameboard: polls player presence and keeps a chat up to date.
//!
//! The [`scheduler::Scheduler`] owns the two recurring actions and the
//! in-memory transition cache. Rendering, publication and the file-backed
//! roster are plain helpers it calls; the concrete presence source, notifier
//! and store are supplied by the caller.

pub mod config;
pub mod error;
pub mod publish;
pub mod render;
pub mod roster;
pub mod scheduler;

pub use config::BotConfig;
pub use error::{Error, Result};
pub use scheduler::{Scheduler, Timing};
