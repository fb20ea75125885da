//! The reconciliation scheduler.
//!
//! Two recurring actions share one presence source:
//!
//! - **summary refresh** re-reads the roster, queries everyone and publishes
//!   the board (edit in place, or post anew);
//! - **change detection** queries the roster captured at construction and
//!   compares each answer with the previous one held in memory, announcing
//!   activity transitions and persisting every change.
//!
//! Both run from a single loop, so they never overlap. Every failure is
//! contained to the player or tick it happened in; the loop always carries
//! on with the next tick.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::Local;
use gameboard_core::{
  notify::Notifier,
  player::{Identity, OnlineStatus, PlayerId, PlayerStateUpdate, Presence},
  presence::PresenceSource,
  roster::Roster,
  store::StateStore,
};
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::{
  Error, Result,
  publish::{Publication, publish_summary, send_notification},
  render::{BoardEntry, BoardStatus, Change, LOOKUP_FAILED, render_notification, render_summary},
};

// ─── Timing ──────────────────────────────────────────────────────────────────

/// Periods and start delays for the two recurring actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
  pub summary_period:      Duration,
  pub summary_first_delay: Duration,
  pub change_period:       Duration,
  pub change_first_delay:  Duration,
}

impl Default for Timing {
  fn default() -> Self {
    Self {
      summary_period:      Duration::from_secs(600),
      summary_first_delay: Duration::from_secs(10),
      change_period:       Duration::from_secs(60),
      change_first_delay:  Duration::from_secs(5),
    }
  }
}

// ─── Observation ─────────────────────────────────────────────────────────────

/// The tuple change detection compares between ticks. Equality is
/// structural; a player never seen before compares as the all-empty default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
  pub activity_id:   Option<String>,
  pub activity_name: Option<String>,
  pub status:        Option<OnlineStatus>,
}

impl From<&Presence> for Observation {
  fn from(presence: &Presence) -> Self {
    Self {
      activity_id:   presence.activity_id.clone(),
      activity_name: presence.activity_name.clone(),
      status:        Some(presence.status),
    }
  }
}

/// The notification owed for a transition, before the stopped activity's
/// name is checked against the durable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
  Started(String),
  /// `fallback` is the activity name remembered in memory.
  Stopped { fallback: String },
}

/// Only activity transitions are announced; pure status flips are silent.
pub fn announcement(prev: &Observation, curr: &Observation) -> Option<Announcement> {
  match (&prev.activity_name, &curr.activity_name) {
    (_, Some(current)) => Some(Announcement::Started(current.clone())),
    (Some(previous), None) => Some(Announcement::Stopped { fallback: previous.clone() }),
    (None, None) => None,
  }
}

// ─── Scheduler ───────────────────────────────────────────────────────────────

pub struct Scheduler<S, P, N, R> {
  store:       Arc<S>,
  presence:    Arc<P>,
  notifier:    Arc<N>,
  roster:      R,
  /// Roster captured at construction; change detection never re-reads it.
  snapshot:    Vec<Identity>,
  /// Last observation per player, as seen by change detection. Starts empty
  /// on every process start.
  transitions: HashMap<PlayerId, Observation>,
  timing:      Timing,
}

impl<S, P, N, R> Scheduler<S, P, N, R>
where
  S: StateStore,
  P: PresenceSource,
  N: Notifier,
  R: Roster,
{
  pub fn new(
    store: Arc<S>,
    presence: Arc<P>,
    notifier: Arc<N>,
    mut roster: R,
    timing: Timing,
  ) -> Self {
    let snapshot = roster.load(false);
    Self {
      store,
      presence,
      notifier,
      roster,
      snapshot,
      transitions: HashMap::new(),
      timing,
    }
  }

  /// The identities change detection polls.
  pub fn snapshot(&self) -> &[Identity] { &self.snapshot }

  /// What change detection last saw for `id`.
  pub fn last_observation(&self, id: &PlayerId) -> Option<&Observation> {
    self.transitions.get(id)
  }

  // ── Summary refresh ───────────────────────────────────────────────────────

  /// Query the whole (freshly reloaded) roster and publish the board.
  ///
  /// A failed lookup becomes an error row for that player alone.
  pub async fn refresh_summary(&mut self) -> Result<Publication> {
    let roster = self.roster.load(true);
    tracing::debug!(players = roster.len(), "refreshing summary");

    let mut entries = Vec::with_capacity(roster.len());
    for identity in roster {
      let status = match self.presence.query(&identity.id).await {
        Ok(Some(presence)) => BoardStatus::classify(&presence),
        Ok(None) => {
          tracing::warn!(player = %identity.id, "presence source returned nothing");
          BoardStatus::Error(LOOKUP_FAILED.to_owned())
        }
        Err(e) => {
          tracing::error!(player = %identity.id, error = %Error::query(e), "presence lookup failed");
          BoardStatus::Error(LOOKUP_FAILED.to_owned())
        }
      };
      entries.push(BoardEntry { display_name: identity.display_name, status });
    }

    let text = render_summary(&entries, Local::now().time(), self.timing.summary_period);
    publish_summary(&*self.store, &*self.notifier, &text).await
  }

  // ── Change detection ──────────────────────────────────────────────────────

  /// Compare every snapshot player with their previous observation. Returns
  /// the number of transitions seen.
  pub async fn detect_changes(&mut self) -> usize {
    tracing::debug!("checking for activity changes");
    let mut changed = 0;

    for identity in &self.snapshot {
      let presence = match self.presence.query(&identity.id).await {
        Ok(Some(presence)) => presence,
        Ok(None) => continue,
        Err(e) => {
          tracing::warn!(player = %identity.id, error = %Error::query(e), "skipping player this tick");
          continue;
        }
      };

      let current = Observation::from(&presence);
      let previous = self.transitions.get(&identity.id).cloned().unwrap_or_default();
      if previous == current {
        continue;
      }

      changed += 1;
      let name = self.roster.display_name(&identity.id);
      tracing::info!(player = %name, ?previous, ?current, "status changed");
      self.transitions.insert(identity.id.clone(), current.clone());

      if let Some(announcement) = announcement(&previous, &current) {
        announce(&*self.store, &*self.notifier, &identity.id, &name, announcement).await;
      }

      let update = PlayerStateUpdate::from_presence(identity.id.clone(), &presence);
      if let Err(e) = self.store.upsert_player_state(update).await {
        tracing::error!(player = %identity.id, error = %e, "failed to persist player state");
      }
    }

    changed
  }

  // ── Loop ──────────────────────────────────────────────────────────────────

  async fn summary_tick(&mut self) {
    match self.refresh_summary().await {
      Ok(Publication::Edited(handle)) => {
        tracing::info!(message_id = %handle.message_id, "summary message updated");
      }
      Ok(Publication::Posted(handle)) => {
        tracing::info!(message_id = %handle.message_id, chat = %handle.chat, "new summary message posted");
      }
      Err(Error::NoChannelTarget) => {
        tracing::warn!("no channel target set; run `gameboard activate` first");
      }
      Err(e) => tracing::error!(error = %e, "summary refresh failed"),
    }
  }

  /// Drive both actions forever. Each action finishes before the next timer
  /// is polled; missed ticks are delayed rather than bunched up.
  pub async fn run(mut self) {
    let start = Instant::now();
    let mut summary =
      interval_at(start + self.timing.summary_first_delay, self.timing.summary_period);
    summary.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut changes =
      interval_at(start + self.timing.change_first_delay, self.timing.change_period);
    changes.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(players = self.snapshot.len(), timing = ?self.timing, "scheduler started");

    loop {
      tokio::select! {
        _ = summary.tick() => self.summary_tick().await,
        _ = changes.tick() => {
          self.detect_changes().await;
        }
      }
    }
  }
}

/// Send the notification for one transition. A stopped activity is named
/// after the durable record when it has one. Failures are logged only.
async fn announce<S, N>(
  store: &S,
  notifier: &N,
  id: &PlayerId,
  name: &str,
  announcement: Announcement,
) where
  S: StateStore,
  N: Notifier,
{
  let text = match announcement {
    Announcement::Started(activity) => render_notification(name, &activity, Change::Started),
    Announcement::Stopped { fallback } => {
      let recorded = match store.player_state(id.clone()).await {
        Ok(row) => row.and_then(|row| row.last_activity_name),
        Err(e) => {
          tracing::warn!(player = %id, error = %e, "could not read last activity");
          None
        }
      };
      render_notification(name, &recorded.unwrap_or(fallback), Change::Stopped)
    }
  };

  match send_notification(store, notifier, &text).await {
    Ok(message_id) => tracing::info!(player = %name, %message_id, "notification sent"),
    Err(Error::NoChannelTarget) => {
      tracing::warn!(player = %name, "no channel target set; notification dropped");
    }
    Err(e) => tracing::error!(player = %name, error = %e, "failed to send notification"),
  }
}
