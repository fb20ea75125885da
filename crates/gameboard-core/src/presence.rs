//! The `PresenceSource` trait: where observations come from.

use std::future::Future;

use crate::player::{PlayerId, Presence};

/// A read-only view of the third-party presence API.
///
/// Implementations map ordinary "not found" or "private profile" answers to
/// [`Presence::offline`] and transport or decoding failures to
/// [`Presence::error`]; they enforce their own bounded timeout. `Err` is
/// reserved for requests that could not be issued at all. `Ok(None)` means
/// the source had nothing to say about the player this time.
pub trait PresenceSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn query<'a>(
    &'a self,
    id: &'a PlayerId,
  ) -> impl Future<Output = Result<Option<Presence>, Self::Error>> + Send + 'a;
}
