//! The `Roster` trait: the ordered set of tracked identities.

use crate::player::{Identity, PlayerId};

/// Supplies the identities under observation, in display order.
///
/// Implementations cache for a bounded interval and never fail: a source that
/// cannot be read yields the previous roster (or an empty one).
pub trait Roster: Send {
  /// Return the roster, re-reading the backing source when `force` is set or
  /// the cache has expired.
  fn load(&mut self, force: bool) -> Vec<Identity>;

  /// The display name for `id`, falling back to a generic label for ids that
  /// are not on the roster.
  fn display_name(&mut self, id: &PlayerId) -> String {
    self
      .load(false)
      .into_iter()
      .find(|identity| &identity.id == id)
      .map(|identity| identity.display_name)
      .unwrap_or_else(|| format!("Player {id}"))
  }
}

/// A fixed roster, never refreshed.
impl Roster for Vec<Identity> {
  fn load(&mut self, _force: bool) -> Vec<Identity> { self.clone() }
}
