//! Master-catalog reconciliation planning.
//!
//! Computes the catalog rows to add and prune so that the master catalog
//! covers exactly the union of the albums referenced by ratings and homework.
//! Executing the plan needs the catalog client and lives with the caller.

use std::collections::BTreeSet;

use crate::album::AlbumId;

/// The store operations that bring the master catalog back in step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
  /// Referenced by a rating or homework row but absent from the catalog.
  pub to_add:    BTreeSet<AlbumId>,
  /// Present in the catalog but referenced by nothing.
  pub to_remove: BTreeSet<AlbumId>,
}

impl ReconcilePlan {
  pub fn is_empty(&self) -> bool {
    self.to_add.is_empty() && self.to_remove.is_empty()
  }
}

/// Diff the catalog ids against the ids referenced by ratings and homework.
pub fn plan(
  master: &BTreeSet<AlbumId>,
  ratings: &BTreeSet<AlbumId>,
  homework: &BTreeSet<AlbumId>,
) -> ReconcilePlan {
  let referenced: BTreeSet<AlbumId> = ratings.union(homework).cloned().collect();

  ReconcilePlan {
    to_add:    referenced.difference(master).cloned().collect(),
    to_remove: master.difference(&referenced).cloned().collect(),
  }
}
