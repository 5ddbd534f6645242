//! Executing a master-catalog reconciliation pass.

use rankbot_core::{
  album::AlbumId,
  catalog::AlbumCatalog,
  reconcile::plan,
  store::RankingStore,
};

use crate::error::{Error, Result};

/// What one pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
  pub added:   Vec<AlbumId>,
  pub removed: Vec<AlbumId>,
  /// Referenced ids the catalog did not return; they stay orphaned until a
  /// later pass.
  pub missing: Vec<AlbumId>,
}

/// Prune catalog rows nothing references and fetch the referenced ones
/// that are missing.
pub async fn reconcile<S, C>(store: &S, catalog: &C) -> Result<ReconcileReport>
where
  S: RankingStore,
  C: AlbumCatalog,
{
  let master   = store.album_ids().await.map_err(Error::store)?;
  let ratings  = store.rating_album_ids().await.map_err(Error::store)?;
  let homework = store.homework_album_ids().await.map_err(Error::store)?;
  let plan     = plan(&master, &ratings, &homework);

  let mut report = ReconcileReport::default();
  if plan.is_empty() {
    return Ok(report);
  }

  for album_id in plan.to_remove {
    if store.remove_album(&album_id).await.map_err(Error::store)?.is_some() {
      report.removed.push(album_id);
    }
  }

  for album_id in plan.to_add {
    match catalog.get_album(&album_id).await {
      Ok(Some(found)) => {
        store.upsert_album(found.into_album()).await.map_err(Error::store)?;
        report.added.push(album_id);
      }
      Ok(None) => {
        tracing::warn!(%album_id, "referenced album is unknown to the catalog");
        report.missing.push(album_id);
      }
      Err(e) => {
        tracing::warn!(%album_id, error = %e, "catalog lookup failed, skipping album");
        report.missing.push(album_id);
      }
    }
  }

  tracing::info!(
    added = report.added.len(),
    removed = report.removed.len(),
    missing = report.missing.len(),
    "master catalog reconciled"
  );
  Ok(report)
}
