//! Turning a command's `entry` text into an album.
//!
//! Autocomplete fills `entry` with a catalog id, but users can also type
//! `"artist - title"` and send it without picking a suggestion.

use rankbot_core::{
  album::{Album, AlbumId, CatalogAlbum},
  catalog::AlbumCatalog,
  matching::{match_album, split_display_name},
  store::RankingStore,
};

use crate::error::{Error, Result};

const NOT_FOUND: &str = "error: no results found";

/// Resolve `entry` against the catalog.
///
/// In order: the entry as a catalog id, a name match over the master
/// catalog, then the catalog's top search hit.
pub async fn resolve_entry<S, C>(store: &S, catalog: &C, entry: &str) -> Result<CatalogAlbum>
where
  S: RankingStore,
  C: AlbumCatalog,
{
  let entry = entry.trim();
  if entry.is_empty() {
    return Err(Error::invalid(NOT_FOUND));
  }

  if let Some(found) = catalog.get_album(&AlbumId::from(entry)).await.map_err(Error::catalog)? {
    return Ok(found);
  }

  let shaped = split_display_name(entry);
  if let Some((artist, title)) = shaped {
    let albums = store.list_albums().await.map_err(Error::store)?;
    if let Some(known) = match_album(artist, title, &albums)? {
      tracing::debug!(entry, album_id = %known.album_id, "entry matched the master catalog");
      if let Some(found) = catalog.get_album(&known.album_id).await.map_err(Error::catalog)? {
        return Ok(found);
      }
    }
  }

  let (artists, title) = match shaped {
    Some((artist, title)) => (vec![artist.to_string()], title),
    None => (Vec::new(), entry),
  };
  catalog
    .find_album(&artists, title)
    .await
    .map_err(Error::catalog)?
    .ok_or_else(|| Error::invalid(NOT_FOUND))
}

/// Find `entry` among albums the user already holds (their ratings or
/// homework): by id, else by name.
pub fn find_owned<'a>(entry: &str, albums: &'a [Album]) -> Result<Option<&'a Album>> {
  let entry = entry.trim();
  if let Some(album) = albums.iter().find(|a| a.album_id.as_str() == entry) {
    return Ok(Some(album));
  }
  let (artist, title) = split_display_name(entry).unwrap_or(("", entry));
  Ok(match_album(artist, title, albums)?)
}
