//! The `AlbumCatalog` trait — the external music-metadata service.

use std::future::Future;

use crate::album::{AlbumId, CatalogAlbum, Playlist};

/// Name of the playlist that mirrors a user's homework.
pub fn homework_playlist_name(owner_name: &str) -> String {
  format!("{owner_name}'s Homework")
}

/// Description given to newly created homework playlists.
pub const HOMEWORK_PLAYLIST_DESCRIPTION: &str =
  "Your homework, managed by the Ranking Bot";

/// Abstraction over the album search / lookup service and the account that
/// owns the homework playlists.
pub trait AlbumCatalog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Keyword search restricted to albums.
  fn search_albums<'a>(
    &'a self,
    query: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<CatalogAlbum>, Self::Error>> + Send + 'a;

  /// Fetch an album by id. Unknown or malformed ids yield `None`.
  fn get_album<'a>(
    &'a self,
    album_id: &'a AlbumId,
  ) -> impl Future<Output = Result<Option<CatalogAlbum>, Self::Error>> + Send + 'a;

  /// The top search result for an artist/title pair.
  fn find_album<'a>(
    &'a self,
    artists: &'a [String],
    title: &'a str,
  ) -> impl Future<Output = Result<Option<CatalogAlbum>, Self::Error>> + Send + 'a;

  /// Find the homework playlist for `owner_name`, creating it if needed.
  fn homework_playlist<'a>(
    &'a self,
    owner_name: &'a str,
  ) -> impl Future<Output = Result<Playlist, Self::Error>> + Send + 'a;

  /// Add every track of an album that the playlist does not already hold.
  fn add_album_to_playlist<'a>(
    &'a self,
    playlist: &'a Playlist,
    album_id: &'a AlbumId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn remove_album_from_playlist<'a>(
    &'a self,
    playlist: &'a Playlist,
    album_id: &'a AlbumId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
