//! Wire types for the subset of the Spotify Web API the bot uses.
//!
//! Only the fields the bot reads are declared; serde ignores the rest.

use rankbot_core::album::{AlbumId, CatalogAlbum, Playlist};
use serde::{Deserialize, Serialize};

// ─── Accounts ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  /// Lifetime in seconds.
  pub expires_in:   u64,
}

// ─── Paging ──────────────────────────────────────────────────────────────────

/// A page of results. `next` is the absolute URL of the following page.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  #[serde(default)]
  pub next:  Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
  pub albums: Page<AlbumObject>,
}

// ─── Albums ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ArtistObject {
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageObject {
  pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct AlbumObject {
  pub id:           String,
  pub name:         String,
  pub album_type:   String,
  pub artists:      Vec<ArtistObject>,
  #[serde(default)]
  pub release_date: String,
  #[serde(default)]
  pub images:       Vec<ImageObject>,
}

impl From<AlbumObject> for CatalogAlbum {
  fn from(album: AlbumObject) -> Self {
    CatalogAlbum {
      id:           AlbumId(album.id),
      name:         album.name,
      artists:      album.artists.into_iter().map(|a| a.name).collect(),
      release_date: album.release_date,
      album_type:   album.album_type,
      image_url:    album.images.into_iter().next().map(|i| i.url),
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct TrackObject {
  /// Local files have no id.
  pub id:  Option<String>,
  pub uri: String,
}

// ─── Playlists ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExternalUrls {
  #[serde(default)]
  pub spotify: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistObject {
  pub id:            String,
  pub name:          String,
  pub external_urls: ExternalUrls,
}

impl From<PlaylistObject> for Playlist {
  fn from(p: PlaylistObject) -> Self {
    Playlist { id: p.id, name: p.name, url: p.external_urls.spotify }
  }
}

/// One entry of a playlist. Removed or unavailable tracks come back `null`.
#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
  pub track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub struct UserObject {
  pub id: String,
}

// ─── Request bodies ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct NewPlaylist<'a> {
  pub name:        &'a str,
  pub description: &'a str,
  pub public:      bool,
}

#[derive(Debug, Serialize)]
pub struct AddTracks<'a> {
  pub uris: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct TrackRef<'a> {
  pub uri: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RemoveTracks<'a> {
  pub tracks: Vec<TrackRef<'a>>,
}
