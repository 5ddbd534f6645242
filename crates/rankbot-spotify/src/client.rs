//! Async HTTP client for the Spotify Web API.

use std::{collections::HashSet, sync::Arc, time::Duration};

use rankbot_core::{
  album::{AlbumId, CatalogAlbum, Playlist},
  catalog::{AlbumCatalog, HOMEWORK_PLAYLIST_DESCRIPTION, homework_playlist_name},
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
  Error, Result,
  model::{
    AddTracks, AlbumObject, NewPlaylist, Page, PlaylistItem, PlaylistObject, RemoveTracks,
    SearchResponse, TrackObject, TrackRef, UserObject,
  },
  token::TokenCache,
};

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";
pub const DEFAULT_ACCOUNTS_BASE: &str = "https://accounts.spotify.com";

/// Spotify rejects playlist edits of more than 100 tracks at once.
const TRACK_BATCH: usize = 100;

/// Largest page size the search endpoint accepts.
const SEARCH_LIMIT_MAX: usize = 50;

/// Credentials and endpoints for the Spotify account that owns the
/// homework playlists.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
  pub client_id:     String,
  pub client_secret: String,
  pub refresh_token: String,
  pub api_base:      String,
  pub accounts_base: String,
}

impl SpotifyConfig {
  /// Settings pointing at the public Spotify hosts.
  pub fn new(
    client_id: impl Into<String>,
    client_secret: impl Into<String>,
    refresh_token: impl Into<String>,
  ) -> Self {
    Self {
      client_id:     client_id.into(),
      client_secret: client_secret.into(),
      refresh_token: refresh_token.into(),
      api_base:      DEFAULT_API_BASE.to_string(),
      accounts_base: DEFAULT_ACCOUNTS_BASE.to_string(),
    }
  }
}

/// Album search, lookup and playlist maintenance over the Spotify Web API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cached
/// access token.
#[derive(Clone)]
pub struct SpotifyClient {
  http:   Client,
  config: Arc<SpotifyConfig>,
  tokens: Arc<TokenCache>,
}

impl SpotifyClient {
  pub fn new(config: SpotifyConfig) -> Result<Self> {
    let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self {
      http,
      config: Arc::new(config),
      tokens: Arc::new(TokenCache::default()),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
  }

  /// Authorise and send `req`, turning non-2xx statuses into
  /// [`Error::Api`].
  async fn send(&self, req: RequestBuilder) -> Result<Response> {
    let token = self.tokens.bearer(&self.http, &self.config).await?;
    let resp  = req.bearer_auth(token).send().await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Api { status: status.as_u16(), body });
    }
    Ok(resp)
  }

  async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
    tracing::debug!(url = %url, "GET spotify");
    let resp = self.send(self.http.get(url).query(query)).await?;
    Ok(resp.json().await?)
  }

  /// Fetch `url` and every page after it.
  async fn get_all<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut page: Page<T> = self.get_json(url, query).await?;
    loop {
      items.extend(page.items);
      match page.next {
        Some(next) => page = self.get_json(&next, &[]).await?,
        None => break,
      }
    }
    Ok(items)
  }

  // ── Albums ────────────────────────────────────────────────────────────────

  /// `GET /albums/{id}/tracks`, every page.
  async fn album_tracks(&self, album_id: &AlbumId) -> Result<Vec<TrackObject>> {
    let url = self.url(&format!("/albums/{album_id}/tracks"));
    self.get_all(&url, &[("limit", "50")]).await
  }

  // ── Playlists ─────────────────────────────────────────────────────────────

  /// `GET /playlists/{id}/tracks`, every page, skipping unavailable tracks.
  async fn playlist_tracks(&self, playlist: &Playlist) -> Result<Vec<TrackObject>> {
    let url   = self.url(&format!("/playlists/{}/tracks", playlist.id));
    let items = self.get_all::<PlaylistItem>(&url, &[("limit", "100")]).await?;
    Ok(items.into_iter().filter_map(|item| item.track).collect())
  }

  /// `POST /users/{me}/playlists`
  async fn create_playlist(&self, name: &str) -> Result<Playlist> {
    let me: UserObject = self.get_json(&self.url("/me"), &[]).await?;
    let url = self.url(&format!("/users/{}/playlists", me.id));
    tracing::debug!(url = %url, name, "POST spotify");

    let body = NewPlaylist { name, description: HOMEWORK_PLAYLIST_DESCRIPTION, public: false };
    let created: PlaylistObject = self.send(self.http.post(&url).json(&body)).await?.json().await?;
    tracing::info!(playlist = %created.id, name, "created homework playlist");
    Ok(created.into())
  }
}

/// Spotify ids are base-62. Anything else cannot name an album, and must not
/// be spliced into a request path.
fn is_catalog_id(id: &str) -> bool {
  !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

// ─── AlbumCatalog impl ───────────────────────────────────────────────────────

impl AlbumCatalog for SpotifyClient {
  type Error = Error;

  async fn search_albums(&self, query: &str, limit: usize) -> Result<Vec<CatalogAlbum>> {
    if query.trim().is_empty() {
      return Ok(Vec::new());
    }
    let limit = limit.clamp(1, SEARCH_LIMIT_MAX).to_string();
    let found: SearchResponse = self
      .get_json(
        &self.url("/search"),
        &[("q", query), ("type", "album"), ("limit", limit.as_str())],
      )
      .await?;
    Ok(found.albums.items.into_iter().map(CatalogAlbum::from).collect())
  }

  async fn get_album(&self, album_id: &AlbumId) -> Result<Option<CatalogAlbum>> {
    if !is_catalog_id(album_id.as_str()) {
      return Ok(None);
    }
    match self
      .get_json::<AlbumObject>(&self.url(&format!("/albums/{album_id}")), &[])
      .await
    {
      Ok(album) => Ok(Some(album.into())),
      Err(Error::Api { status: 400 | 404, .. }) => Ok(None),
      Err(e) => Err(e),
    }
  }

  async fn find_album(&self, artists: &[String], title: &str) -> Result<Option<CatalogAlbum>> {
    let query = format!("{title} {}", artists.join(" "));
    Ok(self.search_albums(query.trim(), 1).await?.into_iter().next())
  }

  async fn homework_playlist(&self, owner_name: &str) -> Result<Playlist> {
    let name = homework_playlist_name(owner_name);
    let playlists: Vec<PlaylistObject> =
      self.get_all(&self.url("/me/playlists"), &[("limit", "50")]).await?;

    match playlists.into_iter().find(|p| p.name == name) {
      Some(existing) => Ok(existing.into()),
      None => self.create_playlist(&name).await,
    }
  }

  async fn add_album_to_playlist(&self, playlist: &Playlist, album_id: &AlbumId) -> Result<()> {
    let existing: HashSet<String> = self
      .playlist_tracks(playlist)
      .await?
      .into_iter()
      .map(|t| t.uri)
      .collect();
    let uris: Vec<String> = self
      .album_tracks(album_id)
      .await?
      .into_iter()
      .map(|t| t.uri)
      .filter(|uri| !existing.contains(uri))
      .collect();

    let url = self.url(&format!("/playlists/{}/tracks", playlist.id));
    for batch in uris.chunks(TRACK_BATCH) {
      tracing::debug!(url = %url, tracks = batch.len(), "POST spotify");
      self.send(self.http.post(&url).json(&AddTracks { uris: batch })).await?;
    }
    Ok(())
  }

  async fn remove_album_from_playlist(
    &self,
    playlist: &Playlist,
    album_id: &AlbumId,
  ) -> Result<()> {
    let uris: Vec<String> = self
      .album_tracks(album_id)
      .await?
      .into_iter()
      .map(|t| t.uri)
      .collect();

    let url = self.url(&format!("/playlists/{}/tracks", playlist.id));
    for batch in uris.chunks(TRACK_BATCH) {
      tracing::debug!(url = %url, tracks = batch.len(), "DELETE spotify");
      let body = RemoveTracks { tracks: batch.iter().map(|uri| TrackRef { uri }).collect() };
      self.send(self.http.delete(&url).json(&body)).await?;
    }
    Ok(())
  }
}
