//! In-memory collaborators for handler tests.

use std::{
  collections::{BTreeMap, BTreeSet},
  convert::Infallible,
  sync::{Arc, Mutex},
};

use chrono::Datelike as _;
use rankbot_core::{
  album::{Album, AlbumId, CatalogAlbum, Playlist, UserId},
  catalog::{AlbumCatalog, homework_playlist_name},
  text::words_match,
};
use rankbot_store_sqlite::SqliteStore;
use serde_json::Value;

use crate::{
  AppState,
  auth::{SignatureVerifier, tests::signing_key},
  chat::{ChatPlatform, ChatUser},
  config::{
    BotConfig, ChangelogConfig, DEFAULT_DISCORD_API, DiscordConfig, RankingChannel,
    SpotifySettings,
  },
  discord::Message,
};

pub type TestState = AppState<SqliteStore, FakeCatalog, RecordingChat>;

pub const MOD_ROLE: u64 = 900;
pub const CHANGELOG_CHANNEL: u64 = 4000;
/// Ranking channel of the year 2000.
pub const CHANNEL_2000: u64 = 5000;
/// Ranking channel of the current year.
pub const CHANNEL_NOW: u64 = 5001;

pub fn album(id: &str, title: &str, year: i32) -> Album {
  Album {
    album_id:  AlbumId::from(id),
    title:     title.into(),
    artists:   vec!["Radiohead".into()],
    year,
    cover_url: Some(format!("https://img/{id}")),
  }
}

pub fn catalog_album(id: &str, name: &str, year: i32) -> CatalogAlbum {
  CatalogAlbum {
    id:           AlbumId::from(id),
    name:         name.into(),
    artists:      vec!["Radiohead".into()],
    release_date: format!("{year}-10-02"),
    album_type:   "album".into(),
    image_url:    Some(format!("https://img/{id}")),
  }
}

fn config() -> BotConfig {
  BotConfig {
    host:             "127.0.0.1".into(),
    port:             0,
    store_path:       ":memory:".into(),
    discord:          DiscordConfig {
      application_id: 99,
      public_key:     String::new(),
      token:          "bot-token".into(),
      guild_id:       7,
      mod_role_id:    MOD_ROLE,
      api_base:       DEFAULT_DISCORD_API.into(),
    },
    changelog:        ChangelogConfig { active: true, channel_id: CHANGELOG_CHANNEL },
    ranking_channels: vec![
      RankingChannel { year: 2000, channel_id: CHANNEL_2000 },
      RankingChannel { year: chrono::Local::now().year(), channel_id: CHANNEL_NOW },
    ],
    spotify:          SpotifySettings {
      client_id:     "id".into(),
      client_secret: "secret".into(),
      refresh_token: "refresh".into(),
      playlists:     true,
      api_base:      None,
      accounts_base: None,
    },
  }
}

pub async fn test_state() -> TestState { test_state_with(|_| {}).await }

pub async fn test_state_with(adjust: impl FnOnce(&mut BotConfig)) -> TestState {
  let mut config = config();
  adjust(&mut config);
  AppState {
    store:        Arc::new(SqliteStore::open_in_memory().await.unwrap()),
    catalog:      Arc::new(FakeCatalog::default()),
    chat:         Arc::new(RecordingChat::default()),
    config:       Arc::new(config),
    verifier:     Arc::new(SignatureVerifier::new(signing_key().verifying_key())),
    command_lock: Arc::default(),
  }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("catalog unavailable")]
pub struct CatalogDown;

/// Albums held in a map; playlist edits are recorded as `"add {playlist} {album}"`
/// and `"remove {playlist} {album}"`.
#[derive(Default)]
pub struct FakeCatalog {
  albums:    Mutex<BTreeMap<AlbumId, CatalogAlbum>>,
  playlists: Mutex<Vec<String>>,
  /// Ids whose lookup fails with [`CatalogDown`].
  failing:   Mutex<BTreeSet<AlbumId>>,
}

impl FakeCatalog {
  pub fn insert(&self, album: CatalogAlbum) {
    self.albums.lock().unwrap().insert(album.id.clone(), album);
  }

  pub fn fail_lookups_of(&self, album_id: &str) {
    self.failing.lock().unwrap().insert(AlbumId::from(album_id));
  }

  pub fn playlist_ops(&self) -> Vec<String> { self.playlists.lock().unwrap().clone() }

  fn matching(&self, query: &str) -> Vec<CatalogAlbum> {
    self
      .albums
      .lock()
      .unwrap()
      .values()
      .filter(|a| words_match(query, &format!("{} {}", a.artists.join(" "), a.name)))
      .cloned()
      .collect()
  }
}

impl AlbumCatalog for FakeCatalog {
  type Error = CatalogDown;

  async fn search_albums(
    &self,
    query: &str,
    limit: usize,
  ) -> Result<Vec<CatalogAlbum>, CatalogDown> {
    let mut hits = self.matching(query);
    hits.truncate(limit);
    Ok(hits)
  }

  async fn get_album(&self, album_id: &AlbumId) -> Result<Option<CatalogAlbum>, CatalogDown> {
    if self.failing.lock().unwrap().contains(album_id) {
      return Err(CatalogDown);
    }
    Ok(self.albums.lock().unwrap().get(album_id).cloned())
  }

  async fn find_album(
    &self,
    artists: &[String],
    title: &str,
  ) -> Result<Option<CatalogAlbum>, CatalogDown> {
    let query = format!("{title} {}", artists.join(" "));
    Ok(self.matching(query.trim()).into_iter().next())
  }

  async fn homework_playlist(&self, owner_name: &str) -> Result<Playlist, CatalogDown> {
    Ok(Playlist {
      id:   owner_name.to_lowercase(),
      name: homework_playlist_name(owner_name),
      url:  format!("https://open.spotify.com/playlist/{}", owner_name.to_lowercase()),
    })
  }

  async fn add_album_to_playlist(
    &self,
    playlist: &Playlist,
    album_id: &AlbumId,
  ) -> Result<(), CatalogDown> {
    self.playlists.lock().unwrap().push(format!("add {} {album_id}", playlist.id));
    Ok(())
  }

  async fn remove_album_from_playlist(
    &self,
    playlist: &Playlist,
    album_id: &AlbumId,
  ) -> Result<(), CatalogDown> {
    self.playlists.lock().unwrap().push(format!("remove {} {album_id}", playlist.id));
    Ok(())
  }
}

// ─── Chat ────────────────────────────────────────────────────────────────────

/// Records everything sent. `fetch_user` names user `n` `"user{n}"`.
#[derive(Default)]
pub struct RecordingChat {
  sent:         Mutex<Vec<(u64, Message)>>,
  followups:    Mutex<Vec<(String, Message)>>,
  deleted:      Mutex<Vec<(u64, u64)>>,
  registered:   Mutex<Vec<Value>>,
  /// Message ids `bot_messages` reports for every channel.
  pub previous: Mutex<Vec<u64>>,
}

impl RecordingChat {
  pub fn followups(&self) -> Vec<(String, Message)> { self.followups.lock().unwrap().clone() }

  /// Contents of the follow-ups, in order.
  pub fn replies(&self) -> Vec<String> {
    self.followups().into_iter().map(|(_, m)| m.content).collect()
  }

  /// Contents of the messages posted to `channel_id`, in order.
  pub fn posted(&self, channel_id: u64) -> Vec<String> {
    self
      .sent
      .lock()
      .unwrap()
      .iter()
      .filter(|(c, _)| *c == channel_id)
      .map(|(_, m)| m.content.clone())
      .collect()
  }

  pub fn deleted(&self) -> Vec<(u64, u64)> { self.deleted.lock().unwrap().clone() }

  pub fn registered(&self) -> Vec<Value> { self.registered.lock().unwrap().clone() }
}

impl ChatPlatform for RecordingChat {
  type Error = Infallible;

  async fn fetch_user(&self, user_id: UserId) -> Result<ChatUser, Infallible> {
    Ok(ChatUser { id: user_id, name: format!("user{user_id}") })
  }

  async fn send_message(&self, channel_id: u64, message: &Message) -> Result<(), Infallible> {
    self.sent.lock().unwrap().push((channel_id, message.clone()));
    Ok(())
  }

  async fn bot_messages(&self, _channel_id: u64) -> Result<Vec<u64>, Infallible> {
    Ok(self.previous.lock().unwrap().clone())
  }

  async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), Infallible> {
    self.deleted.lock().unwrap().push((channel_id, message_id));
    Ok(())
  }

  async fn send_followup(&self, token: &str, message: &Message) -> Result<(), Infallible> {
    self.followups.lock().unwrap().push((token.to_string(), message.clone()));
    Ok(())
  }

  async fn register_commands(&self, commands: &Value) -> Result<(), Infallible> {
    self.registered.lock().unwrap().push(commands.clone());
    Ok(())
  }
}
