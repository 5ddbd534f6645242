//! Client tests against a local axum server standing in for both the
//! accounts service and the Web API.

use std::sync::{
  Arc, Mutex,
  atomic::{AtomicUsize, Ordering},
};

use axum::{
  Json, Router,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  routing::{get, post},
};
use rankbot_core::{
  album::{AlbumId, Playlist},
  catalog::AlbumCatalog,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::{Error, SpotifyClient, SpotifyConfig};

// ─── Fake Spotify ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct Fake {
  base:           Arc<Mutex<String>>,
  token_requests: Arc<AtomicUsize>,
  playlists:      Arc<Mutex<Vec<Value>>>,
  added:          Arc<Mutex<Vec<String>>>,
  removed:        Arc<Mutex<Vec<String>>>,
}

impl Fake {
  fn base(&self) -> String { self.base.lock().unwrap().clone() }
}

fn authorised(headers: &HeaderMap) -> bool {
  headers
    .get("authorization")
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v == "Bearer test-token")
}

fn album_json(id: &str, name: &str) -> Value {
  json!({
    "id": id,
    "name": name,
    "album_type": "album",
    "artists": [{ "name": "Radiohead" }],
    "release_date": "2000-10-02",
    "images": [{ "url": format!("https://img/{id}/640") }, { "url": "https://img/small" }],
  })
}

async fn token(State(fake): State<Fake>, body: String) -> Json<Value> {
  assert!(body.contains("grant_type=refresh_token"));
  assert!(body.contains("refresh_token=refresh"));
  fake.token_requests.fetch_add(1, Ordering::SeqCst);
  Json(json!({ "access_token": "test-token", "token_type": "Bearer", "expires_in": 3600 }))
}

async fn search(
  headers: HeaderMap,
  Query(q): Query<std::collections::HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
  if !authorised(&headers) {
    return Err(StatusCode::UNAUTHORIZED);
  }
  assert_eq!(q.get("type").map(String::as_str), Some("album"));
  let limit: usize = q.get("limit").and_then(|l| l.parse().ok()).unwrap_or(20);
  let items: Vec<Value> = [("kida", "Kid A"), ("amnesiac", "Amnesiac")]
    .into_iter()
    .take(limit)
    .map(|(id, name)| album_json(id, name))
    .collect();
  Ok(Json(json!({ "albums": { "items": items, "next": null } })))
}

async fn album(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
  match id.as_str() {
    "kida" => Ok(Json(album_json("kida", "Kid A"))),
    "broken" => Err(StatusCode::INTERNAL_SERVER_ERROR),
    _ => Err(StatusCode::NOT_FOUND),
  }
}

/// Three tracks split over two pages.
async fn album_tracks(
  State(fake): State<Fake>,
  Path(id): Path<String>,
  Query(q): Query<std::collections::HashMap<String, String>>,
) -> Json<Value> {
  if q.contains_key("offset") {
    Json(json!({ "items": [{ "id": "t3", "uri": "spotify:track:t3" }], "next": null }))
  } else {
    let next = format!("{}/v1/albums/{id}/tracks?offset=2", fake.base());
    Json(json!({
      "items": [
        { "id": "t1", "uri": "spotify:track:t1" },
        { "id": "t2", "uri": "spotify:track:t2" },
      ],
      "next": next,
    }))
  }
}

async fn my_playlists(State(fake): State<Fake>) -> Json<Value> {
  let items = fake.playlists.lock().unwrap().clone();
  Json(json!({ "items": items, "next": null }))
}

async fn me() -> Json<Value> { Json(json!({ "id": "bot-account" })) }

async fn create_playlist(
  State(fake): State<Fake>,
  Path(user): Path<String>,
  Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
  assert_eq!(user, "bot-account");
  assert_eq!(body["description"], "Your homework, managed by the Ranking Bot");
  let created = json!({
    "id": "new-pl",
    "name": body["name"],
    "external_urls": { "spotify": "https://open.spotify.com/playlist/new-pl" },
  });
  fake.playlists.lock().unwrap().push(created.clone());
  (StatusCode::CREATED, Json(created))
}

async fn playlist_tracks(Path(_id): Path<String>) -> Json<Value> {
  Json(json!({
    "items": [
      { "track": { "id": "t1", "uri": "spotify:track:t1" } },
      { "track": null },
    ],
    "next": null,
  }))
}

async fn add_tracks(State(fake): State<Fake>, Json(body): Json<Value>) -> StatusCode {
  let uris = body["uris"].as_array().unwrap();
  fake.added.lock().unwrap().extend(uris.iter().map(|u| u.as_str().unwrap().to_string()));
  StatusCode::CREATED
}

async fn remove_tracks(State(fake): State<Fake>, Json(body): Json<Value>) -> StatusCode {
  let tracks = body["tracks"].as_array().unwrap();
  fake
    .removed
    .lock()
    .unwrap()
    .extend(tracks.iter().map(|t| t["uri"].as_str().unwrap().to_string()));
  StatusCode::OK
}

async fn serve() -> (SpotifyClient, Fake) {
  let fake = Fake::default();
  let app = Router::new()
    .route("/api/token", post(token))
    .route("/v1/search", get(search))
    .route("/v1/albums/{id}", get(album))
    .route("/v1/albums/{id}/tracks", get(album_tracks))
    .route("/v1/me", get(me))
    .route("/v1/me/playlists", get(my_playlists))
    .route("/v1/users/{user}/playlists", post(create_playlist))
    .route(
      "/v1/playlists/{id}/tracks",
      get(playlist_tracks).post(add_tracks).delete(remove_tracks),
    )
    .with_state(fake.clone());

  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let base     = format!("http://{}", listener.local_addr().unwrap());
  *fake.base.lock().unwrap() = base.clone();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

  let client = SpotifyClient::new(SpotifyConfig {
    api_base:      format!("{base}/v1"),
    accounts_base: base,
    ..SpotifyConfig::new("client", "secret", "refresh")
  })
  .unwrap();
  (client, fake)
}

fn playlist() -> Playlist {
  Playlist {
    id:   "pl1".into(),
    name: "Alice's Homework".into(),
    url:  "https://open.spotify.com/playlist/pl1".into(),
  }
}

// ─── Search and lookup ───────────────────────────────────────────────────────

#[tokio::test]
async fn search_maps_albums_and_reuses_the_token() {
  let (client, fake) = serve().await;

  let found = client.search_albums("radiohead", 25).await.unwrap();
  assert_eq!(found.len(), 2);
  assert_eq!(found[0].id, AlbumId::from("kida"));
  assert_eq!(found[0].artists, vec!["Radiohead".to_string()]);
  assert_eq!(found[0].release_year(), 2000);
  assert_eq!(found[0].image_url.as_deref(), Some("https://img/kida/640"));

  client.search_albums("kid a", 1).await.unwrap();
  assert_eq!(fake.token_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn blank_search_skips_the_request() {
  let (client, fake) = serve().await;
  assert!(client.search_albums("   ", 25).await.unwrap().is_empty());
  assert_eq!(fake.token_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn find_album_takes_the_top_hit() {
  let (client, _) = serve().await;
  let found = client
    .find_album(&["Radiohead".to_string()], "Kid A")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.name, "Kid A");
}

#[tokio::test]
async fn get_album_known_unknown_and_malformed() {
  let (client, _) = serve().await;

  let album = client.get_album(&AlbumId::from("kida")).await.unwrap().unwrap();
  assert_eq!(album.into_album().year, 2000);

  assert!(client.get_album(&AlbumId::from("missing")).await.unwrap().is_none());
  assert!(client.get_album(&AlbumId::from("Radiohead - Kid A")).await.unwrap().is_none());
}

#[tokio::test]
async fn server_errors_are_not_swallowed() {
  let (client, _) = serve().await;
  let err = client.get_album(&AlbumId::from("broken")).await.unwrap_err();
  assert!(matches!(err, Error::Api { status: 500, .. }));
}

// ─── Playlists ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn homework_playlist_is_created_once() {
  let (client, fake) = serve().await;

  let created = client.homework_playlist("Alice").await.unwrap();
  assert_eq!(created.name, "Alice's Homework");
  assert_eq!(created.url, "https://open.spotify.com/playlist/new-pl");

  let found = client.homework_playlist("Alice").await.unwrap();
  assert_eq!(found, created);
  assert_eq!(fake.playlists.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn adding_an_album_skips_tracks_already_present() {
  let (client, fake) = serve().await;
  client
    .add_album_to_playlist(&playlist(), &AlbumId::from("kida"))
    .await
    .unwrap();
  assert_eq!(
    *fake.added.lock().unwrap(),
    vec!["spotify:track:t2".to_string(), "spotify:track:t3".to_string()]
  );
}

#[tokio::test]
async fn removing_an_album_removes_every_track() {
  let (client, fake) = serve().await;
  client
    .remove_album_from_playlist(&playlist(), &AlbumId::from("kida"))
    .await
    .unwrap();
  assert_eq!(fake.removed.lock().unwrap().len(), 3);
}
