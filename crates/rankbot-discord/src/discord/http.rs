//! Async HTTP client for the Discord REST API.

use std::time::Duration;

use rankbot_core::album::UserId;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::{
  chat::{ChatPlatform, ChatUser},
  discord::{Message, Snowflake, User},
};

/// Attempts per request when Discord answers 429.
const MAX_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum HttpError {
  #[error("discord request failed: {0}")]
  Request(#[from] reqwest::Error),
  #[error("discord returned {status}: {body}")]
  Api { status: u16, body: String },
}

/// Connection settings for the Discord REST API.
#[derive(Debug, Clone)]
pub struct DiscordHttpConfig {
  pub api_base:       String,
  pub token:          String,
  pub application_id: u64,
  pub guild_id:       u64,
}

/// Discord REST client authenticated as the bot user.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct DiscordHttp {
  client: Client,
  config: DiscordHttpConfig,
}

#[derive(Deserialize)]
struct ChannelMessage {
  id:     Snowflake,
  author: User,
}

#[derive(Deserialize)]
struct RateLimited {
  retry_after: f64,
}

impl DiscordHttp {
  pub fn new(config: DiscordHttpConfig) -> Result<Self, HttpError> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    req.header("authorization", format!("Bot {}", self.config.token))
  }

  /// Send `req`, waiting out rate limits, and turn failures into
  /// [`HttpError::Api`].
  async fn send(&self, req: RequestBuilder) -> Result<Response, HttpError> {
    let mut attempt = 1;
    let resp = loop {
      let Some(this_try) = req.try_clone() else {
        break self.auth(req).send().await?;
      };
      let resp = self.auth(this_try).send().await?;
      if resp.status() != StatusCode::TOO_MANY_REQUESTS || attempt == MAX_ATTEMPTS {
        break resp;
      }

      let wait = resp.json::<RateLimited>().await.map_or(1.0, |r| r.retry_after);
      tracing::debug!(retry_after = wait, attempt, "discord rate limit hit");
      tokio::time::sleep(Duration::from_secs_f64(wait.clamp(0.0, 60.0))).await;
      attempt += 1;
    };

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(HttpError::Api { status: status.as_u16(), body });
    }
    Ok(resp)
  }
}

impl ChatPlatform for DiscordHttp {
  type Error = HttpError;

  /// `GET /users/{id}`
  async fn fetch_user(&self, user_id: UserId) -> Result<ChatUser, HttpError> {
    let url = self.url(&format!("/users/{user_id}"));
    tracing::debug!(url = %url, "GET discord");
    let user: User = self.send(self.client.get(&url)).await?.json().await?;
    Ok(ChatUser { id: user_id, name: user.display_name().to_string() })
  }

  /// `POST /channels/{id}/messages`
  async fn send_message(&self, channel_id: u64, message: &Message) -> Result<(), HttpError> {
    let url = self.url(&format!("/channels/{channel_id}/messages"));
    tracing::debug!(url = %url, "POST discord");
    self.send(self.client.post(&url).json(message)).await?;
    Ok(())
  }

  /// `GET /channels/{id}/messages?limit=100`, filtered to the bot's own.
  async fn bot_messages(&self, channel_id: u64) -> Result<Vec<u64>, HttpError> {
    let url = self.url(&format!("/channels/{channel_id}/messages"));
    tracing::debug!(url = %url, "GET discord");
    let messages: Vec<ChannelMessage> = self
      .send(self.client.get(&url).query(&[("limit", "100")]))
      .await?
      .json()
      .await?;

    Ok(
      messages
        .into_iter()
        .filter(|m| m.author.id.0 == self.config.application_id)
        .map(|m| m.id.0)
        .collect(),
    )
  }

  /// `DELETE /channels/{id}/messages/{message}`
  async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), HttpError> {
    let url = self.url(&format!("/channels/{channel_id}/messages/{message_id}"));
    tracing::debug!(url = %url, "DELETE discord");
    self.send(self.client.delete(&url)).await?;
    Ok(())
  }

  /// `POST /webhooks/{application}/{token}`
  async fn send_followup(&self, token: &str, message: &Message) -> Result<(), HttpError> {
    let url = self.url(&format!("/webhooks/{}/{token}", self.config.application_id));
    tracing::debug!("POST discord follow-up");
    self.send(self.client.post(&url).json(message)).await?;
    Ok(())
  }

  /// `PUT /applications/{application}/guilds/{guild}/commands`
  async fn register_commands(&self, commands: &Value) -> Result<(), HttpError> {
    let url = self.url(&format!(
      "/applications/{}/guilds/{}/commands",
      self.config.application_id, self.config.guild_id
    ));
    tracing::debug!(url = %url, "PUT discord");
    self.send(self.client.put(&url).json(commands)).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
  };

  use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::{delete, get, post},
  };
  use serde_json::json;
  use tokio::net::TcpListener;

  #[derive(Clone, Default)]
  struct Fake {
    posted:   Arc<Mutex<Vec<(String, Value)>>>,
    deleted:  Arc<Mutex<Vec<String>>>,
    attempts: Arc<AtomicUsize>,
  }

  async fn post_message(
    State(fake): State<Fake>,
    Path(channel): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
  ) -> Json<Value> {
    assert_eq!(headers["authorization"], "Bot secret");
    fake.posted.lock().unwrap().push((channel, body));
    Json(json!({ "id": "1" }))
  }

  async fn history() -> Json<Value> {
    Json(json!([
      { "id": "10", "author": { "id": "99", "username": "rankbot" } },
      { "id": "11", "author": { "id": "5", "username": "someone" } },
      { "id": "12", "author": { "id": "99", "username": "rankbot" } },
    ]))
  }

  async fn delete_message(
    State(fake): State<Fake>,
    Path((_channel, message)): Path<(String, String)>,
  ) -> axum::http::StatusCode {
    fake.deleted.lock().unwrap().push(message);
    axum::http::StatusCode::NO_CONTENT
  }

  /// Rate-limits the first attempt.
  async fn followup(State(fake): State<Fake>) -> axum::response::Response {
    use axum::response::IntoResponse as _;
    if fake.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
      (
        axum::http::StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "retry_after": 0.01, "global": false })),
      )
        .into_response()
    } else {
      Json(json!({ "id": "2" })).into_response()
    }
  }

  async fn user(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "id": id, "username": "alice", "global_name": "Alice" }))
  }

  async fn serve() -> (DiscordHttp, Fake) {
    let fake = Fake::default();
    let app  = Router::new()
      .route("/channels/{channel}/messages", post(post_message).get(history))
      .route("/channels/{channel}/messages/{message}", delete(delete_message))
      .route("/webhooks/{app}/{token}", post(followup))
      .route("/users/{id}", get(user))
      .with_state(fake.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base     = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let http = DiscordHttp::new(DiscordHttpConfig {
      api_base:       base,
      token:          "secret".into(),
      application_id: 99,
      guild_id:       7,
    })
    .unwrap();
    (http, fake)
  }

  #[tokio::test]
  async fn send_message_posts_json_with_bot_auth() {
    let (http, fake) = serve().await;
    http.send_message(42, &Message::text("hello")).await.unwrap();

    let posted = fake.posted.lock().unwrap();
    assert_eq!(posted[0].0, "42");
    assert_eq!(posted[0].1["content"], "hello");
    assert_eq!(posted[0].1["allowed_mentions"], json!({ "parse": [] }));
  }

  #[tokio::test]
  async fn bot_messages_keep_only_the_bots_own() {
    let (http, _) = serve().await;
    assert_eq!(http.bot_messages(42).await.unwrap(), vec![10, 12]);
  }

  #[tokio::test]
  async fn delete_message_hits_the_message_path() {
    let (http, fake) = serve().await;
    http.delete_message(42, 10).await.unwrap();
    assert_eq!(*fake.deleted.lock().unwrap(), vec!["10".to_string()]);
  }

  #[tokio::test]
  async fn followups_retry_after_a_rate_limit() {
    let (http, fake) = serve().await;
    http.send_followup("tok", &Message::text("done")).await.unwrap();
    assert_eq!(fake.attempts.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn fetch_user_prefers_the_global_name() {
    let (http, _) = serve().await;
    let user = http.fetch_user(UserId(5)).await.unwrap();
    assert_eq!(user.name, "Alice");
  }
}
