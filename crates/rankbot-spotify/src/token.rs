//! Access-token cache for the refresh-token flow.

use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::Mutex;

use crate::{Error, Result, client::SpotifyConfig, model::TokenResponse};

/// Tokens are treated as expired this long before Spotify says they are.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct AccessToken {
  value:      String,
  expires_at: Instant,
}

impl AccessToken {
  fn is_fresh(&self) -> bool { Instant::now() < self.expires_at }
}

/// Holds the current access token and refreshes it on demand.
///
/// The lock is held across the refresh request so concurrent callers wait
/// for one refresh instead of each issuing their own.
#[derive(Default)]
pub struct TokenCache {
  slot: Mutex<Option<AccessToken>>,
}

impl TokenCache {
  pub async fn bearer(&self, http: &Client, config: &SpotifyConfig) -> Result<String> {
    let mut slot = self.slot.lock().await;
    if let Some(token) = slot.as_ref().filter(|t| t.is_fresh()) {
      return Ok(token.value.clone());
    }

    let token = refresh(http, config).await?;
    let value = token.value.clone();
    *slot = Some(token);
    Ok(value)
  }
}

async fn refresh(http: &Client, config: &SpotifyConfig) -> Result<AccessToken> {
  let url = format!("{}/api/token", config.accounts_base.trim_end_matches('/'));
  tracing::debug!(url = %url, "refreshing spotify access token");

  let resp = http
    .post(&url)
    .basic_auth(&config.client_id, Some(&config.client_secret))
    .form(&[
      ("grant_type", "refresh_token"),
      ("refresh_token", config.refresh_token.as_str()),
    ])
    .send()
    .await?;

  let status = resp.status();
  if !status.is_success() {
    let body = resp.text().await.unwrap_or_default();
    return Err(Error::Auth(format!("{status}: {body}")));
  }

  let token: TokenResponse = resp.json().await?;
  let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
  Ok(AccessToken {
    value:      token.access_token,
    expires_at: Instant::now() + lifetime,
  })
}
