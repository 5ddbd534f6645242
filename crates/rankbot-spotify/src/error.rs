//! Error types for `rankbot-spotify`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("spotify request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("spotify returned {status}: {body}")]
  Api { status: u16, body: String },

  #[error("spotify token refresh failed: {0}")]
  Auth(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
