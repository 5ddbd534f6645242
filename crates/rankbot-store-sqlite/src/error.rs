//! Error type for `rankbot-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Domain errors (duplicate rows) pass through with their own message.
  #[error(transparent)]
  Core(#[from] rankbot_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("cannot decode column {column}: {reason}")]
  Decode { column: &'static str, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
