//! Error types and axum `IntoResponse` implementation.
//!
//! Errors raised while running a command are shown to the invoking user as
//! the follow-up message, so their `Display` output is user-facing.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid request signature")]
  Unauthorized,
  #[error("bad request: {0}")]
  BadRequest(String),
  /// A command was used incorrectly. The message is shown as-is.
  #[error("{0}")]
  Invalid(String),
  #[error("error: only moderators can use this command")]
  Forbidden,
  #[error("error: unknown command {0:?}")]
  UnknownCommand(String),
  #[error(transparent)]
  Core(#[from] rankbot_core::Error),
  #[error("{0}")]
  Store(#[source] BoxError),
  #[error("error: the album catalog is unavailable ({0})")]
  Catalog(#[source] BoxError),
  #[error("error: cannot reach discord ({0})")]
  Chat(#[source] BoxError),
}

impl Error {
  pub fn invalid(message: impl Into<String>) -> Self { Self::Invalid(message.into()) }

  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  pub fn catalog(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Catalog(Box::new(e))
  }

  pub fn chat(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Chat(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match self {
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::BadRequest(_) | Error::UnknownCommand(_) => StatusCode::BAD_REQUEST,
      Error::Invalid(_) | Error::Core(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Error::Forbidden => StatusCode::FORBIDDEN,
      Error::Store(_) | Error::Catalog(_) | Error::Chat(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, self.to_string()).into_response()
  }
}
