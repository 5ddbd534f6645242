//! The album ranking bot's Discord front-end.
//!
//! Exposes an axum [`Router`] that receives Discord interactions over HTTP,
//! backed by any [`RankingStore`], [`AlbumCatalog`] and [`ChatPlatform`].

pub mod auth;
pub mod autocomplete;
pub mod changelog;
pub mod chat;
pub mod commands;
pub mod config;
pub mod definitions;
pub mod discord;
pub mod error;
pub mod invocation;
pub mod rankings;
pub mod reconcile;
pub mod resolve;

#[cfg(test)]
mod testing;

pub use config::BotConfig;
pub use error::Error;

use std::sync::Arc;

use axum::{
  Json, Router,
  body::Bytes,
  extract::State,
  http::HeaderMap,
  routing::{get, post},
};
use rankbot_core::{catalog::AlbumCatalog, store::RankingStore};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use auth::SignatureVerifier;
use changelog::Changelog;
use chat::ChatPlatform;
use discord::{
  Interaction, InteractionResponse,
  interaction::{APPLICATION_COMMAND, APPLICATION_COMMAND_AUTOCOMPLETE, PING},
};
use invocation::Invocation;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers and command tasks.
pub struct AppState<S, C, P> {
  pub store:        Arc<S>,
  pub catalog:      Arc<C>,
  pub chat:         Arc<P>,
  pub config:       Arc<BotConfig>,
  pub verifier:     Arc<SignatureVerifier>,
  /// Held for the whole of a command, reconciliation included, so commands
  /// run one at a time.
  pub command_lock: Arc<Mutex<()>>,
}

impl<S, C, P> Clone for AppState<S, C, P> {
  fn clone(&self) -> Self {
    Self {
      store:        Arc::clone(&self.store),
      catalog:      Arc::clone(&self.catalog),
      chat:         Arc::clone(&self.chat),
      config:       Arc::clone(&self.config),
      verifier:     Arc::clone(&self.verifier),
      command_lock: Arc::clone(&self.command_lock),
    }
  }
}

impl<S, C, P: ChatPlatform> AppState<S, C, P> {
  pub fn changelog(&self) -> Changelog<'_, P> {
    Changelog::new(&*self.chat, &self.config.changelog)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the interactions endpoint.
pub fn router<S, C, P>(state: AppState<S, C, P>) -> Router
where
  S: RankingStore + 'static,
  C: AlbumCatalog + 'static,
  P: ChatPlatform + 'static,
{
  Router::new()
    .route("/interactions", post(interactions_handler::<S, C, P>))
    .route("/health", get(health_handler))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn health_handler() -> &'static str { "ok" }

/// Verify, then answer pings and autocomplete inline. Commands are
/// acknowledged at once and run on a spawned task that replies through
/// follow-up messages.
async fn interactions_handler<S, C, P>(
  State(state): State<AppState<S, C, P>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<InteractionResponse>, Error>
where
  S: RankingStore + 'static,
  C: AlbumCatalog + 'static,
  P: ChatPlatform + 'static,
{
  state.verifier.verify(&headers, &body)?;
  let interaction: Interaction =
    serde_json::from_slice(&body).map_err(|e| Error::BadRequest(e.to_string()))?;

  match interaction.kind {
    PING => Ok(Json(InteractionResponse::pong())),
    APPLICATION_COMMAND => {
      let invocation = Invocation::from_interaction(&interaction)?;
      tracing::info!(
        command = %invocation.command,
        user = %invocation.invoker.id,
        "command received"
      );
      let token = interaction.token;
      tokio::spawn(async move { commands::respond(&state, &token, &invocation).await });
      Ok(Json(InteractionResponse::deferred()))
    }
    APPLICATION_COMMAND_AUTOCOMPLETE => {
      let invocation = Invocation::from_interaction(&interaction)?;
      let choices = autocomplete::suggest(&state, &invocation).await;
      Ok(Json(InteractionResponse::autocomplete(choices)))
    }
    other => Err(Error::BadRequest(format!("unsupported interaction type {other}"))),
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
