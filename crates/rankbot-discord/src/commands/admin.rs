//! Moderator commands: `update` and `sync`.

use rankbot_core::{catalog::AlbumCatalog, store::RankingStore};

use super::require_mod;
use crate::{
  AppState,
  chat::ChatPlatform,
  definitions,
  discord::Message,
  error::{Error, Result},
  invocation::Invocation,
  rankings::publish,
  reconcile::reconcile,
};

/// Reconcile, then republish every configured ranking channel.
pub async fn update<S, C, P>(state: &AppState<S, C, P>, inv: &Invocation) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  require_mod(state, inv)?;
  reconcile(&*state.store, &*state.catalog).await?;
  for channel in &state.config.ranking_channels {
    publish(state, channel.year).await?;
  }
  Ok(vec![Message::text("i probably updated the entire bot hopefully")])
}

/// Re-register the slash commands, then reconcile.
pub async fn sync<S, C, P>(state: &AppState<S, C, P>, inv: &Invocation) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  require_mod(state, inv)?;
  state
    .chat
    .register_commands(&definitions::commands())
    .await
    .map_err(Error::chat)?;
  reconcile(&*state.store, &*state.catalog).await?;
  Ok(vec![Message::text("sync successful")])
}
