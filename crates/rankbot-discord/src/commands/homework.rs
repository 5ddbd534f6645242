//! `add-homework`, `get-homework`, `remove-homework` and `add-all-homework`.

use rankbot_core::{catalog::AlbumCatalog, store::RankingStore};

use super::{
  PlaylistEdit, edit_playlist, entry, is_first_use, require_mod, target, text_messages,
};
use crate::{
  AppState,
  changelog::Event,
  chat::{ChatPlatform, ChatUser},
  discord::Message,
  error::{Error, Result},
  invocation::Invocation,
  resolve::{find_owned, resolve_entry},
};

pub async fn add_homework<S, C, P>(
  state: &AppState<S, C, P>,
  inv: &Invocation,
) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  let album = resolve_entry(&*state.store, &*state.catalog, entry(inv)?)
    .await?
    .into_album();
  let target = target(inv);
  let first_use = is_first_use(&*state.store, inv.invoker.id).await?;

  state.store.upsert_album(album.clone()).await.map_err(Error::store)?;
  if state
    .store
    .get_rating(target.id, &album.album_id)
    .await
    .map_err(Error::store)?
    .is_some()
  {
    return Err(Error::invalid(format!(
      "error: {} has already listened to {}",
      target.mention(),
      album.display_name()
    )));
  }
  state
    .store
    .add_homework(target.id, &album.album_id)
    .await
    .map_err(Error::store)?;

  edit_playlist(state, &target, &album.album_id, PlaylistEdit::Add).await;
  let changelog = state.changelog();
  if first_use {
    changelog.record(Event::FirstUse { user: inv.invoker.id }).await;
  }
  changelog
    .record(Event::HomeworkAdded { by: inv.invoker.id, target: target.id, album: &album })
    .await;

  Ok(vec![Message::text(format!(
    "i successfully added {} to {}'s homework",
    album.display_name(),
    target.mention()
  ))])
}

pub async fn get_homework<S, C, P>(
  state: &AppState<S, C, P>,
  inv: &Invocation,
) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  let target  = target(inv);
  let entries = state.store.user_homework(target.id, false).await.map_err(Error::store)?;

  let mut out = format!("## Homework of {}\n", target.mention());
  for (i, entry) in entries.iter().enumerate() {
    out.push_str(&format!("{}. {} ({})\n", i + 1, entry.album.display_name(), entry.album.year));
  }
  if entries.is_empty() {
    out.push_str(&format!("{} doesn't have any homework at the moment\n", target.name));
  }
  if let Some(url) = playlist_url(state, &target).await {
    out.push_str(&format!("\nPlaylist URL: {url}"));
  }

  Ok(text_messages(&out).into_iter().map(Message::suppress_embeds).collect())
}

async fn playlist_url<S, C, P>(state: &AppState<S, C, P>, owner: &ChatUser) -> Option<String>
where
  C: AlbumCatalog,
{
  if !state.config.spotify.playlists {
    return None;
  }
  match state.catalog.homework_playlist(&owner.name).await {
    Ok(playlist) => Some(playlist.url),
    Err(e) => {
      tracing::warn!(user = %owner.id, error = %e, "failed to look up homework playlist");
      None
    }
  }
}

/// Mark an album of the invoker's homework as listened to.
pub async fn remove_homework<S, C, P>(
  state: &AppState<S, C, P>,
  inv: &Invocation,
) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  const MISSING: &str = "error: row not found in your homework";

  let user    = &inv.invoker;
  let entries = state.store.user_homework(user.id, false).await.map_err(Error::store)?;
  let albums  = entries.into_iter().map(|e| e.album).collect::<Vec<_>>();
  let album   = find_owned(entry(inv)?, &albums)?
    .cloned()
    .ok_or_else(|| Error::invalid(MISSING))?;

  state
    .store
    .remove_homework(user.id, &album.album_id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::invalid(MISSING))?;

  edit_playlist(state, user, &album.album_id, PlaylistEdit::Remove).await;
  state
    .changelog()
    .record(Event::HomeworkFinished { user: user.id, album: &album })
    .await;

  Ok(vec![
    Message::text(format!(
      "i successfully removed {} from your homework",
      album.display_name()
    ))
    .suppress_embeds(),
  ])
}

/// Queue an album for every user with ratings who has neither rated nor
/// queued it yet.
pub async fn add_all_homework<S, C, P>(
  state: &AppState<S, C, P>,
  inv: &Invocation,
) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  require_mod(state, inv)?;
  let album = resolve_entry(&*state.store, &*state.catalog, entry(inv)?)
    .await?
    .into_album();
  state.store.upsert_album(album.clone()).await.map_err(Error::store)?;

  let changelog = state.changelog();
  let mut added = 0;
  for user_id in state.store.rated_users().await.map_err(Error::store)? {
    let queued = state
      .store
      .get_homework(user_id, &album.album_id)
      .await
      .map_err(Error::store)?;
    let rated = state
      .store
      .get_rating(user_id, &album.album_id)
      .await
      .map_err(Error::store)?;
    if queued.is_some() || rated.is_some() {
      continue;
    }

    state
      .store
      .add_homework(user_id, &album.album_id)
      .await
      .map_err(Error::store)?;
    added += 1;

    if state.config.spotify.playlists {
      match state.chat.fetch_user(user_id).await {
        Ok(owner) => edit_playlist(state, &owner, &album.album_id, PlaylistEdit::Add).await,
        Err(e) => tracing::warn!(user = %user_id, error = %e, "failed to look up user"),
      }
    }
    changelog
      .record(Event::HomeworkAdded { by: user_id, target: user_id, album: &album })
      .await;
  }

  tracing::info!(album_id = %album.album_id, added, "homework added for every user");
  Ok(vec![Message::text(format!(
    "i successfully added {} to {added} users homework",
    album.display_name()
  ))])
}
