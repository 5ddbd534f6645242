//! `get-ratings`, `add-rating`, `edit-rating` and `remove-rating`.

use rankbot_core::{
  album::{Album, Rating},
  catalog::AlbumCatalog,
  store::RankingStore,
  text::format_score,
};

use super::{PlaylistEdit, edit_playlist, entry, is_first_use, score, text_messages, year};
use crate::{
  AppState,
  changelog::Event,
  chat::ChatPlatform,
  discord::Message,
  error::{Error, Result},
  invocation::Invocation,
  rankings::{rankings_message, republish},
  resolve::{find_owned, resolve_entry},
};

pub async fn get_ratings<S, C, P>(
  state: &AppState<S, C, P>,
  inv: &Invocation,
) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  let content = rankings_message(&*state.store, year(inv)).await?;
  Ok(text_messages(&content))
}

pub async fn add_rating<S, C, P>(
  state: &AppState<S, C, P>,
  inv: &Invocation,
) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  let score = score(inv)?;
  let album = resolve_entry(&*state.store, &*state.catalog, entry(inv)?)
    .await?
    .into_album();
  let user = &inv.invoker;
  let first_use = is_first_use(&*state.store, user.id).await?;

  state.store.upsert_album(album.clone()).await.map_err(Error::store)?;
  state
    .store
    .add_rating(Rating { album_id: album.album_id.clone(), user_id: user.id, score })
    .await
    .map_err(Error::store)?;

  // A rated album is no longer homework.
  if state
    .store
    .remove_homework(user.id, &album.album_id)
    .await
    .map_err(Error::store)?
    .is_some()
  {
    edit_playlist(state, user, &album.album_id, PlaylistEdit::Remove).await;
  }

  republish(state, album.year).await;
  let changelog = state.changelog();
  if first_use {
    changelog.record(Event::FirstUse { user: user.id }).await;
  }
  changelog.record(Event::RatingAdded { user: user.id, album: &album, score }).await;

  Ok(vec![Message::text(format!(
    "i successfully added {} to your rankings",
    album.display_name()
  ))])
}

/// The invoker's rated album that `entry` names.
async fn owned_rating<S: RankingStore>(
  store: &S,
  inv: &Invocation,
  missing: &str,
) -> Result<Album> {
  let rated  = store.user_ratings(inv.invoker.id).await.map_err(Error::store)?;
  let albums = rated.into_iter().map(|r| r.album).collect::<Vec<_>>();
  find_owned(entry(inv)?, &albums)?
    .cloned()
    .ok_or_else(|| Error::invalid(missing))
}

pub async fn edit_rating<S, C, P>(
  state: &AppState<S, C, P>,
  inv: &Invocation,
) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  const MISSING: &str = "error: you cannot edit a rating that isnt on your list";

  let score = score(inv)?;
  let user  = inv.invoker.id;
  let album = owned_rating(&*state.store, inv, MISSING).await?;
  let old   = state
    .store
    .edit_rating(user, &album.album_id, score)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::invalid(MISSING))?;

  republish(state, album.year).await;
  state
    .changelog()
    .record(Event::RatingEdited { user, album: &album, old: old.score, new: score })
    .await;

  Ok(vec![Message::text(format!(
    "i successfully edited {} to a {}/10.0",
    album.display_name(),
    format_score(score)
  ))])
}

pub async fn remove_rating<S, C, P>(
  state: &AppState<S, C, P>,
  inv: &Invocation,
) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  const MISSING: &str = "error: you cannot remove a row that doesnt exist in your rankings";

  let user  = inv.invoker.id;
  let album = owned_rating(&*state.store, inv, MISSING).await?;
  state
    .store
    .remove_rating(user, &album.album_id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::invalid(MISSING))?;

  republish(state, album.year).await;
  state.changelog().record(Event::RatingRemoved { user, album: &album }).await;

  Ok(vec![Message::text(format!(
    "i successfully deleted {} from your list",
    album.display_name()
  ))])
}
