//! Slash-command handlers.
//!
//! [`respond`] runs on a spawned task after the interaction has been
//! deferred. Every handler returns the messages to send back; errors are
//! sent back as their display text.

mod admin;
mod albums;
mod homework;
mod ratings;


use chrono::Datelike as _;
use rankbot_core::{
  album::{AlbumId, UserId, validate_score},
  catalog::AlbumCatalog,
  store::RankingStore,
  text::split_message,
};

use crate::{
  AppState,
  chat::{ChatPlatform, ChatUser},
  discord::Message,
  error::{Error, Result},
  invocation::Invocation,
  reconcile::reconcile,
};

/// Commands that reconcile the master catalog once they finish, whether or
/// not they succeeded.
const SETTLING: &[&str] = &[
  "add-rating",
  "remove-rating",
  "add-homework",
  "get-homework",
  "remove-homework",
  "add-all-homework",
];

/// Run the command and deliver its reply as follow-up messages.
pub async fn respond<S, C, P>(state: &AppState<S, C, P>, token: &str, invocation: &Invocation)
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  let messages = match run(state, invocation).await {
    Ok(messages) => messages,
    Err(e) => {
      tracing::error!(command = %invocation.command, error = %e, "command failed");
      vec![Message::text(e.to_string())]
    }
  };

  for message in &messages {
    if let Err(e) = state.chat.send_followup(token, message).await {
      tracing::error!(command = %invocation.command, error = %e, "failed to send follow-up");
      break;
    }
  }
}

/// Run one command to completion. Commands take turns on the state's
/// command lock.
pub async fn run<S, C, P>(state: &AppState<S, C, P>, inv: &Invocation) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  let _turn = state.command_lock.lock().await;

  let outcome = match inv.command.as_str() {
    "update" => admin::update(state, inv).await,
    "sync" => admin::sync(state, inv).await,
    "get-ratings" => ratings::get_ratings(state, inv).await,
    "add-rating" => ratings::add_rating(state, inv).await,
    "edit-rating" => ratings::edit_rating(state, inv).await,
    "remove-rating" => ratings::remove_rating(state, inv).await,
    "album-cover" => albums::album_cover(state, inv).await,
    "stats" => albums::stats(state, inv).await,
    "top-albums" => albums::top_albums(state, inv).await,
    "add-homework" => homework::add_homework(state, inv).await,
    "get-homework" => homework::get_homework(state, inv).await,
    "remove-homework" => homework::remove_homework(state, inv).await,
    "add-all-homework" => homework::add_all_homework(state, inv).await,
    other => Err(Error::UnknownCommand(other.to_string())),
  };

  if SETTLING.contains(&inv.command.as_str()) {
    settle(state).await;
  }
  outcome
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

pub(crate) fn current_year() -> i32 { chrono::Local::now().year() }

fn entry(inv: &Invocation) -> Result<&str> {
  inv.string("entry").ok_or_else(|| Error::invalid("error: pick an album for \"entry\""))
}

fn score(inv: &Invocation) -> Result<f64> {
  let score = inv
    .number("rating")
    .ok_or_else(|| Error::invalid("error: give the album a rating between 0 and 10"))?;
  Ok(validate_score(score)?)
}

/// The `year` option, defaulting to the current year.
pub(crate) fn year(inv: &Invocation) -> i32 {
  inv
    .integer("year")
    .and_then(|y| i32::try_from(y).ok())
    .unwrap_or_else(current_year)
}

/// The `user` option, defaulting to the invoker.
fn target(inv: &Invocation) -> ChatUser { inv.user("user").unwrap_or_else(|| inv.invoker.clone()) }

fn require_mod<S, C, P>(state: &AppState<S, C, P>, inv: &Invocation) -> Result<()> {
  if inv.has_role(state.config.discord.mod_role_id) {
    Ok(())
  } else {
    Err(Error::Forbidden)
  }
}

/// One follow-up per message-sized fragment of `content`.
fn text_messages(content: &str) -> Vec<Message> {
  split_message(content).into_iter().map(Message::text).collect()
}

/// Whether `user_id` has never rated anything.
async fn is_first_use<S: RankingStore>(store: &S, user_id: UserId) -> Result<bool> {
  let users = store.rated_users().await.map_err(Error::store)?;
  Ok(!users.contains(&user_id))
}

async fn settle<S, C, P>(state: &AppState<S, C, P>)
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  if let Err(e) = reconcile(&*state.store, &*state.catalog).await {
    tracing::warn!(error = %e, "reconciliation after command failed");
  }
}

// ── Homework playlists ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum PlaylistEdit {
  Add,
  Remove,
}

/// Mirror a homework change onto `owner`'s playlist when playlists are
/// enabled. Failures are only logged.
async fn edit_playlist<S, C, P>(
  state: &AppState<S, C, P>,
  owner: &ChatUser,
  album_id: &AlbumId,
  edit: PlaylistEdit,
) where
  C: AlbumCatalog,
{
  if !state.config.spotify.playlists {
    return;
  }
  let outcome = async {
    let playlist = state.catalog.homework_playlist(&owner.name).await?;
    match edit {
      PlaylistEdit::Add => state.catalog.add_album_to_playlist(&playlist, album_id).await,
      PlaylistEdit::Remove => state.catalog.remove_album_from_playlist(&playlist, album_id).await,
    }
  }
  .await;

  if let Err(e) = outcome {
    tracing::warn!(user = %owner.id, %album_id, ?edit, error = %e, "failed to update homework playlist");
  }
}
