//! Suggestions for the option a user is typing into.

use rankbot_core::{
  album::{Album, CatalogAlbum},
  catalog::AlbumCatalog,
  stats::{max_albums_possible, max_min_ratings_possible},
  store::RankingStore,
  text::{MAX_CHOICES, truncate_choice_name, words_match},
};
use serde_json::Value;

use crate::{
  AppState,
  chat::ChatPlatform,
  commands,
  discord::{Choice, CommandOption},
  error::{Error, Result},
  invocation::Invocation,
};

/// Choices for the focused option. Lookup failures yield no choices.
pub async fn suggest<S, C, P>(state: &AppState<S, C, P>, inv: &Invocation) -> Vec<Choice>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  match choices(state, inv).await {
    Ok(mut choices) => {
      choices.truncate(MAX_CHOICES);
      choices
    }
    Err(e) => {
      tracing::warn!(command = %inv.command, error = %e, "autocomplete failed");
      Vec::new()
    }
  }
}

async fn choices<S, C, P>(state: &AppState<S, C, P>, inv: &Invocation) -> Result<Vec<Choice>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  let Some(focused) = inv.focused() else {
    return Ok(Vec::new());
  };
  let typed = typed_text(focused);
  let store = &*state.store;

  let choices = match (inv.command.as_str(), focused.name.as_str()) {
    ("add-rating" | "album-cover" | "add-homework" | "add-all-homework", "entry") => {
      if typed.trim().is_empty() {
        return Ok(Vec::new());
      }
      let hits = state
        .catalog
        .search_albums(&typed, MAX_CHOICES)
        .await
        .map_err(Error::catalog)?;
      catalog_choices(&hits)
    }
    ("stats", "entry") => {
      let albums = store.list_albums().await.map_err(Error::store)?;
      word_search_choices(&typed, &albums)
    }
    ("edit-rating" | "remove-rating", "entry") => {
      let rated = store.user_ratings(inv.invoker.id).await.map_err(Error::store)?;
      let albums: Vec<Album> = rated.into_iter().map(|r| r.album).collect();
      substring_choices(&typed, &albums)
    }
    ("remove-homework", "entry") => {
      let entries = store.user_homework(inv.invoker.id, false).await.map_err(Error::store)?;
      let albums: Vec<Album> = entries.into_iter().map(|e| e.album).collect();
      substring_choices(&typed, &albums)
    }
    ("top-albums", "numberofalbums") => {
      let groups = store.grouped_ratings().await.map_err(Error::store)?;
      let min    = inv.integer("minimumratings").and_then(|m| usize::try_from(m).ok());
      number_choices(&typed, max_albums_possible(&groups, commands::year(inv), min))
    }
    ("top-albums", "minimumratings") => {
      let groups = store.grouped_ratings().await.map_err(Error::store)?;
      let count  = inv.integer("numberofalbums").and_then(|n| usize::try_from(n).ok());
      number_choices(&typed, max_min_ratings_possible(&groups, commands::year(inv), count))
    }
    _ => Vec::new(),
  };
  Ok(choices)
}

/// What the user has typed so far. Numeric options arrive as strings while
/// they are being edited, but may also arrive as numbers.
fn typed_text(option: &CommandOption) -> String {
  match &option.value {
    Some(Value::String(s)) => s.clone(),
    Some(Value::Null) | None => String::new(),
    Some(other) => other.to_string(),
  }
}

fn album_choice(album: &Album) -> Choice {
  Choice::string(truncate_choice_name(&album.display_name()), album.album_id.as_str())
}

/// Catalog search hits as `"{artists} ({album_type}) - {name}"`.
pub fn catalog_choices(hits: &[CatalogAlbum]) -> Vec<Choice> {
  hits
    .iter()
    .map(|a| {
      let name = format!("{} ({}) - {}", a.artist_credit(), a.album_type, a.name);
      Choice::string(truncate_choice_name(&name), a.id.as_str())
    })
    .collect()
}

/// Albums whose display name contains every typed word.
pub fn word_search_choices(typed: &str, albums: &[Album]) -> Vec<Choice> {
  albums
    .iter()
    .filter(|a| words_match(typed, &a.display_name()))
    .take(MAX_CHOICES)
    .map(album_choice)
    .collect()
}

/// Albums whose display name contains the typed text, ignoring case.
pub fn substring_choices(typed: &str, albums: &[Album]) -> Vec<Choice> {
  let typed = typed.to_lowercase();
  albums
    .iter()
    .filter(|a| a.display_name().to_lowercase().contains(&typed))
    .take(MAX_CHOICES)
    .map(album_choice)
    .collect()
}

/// `1..=max`, keeping numbers whose digits contain the typed digits.
pub fn number_choices(typed: &str, max: usize) -> Vec<Choice> {
  let typed = typed.trim();
  (1..=max as i64)
    .filter(|n| n.to_string().contains(typed))
    .take(MAX_CHOICES)
    .map(Choice::integer)
    .collect()
}
