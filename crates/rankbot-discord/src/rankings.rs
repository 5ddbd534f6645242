//! The per-year rankings message and its publication to the year's channel.

use rankbot_core::{
  catalog::AlbumCatalog,
  store::RankingStore,
  text::{format_score, split_message},
};

use crate::{
  AppState,
  chat::ChatPlatform,
  discord::Message,
  error::{Error, Result},
};

/// Every user's ratings of albums released in `year`, highest first.
pub async fn rankings_message<S: RankingStore>(store: &S, year: i32) -> Result<String> {
  let mut out = format!("# Ratings of {year}\n");

  for user_id in store.rated_users().await.map_err(Error::store)? {
    let ratings = store.user_ratings(user_id).await.map_err(Error::store)?;
    let mut rows = ratings.iter().filter(|r| r.album.year == year).peekable();
    if rows.peek().is_none() {
      continue;
    }

    out.push_str(&format!("## {}'s rankings:\n", user_id.mention()));
    for (i, rated) in rows.enumerate() {
      out.push_str(&format!(
        "{}. {} ({})\n",
        i + 1,
        rated.album.display_name(),
        format_score(rated.score)
      ));
    }
    out.push('\n');
  }
  Ok(out)
}

/// Replace the bot's messages in `year`'s ranking channel with fresh
/// rankings.
pub async fn publish<S, C, P>(state: &AppState<S, C, P>, year: i32) -> Result<()>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  let channel = state.config.ranking_channel(year).ok_or_else(|| {
    Error::invalid(format!("error: no channel found for {year}. ask a mod for help."))
  })?;
  let content = rankings_message(&*state.store, year).await?;

  for message_id in state.chat.bot_messages(channel).await.map_err(Error::chat)? {
    state.chat.delete_message(channel, message_id).await.map_err(Error::chat)?;
  }
  for fragment in split_message(&content) {
    state.chat.send_message(channel, &Message::text(fragment)).await.map_err(Error::chat)?;
  }

  tracing::info!(year, channel, "rankings published");
  Ok(())
}

/// [`publish`] when `year` has a channel; failures are only logged.
pub async fn republish<S, C, P>(state: &AppState<S, C, P>, year: i32)
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  if state.config.ranking_channel(year).is_none() {
    return;
  }
  if let Err(e) = publish(state, year).await {
    tracing::warn!(year, error = %e, "failed to republish rankings");
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rankbot_core::{
    album::{AlbumId, Rating, UserId},
    store::RankingStore as _,
    text::MESSAGE_LIMIT,
  };

  use crate::testing::{CHANNEL_2000, album, test_state};

  async fn rate(state: &crate::testing::TestState, id: &str, user: u64, score: f64) {
    state
      .store
      .add_rating(Rating { album_id: AlbumId::from(id), user_id: UserId(user), score })
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn message_lists_each_users_albums_of_the_year() {
    let state = test_state().await;
    state.store.upsert_album(album("kida", "Kid A", 2000)).await.unwrap();
    state.store.upsert_album(album("ok", "OK Computer", 1997)).await.unwrap();
    state.store.upsert_album(album("amn", "Amnesiac", 2000)).await.unwrap();
    rate(&state, "kida", 1, 7.5).await;
    rate(&state, "amn", 1, 9.0).await;
    rate(&state, "ok", 2, 10.0).await;

    let message = rankings_message(&*state.store, 2000).await.unwrap();
    assert_eq!(
      message,
      "# Ratings of 2000\n\
       ## <@1>'s rankings:\n\
       1. Radiohead - Amnesiac (9.0)\n\
       2. Radiohead - Kid A (7.5)\n\
       \n"
    );
  }

  #[tokio::test]
  async fn publishing_replaces_the_bots_previous_messages() {
    let state = test_state().await;
    state.store.upsert_album(album("kida", "Kid A", 2000)).await.unwrap();
    rate(&state, "kida", 1, 8.0).await;
    *state.chat.previous.lock().unwrap() = vec![31, 32];

    publish(&state, 2000).await.unwrap();

    assert_eq!(state.chat.deleted(), vec![(CHANNEL_2000, 31), (CHANNEL_2000, 32)]);
    let posted = state.chat.posted(CHANNEL_2000);
    assert_eq!(posted.len(), 1);
    assert!(posted[0].contains("1. Radiohead - Kid A (8.0)"));
  }

  #[tokio::test]
  async fn an_oversized_line_is_posted_in_pieces() {
    let state = test_state().await;
    state.store.upsert_album(album("long", &"y".repeat(2100), 2000)).await.unwrap();
    rate(&state, "long", 1, 8.0).await;

    publish(&state, 2000).await.unwrap();

    let posted = state.chat.posted(CHANNEL_2000);
    assert!(posted.len() > 1);
    assert!(posted.iter().all(|p| p.chars().count() <= MESSAGE_LIMIT));
    let ys: usize = posted.iter().map(|p| p.matches('y').count()).sum();
    assert_eq!(ys, 2100);
  }

  #[tokio::test]
  async fn years_without_a_channel_are_refused() {
    let state = test_state().await;
    let err   = publish(&state, 1999).await.unwrap_err();
    assert_eq!(err.to_string(), "error: no channel found for 1999. ask a mod for help.");
  }
}
