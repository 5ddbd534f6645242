//! `album-cover`, `stats` and `top-albums`.

use rankbot_core::{
  catalog::AlbumCatalog,
  stats::{SortBy, TopQuery, album_stats, round2, top_albums as rank},
  store::RankingStore,
  text::format_score,
};

use super::{entry, text_messages, year};
use crate::{
  AppState,
  chat::ChatPlatform,
  discord::{Embed, EmbedImage, Message},
  error::{Error, Result},
  invocation::Invocation,
  resolve::{find_owned, resolve_entry},
};

pub async fn album_cover<S, C, P>(
  state: &AppState<S, C, P>,
  inv: &Invocation,
) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  let album = resolve_entry(&*state.store, &*state.catalog, entry(inv)?).await?;
  let embed = Embed {
    title:       album.name.clone(),
    description: format!("by {} - {}", album.artist_credit(), album.release_date),
    image:       album.image_url.clone().map(|url| EmbedImage { url }),
  };
  Ok(vec![Message::embed(embed)])
}

/// Rating statistics of an album somebody has rated.
pub async fn stats<S, C, P>(state: &AppState<S, C, P>, inv: &Invocation) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  let albums = state.store.list_albums().await.map_err(Error::store)?;
  let album  = find_owned(entry(inv)?, &albums)?.ok_or_else(|| {
    Error::invalid(
      "error: no albums found, potentially because you didn't select an autocomplete option",
    )
  })?;
  let scores = state.store.album_scores(&album.album_id).await.map_err(Error::store)?;
  let stats  = album_stats(&scores)?;

  let mut description = format!(
    "Artist: {}\nAlbum: {}\nNumber of Ratings: {}\nMean: {}",
    album.artist_credit(),
    album.title,
    stats.count,
    format_score(stats.mean)
  );
  if let Some(std_dev) = stats.std_dev {
    description.push_str(&format!("\nStandard Deviation: {}", format_score(std_dev)));
  }

  Ok(vec![Message::embed(Embed {
    title: album.title.clone(),
    description,
    image: album.cover_url.clone().map(|url| EmbedImage { url }),
  })])
}

pub async fn top_albums<S, C, P>(
  state: &AppState<S, C, P>,
  inv: &Invocation,
) -> Result<Vec<Message>>
where
  S: RankingStore,
  C: AlbumCatalog,
  P: ChatPlatform,
{
  let defaults = TopQuery::default();
  let query    = TopQuery {
    count:       inv.integer("numberofalbums").unwrap_or(defaults.count),
    min_ratings: inv
      .integer("minimumratings")
      .map_or(defaults.min_ratings, |m| usize::try_from(m).unwrap_or(0)),
    year:        year(inv),
    sort_by:     inv.string("sortby").map(SortBy::from_option).unwrap_or_default(),
  };

  let groups = state.store.grouped_ratings().await.map_err(Error::store)?;
  let ranked = rank(groups, query)?;

  let mut out = format!(
    "## Top {} albums with at least {} rating(s) according to {}:",
    query.count,
    query.min_ratings,
    query.sort_by.label()
  );
  for entry in &ranked {
    out.push_str(&format!(
      "\n{}: {}",
      entry.album.display_name(),
      format_score(round2(entry.statistic))
    ));
  }
  Ok(text_messages(&out))
}
