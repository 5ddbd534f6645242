//! Statistics over grouped ratings: per-album summaries and the top-albums
//! ranking.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  album::{Album, AlbumRatings},
};

/// Year filter value meaning "every year".
pub const ALL_YEARS: i32 = -1;

pub fn mean(xs: &[f64]) -> Option<f64> {
  if xs.is_empty() {
    return None;
  }
  Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Sample standard deviation (n − 1 denominator); needs two values.
pub fn sample_std_dev(xs: &[f64]) -> Option<f64> {
  if xs.len() < 2 {
    return None;
  }
  let m = mean(xs)?;
  let var = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
  Some(var.sqrt())
}

pub fn round2(x: f64) -> f64 { (x * 100.0).round() / 100.0 }

fn in_year(album: &Album, year: i32) -> bool {
  year == ALL_YEARS || album.year == year
}

// ─── Single album ────────────────────────────────────────────────────────────

/// Summary of every score recorded for one album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumStats {
  pub count:   usize,
  /// Rounded to two decimals.
  pub mean:    f64,
  /// Rounded to two decimals; only present with two or more scores.
  pub std_dev: Option<f64>,
}

pub fn album_stats(scores: &[f64]) -> Result<AlbumStats> {
  let mean = mean(scores).ok_or(Error::NoRatings)?;
  Ok(AlbumStats {
    count:   scores.len(),
    mean:    round2(mean),
    std_dev: sample_std_dev(scores).map(round2),
  })
}

// ─── Top albums ──────────────────────────────────────────────────────────────

/// Which statistic the top-albums ranking sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
  /// Highest mean first.
  #[default]
  #[serde(rename = "avg")]
  Average,
  /// Lowest spread first: the albums everybody agrees on.
  #[serde(rename = "std")]
  StdDev,
}

impl SortBy {
  /// Parse a command option value; anything mentioning `avg` is an average,
  /// everything else a standard deviation.
  pub fn from_option(value: &str) -> Self {
    if value.contains("avg") {
      Self::Average
    } else {
      Self::StdDev
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Average => "average",
      Self::StdDev => "standard deviation",
    }
  }
}

/// Parameters for [`top_albums`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopQuery {
  pub count:       i64,
  pub min_ratings: usize,
  /// A release year, or [`ALL_YEARS`].
  pub year:        i32,
  pub sort_by:     SortBy,
}

impl Default for TopQuery {
  fn default() -> Self {
    Self { count: 5, min_ratings: 1, year: ALL_YEARS, sort_by: SortBy::Average }
  }
}

/// An album with the statistic it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAlbum {
  pub album:     Album,
  pub scores:    Vec<f64>,
  pub statistic: f64,
}

/// Rank the albums with at least `min_ratings` scores released in `year`.
pub fn top_albums(groups: Vec<AlbumRatings>, query: TopQuery) -> Result<Vec<RankedAlbum>> {
  let eligible: Vec<AlbumRatings> = groups
    .into_iter()
    .filter(|g| g.scores.len() >= query.min_ratings && in_year(&g.album, query.year))
    .collect();

  if eligible.is_empty() {
    return Err(Error::NoQualifyingAlbums);
  }
  if query.count < 1 || query.count as usize > eligible.len() {
    return Err(Error::NotEnoughAlbums);
  }

  let mut ranked: Vec<RankedAlbum> = match query.sort_by {
    SortBy::Average => eligible
      .into_iter()
      .filter_map(|g| {
        let statistic = mean(&g.scores)?;
        Some(RankedAlbum { album: g.album, scores: g.scores, statistic })
      })
      .collect(),
    SortBy::StdDev => {
      if query.min_ratings < 2 {
        return Err(Error::StdDevNeedsTwoRatings);
      }
      eligible
        .into_iter()
        .filter_map(|g| {
          let statistic = sample_std_dev(&g.scores)?;
          Some(RankedAlbum { album: g.album, scores: g.scores, statistic })
        })
        .collect()
    }
  };

  match query.sort_by {
    SortBy::Average => ranked.sort_by(|a, b| b.statistic.total_cmp(&a.statistic)),
    SortBy::StdDev => ranked.sort_by(|a, b| a.statistic.total_cmp(&b.statistic)),
  }
  ranked.truncate(query.count as usize);
  Ok(ranked)
}

// ─── Autocomplete bounds ─────────────────────────────────────────────────────

/// How many albums of `year` have at least `min_ratings` scores.
pub fn max_albums_possible(
  groups: &[AlbumRatings],
  year: i32,
  min_ratings: Option<usize>,
) -> usize {
  groups
    .iter()
    .filter(|g| in_year(&g.album, year))
    .filter(|g| min_ratings.is_none_or(|min| g.scores.len() >= min))
    .count()
}

/// The largest `min_ratings` that still leaves `count` albums of `year` to
/// rank. Without a count, the rating count of the least-rated album.
pub fn max_min_ratings_possible(
  groups: &[AlbumRatings],
  year: i32,
  count: Option<usize>,
) -> usize {
  let mut counts: Vec<usize> = groups
    .iter()
    .filter(|g| in_year(&g.album, year))
    .map(|g| g.scores.len())
    .collect();
  counts.sort_unstable_by(|a, b| b.cmp(a));

  match count {
    Some(n) if n >= 1 => counts.get(n - 1).or(counts.last()).copied().unwrap_or(0),
    _ => counts.last().copied().unwrap_or(0),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::album::AlbumId;

  fn group(id: &str, year: i32, scores: &[f64]) -> AlbumRatings {
    AlbumRatings {
      album:  Album {
        album_id:  AlbumId::from(id),
        title:     format!("Title {id}"),
        artists:   vec![format!("Artist {id}")],
        year,
        cover_url: None,
      },
      scores: scores.to_vec(),
    }
  }

  fn groups() -> Vec<AlbumRatings> {
    vec![
      group("a", 2024, &[9.0, 8.0, 7.0]),
      group("b", 2024, &[6.0, 6.0]),
      group("c", 2024, &[10.0]),
      group("d", 2023, &[5.0, 9.0]),
    ]
  }

  #[test]
  fn mean_and_std_dev() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    assert_eq!(sample_std_dev(&[5.0]), None);
    assert_eq!(sample_std_dev(&[2.0, 4.0]).map(round2), Some(1.41));
  }

  #[test]
  fn album_stats_omits_std_dev_for_single_rating() {
    let stats = album_stats(&[7.25]).unwrap();
    assert_eq!(stats, AlbumStats { count: 1, mean: 7.25, std_dev: None });

    let stats = album_stats(&[9.0, 8.0, 7.0]).unwrap();
    assert_eq!(stats.mean, 8.0);
    assert_eq!(stats.std_dev, Some(1.0));

    assert!(matches!(album_stats(&[]), Err(Error::NoRatings)));
  }

  #[test]
  fn top_albums_by_average_descending() {
    let query = TopQuery { count: 3, min_ratings: 1, year: 2024, sort_by: SortBy::Average };
    let ranked = top_albums(groups(), query).unwrap();
    let ids: Vec<&str> = ranked.iter().map(|r| r.album.album_id.as_str()).collect();
    assert_eq!(ids, ["c", "a", "b"]);
    assert_eq!(ranked[1].statistic, 8.0);
  }

  #[test]
  fn top_albums_respects_min_ratings_and_all_years() {
    let query = TopQuery { count: 3, min_ratings: 2, year: ALL_YEARS, sort_by: SortBy::Average };
    let ranked = top_albums(groups(), query).unwrap();
    let ids: Vec<&str> = ranked.iter().map(|r| r.album.album_id.as_str()).collect();
    assert_eq!(ids, ["a", "d", "b"]);
  }

  #[test]
  fn top_albums_by_std_dev_ascending() {
    let query = TopQuery { count: 2, min_ratings: 2, year: 2024, sort_by: SortBy::StdDev };
    let ranked = top_albums(groups(), query).unwrap();
    let ids: Vec<&str> = ranked.iter().map(|r| r.album.album_id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
    assert_eq!(ranked[0].statistic, 0.0);
  }

  #[test]
  fn top_albums_errors() {
    let q = |count, min_ratings, year, sort_by| TopQuery { count, min_ratings, year, sort_by };
    assert!(matches!(
      top_albums(groups(), q(1, 5, ALL_YEARS, SortBy::Average)),
      Err(Error::NoQualifyingAlbums)
    ));
    assert!(matches!(
      top_albums(groups(), q(4, 1, 2024, SortBy::Average)),
      Err(Error::NotEnoughAlbums)
    ));
    assert!(matches!(
      top_albums(groups(), q(0, 1, 2024, SortBy::Average)),
      Err(Error::NotEnoughAlbums)
    ));
    assert!(matches!(
      top_albums(groups(), q(1, 1, 2024, SortBy::StdDev)),
      Err(Error::StdDevNeedsTwoRatings)
    ));
  }

  #[test]
  fn sort_by_option_parsing() {
    assert_eq!(SortBy::from_option("avg"), SortBy::Average);
    assert_eq!(SortBy::from_option("std"), SortBy::StdDev);
  }

  #[test]
  fn autocomplete_bounds() {
    let g = groups();
    assert_eq!(max_albums_possible(&g, 2024, None), 3);
    assert_eq!(max_albums_possible(&g, 2024, Some(2)), 2);
    assert_eq!(max_albums_possible(&g, ALL_YEARS, Some(2)), 3);

    assert_eq!(max_min_ratings_possible(&g, 2024, None), 1);
    assert_eq!(max_min_ratings_possible(&g, 2024, Some(1)), 3);
    assert_eq!(max_min_ratings_possible(&g, 2024, Some(2)), 2);
    assert_eq!(max_min_ratings_possible(&g, 2024, Some(10)), 1);
    assert_eq!(max_min_ratings_possible(&[], 2024, Some(1)), 0);
  }
}
