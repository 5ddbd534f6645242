//! Album, rating and homework types: the three collections the bot keeps in
//! step.
//!
//! The master catalog holds one [`Album`] per external catalog id. Ratings and
//! homework items only carry the id; readers join them back onto the catalog
//! to get titles and artists.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// The external catalog id of an album (a Spotify album id).
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AlbumId(pub String);

impl AlbumId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for AlbumId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for AlbumId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// A chat-platform user snowflake.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
  /// The platform mention markup for this user.
  pub fn mention(self) -> String { format!("<@{}>", self.0) }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Master catalog ──────────────────────────────────────────────────────────

/// A row of the master catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
  pub album_id:  AlbumId,
  pub title:     String,
  pub artists:   Vec<String>,
  pub year:      i32,
  pub cover_url: Option<String>,
}

impl Album {
  /// All artist names joined with `", "`.
  pub fn artist_credit(&self) -> String { self.artists.join(", ") }

  /// `"{artists} - {title}"`, the form used in listings and autocomplete.
  pub fn display_name(&self) -> String {
    format!("{} - {}", self.artist_credit(), self.title)
  }
}

// ─── Ratings ─────────────────────────────────────────────────────────────────

/// Lowest and highest accepted score.
pub const SCORE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

/// Reject scores outside [`SCORE_RANGE`] (and NaN).
pub fn validate_score(score: f64) -> Result<f64> {
  if SCORE_RANGE.contains(&score) {
    Ok(score)
  } else {
    Err(Error::InvalidScore(score))
  }
}

/// A single user's score for an album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
  pub album_id: AlbumId,
  pub user_id:  UserId,
  pub score:    f64,
}

/// A rating joined with its master catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedAlbum {
  pub album:   Album,
  pub user_id: UserId,
  pub score:   f64,
}

/// Every score recorded for one album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumRatings {
  pub album:  Album,
  pub scores: Vec<f64>,
}

// ─── Homework ────────────────────────────────────────────────────────────────

/// An album queued for a user to listen to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeworkItem {
  pub album_id: AlbumId,
  pub user_id:  UserId,
  pub complete: bool,
}

/// A homework item joined with its master catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeworkEntry {
  pub album:    Album,
  pub user_id:  UserId,
  pub complete: bool,
}

// ─── Catalog results ─────────────────────────────────────────────────────────

/// An album as described by the external catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogAlbum {
  pub id:           AlbumId,
  pub name:         String,
  pub artists:      Vec<String>,
  /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD` depending on the catalog's precision.
  pub release_date: String,
  /// `album`, `single` or `compilation`.
  pub album_type:   String,
  pub image_url:    Option<String>,
}

impl CatalogAlbum {
  /// The leading year of `release_date`, or `0` when it cannot be read.
  pub fn release_year(&self) -> i32 {
    self
      .release_date
      .split('-')
      .next()
      .and_then(|y| y.parse().ok())
      .unwrap_or(0)
  }

  pub fn artist_credit(&self) -> String { self.artists.join(", ") }

  /// Convert into a master catalog row.
  pub fn into_album(self) -> Album {
    let year = self.release_year();
    Album {
      album_id: self.id,
      title: self.name,
      artists: self.artists,
      year,
      cover_url: self.image_url,
    }
  }
}

/// A playlist held on the catalog account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
  pub id:   String,
  pub name: String,
  pub url:  String,
}
