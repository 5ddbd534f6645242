//! Error types for `rankbot-core`.
//!
//! Messages are shown to chat users verbatim, hence the `error:` prefix.

use thiserror::Error;

use crate::album::AlbumId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("error: you cannot have the same album in your rankings more than once")]
  DuplicateRating(AlbumId),

  #[error("error: you cannot add duplicate entries into your homework list")]
  DuplicateHomework(AlbumId),

  #[error("error: {count} albums match {query:?}, pick one from the autocomplete list")]
  AmbiguousMatch { query: String, count: usize },

  #[error("error: ratings must be between 0 and 10 (got {0})")]
  InvalidScore(f64),

  #[error("error: no albums found that meet the conditions required")]
  NoQualifyingAlbums,

  #[error("error: not enough albums to rank (or you entered a negative value)")]
  NotEnoughAlbums,

  #[error(
    "error: you cannot sort by standard deviation if minimum ratings is set to less than 2"
  )]
  StdDevNeedsTwoRatings,

  #[error("error: This album has no ratings")]
  NoRatings,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
