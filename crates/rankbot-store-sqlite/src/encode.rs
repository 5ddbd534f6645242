//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Artist lists are stored as compact JSON arrays. User snowflakes are stored
//! as `INTEGER` (they fit in 63 bits).

use rankbot_core::album::{Album, AlbumId, HomeworkEntry, RatedAlbum, UserId};

use crate::{Error, Result};

/// Columns selected whenever a master row is read, in [`RawAlbum`] order.
pub const ALBUM_COLUMNS: &str =
  "m.album_id, m.album_name, m.artist, m.year, m.album_cover_url";

// ─── UserId ──────────────────────────────────────────────────────────────────

pub fn encode_user(id: UserId) -> i64 { id.0 as i64 }

pub fn decode_user(raw: i64) -> UserId { UserId(raw as u64) }

// ─── Artists ─────────────────────────────────────────────────────────────────

pub fn encode_artists(artists: &[String]) -> Result<String> {
  Ok(serde_json::to_string(artists)?)
}

pub fn decode_artists(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Year ────────────────────────────────────────────────────────────────────

fn decode_year(raw: i64) -> Result<i32> {
  i32::try_from(raw).map_err(|e| Error::Decode {
    column: "year",
    reason: e.to_string(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `master_table` row.
pub struct RawAlbum {
  pub album_id:   String,
  pub album_name: String,
  pub artist:     String,
  pub year:       i64,
  pub cover_url:  Option<String>,
}

impl RawAlbum {
  /// Read the five [`ALBUM_COLUMNS`] starting at column `offset`.
  pub fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      album_id:   row.get(offset)?,
      album_name: row.get(offset + 1)?,
      artist:     row.get(offset + 2)?,
      year:       row.get(offset + 3)?,
      cover_url:  row.get(offset + 4)?,
    })
  }

  pub fn into_album(self) -> Result<Album> {
    Ok(Album {
      album_id:  AlbumId(self.album_id),
      title:     self.album_name,
      artists:   decode_artists(&self.artist)?,
      year:      decode_year(self.year)?,
      cover_url: self.cover_url,
    })
  }
}

/// A `rating_table` row joined with its master row.
pub struct RawRatedAlbum {
  pub album:   RawAlbum,
  pub user_id: i64,
  pub score:   f64,
}

impl RawRatedAlbum {
  pub fn into_rated(self) -> Result<RatedAlbum> {
    Ok(RatedAlbum {
      album:   self.album.into_album()?,
      user_id: decode_user(self.user_id),
      score:   self.score,
    })
  }
}

/// A `homework_table` row joined with its master row.
pub struct RawHomeworkEntry {
  pub album:    RawAlbum,
  pub user_id:  i64,
  pub complete: bool,
}

impl RawHomeworkEntry {
  pub fn into_entry(self) -> Result<HomeworkEntry> {
    Ok(HomeworkEntry {
      album:    self.album.into_album()?,
      user_id:  decode_user(self.user_id),
      complete: self.complete,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn user_ids_survive_the_signed_column() {
    let id = UserId(1_234_567_890_123_456_789);
    assert_eq!(decode_user(encode_user(id)), id);
  }

  #[test]
  fn artists_are_json_arrays() {
    let artists = vec!["Simon".to_string(), "Garfunkel".to_string()];
    let encoded = encode_artists(&artists).unwrap();
    assert_eq!(encoded, r#"["Simon","Garfunkel"]"#);
    assert_eq!(decode_artists(&encoded).unwrap(), artists);
  }
}
