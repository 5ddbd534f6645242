//! [`SqliteStore`] — the SQLite implementation of [`RankingStore`].

use std::{collections::BTreeSet, path::Path};

use rankbot_core::{
  album::{
    Album, AlbumId, AlbumRatings, HomeworkEntry, HomeworkItem, RatedAlbum, Rating,
    UserId,
  },
  store::RankingStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{
    ALBUM_COLUMNS, RawAlbum, RawHomeworkEntry, RawRatedAlbum, decode_user,
    encode_artists, encode_user,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The bot's three tables, backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// `SELECT album_id FROM <table>` as a set.
  async fn ids_in(&self, table: &'static str) -> Result<BTreeSet<AlbumId>> {
    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!("SELECT DISTINCT album_id FROM {table}"))?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(ids.into_iter().map(AlbumId).collect())
  }

  async fn rated_albums(&self, user: Option<i64>) -> Result<Vec<RatedAlbum>> {
    let raws: Vec<RawRatedAlbum> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {ALBUM_COLUMNS}, r.user_id, r.rating
           FROM rating_table r
           INNER JOIN master_table m ON m.album_id = r.album_id
           WHERE ?1 IS NULL OR r.user_id = ?1
           ORDER BY r.rating DESC, m.album_name ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![user], |row| {
            Ok(RawRatedAlbum {
              album:   RawAlbum::from_row(row, 0)?,
              user_id: row.get(5)?,
              score:   row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRatedAlbum::into_rated).collect()
  }
}

// ─── RankingStore impl ───────────────────────────────────────────────────────

impl RankingStore for SqliteStore {
  type Error = crate::Error;

  // ── Master catalog ────────────────────────────────────────────────────────

  async fn upsert_album(&self, album: Album) -> Result<bool> {
    let artists = encode_artists(&album.artists)?;
    let Album { album_id, title, year, cover_url, .. } = album;

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT OR IGNORE INTO master_table
             (album_id, album_name, artist, year, album_cover_url)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![album_id.0, title, artists, year, cover_url],
        )?;
        Ok(changed > 0)
      })
      .await?;

    Ok(inserted)
  }

  async fn get_album(&self, album_id: &AlbumId) -> Result<Option<Album>> {
    let id = album_id.0.clone();

    let raw: Option<RawAlbum> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ALBUM_COLUMNS} FROM master_table m WHERE m.album_id = ?1"),
              rusqlite::params![id],
              |row| RawAlbum::from_row(row, 0),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAlbum::into_album).transpose()
  }

  async fn list_albums(&self) -> Result<Vec<Album>> {
    let raws: Vec<RawAlbum> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ALBUM_COLUMNS} FROM master_table m ORDER BY m.album_name"
        ))?;
        let rows = stmt
          .query_map([], |row| RawAlbum::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAlbum::into_album).collect()
  }

  async fn remove_album(&self, album_id: &AlbumId) -> Result<Option<Album>> {
    let id = album_id.0.clone();

    let raw: Option<RawAlbum> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "DELETE FROM master_table WHERE album_id = ?1
               RETURNING album_id, album_name, artist, year, album_cover_url",
              rusqlite::params![id],
              |row| RawAlbum::from_row(row, 0),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAlbum::into_album).transpose()
  }

  async fn album_ids(&self) -> Result<BTreeSet<AlbumId>> {
    self.ids_in("master_table").await
  }

  // ── Ratings ───────────────────────────────────────────────────────────────

  async fn add_rating(&self, rating: Rating) -> Result<Rating> {
    let id    = rating.album_id.0.clone();
    let user  = encode_user(rating.user_id);
    let score = rating.score;

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT OR IGNORE INTO rating_table (album_id, user_id, rating)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id, user, score],
        )?;
        Ok(changed > 0)
      })
      .await?;

    if !inserted {
      return Err(rankbot_core::Error::DuplicateRating(rating.album_id).into());
    }
    Ok(rating)
  }

  async fn edit_rating(
    &self,
    user_id:  UserId,
    album_id: &AlbumId,
    score:    f64,
  ) -> Result<Option<Rating>> {
    let id   = album_id.0.clone();
    let user = encode_user(user_id);

    let previous: Option<f64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let previous: Option<f64> = tx
          .query_row(
            "SELECT rating FROM rating_table WHERE album_id = ?1 AND user_id = ?2",
            rusqlite::params![id, user],
            |row| row.get(0),
          )
          .optional()?;
        if previous.is_some() {
          tx.execute(
            "UPDATE rating_table SET rating = ?3 WHERE album_id = ?1 AND user_id = ?2",
            rusqlite::params![id, user, score],
          )?;
        }
        tx.commit()?;
        Ok(previous)
      })
      .await?;

    Ok(previous.map(|score| Rating { album_id: album_id.clone(), user_id, score }))
  }

  async fn remove_rating(&self, user_id: UserId, album_id: &AlbumId) -> Result<Option<Rating>> {
    let id   = album_id.0.clone();
    let user = encode_user(user_id);

    let removed: Option<f64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "DELETE FROM rating_table WHERE album_id = ?1 AND user_id = ?2
               RETURNING rating",
              rusqlite::params![id, user],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(removed.map(|score| Rating { album_id: album_id.clone(), user_id, score }))
  }

  async fn get_rating(&self, user_id: UserId, album_id: &AlbumId) -> Result<Option<RatedAlbum>> {
    let id   = album_id.0.clone();
    let user = encode_user(user_id);

    let raw: Option<RawRatedAlbum> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ALBUM_COLUMNS}, r.user_id, r.rating
                 FROM rating_table r
                 INNER JOIN master_table m ON m.album_id = r.album_id
                 WHERE r.album_id = ?1 AND r.user_id = ?2"
              ),
              rusqlite::params![id, user],
              |row| {
                Ok(RawRatedAlbum {
                  album:   RawAlbum::from_row(row, 0)?,
                  user_id: row.get(5)?,
                  score:   row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRatedAlbum::into_rated).transpose()
  }

  async fn user_ratings(&self, user_id: UserId) -> Result<Vec<RatedAlbum>> {
    self.rated_albums(Some(encode_user(user_id))).await
  }

  async fn album_scores(&self, album_id: &AlbumId) -> Result<Vec<f64>> {
    let id = album_id.0.clone();

    let scores = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare("SELECT rating FROM rating_table WHERE album_id = ?1 ORDER BY user_id")?;
        let rows = stmt
          .query_map(rusqlite::params![id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<f64>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(scores)
  }

  async fn rated_users(&self) -> Result<Vec<UserId>> {
    let users: Vec<i64> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT DISTINCT user_id FROM rating_table ORDER BY user_id")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(users.into_iter().map(decode_user).collect())
  }

  async fn grouped_ratings(&self) -> Result<Vec<AlbumRatings>> {
    let mut groups: Vec<AlbumRatings> = Vec::new();

    // Sorted by album id so each group is a contiguous run.
    let mut rows = self.rated_albums(None).await?;
    rows.sort_by(|a, b| a.album.album_id.cmp(&b.album.album_id));

    for rated in rows {
      match groups.last_mut() {
        Some(group) if group.album.album_id == rated.album.album_id => {
          group.scores.push(rated.score);
        }
        _ => groups.push(AlbumRatings { album: rated.album, scores: vec![rated.score] }),
      }
    }

    Ok(groups)
  }

  async fn rating_album_ids(&self) -> Result<BTreeSet<AlbumId>> {
    self.ids_in("rating_table").await
  }

  // ── Homework ──────────────────────────────────────────────────────────────

  async fn add_homework(&self, user_id: UserId, album_id: &AlbumId) -> Result<HomeworkItem> {
    let id   = album_id.0.clone();
    let user = encode_user(user_id);

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT OR IGNORE INTO homework_table (album_id, user_id, complete)
           VALUES (?1, ?2, 0)",
          rusqlite::params![id, user],
        )?;
        Ok(changed > 0)
      })
      .await?;

    if !inserted {
      return Err(rankbot_core::Error::DuplicateHomework(album_id.clone()).into());
    }
    Ok(HomeworkItem { album_id: album_id.clone(), user_id, complete: false })
  }

  async fn get_homework(&self, user_id: UserId, album_id: &AlbumId) -> Result<Option<HomeworkItem>> {
    let id   = album_id.0.clone();
    let user = encode_user(user_id);

    let complete: Option<bool> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT complete FROM homework_table WHERE album_id = ?1 AND user_id = ?2",
              rusqlite::params![id, user],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(complete.map(|complete| HomeworkItem { album_id: album_id.clone(), user_id, complete }))
  }

  async fn remove_homework(
    &self,
    user_id:  UserId,
    album_id: &AlbumId,
  ) -> Result<Option<HomeworkItem>> {
    let id   = album_id.0.clone();
    let user = encode_user(user_id);

    let removed: Option<bool> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "DELETE FROM homework_table WHERE album_id = ?1 AND user_id = ?2
               RETURNING complete",
              rusqlite::params![id, user],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(removed.map(|complete| HomeworkItem { album_id: album_id.clone(), user_id, complete }))
  }

  async fn user_homework(&self, user_id: UserId, complete: bool) -> Result<Vec<HomeworkEntry>> {
    let user = encode_user(user_id);

    let raws: Vec<RawHomeworkEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ALBUM_COLUMNS}, h.user_id, h.complete
           FROM homework_table h
           INNER JOIN master_table m ON m.album_id = h.album_id
           WHERE h.user_id = ?1 AND h.complete = ?2
           ORDER BY h.rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user, complete], |row| {
            Ok(RawHomeworkEntry {
              album:    RawAlbum::from_row(row, 0)?,
              user_id:  row.get(5)?,
              complete: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHomeworkEntry::into_entry).collect()
  }

  async fn homework_album_ids(&self) -> Result<BTreeSet<AlbumId>> {
    self.ids_in("homework_table").await
  }
}
