//! The `RankingStore` trait.
//!
//! Implemented by storage backends (e.g. `rankbot-store-sqlite`). The bot
//! depends on this abstraction, not on any concrete backend.

use std::{collections::BTreeSet, future::Future};

use crate::album::{
  Album, AlbumId, AlbumRatings, HomeworkEntry, HomeworkItem, RatedAlbum, Rating,
  UserId,
};

/// Abstraction over the three tables the bot keeps: the master catalog, the
/// per-user ratings and the per-user homework queue.
///
/// Ratings and homework reference albums by id only. Keeping the master
/// catalog in step with them is the job of [`crate::reconcile`], not of the
/// store.
///
/// All methods return `Send` futures so the trait can be used from spawned
/// tokio tasks.
pub trait RankingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Master catalog ────────────────────────────────────────────────────

  /// Insert `album` unless a row with the same id exists. Returns `true`
  /// when a row was inserted.
  fn upsert_album(
    &self,
    album: Album,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get_album<'a>(
    &'a self,
    album_id: &'a AlbumId,
  ) -> impl Future<Output = Result<Option<Album>, Self::Error>> + Send + 'a;

  fn list_albums(
    &self,
  ) -> impl Future<Output = Result<Vec<Album>, Self::Error>> + Send + '_;

  /// Delete a catalog row and return it, if it existed.
  fn remove_album<'a>(
    &'a self,
    album_id: &'a AlbumId,
  ) -> impl Future<Output = Result<Option<Album>, Self::Error>> + Send + 'a;

  fn album_ids(
    &self,
  ) -> impl Future<Output = Result<BTreeSet<AlbumId>, Self::Error>> + Send + '_;

  // ── Ratings ───────────────────────────────────────────────────────────

  /// Record a new rating. Fails with a duplicate-rating error if the user
  /// already rated the album.
  fn add_rating(
    &self,
    rating: Rating,
  ) -> impl Future<Output = Result<Rating, Self::Error>> + Send + '_;

  /// Change a rating's score. Returns the rating as it was before the edit,
  /// or `None` if the user has not rated the album.
  fn edit_rating<'a>(
    &'a self,
    user_id: UserId,
    album_id: &'a AlbumId,
    score: f64,
  ) -> impl Future<Output = Result<Option<Rating>, Self::Error>> + Send + 'a;

  fn remove_rating<'a>(
    &'a self,
    user_id: UserId,
    album_id: &'a AlbumId,
  ) -> impl Future<Output = Result<Option<Rating>, Self::Error>> + Send + 'a;

  /// A single rating joined with its catalog row. Ratings whose album is
  /// missing from the catalog are not returned.
  fn get_rating<'a>(
    &'a self,
    user_id: UserId,
    album_id: &'a AlbumId,
  ) -> impl Future<Output = Result<Option<RatedAlbum>, Self::Error>> + Send + 'a;

  /// A user's ratings, highest score first.
  fn user_ratings(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Vec<RatedAlbum>, Self::Error>> + Send + '_;

  fn album_scores<'a>(
    &'a self,
    album_id: &'a AlbumId,
  ) -> impl Future<Output = Result<Vec<f64>, Self::Error>> + Send + 'a;

  /// Every user with at least one rating, ascending.
  fn rated_users(
    &self,
  ) -> impl Future<Output = Result<Vec<UserId>, Self::Error>> + Send + '_;

  /// All scores grouped per catalog album.
  fn grouped_ratings(
    &self,
  ) -> impl Future<Output = Result<Vec<AlbumRatings>, Self::Error>> + Send + '_;

  fn rating_album_ids(
    &self,
  ) -> impl Future<Output = Result<BTreeSet<AlbumId>, Self::Error>> + Send + '_;

  // ── Homework ──────────────────────────────────────────────────────────

  /// Queue an album for a user. Fails with a duplicate-homework error if it
  /// is already queued.
  fn add_homework<'a>(
    &'a self,
    user_id: UserId,
    album_id: &'a AlbumId,
  ) -> impl Future<Output = Result<HomeworkItem, Self::Error>> + Send + 'a;

  fn get_homework<'a>(
    &'a self,
    user_id: UserId,
    album_id: &'a AlbumId,
  ) -> impl Future<Output = Result<Option<HomeworkItem>, Self::Error>> + Send + 'a;

  fn remove_homework<'a>(
    &'a self,
    user_id: UserId,
    album_id: &'a AlbumId,
  ) -> impl Future<Output = Result<Option<HomeworkItem>, Self::Error>> + Send + 'a;

  /// A user's homework with the given completion flag, joined with the
  /// catalog.
  fn user_homework(
    &self,
    user_id: UserId,
    complete: bool,
  ) -> impl Future<Output = Result<Vec<HomeworkEntry>, Self::Error>> + Send + '_;

  fn homework_album_ids(
    &self,
  ) -> impl Future<Output = Result<BTreeSet<AlbumId>, Self::Error>> + Send + '_;
}
