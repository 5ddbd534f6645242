//! SQL schema for the ranking store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Foreign keys are declared but not enforced (`PRAGMA foreign_keys` stays
/// off): ratings and homework may briefly reference albums that the master
/// catalog does not hold yet, and reconciliation repairs that.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS master_table (
    album_id        TEXT PRIMARY KEY,
    album_name      TEXT NOT NULL,
    artist          TEXT NOT NULL,   -- JSON array of artist names
    year            INTEGER NOT NULL,
    album_cover_url TEXT
);

CREATE TABLE IF NOT EXISTS rating_table (
    album_id TEXT NOT NULL REFERENCES master_table(album_id),
    user_id  INTEGER NOT NULL,
    rating   REAL NOT NULL,
    PRIMARY KEY (album_id, user_id)
);

CREATE TABLE IF NOT EXISTS homework_table (
    album_id TEXT NOT NULL REFERENCES master_table(album_id),
    user_id  INTEGER NOT NULL,
    complete INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (album_id, user_id)
);

CREATE INDEX IF NOT EXISTS rating_user_idx   ON rating_table(user_id);
CREATE INDEX IF NOT EXISTS homework_user_idx ON homework_table(user_id);

PRAGMA user_version = 1;
";
