//! SQL schema for the Sparkify star schema.
//!
//! Applied every time a store is opened; idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`.

/// Tables a caller may inspect through [`SqliteStore::count`](crate::SqliteStore::count).
pub const TABLES: &[&str] = &["songplays", "users", "songs", "artists", "time"];

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Fact table. song_id / artist_id stay NULL when the lookup join misses.
CREATE TABLE IF NOT EXISTS songplays (
    songplay_id INTEGER PRIMARY KEY AUTOINCREMENT,
    start_time  TEXT    NOT NULL,   -- RFC 3339 UTC, millisecond precision
    user_id     TEXT    NOT NULL,
    level       TEXT    NOT NULL,
    song_id     TEXT,
    artist_id   TEXT,
    session_id  INTEGER NOT NULL,
    location    TEXT,
    user_agent  TEXT
);

CREATE TABLE IF NOT EXISTS users (
    user_id    TEXT PRIMARY KEY,
    first_name TEXT,
    last_name  TEXT,
    gender     TEXT,
    level      TEXT NOT NULL        -- 'free' | 'paid'; last write wins
);

CREATE TABLE IF NOT EXISTS songs (
    song_id   TEXT PRIMARY KEY,
    title     TEXT    NOT NULL,
    artist_id TEXT    NOT NULL,
    year      INTEGER NOT NULL,
    duration  REAL    NOT NULL
);

CREATE TABLE IF NOT EXISTS artists (
    artist_id TEXT PRIMARY KEY,
    name      TEXT NOT NULL,
    location  TEXT,
    latitude  REAL,
    longitude REAL
);

CREATE TABLE IF NOT EXISTS time (
    start_time TEXT PRIMARY KEY,
    hour       INTEGER NOT NULL,
    day        INTEGER NOT NULL,
    week       INTEGER NOT NULL,   -- ISO 8601 week number
    month      INTEGER NOT NULL,
    year       INTEGER NOT NULL,
    weekday    INTEGER NOT NULL    -- 0 = Monday
);

CREATE INDEX IF NOT EXISTS songs_lookup_idx    ON songs(title, duration);
CREATE INDEX IF NOT EXISTS songplays_time_idx  ON songplays(start_time);
CREATE INDEX IF NOT EXISTS songplays_user_idx  ON songplays(user_id);
";
