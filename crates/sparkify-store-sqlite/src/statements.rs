//! Default SQLite templates for every [`StatementName`].
//!
//! Dimension inserts lean on the primary keys for idempotence: songs, artists
//! and time rows are kept on conflict, users take the latest `level`.

use sparkify_core::{StatementName, StatementTable};

const INSERT_SONG: &str = "
INSERT INTO songs (song_id, title, artist_id, year, duration)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (song_id) DO NOTHING";

const INSERT_ARTIST: &str = "
INSERT INTO artists (artist_id, name, location, latitude, longitude)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (artist_id) DO NOTHING";

const INSERT_TIME: &str = "
INSERT INTO time (start_time, hour, day, week, month, year, weekday)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT (start_time) DO NOTHING";

const INSERT_USER: &str = "
INSERT INTO users (user_id, first_name, last_name, gender, level)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (user_id) DO UPDATE SET level = excluded.level";

const INSERT_SONGPLAY: &str = "
INSERT INTO songplays (
  start_time, user_id, level, song_id, artist_id,
  session_id, location, user_agent
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const SELECT_SONG_ARTIST: &str = "
SELECT s.song_id, a.artist_id
FROM songs s
JOIN artists a ON a.artist_id = s.artist_id
WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3
ORDER BY s.song_id
LIMIT 1";

/// The statement table [`SqliteStore`](crate::SqliteStore) is normally opened
/// with.
pub fn default_statements() -> StatementTable {
  StatementTable::from_fn(|name| match name {
    StatementName::InsertSong => INSERT_SONG,
    StatementName::InsertArtist => INSERT_ARTIST,
    StatementName::InsertTime => INSERT_TIME,
    StatementName::InsertUser => INSERT_USER,
    StatementName::InsertSongplay => INSERT_SONGPLAY,
    StatementName::SelectSongArtistByTitleArtistLength => SELECT_SONG_ARTIST,
  })
}
