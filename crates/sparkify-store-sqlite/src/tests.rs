//! Integration tests for `SqliteStore` against in-memory and on-disk
//! databases.

use std::{fs, io, path::Path};

use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use sparkify_core::{
  Error as CoreError, ErrorPolicy, StatementName, StoreGateway,
  row::Value,
  transform::{process_log_file, process_song_file},
  walk::process_data,
};
use tempfile::TempDir;

use crate::{SqliteStore, default_statements};

fn decode_dt(s: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .ok()
    .map(|dt| dt.with_timezone(&Utc))
}

fn store() -> SqliteStore {
  SqliteStore::open_in_memory(default_statements()).expect("in-memory store")
}

fn write(dir: &Path, rel: &str, contents: &str) -> std::path::PathBuf {
  let path = dir.join(rel);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(&path, contents).unwrap();
  path
}

const SONG: &str = r#"{"song_id":"S1","title":"T","artist_id":"A1","year":2000,"duration":180.5,"artist_name":"N","artist_location":"L","artist_latitude":1.0,"artist_longitude":2.0}"#;

fn play(ts: i64, user: &str, level: &str, song: &str, artist: &str, length: f64) -> String {
  format!(
    r#"{{"artist":"{artist}","firstName":"Kate","gender":"F","lastName":"Harrell","length":{length},"level":"{level}","location":"Lansing-East Lansing, MI","page":"NextSong","sessionId":293,"song":"{song}","ts":{ts},"userAgent":"Mozilla/5.0","userId":"{user}"}}"#
  )
}

// ─── Gateway basics ──────────────────────────────────────────────────────────

#[test]
fn lookup_returns_first_matching_pair() {
  let mut s = store();
  let dir = TempDir::new().unwrap();
  process_song_file(&mut s, &write(dir.path(), "s.json", SONG)).unwrap();

  let hit = s
    .execute(StatementName::SelectSongArtistByTitleArtistLength, &[
      Value::from("T"),
      Value::from("N"),
      Value::from(180.5),
    ])
    .unwrap();
  assert_eq!(hit, Some(vec![Value::from("S1"), Value::from("A1")]));

  let miss = s
    .execute(StatementName::SelectSongArtistByTitleArtistLength, &[
      Value::from("T"),
      Value::from("N"),
      Value::from(180.0),
    ])
    .unwrap();
  assert_eq!(miss, None);
}

#[test]
fn rollback_discards_uncommitted_statements() {
  let mut s = store();
  let dir = TempDir::new().unwrap();
  process_song_file(&mut s, &write(dir.path(), "s.json", SONG)).unwrap();
  assert_eq!(s.count("songs").unwrap(), 1);

  s.rollback().unwrap();
  assert_eq!(s.count("songs").unwrap(), 0);
  assert_eq!(s.count("artists").unwrap(), 0);
}

#[test]
fn commit_without_statements_is_a_no_op() {
  let mut s = store();
  s.commit().unwrap();
  s.rollback().unwrap();
}

#[test]
fn count_rejects_unknown_table() {
  let s = store();
  assert!(matches!(s.count("sqlite_master"), Err(crate::Error::UnknownTable(_))));
}

#[test]
fn timestamps_are_stored_as_rfc3339_millis() {
  let mut s = store();
  let dir = TempDir::new().unwrap();
  let log = write(
    dir.path(),
    "log.json",
    &play(1_541_903_636_796, "8", "free", "x", "y", 1.0),
  );
  process_log_file(&mut s, &log).unwrap();
  s.commit().unwrap();

  let stored: String = s
    .connection()
    .query_row("SELECT start_time FROM time", [], |r| r.get(0))
    .unwrap();
  assert_eq!(stored, "2018-11-11T02:33:56.796Z");
  assert_eq!(
    decode_dt(&stored).unwrap().timestamp_millis(),
    1_541_903_636_796
  );
}

// ─── Dimension idempotence ───────────────────────────────────────────────────

#[test]
fn song_file_twice_is_idempotent_via_upsert() {
  let mut s = store();
  let dir = TempDir::new().unwrap();
  let path = write(dir.path(), "s.json", SONG);

  for _ in 0..2 {
    process_song_file(&mut s, &path).unwrap();
    s.commit().unwrap();
  }

  assert_eq!(s.count("songs").unwrap(), 1);
  assert_eq!(s.count("artists").unwrap(), 1);
}

#[test]
fn strict_insert_fails_the_same_way_every_rerun() {
  let statements = default_statements().with_override(
    StatementName::InsertSong,
    "INSERT INTO songs (song_id, title, artist_id, year, duration) \
     VALUES (?1, ?2, ?3, ?4, ?5)",
  );
  let mut s = SqliteStore::open_in_memory(statements).unwrap();
  let dir = TempDir::new().unwrap();
  let path = write(dir.path(), "s.json", SONG);

  process_song_file(&mut s, &path).unwrap();
  s.commit().unwrap();

  let mut failures = Vec::new();
  for _ in 0..2 {
    let err = process_song_file(&mut s, &path).unwrap_err();
    assert!(matches!(err, CoreError::Store(_)), "{err:?}");
    s.rollback().unwrap();
    failures.push(err.to_string());
  }
  assert_eq!(failures[0], failures[1]);
  assert!(failures[0].contains("UNIQUE"), "{}", failures[0]);
  assert_eq!(s.count("songs").unwrap(), 1);
}

#[test]
fn user_level_is_last_write_wins() {
  let mut s = store();
  let dir = TempDir::new().unwrap();
  let lines = [
    play(1_541_903_636_796, "97", "free", "a", "b", 1.0),
    play(1_541_903_700_000, "97", "paid", "a", "b", 1.0),
  ];
  let log = write(dir.path(), "log.json", &lines.join("\n"));

  let report = process_log_file(&mut s, &log).unwrap();
  s.commit().unwrap();

  assert_eq!(report.events, 2);
  assert_eq!(s.count("users").unwrap(), 1);
  assert_eq!(s.count("time").unwrap(), 2);
  assert_eq!(s.count("songplays").unwrap(), 2);

  let level: String = s
    .connection()
    .query_row("SELECT level FROM users WHERE user_id = '97'", [], |r| {
      r.get(0)
    })
    .unwrap();
  assert_eq!(level, "paid");
}

// ─── Per-file commit ─────────────────────────────────────────────────────────

#[test]
fn failed_file_leaves_no_rows_and_earlier_files_stay() {
  let statements = default_statements()
    .with_override(StatementName::InsertSongplay, "INSERT INTO missing_table VALUES (?1)");
  let mut s = SqliteStore::open_in_memory(statements).unwrap();
  let dir = TempDir::new().unwrap();
  write(dir.path(), "songs/a.json", SONG);
  write(
    dir.path(),
    "logs/a.json",
    &play(1_541_903_636_796, "8", "free", "T", "N", 180.5),
  );

  process_data(
    &mut s,
    dir.path().join("songs"),
    |st, p| process_song_file(st, p).map(drop),
    ErrorPolicy::Abort,
    &mut io::sink(),
  )
  .unwrap();

  let err = process_data(
    &mut s,
    dir.path().join("logs"),
    |st, p| process_log_file(st, p).map(drop),
    ErrorPolicy::Abort,
    &mut io::sink(),
  )
  .unwrap_err();

  assert!(matches!(err, CoreError::Store(_)), "{err:?}");
  assert_eq!(s.count("songs").unwrap(), 1);
  assert_eq!(s.count("time").unwrap(), 0);
  assert_eq!(s.count("users").unwrap(), 0);
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[test]
fn end_to_end_song_then_log_pipeline() {
  let dir = TempDir::new().unwrap();
  write(dir.path(), "song_data/A/A/S1.json", SONG);
  write(
    dir.path(),
    "log_data/2018/11/events.json",
    &play(1_541_903_636_796, "8", "free", "T", "N", 180.5),
  );

  let db = dir.path().join("sparkify.db");
  let mut s = SqliteStore::open(&db, default_statements()).unwrap();
  let mut out = Vec::new();

  let songs = process_data(
    &mut s,
    dir.path().join("song_data"),
    |st, p| process_song_file(st, p).map(drop),
    ErrorPolicy::Abort,
    &mut out,
  )
  .unwrap();
  let logs = process_data(
    &mut s,
    dir.path().join("log_data"),
    |st, p| process_log_file(st, p).map(drop),
    ErrorPolicy::Abort,
    &mut out,
  )
  .unwrap();
  assert_eq!((songs.processed, logs.processed), (1, 1));
  drop(s);

  // Reopen to prove everything was committed.
  let s = SqliteStore::open(&db, default_statements()).unwrap();
  for table in ["songs", "artists", "time", "users", "songplays"] {
    assert_eq!(s.count(table).unwrap(), 1, "{table}");
  }

  let (song_id, artist_id): (Option<String>, Option<String>) = s
    .connection()
    .query_row("SELECT song_id, artist_id FROM songplays", [], |r| {
      Ok((r.get(0)?, r.get(1)?))
    })
    .unwrap();
  assert_eq!(song_id.as_deref(), Some("S1"));
  assert_eq!(artist_id.as_deref(), Some("A1"));

  let out = String::from_utf8(out).unwrap();
  assert!(out.contains("1/1 files processed."), "{out}");
}

#[test]
fn unmatched_songplay_stores_null_keys() {
  let mut s = store();
  let dir = TempDir::new().unwrap();
  let log = write(
    dir.path(),
    "log.json",
    &play(1_541_903_636_796, "8", "free", "Unknown", "Nobody", 99.0),
  );

  process_log_file(&mut s, &log).unwrap();
  s.commit().unwrap();

  let nulls: i64 = s
    .connection()
    .query_row(
      "SELECT COUNT(*) FROM songplays WHERE song_id IS NULL AND artist_id IS NULL",
      [],
      |r| r.get(0),
    )
    .unwrap();
  assert_eq!(nulls, 1);
}
