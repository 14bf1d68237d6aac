//! Typed rows of the star schema and the parameter values they bind to.
//!
//! Each row knows which statement inserts it and how to flatten itself into
//! that statement's positional parameters.

use chrono::{DateTime, Utc};

use crate::store::StatementName;

// ─── Parameter values ────────────────────────────────────────────────────────

/// A single bound parameter or result column.
///
/// `Null` is the explicit absent value; it is never conflated with `0` or an
/// empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
  Timestamp(DateTime<Utc>),
}

impl Value {
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<i64> for Value {
  fn from(n: i64) -> Self { Self::Integer(n) }
}

impl From<i32> for Value {
  fn from(n: i32) -> Self { Self::Integer(n.into()) }
}

impl From<u32> for Value {
  fn from(n: u32) -> Self { Self::Integer(n.into()) }
}

impl From<f64> for Value {
  fn from(x: f64) -> Self { Self::Real(x) }
}

impl From<DateTime<Utc>> for Value {
  fn from(dt: DateTime<Utc>) -> Self { Self::Timestamp(dt) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Null, Into::into) }
}

// ─── Row trait ───────────────────────────────────────────────────────────────

/// A row destined for one table of the star schema.
pub trait Row {
  /// The statement that inserts this row.
  const STATEMENT: StatementName;

  /// Positional parameters, in the column order of [`Self::STATEMENT`].
  fn params(&self) -> Vec<Value>;
}

// ─── Dimensions ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SongRow {
  pub song_id:   String,
  pub title:     String,
  pub artist_id: String,
  pub year:      i32,
  pub duration:  f64,
}

impl Row for SongRow {
  const STATEMENT: StatementName = StatementName::InsertSong;

  fn params(&self) -> Vec<Value> {
    vec![
      self.song_id.as_str().into(),
      self.title.as_str().into(),
      self.artist_id.as_str().into(),
      self.year.into(),
      self.duration.into(),
    ]
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRow {
  pub artist_id: String,
  pub name:      String,
  pub location:  Option<String>,
  pub latitude:  Option<f64>,
  pub longitude: Option<f64>,
}

impl Row for ArtistRow {
  const STATEMENT: StatementName = StatementName::InsertArtist;

  fn params(&self) -> Vec<Value> {
    vec![
      self.artist_id.as_str().into(),
      self.name.as_str().into(),
      self.location.clone().into(),
      self.latitude.into(),
      self.longitude.into(),
    ]
  }
}

/// Calendar breakdown of one play event's start time.
///
/// `week` is the ISO-8601 week number; `weekday` counts from Monday = 0.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRow {
  pub start_time: DateTime<Utc>,
  pub hour:       u32,
  pub day:        u32,
  pub week:       u32,
  pub month:      u32,
  pub year:       i32,
  pub weekday:    u32,
}

impl Row for TimeRow {
  const STATEMENT: StatementName = StatementName::InsertTime;

  fn params(&self) -> Vec<Value> {
    vec![
      self.start_time.into(),
      self.hour.into(),
      self.day.into(),
      self.week.into(),
      self.month.into(),
      self.year.into(),
      self.weekday.into(),
    ]
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
  pub user_id:    String,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub gender:     Option<String>,
  /// Subscription tier at the time of the event (`free` / `paid`).
  pub level:      String,
}

impl Row for UserRow {
  const STATEMENT: StatementName = StatementName::InsertUser;

  fn params(&self) -> Vec<Value> {
    vec![
      self.user_id.as_str().into(),
      self.first_name.clone().into(),
      self.last_name.clone().into(),
      self.gender.clone().into(),
      self.level.as_str().into(),
    ]
  }
}

// ─── Fact ────────────────────────────────────────────────────────────────────

/// One play event. `song_id` / `artist_id` are `None` when the lookup join
/// found no matching dimension rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SongplayRow {
  pub start_time: DateTime<Utc>,
  pub user_id:    String,
  pub level:      String,
  pub song_id:    Option<String>,
  pub artist_id:  Option<String>,
  pub session_id: i64,
  pub location:   Option<String>,
  pub user_agent: Option<String>,
}

impl Row for SongplayRow {
  const STATEMENT: StatementName = StatementName::InsertSongplay;

  fn params(&self) -> Vec<Value> {
    vec![
      self.start_time.into(),
      self.user_id.as_str().into(),
      self.level.as_str().into(),
      self.song_id.clone().into(),
      self.artist_id.clone().into(),
      self.session_id.into(),
      self.location.clone().into(),
      self.user_agent.clone().into(),
    ]
  }
}
