//! Log Transformer — one event-log file into `time`, `users` and `songplays`
//! rows.
//!
//! Only `NextSong` events are considered. The filter runs on the raw rows,
//! before decoding, so non-play events (which routinely lack user fields) can
//! never fail the file. The three emission passes then run in order: every
//! time row, every user row, every songplay row.

use std::path::Path;

use chrono::{DateTime, Datelike as _, Timelike as _, Utc};
use tracing::debug;

use super::emit;
use crate::{
  Error, Result,
  extract::JsonLines,
  record::{LogEvent, NEXT_SONG},
  row::{SongplayRow, TimeRow, UserRow, Value},
  store::{self, StatementName, StoreGateway},
};

/// Counts describing one processed log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFileReport {
  /// Rows in the file before filtering.
  pub total:      usize,
  /// `NextSong` events; equals the number of time, user and songplay rows.
  pub events:     usize,
  pub resolved:   usize,
  pub unresolved: usize,
}

// ─── Derivations ─────────────────────────────────────────────────────────────

/// Break an epoch-millisecond timestamp into its calendar parts (UTC).
pub fn time_row(ts: i64) -> Result<TimeRow> {
  let start_time = start_time(ts)?;
  Ok(TimeRow {
    start_time,
    hour: start_time.hour(),
    day: start_time.day(),
    week: start_time.iso_week().week(),
    month: start_time.month(),
    year: start_time.year(),
    weekday: start_time.weekday().num_days_from_monday(),
  })
}

fn start_time(ts: i64) -> Result<DateTime<Utc>> {
  DateTime::from_timestamp_millis(ts).ok_or(Error::InvalidTimestamp(ts))
}

impl From<&LogEvent> for UserRow {
  fn from(e: &LogEvent) -> Self {
    Self {
      user_id:    e.user_id.clone(),
      first_name: e.first_name.clone(),
      last_name:  e.last_name.clone(),
      gender:     e.gender.clone(),
      level:      e.level.clone(),
    }
  }
}

// ─── Lookup join ─────────────────────────────────────────────────────────────

/// Resolve `(song_id, artist_id)` for an event by (title, artist name,
/// duration). A miss is `Ok(None)`, never an error.
pub fn resolve_song_artist<G: StoreGateway>(
  store: &mut G,
  event: &LogEvent,
) -> Result<Option<(String, String)>> {
  let (Some(title), Some(artist), Some(length)) = (&event.song, &event.artist, event.length)
  else {
    return Ok(None);
  };

  let statement = StatementName::SelectSongArtistByTitleArtistLength;
  let params = [
    Value::from(title.as_str()),
    Value::from(artist.as_str()),
    Value::from(length),
  ];

  let Some(row) = store::execute(store, statement, &params)? else {
    return Ok(None);
  };

  match row.as_slice() {
    [song_id, artist_id] => match (song_id.as_text(), artist_id.as_text()) {
      (Some(s), Some(a)) => Ok(Some((s.to_owned(), a.to_owned()))),
      _ => Err(Error::UnexpectedResult {
        statement,
        message: format!("expected two text columns, got {row:?}"),
      }),
    },
    _ => Err(Error::UnexpectedResult {
      statement,
      message: format!("expected 2 columns, got {}", row.len()),
    }),
  }
}

// ─── Driver ──────────────────────────────────────────────────────────────────

/// Load one log file: filter to `NextSong`, then emit time rows, user rows and
/// songplay rows, in that order.
pub fn process_log_file<G: StoreGateway>(store: &mut G, path: &Path) -> Result<LogFileReport> {
  let mut table = JsonLines::read(path)?;
  let total = table.len();
  table.retain_where("page", NEXT_SONG);
  let events: Vec<LogEvent> = table.decode()?;

  let mut report = LogFileReport {
    total,
    events: events.len(),
    ..LogFileReport::default()
  };

  let times = events
    .iter()
    .map(|e| time_row(e.ts))
    .collect::<Result<Vec<_>>>()?;
  for time in &times {
    emit(store, time)?;
  }

  for event in &events {
    emit(store, &UserRow::from(event))?;
  }

  for (event, time) in events.iter().zip(&times) {
    let resolved = resolve_song_artist(store, event)?;
    let (song_id, artist_id) = match resolved {
      Some((s, a)) => {
        report.resolved += 1;
        (Some(s), Some(a))
      }
      None => {
        report.unresolved += 1;
        (None, None)
      }
    };

    let songplay = SongplayRow {
      start_time: time.start_time,
      user_id: event.user_id.clone(),
      level: event.level.clone(),
      song_id,
      artist_id,
      session_id: event.session_id,
      location: event.location.clone(),
      user_agent: event.user_agent.clone(),
    };
    emit(store, &songplay)?;
  }

  debug!(
    total = report.total,
    events = report.events,
    resolved = report.resolved,
    unresolved = report.unresolved,
    "log file loaded"
  );
  Ok(report)
}
