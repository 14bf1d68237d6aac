//! Typed views of the two raw input families.
//!
//! Fields are bound by name so a change in the source's field order can never
//! shift values into the wrong column.

use std::fmt;

use serde::{
  Deserialize, Deserializer,
  de::{self, Visitor},
};

/// One song-metadata record (a song file holds exactly one).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SongRecord {
  pub song_id:          String,
  pub title:            String,
  pub artist_id:        String,
  pub year:             i32,
  pub duration:         f64,
  pub artist_name:      String,
  #[serde(default)]
  pub artist_location:  Option<String>,
  #[serde(default)]
  pub artist_latitude:  Option<f64>,
  #[serde(default)]
  pub artist_longitude: Option<f64>,
}

/// One application event from a log file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
  /// Milliseconds since the Unix epoch, UTC.
  pub ts:         i64,
  pub page:       String,
  #[serde(deserialize_with = "string_or_number")]
  pub user_id:    String,
  #[serde(default)]
  pub first_name: Option<String>,
  #[serde(default)]
  pub last_name:  Option<String>,
  #[serde(default)]
  pub gender:     Option<String>,
  pub level:      String,
  #[serde(default)]
  pub song:       Option<String>,
  #[serde(default)]
  pub artist:     Option<String>,
  #[serde(default)]
  pub length:     Option<f64>,
  pub session_id: i64,
  #[serde(default)]
  pub location:   Option<String>,
  #[serde(default)]
  pub user_agent: Option<String>,
}

/// The page value that marks an event as an actual song play.
pub const NEXT_SONG: &str = "NextSong";

/// Log sources write `userId` as a string, some exports as a number.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  struct UserId;

  impl Visitor<'_> for UserId {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("`userId` as a string or an integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> { Ok(v.to_owned()) }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> { Ok(v) }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> { Ok(v.to_string()) }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> { Ok(v.to_string()) }
  }

  deserializer.deserialize_any(UserId)
}
