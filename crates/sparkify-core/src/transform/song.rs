//! Song Transformer — one song-metadata file into a `songs` and an `artists`
//! row.

use std::path::Path;

use tracing::debug;

use super::emit;
use crate::{
  Error, Result,
  extract::JsonLines,
  record::SongRecord,
  row::{ArtistRow, SongRow},
  store::StoreGateway,
};

/// The rows emitted for one song file.
#[derive(Debug, Clone, PartialEq)]
pub struct SongFileReport {
  pub song:   SongRow,
  pub artist: ArtistRow,
}

impl From<&SongRecord> for SongRow {
  fn from(r: &SongRecord) -> Self {
    Self {
      song_id:   r.song_id.clone(),
      title:     r.title.clone(),
      artist_id: r.artist_id.clone(),
      year:      r.year,
      duration:  r.duration,
    }
  }
}

impl From<&SongRecord> for ArtistRow {
  fn from(r: &SongRecord) -> Self {
    Self {
      artist_id: r.artist_id.clone(),
      name:      r.artist_name.clone(),
      location:  r.artist_location.clone(),
      latitude:  r.artist_latitude,
      longitude: r.artist_longitude,
    }
  }
}

/// Load the single record of a song file and emit its song then its artist.
///
/// A file holding zero or several records is rejected with
/// [`Error::MalformedInput`] before anything is sent to the store.
pub fn process_song_file<G: StoreGateway>(
  store: &mut G,
  path: &Path,
) -> Result<SongFileReport> {
  let table = JsonLines::read(path)?;
  if table.len() != 1 {
    return Err(Error::malformed(
      path,
      format!("expected exactly one song record, found {}", table.len()),
    ));
  }

  let record: SongRecord = table.decode_row(&table.rows()[0])?;
  let song = SongRow::from(&record);
  let artist = ArtistRow::from(&record);

  emit(store, &song)?;
  emit(store, &artist)?;

  debug!(song_id = %song.song_id, artist_id = %artist.artist_id, "song file loaded");
  Ok(SongFileReport { song, artist })
}
