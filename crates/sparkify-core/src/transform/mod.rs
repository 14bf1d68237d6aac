//! Transformers turning one input file into star-schema rows.

pub mod log;
pub mod song;

use crate::{
  Result,
  row::Row,
  store::{self, StoreGateway},
};

pub use log::{LogFileReport, process_log_file};
pub use song::{SongFileReport, process_song_file};

/// Send `row` through its insert statement.
pub(crate) fn emit<G: StoreGateway, R: Row>(store: &mut G, row: &R) -> Result<()> {
  store::execute(store, R::STATEMENT, &row.params())?;
  Ok(())
}
