//! Error type for `sparkify-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] sparkify_core::Error),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("unsupported column type {kind} in result of {statement}")]
  UnexpectedColumn {
    statement: sparkify_core::StatementName,
    kind:      rusqlite::types::Type,
  },

  #[error("unknown table: {0:?}")]
  UnknownTable(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
