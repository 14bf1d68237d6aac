//! Error types for `sparkify-core`.

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StatementName;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("{path}:{line}: invalid JSON record: {source}")]
  Parse {
    path:   PathBuf,
    line:   usize,
    #[source]
    source: serde_json::Error,
  },

  #[error("{0}: file contains no records")]
  EmptyFile(PathBuf),

  #[error("{path}: malformed input: {message}")]
  MalformedInput { path: PathBuf, message: String },

  #[error("timestamp {0}ms is out of range")]
  InvalidTimestamp(i64),

  #[error("no template registered for statement {0}")]
  MissingStatement(StatementName),

  #[error("{statement} returned an unexpected row: {message}")]
  UnexpectedResult {
    statement: StatementName,
    message:   String,
  },

  #[error("failed to write progress: {0}")]
  Progress(#[source] std::io::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
    Self::MalformedInput {
      path:    path.into(),
      message: message.into(),
    }
  }

  /// Wrap a gateway error without altering it.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  /// `true` for the family of errors raised when a file is not usable
  /// newline-delimited JSON.
  pub fn is_parse(&self) -> bool {
    matches!(self, Self::Parse { .. } | Self::EmptyFile(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
