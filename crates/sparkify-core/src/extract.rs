//! Record Extractor — newline-delimited JSON into an in-memory table.
//!
//! Each non-blank line is one independent JSON object. Rows keep the source
//! field names in source order.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as Json};

use crate::{Error, Result};

/// One parsed source object, tagged with the line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
  /// 1-based line number within the source file.
  pub line:   usize,
  pub fields: Map<String, Json>,
}

impl RawRow {
  pub fn get(&self, field: &str) -> Option<&Json> { self.fields.get(field) }

  pub fn field_names(&self) -> impl Iterator<Item = &str> { self.fields.keys().map(String::as_str) }
}

/// All rows of one JSON-lines file.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonLines {
  path: PathBuf,
  rows: Vec<RawRow>,
}

impl JsonLines {
  /// Read and parse `path`. A file without a single record is an error.
  pub fn read(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Self::parse(path, bytes)
  }

  /// Parse already-loaded content; `path` is used only for error reporting.
  ///
  /// Lines are decoded independently, so invalid UTF-8 is reported as a
  /// parse error on the line that carries it.
  pub fn parse(path: impl Into<PathBuf>, content: impl AsRef<[u8]>) -> Result<Self> {
    let path = path.into();
    let mut rows = Vec::new();

    for (idx, raw) in content.as_ref().split(|b| *b == b'\n').enumerate() {
      if raw.iter().all(u8::is_ascii_whitespace) {
        continue;
      }
      let line = idx + 1;
      let fields: Map<String, Json> =
        serde_json::from_slice(raw).map_err(|source| Error::Parse {
          path: path.clone(),
          line,
          source,
        })?;
      rows.push(RawRow { line, fields });
    }

    if rows.is_empty() {
      return Err(Error::EmptyFile(path));
    }

    Ok(Self { path, rows })
  }

  pub fn rows(&self) -> &[RawRow] { &self.rows }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  /// Keep only the rows whose `field` is the string `value`.
  pub fn retain_where(&mut self, field: &str, value: &str) {
    self
      .rows
      .retain(|row| row.get(field).and_then(Json::as_str) == Some(value));
  }

  /// Decode one row into a typed record by field name.
  pub fn decode_row<T: DeserializeOwned>(&self, row: &RawRow) -> Result<T> {
    T::deserialize(&Json::Object(row.fields.clone())).map_err(|e| {
      Error::malformed(&self.path, format!("line {}: {e}", row.line))
    })
  }

  /// Decode every row, failing on the first one that does not fit `T`.
  pub fn decode<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
    self.rows.iter().map(|row| self.decode_row(row)).collect()
  }
}
