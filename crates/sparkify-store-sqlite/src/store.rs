//! [`SqliteStore`] — the SQLite implementation of [`StoreGateway`].

use std::path::Path;

use rusqlite::Connection;
use sparkify_core::{StatementName, StatementTable, StoreGateway, row::Value};
use tracing::debug;

use crate::{
  Error, Result,
  encode::{decode_column, encode_value},
  schema::{SCHEMA, TABLES},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A star-schema store backed by a single SQLite file.
///
/// A transaction is opened implicitly by the first statement after a commit
/// or rollback, so every input file maps onto exactly one transaction.
pub struct SqliteStore {
  conn:       Connection,
  statements: StatementTable,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>, statements: StatementTable) -> Result<Self> {
    let path = path.as_ref();
    let conn = Connection::open(path)?;
    debug!(path = %path.display(), "opened sqlite store");
    Self::init(conn, statements)
  }

  /// Open an in-memory store — useful for testing.
  pub fn open_in_memory(statements: StatementTable) -> Result<Self> {
    Self::init(Connection::open_in_memory()?, statements)
  }

  fn init(conn: Connection, statements: StatementTable) -> Result<Self> {
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn, statements })
  }

  /// Direct access for ad-hoc verification queries.
  pub fn connection(&self) -> &Connection { &self.conn }

  /// Number of committed and pending rows in one of the star-schema tables.
  pub fn count(&self, table: &str) -> Result<u64> {
    if !TABLES.contains(&table) {
      return Err(Error::UnknownTable(table.to_owned()));
    }
    let n: i64 = self
      .conn
      .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
    Ok(n.unsigned_abs())
  }

  fn begin_if_needed(&self) -> Result<()> {
    if self.conn.is_autocommit() {
      self.conn.execute_batch("BEGIN")?;
    }
    Ok(())
  }

  fn finish(&self, verb: &str) -> Result<()> {
    if !self.conn.is_autocommit() {
      self.conn.execute_batch(verb)?;
    }
    Ok(())
  }
}

// ─── StoreGateway impl ───────────────────────────────────────────────────────

impl StoreGateway for SqliteStore {
  type Error = Error;

  fn execute(
    &mut self,
    statement: StatementName,
    params: &[Value],
  ) -> Result<Option<Vec<Value>>> {
    self.begin_if_needed()?;

    let mut stmt = self.conn.prepare_cached(self.statements.get(statement)?)?;
    let bound = rusqlite::params_from_iter(params.iter().map(encode_value));

    if !statement.is_query() {
      stmt.execute(bound)?;
      return Ok(None);
    }

    let columns = stmt.column_count();
    let mut rows = stmt.query(bound)?;
    let Some(row) = rows.next()? else {
      return Ok(None);
    };

    (0..columns)
      .map(|i| decode_column(statement, row.get_ref(i)?))
      .collect::<Result<Vec<_>>>()
      .map(Some)
  }

  fn commit(&mut self) -> Result<()> { self.finish("COMMIT") }

  fn rollback(&mut self) -> Result<()> { self.finish("ROLLBACK") }
}
