//! The `StoreGateway` trait and the named statement table it executes.
//!
//! The core never sees SQL text. Every write or read is identified by a
//! [`StatementName`]; the backend resolves it against the [`StatementTable`]
//! it was constructed with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator as _, IntoStaticStr};

use crate::{Error, Result, row::Value};

// ─── Statement names ─────────────────────────────────────────────────────────

/// Every parameterized operation the pipeline issues.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Display,
  EnumIter,
  IntoStaticStr,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum StatementName {
  InsertSong,
  InsertArtist,
  InsertTime,
  InsertUser,
  InsertSongplay,
  SelectSongArtistByTitleArtistLength,
}

impl StatementName {
  /// Reads return at most one row; writes return nothing.
  pub fn is_query(self) -> bool { matches!(self, Self::SelectSongArtistByTitleArtistLength) }
}

// ─── Statement table ─────────────────────────────────────────────────────────

/// Statement templates keyed by name. Guaranteed complete once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementTable {
  templates: BTreeMap<StatementName, String>,
}

impl StatementTable {
  /// Build a table, rejecting it if any [`StatementName`] has no template.
  pub fn new<I, S>(templates: I) -> Result<Self>
  where
    I: IntoIterator<Item = (StatementName, S)>,
    S: Into<String>,
  {
    let templates: BTreeMap<_, _> = templates
      .into_iter()
      .map(|(name, sql)| (name, sql.into()))
      .collect();

    if let Some(missing) = StatementName::iter().find(|n| !templates.contains_key(n)) {
      return Err(Error::MissingStatement(missing));
    }

    Ok(Self { templates })
  }

  /// Build a table from a template for every name. Complete by construction.
  pub fn from_fn<S: Into<String>>(mut template: impl FnMut(StatementName) -> S) -> Self {
    Self {
      templates: StatementName::iter().map(|n| (n, template(n).into())).collect(),
    }
  }

  /// Replace the template for one statement.
  pub fn with_override(mut self, name: StatementName, sql: impl Into<String>) -> Self {
    self.templates.insert(name, sql.into());
    self
  }

  pub fn get(&self, name: StatementName) -> Result<&str> {
    self
      .templates
      .get(&name)
      .map(String::as_str)
      .ok_or(Error::MissingStatement(name))
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the relational store the star schema is loaded into.
///
/// A gateway holds one connection and one open transaction scope at a time.
/// Statements issued since the last [`commit`](Self::commit) are durable only
/// once it returns.
pub trait StoreGateway {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Send one parameterized statement.
  ///
  /// For queries ([`StatementName::is_query`]) the first result row is
  /// returned, or `None` when nothing matches. Writes always yield `None`.
  fn execute(
    &mut self,
    statement: StatementName,
    params: &[Value],
  ) -> Result<Option<Vec<Value>>, Self::Error>;

  /// Finalise every statement issued since the last commit.
  fn commit(&mut self) -> Result<(), Self::Error>;

  /// Discard every statement issued since the last commit.
  fn rollback(&mut self) -> Result<(), Self::Error>;
}

/// Issue `statement` and map any gateway failure into [`Error::Store`].
pub(crate) fn execute<G: StoreGateway>(
  store: &mut G,
  statement: StatementName,
  params: &[Value],
) -> Result<Option<Vec<Value>>> {
  store.execute(statement, params).map_err(Error::store)
}
