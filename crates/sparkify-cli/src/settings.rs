//! Run configuration: an optional TOML file layered under `SPARKIFY_*`
//! environment variables.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use serde::Deserialize;
use sparkify_core::{ErrorPolicy, StatementName, StatementTable};
use sparkify_store_sqlite::default_statements;

#[derive(Debug, Clone, Deserialize)]
pub struct EtlConfig {
  /// SQLite database file the star schema is loaded into.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Root of the song-metadata tree.
  #[serde(default = "default_song_data")]
  pub song_data:  PathBuf,
  /// Root of the event-log tree.
  #[serde(default = "default_log_data")]
  pub log_data:   PathBuf,
  #[serde(default)]
  pub on_error:   ErrorPolicy,
  /// Per-statement SQL overriding the built-in templates.
  #[serde(default)]
  pub statements: BTreeMap<StatementName, String>,
}

fn default_store_path() -> PathBuf { PathBuf::from("sparkify.db") }

fn default_song_data() -> PathBuf { PathBuf::from("data/song_data") }

fn default_log_data() -> PathBuf { PathBuf::from("data/log_data") }

impl EtlConfig {
  /// Read `path` if it exists, then apply environment overrides.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SPARKIFY"))
      .build()?
      .try_deserialize()
  }

  /// The default SQLite statements with any configured overrides applied.
  pub fn statement_table(&self) -> StatementTable {
    self
      .statements
      .iter()
      .fold(default_statements(), |table, (name, sql)| {
        table.with_override(*name, sql.clone())
      })
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let cfg = EtlConfig::load(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(cfg.song_data, PathBuf::from("data/song_data"));
    assert_eq!(cfg.log_data, PathBuf::from("data/log_data"));
    assert_eq!(cfg.on_error, ErrorPolicy::Abort);
    assert_eq!(cfg.statement_table(), default_statements());
  }

  #[test]
  fn file_values_and_statement_overrides_apply() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sparkify.toml");
    fs::write(
      &path,
      r#"
store_path = "out.db"
song_data = "in/songs"
on_error = "skip"

[statements]
insert-songplay = "INSERT INTO plays VALUES (?1)"
"#,
    )
    .unwrap();

    let cfg = EtlConfig::load(&path).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("out.db"));
    assert_eq!(cfg.song_data, PathBuf::from("in/songs"));
    assert_eq!(cfg.log_data, PathBuf::from("data/log_data"));
    assert_eq!(cfg.on_error, ErrorPolicy::Skip);

    let table = cfg.statement_table();
    assert_eq!(
      table.get(StatementName::InsertSongplay).unwrap(),
      "INSERT INTO plays VALUES (?1)"
    );
    assert_eq!(
      table.get(StatementName::InsertSong).unwrap(),
      default_statements().get(StatementName::InsertSong).unwrap()
    );
  }
}
