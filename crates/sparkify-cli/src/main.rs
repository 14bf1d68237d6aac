//! `sparkify-etl` — load the song and log JSON trees into the star schema.
//!
//! # Usage
//!
//! ```
//! sparkify-etl
//! sparkify-etl --config sparkify.toml --store /var/lib/sparkify.db
//! ```
//!
//! With no arguments the song pipeline runs over `data/song_data`, then the
//! log pipeline over `data/log_data`, loading into `sparkify.db`.

mod settings;

use std::{io, path::PathBuf};

use anyhow::{Context as _, bail};
use clap::Parser;
use sparkify_core::{
  ErrorPolicy,
  transform::{process_log_file, process_song_file},
  walk::process_data,
};
use sparkify_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::EtlConfig;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Sparkify star-schema loader")]
struct Cli {
  /// Path to the TOML configuration file (optional).
  #[arg(short, long, default_value = "sparkify.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `store_path`.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Song-metadata root; overrides `song_data`.
  #[arg(long, value_name = "DIR")]
  song_data: Option<PathBuf>,

  /// Event-log root; overrides `log_data`.
  #[arg(long, value_name = "DIR")]
  log_data: Option<PathBuf>,

  /// Roll back and skip failing files instead of stopping at the first one.
  #[arg(long)]
  skip_failed: bool,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  // Progress goes to stdout; diagnostics to stderr.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut cfg = EtlConfig::load(&cli.config)
    .with_context(|| format!("failed to load {}", cli.config.display()))?;

  // CLI flags override config file, which overrides defaults.
  if let Some(store) = cli.store {
    cfg.store_path = store;
  }
  if let Some(dir) = cli.song_data {
    cfg.song_data = dir;
  }
  if let Some(dir) = cli.log_data {
    cfg.log_data = dir;
  }
  if cli.skip_failed {
    cfg.on_error = ErrorPolicy::Skip;
  }

  let mut store = SqliteStore::open(&cfg.store_path, cfg.statement_table())
    .with_context(|| format!("failed to open store at {}", cfg.store_path.display()))?;

  let stdout = io::stdout();
  let mut out = stdout.lock();

  let songs = process_data(
    &mut store,
    &cfg.song_data,
    |s, path| process_song_file(s, path).map(drop),
    cfg.on_error,
    &mut out,
  )
  .with_context(|| format!("song pipeline failed under {}", cfg.song_data.display()))?;

  let logs = process_data(
    &mut store,
    &cfg.log_data,
    |s, path| process_log_file(s, path).map(drop),
    cfg.on_error,
    &mut out,
  )
  .with_context(|| format!("log pipeline failed under {}", cfg.log_data.display()))?;

  tracing::info!(%songs, %logs, "load complete");

  let failed = songs.failed + logs.failed;
  if failed > 0 {
    bail!("{failed} file(s) failed and were skipped");
  }
  Ok(())
}
