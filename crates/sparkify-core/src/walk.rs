//! Directory Walker — discovers input files and drives one transformer over
//! them with a commit per file.

use std::{
  fmt, fs,
  io::{self, Write},
  path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{info, warn};

use crate::{Error, Result, store::StoreGateway};

/// Extension (without the dot) of the files the walker picks up.
pub const INPUT_EXTENSION: &str = "json";

/// What the walker does when a file fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
  /// Roll back the file and stop the run with its error.
  #[default]
  Abort,
  /// Roll back the file, report it, and move on to the next one.
  Skip,
}

/// Outcome of one walk over an input root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkReport {
  pub root:      PathBuf,
  pub found:     usize,
  pub processed: usize,
  pub failed:    usize,
}

impl fmt::Display for WalkReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}: {} found, {} processed, {} failed",
      self.root.display(),
      self.found,
      self.processed,
      self.failed
    )
  }
}

// ─── Discovery ───────────────────────────────────────────────────────────────

/// Every `*.json` file under `root`, as absolute paths.
///
/// Entries are visited in file-name order; a directory's own files come
/// before those of its sub-directories. Symlinked directories are not
/// followed. Symlinks to regular files are kept.
pub fn discover(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
  let root = root.as_ref();
  let root = std::path::absolute(root).map_err(|e| Error::io(root, e))?;
  let meta = fs::metadata(&root).map_err(|e| Error::io(&root, e))?;
  if !meta.is_dir() {
    return Err(Error::io(&root, io::Error::other("not a directory")));
  }

  let mut files = Vec::new();
  walk_dir(&root, &mut files)?;
  Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
  let mut entries = fs::read_dir(dir)
    .and_then(|rd| rd.collect::<io::Result<Vec<_>>>())
    .map_err(|e| Error::io(dir, e))?;
  entries.sort_by_key(fs::DirEntry::file_name);

  let mut subdirs = Vec::new();
  for entry in entries {
    let path = entry.path();
    let kind = entry.file_type().map_err(|e| Error::io(&path, e))?;

    if kind.is_dir() {
      subdirs.push(path);
    } else if has_input_extension(&path) && (kind.is_file() || path.is_file()) {
      files.push(path);
    }
  }

  for sub in subdirs {
    walk_dir(&sub, files)?;
  }
  Ok(())
}

fn has_input_extension(path: &Path) -> bool {
  path.extension().is_some_and(|ext| ext == INPUT_EXTENSION)
}

// ─── Driver ──────────────────────────────────────────────────────────────────

/// Run `func` over every input file under `root`, committing after each one.
///
/// Progress lines are written to `out` as the walk advances:
/// `"{n} files found in {root}"` once, then `"{i}/{n} files processed."` after
/// each commit. A failing file's statements are rolled back; `policy` decides
/// whether the walk then stops or continues.
pub fn process_data<G, F, W>(
  store: &mut G,
  root: impl AsRef<Path>,
  mut func: F,
  policy: ErrorPolicy,
  out: &mut W,
) -> Result<WalkReport>
where
  G: StoreGateway,
  F: FnMut(&mut G, &Path) -> Result<()>,
  W: Write,
{
  let root = root.as_ref();
  let files = discover(root)?;
  let total = files.len();

  let mut report = WalkReport {
    root:      root.to_path_buf(),
    found:     total,
    processed: 0,
    failed:    0,
  };

  progress(out, format_args!("{total} files found in {}", root.display()))?;
  info!(root = %root.display(), files = total, "input files discovered");

  for (i, file) in files.iter().enumerate() {
    let n = i + 1;
    let outcome = func(store, file.as_path())
      .and_then(|()| store.commit().map_err(Error::store));

    match outcome {
      Ok(()) => {
        report.processed += 1;
        progress(out, format_args!("{n}/{total} files processed."))?;
        info!(file = %file.display(), "{n}/{total} files processed");
      }
      Err(err) => {
        if let Err(rb) = store.rollback() {
          warn!(file = %file.display(), error = %rb, "rollback failed");
        }
        match policy {
          ErrorPolicy::Abort => return Err(err),
          ErrorPolicy::Skip => {
            report.failed += 1;
            progress(out, format_args!("{n}/{total} files failed: {err}"))?;
            warn!(file = %file.display(), error = %err, "skipping file");
          }
        }
      }
    }
  }

  Ok(report)
}

fn progress<W: Write>(out: &mut W, line: fmt::Arguments<'_>) -> Result<()> {
  writeln!(out, "{line}").map_err(Error::Progress)
}
