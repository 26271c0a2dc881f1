//! Source file discovery.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::consts::SOURCE_EXTENSION;

/// Sorted list of source files found under one or more roots.
pub type SourceSet = Vec<PathBuf>;

/// Recursively collects files with a given extension.
#[derive(Debug, Clone, Copy)]
pub struct SourceScanner {
  extension: &'static str,
}

impl Default for SourceScanner {
  fn default() -> Self {
    Self::new(SOURCE_EXTENSION)
  }
}

impl SourceScanner {
  pub fn new(extension: &'static str) -> Self {
    Self { extension }
  }

  /// List every matching file under `directory`, sorted lexicographically.
  ///
  /// A missing directory yields an empty set. Entries that cannot be read
  /// are skipped.
  pub fn scan(&self, directory: &Path) -> SourceSet {
    if !directory.is_dir() {
      return Vec::new();
    }

    let mut files: SourceSet = WalkDir::new(directory)
      .follow_links(true)
      .into_iter()
      .filter_map(|entry| match entry {
        Ok(entry) => Some(entry),
        Err(e) => {
          debug!(error = %e, "skipping unreadable entry");
          None
        }
      })
      .filter(|entry| entry.file_type().is_file())
      .filter(|entry| entry.path().extension().is_some_and(|ext| ext == OsStr::new(self.extension)))
      .map(|entry| entry.into_path())
      .collect();

    files.sort();
    files.dedup();
    files
  }

  /// Scan several roots and concatenate the results in root order.
  pub fn scan_all<P: AsRef<Path>>(&self, directories: &[P]) -> SourceSet {
    let mut files = SourceSet::new();
    for dir in directories {
      for file in self.scan(dir.as_ref()) {
        if !files.contains(&file) {
          files.push(file);
        }
      }
    }
    files
  }
}
