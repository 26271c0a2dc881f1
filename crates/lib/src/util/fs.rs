//! Filesystem helpers.

use std::fs;
use std::io;
use std::path::Path;

/// Remove `path` recursively. Returns `false` if it did not exist.
pub fn remove_dir_if_exists(path: &Path) -> io::Result<bool> {
  match fs::remove_dir_all(path) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(e),
  }
}

/// Write `content` to `path` via a temp file and rename, so readers never
/// observe a partially written file.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
  let file_name = path
    .file_name()
    .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
  let temp_path = path.with_file_name(format!("{}.tmp", file_name.to_string_lossy()));
  fs::write(&temp_path, content)?;
  fs::rename(&temp_path, path)
}

/// Copy `from` to `to` via a temp file and rename.
pub fn copy_atomic(from: &Path, to: &Path) -> io::Result<u64> {
  let file_name = to
    .file_name()
    .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
  let temp_path = to.with_file_name(format!("{}.tmp", file_name.to_string_lossy()));
  let bytes = fs::copy(from, &temp_path)?;
  fs::rename(&temp_path, to)?;
  Ok(bytes)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn remove_missing_dir_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    assert!(!remove_dir_if_exists(&temp.path().join("absent")).unwrap());
  }

  #[test]
  fn remove_existing_dir_recursively() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("target/classes/pkg");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("A.class"), b"cafebabe").unwrap();

    assert!(remove_dir_if_exists(&temp.path().join("target")).unwrap());
    assert!(!temp.path().join("target").exists());
  }

  #[test]
  fn write_atomic_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("report.json");

    write_atomic(&path, b"{}").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    assert!(!temp.path().join("report.json.tmp").exists());
  }

  #[test]
  fn copy_atomic_copies_content() {
    let temp = TempDir::new().unwrap();
    let from = temp.path().join("a.jar");
    let to = temp.path().join("b.jar");
    fs::write(&from, b"PK").unwrap();

    assert_eq!(copy_atomic(&from, &to).unwrap(), 2);
    assert_eq!(fs::read(&to).unwrap(), b"PK");
  }
}
