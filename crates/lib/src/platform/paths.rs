use std::path::PathBuf;

use crate::consts::APP_NAME;

/// Environment variable overriding the local artifact repository root.
pub const REPOSITORY_ENV: &str = "JBUILD_REPOSITORY";

/// Returns the user's home directory, if the environment names one
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory, if the environment names one
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the default local repository (`~/.jbuild/repository`).
///
/// `JBUILD_REPOSITORY` takes precedence over the home-based location.
pub fn local_repository_dir() -> Option<PathBuf> {
  if let Some(dir) = std::env::var_os(REPOSITORY_ENV).filter(|v| !v.is_empty()) {
    return Some(PathBuf::from(dir));
  }
  home_dir().map(|home| home.join(format!(".{}", APP_NAME)).join("repository"))
}

#[cfg(test)]
#[cfg(not(windows))]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn repository_env_takes_precedence() {
    temp_env::with_vars(
      [(REPOSITORY_ENV, Some("/custom/repo")), ("HOME", Some("/home/user"))],
      || {
        assert_eq!(local_repository_dir(), Some(PathBuf::from("/custom/repo")));
      },
    );
  }

  #[test]
  #[serial]
  fn repository_falls_back_to_home() {
    temp_env::with_vars([(REPOSITORY_ENV, None::<&str>), ("HOME", Some("/home/user"))], || {
      assert_eq!(
        local_repository_dir(),
        Some(PathBuf::from("/home/user/.jbuild/repository"))
      );
    });
  }

  #[test]
  #[serial]
  fn empty_repository_env_is_ignored() {
    temp_env::with_vars([(REPOSITORY_ENV, Some("")), ("HOME", Some("/home/user"))], || {
      assert_eq!(
        local_repository_dir(),
        Some(PathBuf::from("/home/user/.jbuild/repository"))
      );
    });
  }

  #[test]
  #[serial]
  fn no_home_means_no_repository() {
    temp_env::with_vars([(REPOSITORY_ENV, None::<&str>), ("HOME", None::<&str>)], || {
      assert_eq!(local_repository_dir(), None);
    });
  }
}
