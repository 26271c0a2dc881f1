//! Immutable per-run build context.
//!
//! Holds everything that would otherwise be process-wide state: the project
//! root, the detected OS, the resolved configuration, the toolchain settings
//! and the local repository location. It is constructed once at startup and
//! passed by reference to every component.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::{self, ConfigError, ConfigSource, ProjectConfig};
use crate::consts::{ARCHIVE_EXTENSION, JARS_DIR, TEST_REPORTS_DIR};
use crate::platform::{self, Os, paths};
use crate::toolchain::Toolchain;

#[derive(Debug, Error)]
pub enum ContextError {
  #[error("project directory {} is not accessible: {source}", path.display())]
  ProjectRoot { path: PathBuf, source: std::io::Error },
}

#[derive(Debug)]
pub struct BuildContext {
  project_root: PathBuf,
  os: Os,
  config: ProjectConfig,
  config_source: ConfigSource,
  config_warning: Option<ConfigError>,
  toolchain: Toolchain,
  local_repository: Option<PathBuf>,
}

impl BuildContext {
  /// Resolve configuration for `project_root` and detect the platform.
  pub fn load(project_root: &Path, toolchain: Toolchain) -> Result<Self, ContextError> {
    let project_root = dunce::canonicalize(project_root).map_err(|source| ContextError::ProjectRoot {
      path: project_root.to_path_buf(),
      source,
    })?;

    let resolution = config::resolve_with_source(&project_root);
    let os = Os::current();
    debug!(root = %project_root.display(), os = %os, source = ?resolution.source, "build context loaded");

    let mut context = Self::new(project_root, os, resolution.config, toolchain);
    context.config_source = resolution.source;
    context.config_warning = resolution.warning;
    Ok(context)
  }

  /// Assemble a context from already-resolved parts.
  pub fn new(project_root: PathBuf, os: Os, config: ProjectConfig, toolchain: Toolchain) -> Self {
    let local_repository = match &config.local_repository {
      Some(dir) => Some(project_root.join(dir)),
      None => paths::local_repository_dir(),
    };
    Self {
      project_root,
      os,
      config,
      config_source: ConfigSource::Default,
      config_warning: None,
      toolchain,
      local_repository,
    }
  }

  pub fn project_root(&self) -> &Path {
    &self.project_root
  }

  pub fn os(&self) -> Os {
    self.os
  }

  pub fn config(&self) -> &ProjectConfig {
    &self.config
  }

  pub fn config_source(&self) -> &ConfigSource {
    &self.config_source
  }

  /// The reason a config file was rejected, if one was.
  pub fn config_warning(&self) -> Option<&ConfigError> {
    self.config_warning.as_ref()
  }

  pub fn toolchain(&self) -> &Toolchain {
    &self.toolchain
  }

  /// Root of the local artifact repository, `None` if no home directory is known.
  pub fn local_repository(&self) -> Option<&Path> {
    self.local_repository.as_deref()
  }

  pub fn with_local_repository(mut self, dir: PathBuf) -> Self {
    self.local_repository = Some(dir);
    self
  }

  pub fn module_dir(&self, module: &str) -> PathBuf {
    self.project_root.join(module)
  }

  /// Shared output directory all modules compile into.
  pub fn output_dir(&self) -> PathBuf {
    self.project_root.join(&self.config.output_directory)
  }

  pub fn test_output_dir(&self) -> PathBuf {
    self.project_root.join(&self.config.test_output_directory)
  }

  pub fn test_reports_dir(&self) -> PathBuf {
    self.project_root.join(TEST_REPORTS_DIR)
  }

  pub fn jars_dir(&self) -> PathBuf {
    self.project_root.join(JARS_DIR)
  }

  /// Where `package` writes the project archive.
  pub fn artifact_path(&self) -> PathBuf {
    self.jars_dir().join(self.config.artifact_name(ARCHIVE_EXTENSION))
  }

  /// Join classpath entries with this platform's separator.
  pub fn classpath<P: AsRef<Path>>(&self, entries: &[P]) -> String {
    platform::join_classpath(entries, self.os)
  }
}
