//! Project configuration discovery.
//!
//! The resolver probes `jbuild.xml`, `build.json` and `.jbuild.json` at the
//! project root and parses the first one that exists. Any problem with that
//! file is downgraded to a warning and the fixed default configuration is
//! used instead, so resolution never aborts a build.

mod types;
mod xml;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::consts::CONFIG_CANDIDATES;

pub use types::{ConfigError, ProjectConfig, defaults};
pub use xml::parse_project_xml;

/// Where the resolved configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
  /// Parsed from this file.
  File(PathBuf),
  /// This file exists but could not be used; defaults were substituted.
  Fallback(PathBuf),
  /// No config file exists.
  Default,
}

/// Outcome of configuration resolution.
#[derive(Debug)]
pub struct Resolution {
  pub config: ProjectConfig,
  pub source: ConfigSource,
  /// Set when a config file was found but rejected.
  pub warning: Option<ConfigError>,
}

/// Resolve the project configuration for `project_root`.
pub fn resolve(project_root: &Path) -> ProjectConfig {
  resolve_with_source(project_root).config
}

/// Resolve the project configuration, reporting where it came from.
pub fn resolve_with_source(project_root: &Path) -> Resolution {
  let Some(path) = find_config_file(project_root) else {
    debug!(root = %project_root.display(), "no config file found, using defaults");
    return Resolution {
      config: ProjectConfig::default(),
      source: ConfigSource::Default,
      warning: None,
    };
  };

  match parse_config_file(&path) {
    Ok(config) => {
      debug!(path = %path.display(), "loaded project config");
      Resolution {
        config,
        source: ConfigSource::File(path),
        warning: None,
      }
    }
    Err(e) => {
      warn!(path = %path.display(), error = %e, "failed to parse config file, using defaults");
      Resolution {
        config: ProjectConfig::default(),
        source: ConfigSource::Fallback(path),
        warning: Some(e),
      }
    }
  }
}

/// Return the first config candidate that exists under `project_root`.
pub fn find_config_file(project_root: &Path) -> Option<PathBuf> {
  CONFIG_CANDIDATES
    .iter()
    .map(|name| project_root.join(name))
    .find(|path| path.is_file())
}

/// Parse a config file according to its extension and validate it.
pub fn parse_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
  let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let config = match path.extension().and_then(|e| e.to_str()) {
    Some("json") => serde_json::from_str::<ProjectConfig>(&content).map_err(|source| ConfigError::Json {
      path: path.to_path_buf(),
      source,
    })?,
    Some("xml") => parse_project_xml(&content, path)?,
    _ => {
      return Err(ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
      });
    }
  };

  config.validate(path)?;
  Ok(config)
}
