//! Project configuration types.
//!
//! `ProjectConfig` is built once per run by the resolver and never mutated
//! afterwards. Every field has a fixed default so that a project without a
//! config file (or with a broken one) still builds deterministically.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed default values used when a field (or the whole file) is missing.
pub mod defaults {
  pub const NAME: &str = "jbuild-project";
  pub const VERSION: &str = "1.0.0";
  pub const GROUP_ID: &str = "com.jbuild";
  pub const SOURCE_DIRECTORY: &str = "src/main/java";
  pub const TEST_SOURCE_DIRECTORY: &str = "src/test/java";
  pub const RESOURCE_DIRECTORY: &str = "src/main/resources";
  pub const OUTPUT_DIRECTORY: &str = "target/classes";
  pub const TEST_OUTPUT_DIRECTORY: &str = "target/test-classes";
  pub const EXAMPLE_MAIN_CLASS: &str = "com.jbuild.plugins.examples.PluginSystemExample";
  pub const MODULES: [&str; 3] = ["jbuild-plugin-api", "jbuild-plugin-system", "jbuild-plugin-examples"];

  pub(super) fn name() -> String {
    NAME.to_string()
  }

  pub(super) fn version() -> String {
    VERSION.to_string()
  }

  pub(super) fn group_id() -> String {
    GROUP_ID.to_string()
  }

  pub(super) fn source_directory() -> String {
    SOURCE_DIRECTORY.to_string()
  }

  pub(super) fn test_source_directory() -> String {
    TEST_SOURCE_DIRECTORY.to_string()
  }

  pub(super) fn resource_directory() -> String {
    RESOURCE_DIRECTORY.to_string()
  }

  pub(super) fn output_directory() -> String {
    OUTPUT_DIRECTORY.to_string()
  }

  pub(super) fn test_output_directory() -> String {
    TEST_OUTPUT_DIRECTORY.to_string()
  }

  pub(super) fn example_main_class() -> String {
    EXAMPLE_MAIN_CLASS.to_string()
  }
}

/// Resolved project configuration.
///
/// Keys in config files are camelCase (`sourceDirectory`, `testOutputDirectory`, ...).
/// A key missing from a file takes its default value, except `modules`, which
/// defaults to an empty list when a file is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
  #[serde(default = "defaults::name")]
  pub name: String,
  #[serde(default = "defaults::version")]
  pub version: String,
  #[serde(default = "defaults::group_id")]
  pub group_id: String,
  #[serde(default = "defaults::source_directory")]
  pub source_directory: String,
  #[serde(default = "defaults::test_source_directory")]
  pub test_source_directory: String,
  #[serde(default = "defaults::resource_directory")]
  pub resource_directory: String,
  #[serde(default = "defaults::output_directory")]
  pub output_directory: String,
  #[serde(default = "defaults::test_output_directory")]
  pub test_output_directory: String,
  /// Module names in compile order.
  #[serde(default)]
  pub modules: Vec<String>,
  /// Entry point recorded in the jar manifest, if any.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub main_class: Option<String>,
  #[serde(default = "defaults::example_main_class")]
  pub example_main_class: String,
  #[serde(default)]
  pub skip_tests: bool,
  /// Overrides the local repository root used by `install`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub local_repository: Option<PathBuf>,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      name: defaults::name(),
      version: defaults::version(),
      group_id: defaults::group_id(),
      source_directory: defaults::source_directory(),
      test_source_directory: defaults::test_source_directory(),
      resource_directory: defaults::resource_directory(),
      output_directory: defaults::output_directory(),
      test_output_directory: defaults::test_output_directory(),
      modules: defaults::MODULES.iter().map(|m| m.to_string()).collect(),
      main_class: None,
      example_main_class: defaults::example_main_class(),
      skip_tests: false,
      local_repository: None,
    }
  }
}

impl ProjectConfig {
  /// Defaults for every field but with no modules declared.
  ///
  /// Used as the starting point when a config file is present.
  pub(crate) fn file_base() -> Self {
    Self {
      modules: Vec::new(),
      ..Self::default()
    }
  }

  /// Artifact file name, e.g. `jbuild-project-1.0.0.jar`.
  pub fn artifact_name(&self, extension: &str) -> String {
    format!("{}-{}.{}", self.name, self.version, extension)
  }

  /// Check the non-empty invariants.
  pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
    let required = [
      ("name", &self.name),
      ("version", &self.version),
      ("groupId", &self.group_id),
      ("sourceDirectory", &self.source_directory),
      ("testSourceDirectory", &self.test_source_directory),
      ("resourceDirectory", &self.resource_directory),
      ("outputDirectory", &self.output_directory),
      ("testOutputDirectory", &self.test_output_directory),
      ("exampleMainClass", &self.example_main_class),
    ];
    for (field, value) in required {
      if value.trim().is_empty() {
        return Err(ConfigError::EmptyField {
          path: path.to_path_buf(),
          field,
        });
      }
    }
    if self.modules.iter().any(|m| m.trim().is_empty()) {
      return Err(ConfigError::EmptyField {
        path: path.to_path_buf(),
        field: "modules",
      });
    }
    Ok(())
  }
}

/// Reasons a config file could not be used. All of them are non-fatal:
/// the resolver falls back to `ProjectConfig::default()`.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("invalid JSON in {}: {source}", path.display())]
  Json { path: PathBuf, source: serde_json::Error },

  #[error("invalid XML in {}: {message}", path.display())]
  Xml { path: PathBuf, message: String },

  #[error("field `{field}` in {} must not be empty", path.display())]
  EmptyField { path: PathBuf, field: &'static str },

  #[error("unsupported config format: {}", path.display())]
  UnsupportedFormat { path: PathBuf },
}
