use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::compile::CompileSummary;
use crate::repository::{InstalledArtifact, RepositoryError};
use crate::testing::TestReport;
use crate::toolchain::InvokeError;

#[derive(Debug, Error)]
pub enum StageError {
  #[error("{program} is not available; install a Java Development Kit (JDK) and add it to PATH, or set {env_var}")]
  ToolchainMissing { program: String, env_var: &'static str },

  #[error("compilation failed in module {module}\n{output}")]
  CompileFailure { module: String, output: String },

  #[error("test compilation failed in module {module}\n{output}")]
  TestCompileFailure { module: String, output: String },

  #[error("{} test(s) failed: {}", failing.len(), failing.join(", "))]
  TestFailure {
    failing: Vec<String>,
    /// Every executed test, including the passing ones.
    report: TestReport,
  },

  #[error("failed to create {}\n{output}", artifact.display())]
  PackagingFailure { artifact: PathBuf, output: String },

  #[error("install failed: {0}")]
  InstallFailure(#[from] RepositoryError),

  #[error("example {main_class} exited with code {}\n{output}", code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
  ExampleFailure {
    main_class: String,
    code: Option<i32>,
    output: String,
  },

  #[error("no plugin modules declared; module names must contain \"plugin\"")]
  NoPluginModules,

  #[error("I/O error on {}: {source}", path.display())]
  Io { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Invoke(#[from] InvokeError),

  #[error("failed to write report: {0}")]
  Report(#[from] serde_json::Error),
}

/// Terminal result of a run, mapped to the process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
  Success,
  Failure(String),
}

impl BuildOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, BuildOutcome::Success)
  }

  pub fn exit_code(&self) -> i32 {
    match self {
      BuildOutcome::Success => 0,
      BuildOutcome::Failure(_) => 1,
    }
  }
}

impl<T> From<Result<T, StageError>> for BuildOutcome {
  fn from(result: Result<T, StageError>) -> Self {
    match result {
      Ok(_) => BuildOutcome::Success,
      Err(e) => BuildOutcome::Failure(e.to_string()),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
  /// Directories that existed and were removed.
  pub removed: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestRun {
  /// `skipTests` is set.
  Skipped,
  /// No module has test sources.
  NoTests,
  Completed { report: TestReport, report_path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
  pub compile: CompileSummary,
  pub artifact: PathBuf,
  pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
  pub package: PackageReport,
  pub installed: InstalledArtifact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleReport {
  pub main_class: String,
  pub stdout: String,
  pub stderr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
  pub name: String,
  pub found: bool,
  pub source_files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
  pub name: String,
  pub version: String,
  pub group_id: String,
  pub project_root: PathBuf,
  pub config_file: Option<PathBuf>,
  pub source_directory: String,
  pub test_source_directory: String,
  pub output_directory: String,
  pub test_output_directory: String,
  pub os: String,
  pub modules: Vec<ModuleInfo>,
}
