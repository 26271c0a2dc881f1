//! Per-module compilation.
//!
//! Each module is compiled with a single compiler invocation whose classpath
//! and output directory are both the shared output directory, so a module can
//! reference classes compiled by the modules declared before it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ProjectConfig;
use crate::consts::SOURCE_ENCODING;
use crate::scan::{SourceScanner, SourceSet};
use crate::toolchain::{InvokeError, Invoker, Toolchain};

/// Errors that stop a module from being compiled at all.
#[derive(Debug, Error)]
pub enum CompileError {
  #[error("failed to create module output directory {}: {source}", path.display())]
  OutputDir { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Invoke(#[from] InvokeError),
}

/// Why a module was not handed to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
  /// `<root>/<module>` does not exist.
  NotFound,
  /// The module has no source files.
  NoSources,
}

/// Outcome of compiling one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileResult {
  pub module: String,
  pub files_attempted: usize,
  pub files_succeeded: usize,
  /// Compiler diagnostics; empty when the compiler was silent or not run.
  pub tool_output: String,
  pub failed: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub skipped: Option<SkipReason>,
}

impl CompileResult {
  fn skipped(module: &str, reason: SkipReason) -> Self {
    Self {
      module: module.to_string(),
      files_attempted: 0,
      files_succeeded: 0,
      tool_output: String::new(),
      failed: false,
      skipped: Some(reason),
    }
  }
}

/// Totals across all modules of a compile stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileSummary {
  pub total_attempted: usize,
  pub total_succeeded: usize,
  pub modules: Vec<CompileResult>,
}

impl CompileSummary {
  pub fn record(&mut self, result: CompileResult) {
    self.total_attempted += result.files_attempted;
    self.total_succeeded += result.files_succeeded;
    self.modules.push(result);
  }

  pub fn is_success(&self) -> bool {
    self.total_attempted == self.total_succeeded && self.modules.iter().all(|m| !m.failed)
  }

  /// Modules that were handed to the compiler.
  pub fn compiled_modules(&self) -> impl Iterator<Item = &CompileResult> {
    self.modules.iter().filter(|m| m.skipped.is_none())
  }
}

/// Build the compiler argv for `sources`.
pub fn javac_command(toolchain: &Toolchain, classpath: &str, output_dir: &Path, sources: &[PathBuf]) -> Vec<String> {
  let mut command = vec![
    toolchain.javac.clone(),
    "-encoding".to_string(),
    SOURCE_ENCODING.to_string(),
    "-cp".to_string(),
    classpath.to_string(),
    "-d".to_string(),
    output_dir.to_string_lossy().into_owned(),
  ];
  command.extend(sources.iter().map(|p| p.to_string_lossy().into_owned()));
  command
}

/// Compiles modules one at a time through an [`Invoker`].
pub struct ModuleCompiler<'a> {
  invoker: &'a dyn Invoker,
  toolchain: &'a Toolchain,
  config: &'a ProjectConfig,
  scanner: SourceScanner,
}

impl<'a> ModuleCompiler<'a> {
  pub fn new(invoker: &'a dyn Invoker, toolchain: &'a Toolchain, config: &'a ProjectConfig) -> Self {
    Self {
      invoker,
      toolchain,
      config,
      scanner: SourceScanner::default(),
    }
  }

  /// Main source root followed by the resource root of a module.
  pub fn source_roots(&self, module_dir: &Path) -> Vec<PathBuf> {
    vec![
      module_dir.join(&self.config.source_directory),
      module_dir.join(&self.config.resource_directory),
    ]
  }

  /// Discover the sources of a module without compiling them.
  pub fn module_sources(&self, module_dir: &Path) -> SourceSet {
    self.scanner.scan_all(&self.source_roots(module_dir))
  }

  /// Compile one module into `shared_output_dir`.
  ///
  /// A missing module or one without sources is skipped without invoking the
  /// compiler. A non-zero compiler exit yields a result with `failed` set;
  /// an output directory that cannot be created or a compiler that cannot be
  /// run at all is an `Err`.
  pub fn compile_module(
    &self,
    module: &str,
    project_root: &Path,
    shared_output_dir: &Path,
  ) -> Result<CompileResult, CompileError> {
    let module_dir = project_root.join(module);
    if !module_dir.is_dir() {
      warn!(module = %module, path = %module_dir.display(), "module not found, skipping");
      return Ok(CompileResult::skipped(module, SkipReason::NotFound));
    }

    let sources = self.module_sources(&module_dir);
    if sources.is_empty() {
      info!(module = %module, "no sources, skipping");
      return Ok(CompileResult::skipped(module, SkipReason::NoSources));
    }

    let module_output = shared_output_dir.join(module);
    fs::create_dir_all(&module_output).map_err(|source| CompileError::OutputDir {
      path: module_output.clone(),
      source,
    })?;

    info!(module = %module, files = sources.len(), "compiling module");
    let classpath = shared_output_dir.to_string_lossy();
    let command = javac_command(self.toolchain, &classpath, shared_output_dir, &sources);
    let output = self.invoker.invoke(&command, project_root)?;

    let attempted = sources.len();
    if output.success() {
      Ok(CompileResult {
        module: module.to_string(),
        files_attempted: attempted,
        files_succeeded: attempted,
        tool_output: output.diagnostics().to_string(),
        failed: false,
        skipped: None,
      })
    } else {
      warn!(module = %module, code = ?output.exit_code, "compilation failed");
      Ok(CompileResult {
        module: module.to_string(),
        files_attempted: attempted,
        files_succeeded: 0,
        tool_output: output.diagnostics().to_string(),
        failed: true,
        skipped: None,
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::{FakeInvoker, Response};
  use tempfile::TempDir;

  fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "class X {}").unwrap();
    path
  }

  fn setup() -> (TempDir, ProjectConfig, Toolchain) {
    (TempDir::new().unwrap(), ProjectConfig::default(), Toolchain::default())
  }

  #[test]
  fn missing_module_is_skipped_without_invocation() {
    let (temp, config, toolchain) = setup();
    let invoker = FakeInvoker::new();
    let compiler = ModuleCompiler::new(&invoker, &toolchain, &config);

    let result = compiler
      .compile_module("ghost", temp.path(), &temp.path().join("target/classes"))
      .unwrap();

    assert_eq!(result.skipped, Some(SkipReason::NotFound));
    assert_eq!((result.files_attempted, result.files_succeeded, result.failed), (0, 0, false));
    assert!(invoker.calls().is_empty());
  }

  #[test]
  fn module_without_sources_is_skipped_without_invocation() {
    let (temp, config, toolchain) = setup();
    fs::create_dir_all(temp.path().join("empty/src/main/java")).unwrap();
    let invoker = FakeInvoker::new();
    let compiler = ModuleCompiler::new(&invoker, &toolchain, &config);

    let result = compiler
      .compile_module("empty", temp.path(), &temp.path().join("target/classes"))
      .unwrap();

    assert_eq!(result.skipped, Some(SkipReason::NoSources));
    assert_eq!((result.files_attempted, result.files_succeeded, result.failed), (0, 0, false));
    assert!(invoker.calls().is_empty());
  }

  #[test]
  fn compiles_main_and_resource_sources_in_one_invocation() {
    let (temp, config, toolchain) = setup();
    let a = touch(temp.path(), "core/src/main/java/com/acme/A.java");
    let b = touch(temp.path(), "core/src/main/java/com/acme/B.java");
    let r = touch(temp.path(), "core/src/main/resources/Gen.java");
    touch(temp.path(), "core/src/main/resources/app.properties");
    let out = temp.path().join("target/classes");
    let invoker = FakeInvoker::new();
    let compiler = ModuleCompiler::new(&invoker, &toolchain, &config);

    let result = compiler.compile_module("core", temp.path(), &out).unwrap();

    assert_eq!((result.files_attempted, result.files_succeeded), (3, 3));
    assert!(!result.failed);
    assert!(out.join("core").is_dir());

    let out_str = out.to_string_lossy().into_owned();
    let expected: Vec<String> = [
      "javac",
      "-encoding",
      "UTF-8",
      "-cp",
      out_str.as_str(),
      "-d",
      out_str.as_str(),
    ]
    .iter()
    .map(|s| s.to_string())
    .chain([a, b, r].iter().map(|p| p.to_string_lossy().into_owned()))
    .collect();
    assert_eq!(invoker.calls(), vec![expected]);
  }

  #[test]
  fn compiler_failure_marks_result_failed() {
    let (temp, config, toolchain) = setup();
    touch(temp.path(), "core/src/main/java/A.java");
    let invoker = FakeInvoker::new().on_program("javac", Response::exit(1, "A.java:1: error: ';' expected"));
    let compiler = ModuleCompiler::new(&invoker, &toolchain, &config);

    let result = compiler
      .compile_module("core", temp.path(), &temp.path().join("target/classes"))
      .unwrap();

    assert!(result.failed);
    assert_eq!((result.files_attempted, result.files_succeeded), (1, 0));
    assert!(result.tool_output.contains("';' expected"));
  }

  #[test]
  fn missing_compiler_is_an_error() {
    let (temp, config, toolchain) = setup();
    touch(temp.path(), "core/src/main/java/A.java");
    let invoker = FakeInvoker::new().on_program("javac", Response::NotFound);
    let compiler = ModuleCompiler::new(&invoker, &toolchain, &config);

    let err = compiler
      .compile_module("core", temp.path(), &temp.path().join("target/classes"))
      .unwrap_err();

    assert!(matches!(err, CompileError::Invoke(InvokeError::NotFound { .. })));
  }

  #[test]
  fn unwritable_module_output_is_an_error_before_invocation() {
    let (temp, config, toolchain) = setup();
    touch(temp.path(), "core/src/main/java/A.java");
    let out = temp.path().join("target/classes");
    // a plain file where the module output directory should go
    touch(temp.path(), "target/classes/core");
    let invoker = FakeInvoker::new();
    let compiler = ModuleCompiler::new(&invoker, &toolchain, &config);

    let err = compiler.compile_module("core", temp.path(), &out).unwrap_err();

    assert!(matches!(err, CompileError::OutputDir { ref path, .. } if path == &out.join("core")));
    assert!(invoker.calls().is_empty());
  }

  #[test]
  fn custom_source_directory_is_honoured() {
    let (temp, mut config, toolchain) = setup();
    config.source_directory = "java".to_string();
    touch(temp.path(), "core/java/A.java");
    touch(temp.path(), "core/src/main/java/Ignored.java");
    let invoker = FakeInvoker::new();
    let compiler = ModuleCompiler::new(&invoker, &toolchain, &config);

    let result = compiler
      .compile_module("core", temp.path(), &temp.path().join("target/classes"))
      .unwrap();

    assert_eq!(result.files_attempted, 1);
  }

  #[test]
  fn summary_totals_and_success() {
    let mut summary = CompileSummary::default();
    summary.record(CompileResult::skipped("a", SkipReason::NotFound));
    summary.record(CompileResult {
      module: "b".to_string(),
      files_attempted: 4,
      files_succeeded: 4,
      tool_output: String::new(),
      failed: false,
      skipped: None,
    });

    assert_eq!((summary.total_attempted, summary.total_succeeded), (4, 4));
    assert!(summary.is_success());
    assert_eq!(summary.compiled_modules().count(), 1);
  }

  #[test]
  fn empty_summary_is_success() {
    assert!(CompileSummary::default().is_success());
  }
}
