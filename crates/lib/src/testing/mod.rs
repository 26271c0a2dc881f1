//! Test discovery, compilation and execution.
//!
//! All sources under a module's test source root are compiled into the test
//! output directory against the main classes. Only classes named like tests
//! (`Test*`, `*Test`, `*Tests`, `*TestCase`) are then executed with the Java
//! runtime: exit code 0 is a pass, anything else a failure. Results are
//! collected per test and written to `target/test-reports/test-report.json`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::compile::javac_command;
use crate::consts::{TEST_CLASS_PREFIXES, TEST_CLASS_SUFFIXES, TEST_REPORT_FILENAME};
use crate::context::BuildContext;
use crate::pipeline::StageError;
use crate::scan::{SourceScanner, SourceSet};
use crate::toolchain::{InvokeError, Invoker};
use crate::util::fs::write_atomic;

/// Test sources of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSuite {
  pub module: String,
  pub root: PathBuf,
  pub sources: SourceSet,
}

impl TestSuite {
  /// Fully qualified names of the classes to execute as tests.
  ///
  /// Support classes in the test tree are left out.
  pub fn class_names(&self) -> Vec<String> {
    self
      .sources
      .iter()
      .filter_map(|source| class_name(&self.root, source))
      .filter(|class| is_test_class(class))
      .collect()
  }
}

/// Whether the simple name of `class` follows the test naming conventions.
pub fn is_test_class(class: &str) -> bool {
  let simple = class.rsplit('.').next().unwrap_or(class);
  TEST_CLASS_PREFIXES.iter().any(|prefix| simple.starts_with(prefix))
    || TEST_CLASS_SUFFIXES.iter().any(|suffix| simple.ends_with(suffix))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
  Passed,
  Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
  pub module: String,
  pub class_name: String,
  pub status: TestStatus,
  pub duration_ms: u64,
  pub output: String,
}

impl TestCaseResult {
  /// `module:class` label used in failure listings.
  pub fn label(&self) -> String {
    format!("{}:{}", self.module, self.class_name)
  }
}

/// Aggregate of every executed test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
  pub passed: usize,
  pub failed: usize,
  pub tests: Vec<TestCaseResult>,
}

impl TestReport {
  pub fn record(&mut self, result: TestCaseResult) {
    match result.status {
      TestStatus::Passed => self.passed += 1,
      TestStatus::Failed => self.failed += 1,
    }
    self.tests.push(result);
  }

  pub fn total(&self) -> usize {
    self.tests.len()
  }

  pub fn is_success(&self) -> bool {
    self.failed == 0
  }

  /// Labels of failed tests in execution order.
  pub fn failing(&self) -> Vec<String> {
    self
      .tests
      .iter()
      .filter(|t| t.status == TestStatus::Failed)
      .map(TestCaseResult::label)
      .collect()
  }
}

/// Derive `com.acme.FooTest` from `<root>/com/acme/FooTest.java`.
pub fn class_name(test_root: &Path, source: &Path) -> Option<String> {
  let relative = source.strip_prefix(test_root).ok()?;
  let stem = relative.file_stem()?.to_str()?;
  let mut parts: Vec<&str> = match relative.parent() {
    Some(parent) => parent
      .components()
      .map(|c| c.as_os_str().to_str())
      .collect::<Option<Vec<_>>>()?,
    None => Vec::new(),
  };
  parts.push(stem);
  Some(parts.join("."))
}

/// Find the test suites of all declared modules, in declaration order.
///
/// Modules without test sources are left out.
pub fn discover(ctx: &BuildContext) -> Vec<TestSuite> {
  let scanner = SourceScanner::default();
  ctx
    .config()
    .modules
    .iter()
    .filter_map(|module| {
      let root = ctx.module_dir(module).join(&ctx.config().test_source_directory);
      let sources = scanner.scan(&root);
      (!sources.is_empty()).then(|| TestSuite {
        module: module.clone(),
        root,
        sources,
      })
    })
    .collect()
}

/// Compiles and runs test suites through an [`Invoker`].
pub struct TestRunner<'a> {
  ctx: &'a BuildContext,
  invoker: &'a dyn Invoker,
}

impl<'a> TestRunner<'a> {
  pub fn new(ctx: &'a BuildContext, invoker: &'a dyn Invoker) -> Self {
    Self { ctx, invoker }
  }

  fn test_classpath(&self) -> String {
    self.ctx.classpath(&[self.ctx.output_dir(), self.ctx.test_output_dir()])
  }

  /// Compile a suite into the test output directory.
  pub fn compile_suite(&self, suite: &TestSuite) -> Result<(), StageError> {
    info!(module = %suite.module, files = suite.sources.len(), "compiling tests");
    let command = javac_command(
      self.ctx.toolchain(),
      &self.test_classpath(),
      &self.ctx.test_output_dir(),
      &suite.sources,
    );
    let output = self.invoker.invoke(&command, self.ctx.project_root())?;
    if !output.success() {
      return Err(StageError::TestCompileFailure {
        module: suite.module.clone(),
        output: output.diagnostics().to_string(),
      });
    }
    Ok(())
  }

  /// Run every test class of a compiled suite.
  ///
  /// A test that exceeds the toolchain timeout counts as failed; a runtime
  /// that cannot be started aborts the run.
  pub fn run_suite(&self, suite: &TestSuite) -> Result<Vec<TestCaseResult>, StageError> {
    let classpath = self.test_classpath();
    let mut results = Vec::with_capacity(suite.sources.len());

    for class in suite.class_names() {
      let command = vec![
        self.ctx.toolchain().java.clone(),
        "-cp".to_string(),
        classpath.clone(),
        class.clone(),
      ];

      let start = Instant::now();
      let (status, output) = match self.invoker.invoke(&command, self.ctx.project_root()) {
        Ok(output) if output.success() => (TestStatus::Passed, output.stdout.trim().to_string()),
        Ok(output) => (TestStatus::Failed, output.diagnostics().to_string()),
        Err(e @ InvokeError::TimedOut { .. }) => (TestStatus::Failed, e.to_string()),
        Err(e) => return Err(e.into()),
      };
      let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

      match status {
        TestStatus::Passed => info!(module = %suite.module, class = %class, duration_ms, "test passed"),
        TestStatus::Failed => warn!(module = %suite.module, class = %class, duration_ms, "test failed"),
      }

      results.push(TestCaseResult {
        module: suite.module.clone(),
        class_name: class,
        status,
        duration_ms,
        output,
      });
    }

    Ok(results)
  }

  /// Write the report as JSON into the test reports directory.
  pub fn write_report(&self, report: &TestReport) -> Result<PathBuf, StageError> {
    let dir = self.ctx.test_reports_dir();
    std::fs::create_dir_all(&dir).map_err(|source| StageError::Io {
      path: dir.clone(),
      source,
    })?;

    let path = dir.join(TEST_REPORT_FILENAME);
    let content = serde_json::to_string_pretty(report)?;
    write_atomic(&path, content.as_bytes()).map_err(|source| StageError::Io {
      path: path.clone(),
      source,
    })?;
    Ok(path)
  }
}
