//! Build lifecycle.
//!
//! [`BuildPipeline`] exposes one method per stage, each running against a
//! [`BuildContext`]; a stage result converts into a [`BuildOutcome`] for the
//! process exit code. Stages with prerequisites (`package` needs `compile`,
//! `install` needs `package`) run them first and stop at the first failure,
//! so a failed compile never reaches the archiver.

mod types;


use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

pub use types::*;

use crate::compile::{CompileError, CompileSummary, ModuleCompiler};
use crate::config::ConfigSource;
use crate::consts::{LEGACY_BUILD_DIR, TARGET_DIR};
use crate::context::BuildContext;
use crate::repository::{LocalRepository, RepositoryError};
use crate::scan::SourceScanner;
use crate::testing::{self, TestReport, TestRunner};
use crate::toolchain::{
  InvokeError, InvokeOutput, Invoker, JAR_ENV, JAVA_ENV, JAVAC_ENV, check_toolchain_present, probe_version,
};
use crate::util::fs::remove_dir_if_exists;

/// Module names containing this marker are compiled by `compile-plugins`.
const PLUGIN_MARKER: &str = "plugin";

pub struct BuildPipeline<'a> {
  ctx: &'a BuildContext,
  invoker: &'a dyn Invoker,
}

impl<'a> BuildPipeline<'a> {
  pub fn new(ctx: &'a BuildContext, invoker: &'a dyn Invoker) -> Self {
    Self { ctx, invoker }
  }

  /// Remove `target/` and the legacy `build/` directory.
  pub fn clean(&self) -> Result<CleanReport, StageError> {
    let mut report = CleanReport::default();
    for dir in [TARGET_DIR, LEGACY_BUILD_DIR] {
      let path = self.ctx.project_root().join(dir);
      let removed = remove_dir_if_exists(&path).map_err(|source| StageError::Io {
        path: path.clone(),
        source,
      })?;
      if removed {
        info!(path = %path.display(), "removed");
        report.removed.push(path);
      }
    }
    Ok(report)
  }

  /// Compile all declared modules in order, or only `module`.
  pub fn compile(&self, module: Option<&str>) -> Result<CompileSummary, StageError> {
    let modules = match module {
      Some(name) => vec![name.to_string()],
      None => self.ctx.config().modules.clone(),
    };
    self.compile_modules(&modules)
  }

  /// Compile only the declared modules whose name marks them as plugins.
  pub fn compile_plugins(&self) -> Result<CompileSummary, StageError> {
    let plugins: Vec<String> = self
      .ctx
      .config()
      .modules
      .iter()
      .filter(|m| m.contains(PLUGIN_MARKER))
      .cloned()
      .collect();
    if plugins.is_empty() {
      return Err(StageError::NoPluginModules);
    }
    self.compile_modules(&plugins)
  }

  fn compile_modules(&self, modules: &[String]) -> Result<CompileSummary, StageError> {
    let toolchain = self.ctx.toolchain();
    self.require_compiler()?;
    self.create_output_dirs()?;

    let compiler = ModuleCompiler::new(self.invoker, toolchain, self.ctx.config());
    let output_dir = self.ctx.output_dir();
    let mut summary = CompileSummary::default();

    for module in modules {
      let result = compiler
        .compile_module(module, self.ctx.project_root(), &output_dir)
        .map_err(|e| match e {
          CompileError::OutputDir { path, source } => StageError::Io { path, source },
          CompileError::Invoke(e) => tool_error(e, JAVAC_ENV),
        })?;
      if result.failed {
        return Err(StageError::CompileFailure {
          module: result.module,
          output: result.tool_output,
        });
      }
      summary.record(result);
    }

    info!(
      attempted = summary.total_attempted,
      succeeded = summary.total_succeeded,
      "compile finished"
    );
    Ok(summary)
  }

  /// Compile and run the test classes of every module.
  pub fn test(&self) -> Result<TestRun, StageError> {
    if self.ctx.config().skip_tests {
      info!("tests skipped by configuration");
      return Ok(TestRun::Skipped);
    }

    let suites = testing::discover(self.ctx);
    if suites.is_empty() {
      info!("no test sources found");
      return Ok(TestRun::NoTests);
    }

    self.require_compiler()?;
    self.require_runtime()?;
    self.create_output_dirs()?;

    let runner = TestRunner::new(self.ctx, self.invoker);
    let mut report = TestReport::default();
    for suite in &suites {
      runner.compile_suite(suite)?;
      for result in runner.run_suite(suite)? {
        report.record(result);
      }
    }

    let report_path = runner.write_report(&report)?;
    info!(
      passed = report.passed,
      failed = report.failed,
      report = %report_path.display(),
      "tests finished"
    );

    if !report.is_success() {
      return Err(StageError::TestFailure {
        failing: report.failing(),
        report,
      });
    }
    Ok(TestRun::Completed { report, report_path })
  }

  /// Compile, then archive the shared output directory.
  pub fn package(&self) -> Result<PackageReport, StageError> {
    let compile = self.compile(None)?;

    let jars_dir = self.ctx.jars_dir();
    create_dir(&jars_dir)?;

    let toolchain = self.ctx.toolchain();
    let artifact = self.ctx.artifact_path();
    let main_class = self.ctx.config().main_class.as_deref();

    let mut command = vec![
      toolchain.jar.clone(),
      (if main_class.is_some() { "cfe" } else { "cf" }).to_string(),
      artifact.to_string_lossy().into_owned(),
    ];
    if let Some(main_class) = main_class {
      command.push(main_class.to_string());
    }
    command.extend([
      "-C".to_string(),
      self.ctx.output_dir().to_string_lossy().into_owned(),
      ".".to_string(),
    ]);

    let output = self.invoke_tool(&command, JAR_ENV)?;
    if !output.success() {
      return Err(StageError::PackagingFailure {
        artifact,
        output: output.diagnostics().to_string(),
      });
    }

    let size_bytes = fs::metadata(&artifact).map(|m| m.len()).ok();
    info!(artifact = %artifact.display(), "package created");
    Ok(PackageReport {
      compile,
      artifact,
      size_bytes,
    })
  }

  /// Package, then copy the archive into the local repository.
  pub fn install(&self) -> Result<InstallReport, StageError> {
    let package = self.package()?;
    let root = self.ctx.local_repository().ok_or(RepositoryError::NoLocation)?;
    let installed = LocalRepository::new(root).install(&package.artifact, self.ctx.config())?;
    Ok(InstallReport { package, installed })
  }

  /// Run the configured example main class against the compiled classes.
  pub fn run_example(&self) -> Result<ExampleReport, StageError> {
    self.require_runtime()?;

    let toolchain = self.ctx.toolchain();
    let config = self.ctx.config();
    let output_dir = self.ctx.output_dir();
    let mut entries: Vec<PathBuf> = vec![output_dir.clone()];
    entries.extend(config.modules.iter().map(|m| output_dir.join(m)));
    entries.push(PathBuf::from("."));

    let command = vec![
      toolchain.java.clone(),
      "-cp".to_string(),
      self.ctx.classpath(&entries),
      config.example_main_class.clone(),
    ];
    info!(main_class = %config.example_main_class, "running example");
    let output = self.invoke_tool(&command, JAVA_ENV)?;
    if !output.success() {
      return Err(StageError::ExampleFailure {
        main_class: config.example_main_class.clone(),
        code: output.exit_code,
        output: output.diagnostics().to_string(),
      });
    }

    Ok(ExampleReport {
      main_class: config.example_main_class.clone(),
      stdout: output.stdout,
      stderr: output.stderr,
    })
  }

  /// Describe the project and the state of each declared module.
  pub fn info(&self) -> ProjectInfo {
    let config = self.ctx.config();
    let scanner = SourceScanner::default();
    let modules = config
      .modules
      .iter()
      .map(|name| {
        let dir = self.ctx.module_dir(name);
        let found = dir.is_dir();
        let source_files = if found {
          scanner.scan(&dir.join(&config.source_directory)).len()
        } else {
          0
        };
        ModuleInfo {
          name: name.clone(),
          found,
          source_files,
        }
      })
      .collect();

    let config_file = match self.ctx.config_source() {
      ConfigSource::File(path) => Some(path.clone()),
      ConfigSource::Fallback(_) | ConfigSource::Default => None,
    };

    ProjectInfo {
      name: config.name.clone(),
      version: config.version.clone(),
      group_id: config.group_id.clone(),
      project_root: self.ctx.project_root().to_path_buf(),
      config_file,
      source_directory: config.source_directory.clone(),
      test_source_directory: config.test_source_directory.clone(),
      output_directory: config.output_directory.clone(),
      test_output_directory: config.test_output_directory.clone(),
      os: self.ctx.os().to_string(),
      modules,
    }
  }

  fn require_compiler(&self) -> Result<(), StageError> {
    let toolchain = self.ctx.toolchain();
    if check_toolchain_present(self.invoker, toolchain, self.ctx.project_root()) {
      Ok(())
    } else {
      Err(StageError::ToolchainMissing {
        program: toolchain.javac.clone(),
        env_var: JAVAC_ENV,
      })
    }
  }

  fn require_runtime(&self) -> Result<(), StageError> {
    let java = &self.ctx.toolchain().java;
    match probe_version(self.invoker, java, self.ctx.project_root()) {
      Some(_) => Ok(()),
      None => Err(StageError::ToolchainMissing {
        program: java.clone(),
        env_var: JAVA_ENV,
      }),
    }
  }

  fn invoke_tool(&self, command: &[String], env_var: &'static str) -> Result<InvokeOutput, StageError> {
    self
      .invoker
      .invoke(command, self.ctx.project_root())
      .map_err(|e| tool_error(e, env_var))
  }

  fn create_output_dirs(&self) -> Result<(), StageError> {
    for dir in [
      self.ctx.output_dir(),
      self.ctx.test_output_dir(),
      self.ctx.test_reports_dir(),
      self.ctx.jars_dir(),
    ] {
      create_dir(&dir)?;
    }
    Ok(())
  }
}

/// A tool that cannot be found is reported with its override variable.
fn tool_error(error: InvokeError, env_var: &'static str) -> StageError {
  match error {
    InvokeError::NotFound { program } => StageError::ToolchainMissing { program, env_var },
    other => StageError::Invoke(other),
  }
}

fn create_dir(path: &Path) -> Result<(), StageError> {
  fs::create_dir_all(path).map_err(|source| StageError::Io {
    path: path.to_path_buf(),
    source,
  })
}
