//! External toolchain invocation.
//!
//! Every compiler, archiver and runtime call goes through the [`Invoker`]
//! trait so pipeline logic can run against a scripted invoker in tests. A
//! non-zero exit code is a normal, reportable outcome; `InvokeError` is
//! reserved for commands that could not be run at all.

mod process;
mod settings;

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

pub use process::ProcessInvoker;
pub use settings::{JAR_ENV, JAVA_ENV, JAVAC_ENV, SettingsError, TIMEOUT_ENV, Toolchain};

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokeOutput {
  /// Exit code, `None` if the process was terminated by a signal.
  pub exit_code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl InvokeOutput {
  pub fn success(&self) -> bool {
    self.exit_code == Some(0)
  }

  /// The most useful text to show when the tool reported a problem.
  pub fn diagnostics(&self) -> &str {
    let stderr = self.stderr.trim();
    if stderr.is_empty() { self.stdout.trim() } else { stderr }
  }
}

/// Errors that prevent a command from running to completion.
#[derive(Debug, Error)]
pub enum InvokeError {
  #[error("empty command")]
  EmptyCommand,

  #[error("executable not found: {program}")]
  NotFound { program: String },

  #[error("failed to start {program}: {source}")]
  Spawn { program: String, source: std::io::Error },

  #[error("working directory does not exist: {}", path.display())]
  WorkingDir { path: PathBuf },

  #[error("{program} timed out after {}", humantime::format_duration(*timeout))]
  TimedOut { program: String, timeout: Duration },

  #[error("failed to create process runtime: {0}")]
  Runtime(#[source] std::io::Error),
}

/// Runs external commands.
pub trait Invoker {
  /// Run `command` (program followed by its arguments) in `working_dir` and
  /// wait for it to finish.
  fn invoke(&self, command: &[String], working_dir: &Path) -> Result<InvokeOutput, InvokeError>;
}

/// Run `<program> -version` and return the reported version line.
///
/// Returns `None` if the program cannot be started or exits non-zero.
pub fn probe_version(invoker: &dyn Invoker, program: &str, working_dir: &Path) -> Option<String> {
  let command = [program.to_string(), "-version".to_string()];
  match invoker.invoke(&command, working_dir) {
    Ok(output) if output.success() => {
      // javac 8 reports on stderr, newer releases on stdout
      let version = output.diagnostics().lines().next().unwrap_or_default().to_string();
      info!(program = %program, version = %version, "toolchain found");
      Some(version)
    }
    Ok(output) => {
      debug!(program = %program, code = ?output.exit_code, "version probe exited with failure");
      None
    }
    Err(e) => {
      debug!(program = %program, error = %e, "version probe failed");
      None
    }
  }
}

/// Preflight check: is the compiler of `toolchain` available?
pub fn check_toolchain_present(invoker: &dyn Invoker, toolchain: &Toolchain, working_dir: &Path) -> bool {
  probe_version(invoker, &toolchain.javac, working_dir).is_some()
}
