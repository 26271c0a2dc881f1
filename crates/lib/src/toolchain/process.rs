//! Process-backed [`Invoker`].

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::{InvokeError, InvokeOutput, Invoker};

/// Spawns real processes and blocks until they finish.
///
/// Processes are driven by a single-threaded tokio runtime so an optional
/// timeout can kill a hung tool instead of blocking forever.
pub struct ProcessInvoker {
  runtime: Runtime,
  timeout: Option<Duration>,
}

impl ProcessInvoker {
  pub fn new(timeout: Option<Duration>) -> Result<Self, InvokeError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .map_err(InvokeError::Runtime)?;
    Ok(Self { runtime, timeout })
  }
}

impl Invoker for ProcessInvoker {
  fn invoke(&self, command: &[String], working_dir: &Path) -> Result<InvokeOutput, InvokeError> {
    let (program, args) = command.split_first().ok_or(InvokeError::EmptyCommand)?;

    if !working_dir.is_dir() {
      return Err(InvokeError::WorkingDir {
        path: working_dir.to_path_buf(),
      });
    }

    info!(program = %program, args = args.len(), "invoking toolchain");
    debug!(command = %command.join(" "), working_dir = ?working_dir, "spawning process");

    let mut cmd = Command::new(program);
    cmd
      .args(args)
      .current_dir(working_dir)
      .stdin(Stdio::null())
      // A timed-out child is killed when its future is dropped.
      .kill_on_drop(true);

    let output = self.runtime.block_on(async {
      let result = match self.timeout {
        Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
          Ok(result) => result,
          Err(_) => {
            return Err(InvokeError::TimedOut {
              program: program.clone(),
              timeout: limit,
            });
          }
        },
        None => cmd.output().await,
      };
      result.map_err(|source| spawn_error(program, source))
    })?;

    let output = InvokeOutput {
      exit_code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !output.success() {
      debug!(program = %program, code = ?output.exit_code, stderr = %output.stderr, "process exited with failure");
    }

    Ok(output)
  }
}

fn spawn_error(program: &str, source: std::io::Error) -> InvokeError {
  if source.kind() == std::io::ErrorKind::NotFound {
    InvokeError::NotFound {
      program: program.to_string(),
    }
  } else {
    InvokeError::Spawn {
      program: program.to_string(),
      source,
    }
  }
}
