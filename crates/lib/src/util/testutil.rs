//! Test utilities for jbuild-lib.
//!
//! Provides a scripted [`FakeInvoker`] that records every command instead of
//! spawning it, plus cross-platform helpers for tests that do need a real
//! process.

use std::cell::RefCell;
use std::path::Path;

use crate::toolchain::{InvokeError, InvokeOutput, Invoker};

/// Scripted result of a fake invocation.
#[derive(Debug, Clone)]
pub enum Response {
  Exit { code: i32, stdout: String, stderr: String },
  NotFound,
}

impl Response {
  pub fn ok() -> Self {
    Self::exit(0, "")
  }

  pub fn ok_with_stdout(stdout: &str) -> Self {
    Self::Exit {
      code: 0,
      stdout: stdout.to_string(),
      stderr: String::new(),
    }
  }

  pub fn ok_with_stderr(stderr: &str) -> Self {
    Self::exit(0, stderr)
  }

  pub fn exit(code: i32, stderr: &str) -> Self {
    Self::Exit {
      code,
      stdout: String::new(),
      stderr: stderr.to_string(),
    }
  }
}

type Matcher = Box<dyn Fn(&[String]) -> bool>;
type Effect = Box<dyn Fn(&[String])>;

struct Rule {
  matches: Matcher,
  response: Response,
  effect: Option<Effect>,
}

/// Records invocations and answers from a list of rules (first match wins).
///
/// Commands matching no rule succeed with empty output.
#[derive(Default)]
pub struct FakeInvoker {
  rules: Vec<Rule>,
  calls: RefCell<Vec<Vec<String>>>,
}

impl FakeInvoker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Answer commands accepted by `matches` with `response`.
  pub fn on(mut self, matches: impl Fn(&[String]) -> bool + 'static, response: Response) -> Self {
    self.rules.push(Rule {
      matches: Box::new(matches),
      response,
      effect: None,
    });
    self
  }

  /// Answer commands whose program is `program`.
  pub fn on_program(self, program: &str, response: Response) -> Self {
    let program = program.to_string();
    self.on(move |argv| argv.first() == Some(&program), response)
  }

  /// Answer commands with any argument containing `needle`.
  pub fn on_arg_containing(self, needle: &str, response: Response) -> Self {
    let needle = needle.to_string();
    self.on(move |argv| argv.iter().skip(1).any(|a| a.contains(&needle)), response)
  }

  /// Like [`FakeInvoker::on_program`] but also runs `effect` with the argv,
  /// e.g. to create the file a real tool would have written.
  pub fn on_program_with(self, program: &str, response: Response, effect: impl Fn(&[String]) + 'static) -> Self {
    let mut this = self.on_program(program, response);
    if let Some(rule) = this.rules.last_mut() {
      rule.effect = Some(Box::new(effect));
    }
    this
  }

  /// Every command invoked so far, in order.
  pub fn calls(&self) -> Vec<Vec<String>> {
    self.calls.borrow().clone()
  }

  /// Commands invoked with `program`, in order.
  pub fn calls_to(&self, program: &str) -> Vec<Vec<String>> {
    self
      .calls
      .borrow()
      .iter()
      .filter(|argv| argv.first().map(String::as_str) == Some(program))
      .cloned()
      .collect()
  }
}

impl Invoker for FakeInvoker {
  fn invoke(&self, command: &[String], _working_dir: &Path) -> Result<InvokeOutput, InvokeError> {
    let program = command.first().ok_or(InvokeError::EmptyCommand)?;
    self.calls.borrow_mut().push(command.to_vec());

    let Some(rule) = self.rules.iter().find(|rule| (rule.matches)(command)) else {
      return Ok(InvokeOutput {
        exit_code: Some(0),
        ..Default::default()
      });
    };

    if let Some(effect) = &rule.effect {
      effect(command);
    }

    match &rule.response {
      Response::Exit { code, stdout, stderr } => Ok(InvokeOutput {
        exit_code: Some(*code),
        stdout: stdout.clone(),
        stderr: stderr.clone(),
      }),
      Response::NotFound => Err(InvokeError::NotFound {
        program: program.clone(),
      }),
    }
  }
}

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the command and args to echo a message.
///
/// On Unix, this uses /bin/echo directly.
/// On Windows, echo is a shell builtin, so we wrap it in cmd.exe.
#[cfg(unix)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("/bin/echo", vec![msg.to_string()])
}

#[cfg(windows)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), format!("echo {}", msg)])
}
