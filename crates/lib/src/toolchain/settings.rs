//! Which executables make up the toolchain and how long they may run.

use std::time::Duration;

use thiserror::Error;

pub const JAVAC_ENV: &str = "JBUILD_JAVAC";
pub const JAR_ENV: &str = "JBUILD_JAR";
pub const JAVA_ENV: &str = "JBUILD_JAVA";
pub const TIMEOUT_ENV: &str = "JBUILD_TIMEOUT";

#[derive(Debug, Error)]
pub enum SettingsError {
  #[error("invalid {var} value `{value}`: {source}")]
  InvalidTimeout {
    var: &'static str,
    value: String,
    source: humantime::DurationError,
  },
}

/// Compiler, archiver and runtime executables, plus the per-invocation timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub javac: String,
  pub jar: String,
  pub java: String,
  /// `None` lets external processes run unbounded.
  pub timeout: Option<Duration>,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      javac: "javac".to_string(),
      jar: "jar".to_string(),
      java: "java".to_string(),
      timeout: None,
    }
  }
}

impl Toolchain {
  /// Build toolchain settings from `JBUILD_JAVAC`, `JBUILD_JAR`, `JBUILD_JAVA`
  /// and `JBUILD_TIMEOUT` (a humantime duration such as `90s`; `0s` disables).
  pub fn from_env() -> Result<Self, SettingsError> {
    let defaults = Self::default();
    let timeout = match env_value(TIMEOUT_ENV) {
      Some(value) => parse_timeout(TIMEOUT_ENV, &value)?,
      None => None,
    };

    Ok(Self {
      javac: env_value(JAVAC_ENV).unwrap_or(defaults.javac),
      jar: env_value(JAR_ENV).unwrap_or(defaults.jar),
      java: env_value(JAVA_ENV).unwrap_or(defaults.java),
      timeout,
    })
  }

  /// Replace the timeout when `timeout` is set.
  pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
    if let Some(limit) = timeout {
      self.timeout = (!limit.is_zero()).then_some(limit);
    }
    self
  }
}

fn env_value(var: &str) -> Option<String> {
  std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn parse_timeout(var: &'static str, value: &str) -> Result<Option<Duration>, SettingsError> {
  let limit = humantime::parse_duration(value.trim()).map_err(|source| SettingsError::InvalidTimeout {
    var,
    value: value.to_string(),
    source,
  })?;
  Ok((!limit.is_zero()).then_some(limit))
}
