use std::fmt;

/// Operating system families jbuild distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  Windows,
  Unknown,
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Self {
    Self::from_name(std::env::consts::OS)
  }

  /// Map a `std::env::consts::OS` style name to an `Os`.
  pub fn from_name(name: &str) -> Self {
    match name {
      "linux" => Self::Linux,
      "macos" => Self::MacOs,
      "windows" => Self::Windows,
      _ => Self::Unknown,
    }
  }

  /// Returns the uppercase label shown in project info
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "LINUX",
      Self::MacOs => "MACOS",
      Self::Windows => "WINDOWS",
      Self::Unknown => "UNKNOWN",
    }
  }

  /// Separator between entries of a multi-entry classpath.
  pub fn classpath_separator(&self) -> &'static str {
    match self {
      Self::Windows => ";",
      _ => ":",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
