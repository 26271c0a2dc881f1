pub mod os;
pub mod paths;

use std::path::Path;

pub use os::Os;

/// Join classpath entries with the separator of `os`.
pub fn join_classpath<P: AsRef<Path>>(entries: &[P], os: Os) -> String {
  entries
    .iter()
    .map(|p| p.as_ref().to_string_lossy().into_owned())
    .collect::<Vec<_>>()
    .join(os.classpath_separator())
}
