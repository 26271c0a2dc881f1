//! Fixed names and directory layout shared across the crate.

pub const APP_NAME: &str = "jbuild";

/// Config files probed at the project root, first match wins.
pub const CONFIG_CANDIDATES: [&str; 3] = ["jbuild.xml", "build.json", ".jbuild.json"];

/// Extension of compilable source files.
pub const SOURCE_EXTENSION: &str = "java";

/// Character encoding passed to the compiler for every invocation.
pub const SOURCE_ENCODING: &str = "UTF-8";

/// Root of everything the build writes.
pub const TARGET_DIR: &str = "target";

/// Legacy output directory removed by `clean` alongside `target/`.
pub const LEGACY_BUILD_DIR: &str = "build";

pub const TEST_REPORTS_DIR: &str = "target/test-reports";

pub const JARS_DIR: &str = "target/jars";

pub const TEST_REPORT_FILENAME: &str = "test-report.json";

/// Simple class names starting with one of these are executed as tests (`Test*`).
pub const TEST_CLASS_PREFIXES: [&str; 1] = ["Test"];

/// Simple class names ending with one of these are executed as tests
/// (`*Test`, `*Tests`, `*TestCase`). Other classes under the test root are
/// compiled as support code but never run.
pub const TEST_CLASS_SUFFIXES: [&str; 3] = ["Test", "Tests", "TestCase"];

pub const ARCHIVE_EXTENSION: &str = "jar";
