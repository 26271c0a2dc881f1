//! End-to-end lifecycle tests through the public API.
//!
//! A recording invoker stands in for the JDK: the compiler and runtime always
//! succeed, and the archiver writes the archive it was asked to create.

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use jbuild_lib::config::ConfigSource;
use jbuild_lib::context::BuildContext;
use jbuild_lib::pipeline::{BuildOutcome, BuildPipeline};
use jbuild_lib::toolchain::{InvokeError, InvokeOutput, Invoker, Toolchain};

#[derive(Default)]
struct RecordingInvoker {
  calls: RefCell<Vec<Vec<String>>>,
}

impl RecordingInvoker {
  /// Source files passed to compiler runs, in invocation order.
  fn compiled_files(&self) -> Vec<String> {
    self
      .calls
      .borrow()
      .iter()
      .filter(|argv| argv[0] == "javac" && argv[1] != "-version")
      .flat_map(|argv| argv.iter().filter(|a| a.ends_with(".java")).cloned().collect::<Vec<_>>())
      .map(|path| Path::new(&path).file_name().unwrap().to_string_lossy().into_owned())
      .collect()
  }
}

impl Invoker for RecordingInvoker {
  fn invoke(&self, command: &[String], _working_dir: &Path) -> Result<InvokeOutput, InvokeError> {
    self.calls.borrow_mut().push(command.to_vec());
    if command[0] == "jar" {
      fs::write(&command[2], b"PK").unwrap();
    }
    Ok(InvokeOutput {
      exit_code: Some(0),
      ..Default::default()
    })
  }
}

fn write(root: &Path, relative: &str, content: &str) {
  let path = root.join(relative);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, content).unwrap();
}

#[test]
fn json_project_goes_through_full_lifecycle() {
  let temp = TempDir::new().unwrap();
  write(
    temp.path(),
    "build.json",
    r#"{ "name": "shop", "version": "2.0.0", "groupId": "org.shop", "modules": ["model", "service"] }"#,
  );
  write(temp.path(), "model/src/main/java/org/shop/Item.java", "class Item {}");
  write(temp.path(), "service/src/main/java/org/shop/Cart.java", "class Cart {}");
  write(temp.path(), "build/stale.txt", "old");

  let repo = temp.path().join("repo");
  let ctx = BuildContext::load(temp.path(), Toolchain::default())
    .unwrap()
    .with_local_repository(repo.clone());
  let invoker = RecordingInvoker::default();
  let pipeline = BuildPipeline::new(&ctx, &invoker);

  assert_eq!(BuildOutcome::from(pipeline.clean()), BuildOutcome::Success);
  assert!(!temp.path().join("build").exists());

  assert_eq!(BuildOutcome::from(pipeline.install()), BuildOutcome::Success);
  assert_eq!(invoker.compiled_files(), vec!["Item.java", "Cart.java"]);
  assert!(ctx.project_root().join("target/jars/shop-2.0.0.jar").is_file());
  assert!(repo.join("org/shop/shop/2.0.0/shop-2.0.0.jar").is_file());
  assert!(repo.join("org/shop/shop/2.0.0/shop-2.0.0.json").is_file());
}

#[test]
fn xml_project_compiles_declared_modules_in_order() {
  let temp = TempDir::new().unwrap();
  write(
    temp.path(),
    "jbuild.xml",
    r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
  <name>xml-app</name>
  <version>0.1.0</version>
  <modules>
    <module>zeta</module>
    <module>alpha</module>
  </modules>
</project>"#,
  );
  write(temp.path(), "zeta/src/main/java/Z.java", "class Z {}");
  write(temp.path(), "alpha/src/main/java/A.java", "class A {}");

  let ctx = BuildContext::load(temp.path(), Toolchain::default()).unwrap();
  let invoker = RecordingInvoker::default();

  let summary = BuildPipeline::new(&ctx, &invoker).compile(None).unwrap();

  assert!(matches!(ctx.config_source(), ConfigSource::File(_)));
  assert_eq!(ctx.config().name, "xml-app");
  assert_eq!((summary.total_attempted, summary.total_succeeded), (2, 2));
  assert_eq!(invoker.compiled_files(), vec!["Z.java", "A.java"]);
}

#[test]
fn broken_config_falls_back_to_default_modules() {
  let temp = TempDir::new().unwrap();
  write(temp.path(), "build.json", r#"{ "name": "" }"#);

  let ctx = BuildContext::load(temp.path(), Toolchain::default()).unwrap();
  let invoker = RecordingInvoker::default();
  let info = BuildPipeline::new(&ctx, &invoker).info();

  assert!(matches!(ctx.config_source(), ConfigSource::Fallback(_)));
  assert!(ctx.config_warning().is_some());
  assert_eq!(info.name, "jbuild-project");
  assert_eq!(info.modules.len(), 3);
  assert!(info.modules.iter().all(|m| !m.found));
}
