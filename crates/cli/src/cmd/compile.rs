//! Implementation of the `jbuild compile` command.

use std::time::Instant;

use jbuild_lib::compile::{CompileSummary, SkipReason};
use jbuild_lib::pipeline::{BuildOutcome, BuildPipeline};

use crate::output::{format_duration, print_info, print_stat, print_success, print_warning};

/// Compile all declared modules, or only `module`.
pub fn cmd_compile(pipeline: &BuildPipeline, module: Option<&str>) -> BuildOutcome {
  let start = Instant::now();
  let result = pipeline.compile(module);
  if let Ok(summary) = &result {
    print_compile_summary(summary);
    print_stat("Duration", &format_duration(start.elapsed()));
  }
  result.into()
}

/// One line per module, then the file totals.
pub(crate) fn print_compile_summary(summary: &CompileSummary) {
  for result in &summary.modules {
    match result.skipped {
      Some(SkipReason::NotFound) => print_warning(&format!("{}: module not found, skipped", result.module)),
      Some(SkipReason::NoSources) => print_info(&format!("{}: no sources", result.module)),
      None => print_success(&format!("{}: {} file(s) compiled", result.module, result.files_succeeded)),
    }
  }
  print_stat("Modules", &summary.compiled_modules().count().to_string());
  print_stat(
    "Compiled",
    &format!("{}/{} files", summary.total_succeeded, summary.total_attempted),
  );
}
