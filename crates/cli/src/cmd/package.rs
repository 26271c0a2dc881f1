use std::time::Instant;

use jbuild_lib::pipeline::{BuildOutcome, BuildPipeline, PackageReport};

use super::compile::print_compile_summary;
use crate::output::{format_bytes, format_duration, print_stat, print_success};

pub fn cmd_package(pipeline: &BuildPipeline) -> BuildOutcome {
  let start = Instant::now();
  let result = pipeline.package();
  if let Ok(report) = &result {
    print_package_report(report);
    print_stat("Duration", &format_duration(start.elapsed()));
  }
  result.into()
}

pub(crate) fn print_package_report(report: &PackageReport) {
  print_compile_summary(&report.compile);
  print_success(&format!("Created {}", report.artifact.display()));
  if let Some(size) = report.size_bytes {
    print_stat("Size", &format_bytes(size));
  }
}
