use std::time::Instant;

use jbuild_lib::pipeline::{BuildOutcome, BuildPipeline};

use super::package::print_package_report;
use crate::output::{format_duration, print_stat, print_success};

pub fn cmd_install(pipeline: &BuildPipeline) -> BuildOutcome {
  let start = Instant::now();
  let result = pipeline.install();
  if let Ok(report) = &result {
    print_package_report(&report.package);
    print_success(&format!("Installed {}", report.installed.archive.display()));
    print_stat("Descriptor", &report.installed.descriptor.display().to_string());
    print_stat("Duration", &format_duration(start.elapsed()));
  }
  result.into()
}
