use std::time::Instant;

use jbuild_lib::pipeline::{BuildOutcome, BuildPipeline};

use super::compile::print_compile_summary;
use crate::output::{format_duration, print_stat};

pub fn cmd_compile_plugins(pipeline: &BuildPipeline) -> BuildOutcome {
  let start = Instant::now();
  let result = pipeline.compile_plugins();
  if let Ok(summary) = &result {
    print_compile_summary(summary);
    print_stat("Duration", &format_duration(start.elapsed()));
  }
  result.into()
}
