use jbuild_lib::pipeline::{BuildOutcome, BuildPipeline};

use crate::output::print_success;

/// Run the example and relay its output.
pub fn cmd_run_example(pipeline: &BuildPipeline) -> BuildOutcome {
  let result = pipeline.run_example();
  if let Ok(report) = &result {
    print!("{}", report.stdout);
    eprint!("{}", report.stderr);
    print_success(&format!("{} finished", report.main_class));
  }
  result.into()
}
