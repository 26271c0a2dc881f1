use jbuild_lib::pipeline::{BuildOutcome, BuildPipeline};

use crate::output::{print_info, print_success};

pub fn cmd_clean(pipeline: &BuildPipeline) -> BuildOutcome {
  let result = pipeline.clean();
  if let Ok(report) = &result {
    if report.removed.is_empty() {
      print_info("Nothing to clean");
    }
    for path in &report.removed {
      print_success(&format!("Removed {}", path.display()));
    }
  }
  result.into()
}
