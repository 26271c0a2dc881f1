use anyhow::Result;

use jbuild_lib::pipeline::{BuildOutcome, BuildPipeline};

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(pipeline: &BuildPipeline, output: OutputFormat) -> Result<BuildOutcome> {
  let info = pipeline.info();

  if output.is_json() {
    print_json(&info)?;
    return Ok(BuildOutcome::Success);
  }

  println!("Project:");
  print_stat("Name", &info.name);
  print_stat("Version", &info.version);
  print_stat("Group", &info.group_id);
  print_stat("Root", &info.project_root.display().to_string());
  match &info.config_file {
    Some(path) => print_stat("Config", &path.display().to_string()),
    None => print_stat("Config", "defaults"),
  }
  print_stat("Sources", &info.source_directory);
  print_stat("Test sources", &info.test_source_directory);
  print_stat("Output", &info.output_directory);
  print_stat("Test output", &info.test_output_directory);
  print_stat("OS", &info.os);

  println!();
  println!("Modules:");
  for module in &info.modules {
    let status = if module.found {
      format!("{} source file(s)", module.source_files)
    } else {
      "not found".to_string()
    };
    print_stat(&module.name, &status);
  }

  Ok(BuildOutcome::Success)
}
