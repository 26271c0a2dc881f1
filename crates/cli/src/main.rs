mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use jbuild_lib::context::BuildContext;
use jbuild_lib::pipeline::{BuildOutcome, BuildPipeline};
use jbuild_lib::toolchain::{ProcessInvoker, Toolchain};

use crate::cmd::{
  cmd_clean, cmd_compile, cmd_compile_plugins, cmd_info, cmd_install, cmd_package, cmd_run_example, cmd_test,
};
use crate::output::{OutputFormat, print_error, print_warning};

/// jbuild - Maven-style build orchestrator for multi-module Java projects
#[derive(Parser)]
#[command(name = "jbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Project root directory
  #[arg(short = 'C', long, global = true, default_value = ".")]
  project_dir: PathBuf,

  /// Kill external tools running longer than this (e.g. "90s", "5m"; "0s" disables)
  #[arg(long, global = true, value_parser = humantime::parse_duration)]
  timeout: Option<Duration>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Compile all declared modules in order, or a single module
  Compile {
    /// Module to compile instead of all declared modules
    module: Option<String>,
  },

  /// Compile and run test classes, writing target/test-reports/test-report.json
  Test,

  /// Compile, then archive the compiled classes into target/jars
  Package,

  /// Remove target/ and build/
  Clean,

  /// Package, then copy the archive into the local repository
  Install,

  /// Compile only modules whose name contains "plugin"
  CompilePlugins,

  /// Run the example main class against the compiled modules
  RunExample,

  /// Show project configuration and module status
  Info {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let Some(command) = &cli.command else {
    if let Err(e) = Cli::command().print_help() {
      print_error(&format!("Failed to print help: {}", e));
      return ExitCode::FAILURE;
    }
    return ExitCode::SUCCESS;
  };

  match run(&cli, command) {
    Ok(BuildOutcome::Success) => ExitCode::SUCCESS,
    Ok(BuildOutcome::Failure(reason)) => {
      print_error(&reason);
      ExitCode::FAILURE
    }
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

/// Log to stderr; `RUST_LOG` wins over the default level.
///
/// Non-fatal conditions are already reported through `output`, so only
/// errors are logged unless `--verbose` is given.
fn init_logging(verbose: bool) {
  let default_level = if verbose { "debug" } else { "error" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: &Cli, command: &Commands) -> Result<BuildOutcome> {
  let toolchain = Toolchain::from_env()
    .context("Invalid toolchain settings")?
    .with_timeout(cli.timeout);
  let ctx = BuildContext::load(&cli.project_dir, toolchain).context("Failed to load project")?;

  if let Some(warning) = ctx.config_warning() {
    print_warning(&format!("{}; using default configuration", warning));
  }

  let toolchain = ctx.toolchain();
  debug!(javac = %toolchain.javac, jar = %toolchain.jar, java = %toolchain.java, timeout = ?toolchain.timeout, "toolchain settings");

  let invoker = ProcessInvoker::new(ctx.toolchain().timeout).context("Failed to start process runtime")?;
  let pipeline = BuildPipeline::new(&ctx, &invoker);

  match command {
    Commands::Compile { module } => Ok(cmd_compile(&pipeline, module.as_deref())),
    Commands::Test => Ok(cmd_test(&pipeline)),
    Commands::Package => Ok(cmd_package(&pipeline)),
    Commands::Clean => Ok(cmd_clean(&pipeline)),
    Commands::Install => Ok(cmd_install(&pipeline)),
    Commands::CompilePlugins => Ok(cmd_compile_plugins(&pipeline)),
    Commands::RunExample => Ok(cmd_run_example(&pipeline)),
    Commands::Info { output } => cmd_info(&pipeline, *output),
  }
}
