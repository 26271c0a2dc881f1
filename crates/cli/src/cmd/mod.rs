mod clean;
mod compile;
mod compile_plugins;
mod info;
mod install;
mod package;
mod run_example;

pub use clean::cmd_clean;
pub use compile::cmd_compile;
pub use compile_plugins::cmd_compile_plugins;
pub use info::cmd_info;
pub use install::cmd_install;
pub use package::cmd_package;
pub use run_example::cmd_run_example;
pub use test::cmd_test;
