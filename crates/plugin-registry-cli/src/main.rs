//! CLI entrypoint for the plugin registry.
//!
//! The binary delegates to [`plugin_registry_cli::run`], which loads
//! configuration, builds the configured plugin and prints its catalog.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    plugin_registry_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
