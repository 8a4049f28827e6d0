//! Command-line runtime for the plugin registry.
//!
//! The runtime loads [`Config`] through `ortho_config`, installs telemetry,
//! builds a plugin and writes its catalog to stdout as pretty-printed JSON.
//! The plugin comes from the configured plugin document when
//! `--manifest-path` is set, with callables resolved against the dummy
//! plugin's function table; otherwise the built-in dummy plugin is used.
//! IO streams and configuration loading are injectable so the runtime can be
//! exercised from tests.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use camino::Utf8Path;
use plugin_registry::{Plugin, PluginDocument, SealedPlugin};
use plugin_registry_config::Config;
use tracing::info;

mod config;
mod errors;
pub mod telemetry;

#[cfg(test)]
mod tests;

use config::{ConfigLoader, OrthoConfigLoader};
use errors::AppError;

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

fn run_with_loader<I, W, E, L>(args: I, stdout: &mut W, stderr: &mut E, loader: &L) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let result = loader.load(&args).and_then(|config| {
        telemetry::initialise(&config)?;
        let plugin = build_plugin(&config)?.seal();
        emit_catalog(&plugin, stdout)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            writeln!(stderr, "{error}").ok();
            ExitCode::FAILURE
        }
    }
}

fn build_plugin(config: &Config) -> Result<Plugin, AppError> {
    config.manifest_path().map_or_else(
        || dummy_plugin::dummy_plugin().map_err(AppError::from),
        load_document,
    )
}

fn load_document(path: &Utf8Path) -> Result<Plugin, AppError> {
    info!(path = %path, "loading plugin document");
    let plugin = PluginDocument::from_path(path.as_std_path())?
        .into_plugin(&dummy_plugin::function_table())?;
    Ok(plugin)
}

fn emit_catalog<W: Write>(plugin: &SealedPlugin, stdout: &mut W) -> Result<(), AppError> {
    let catalog = plugin.catalog();
    serde_json::to_writer_pretty(&mut *stdout, &catalog).map_err(AppError::SerialiseCatalog)?;
    writeln!(stdout).map_err(AppError::EmitCatalog)?;
    stdout.flush().map_err(AppError::EmitCatalog)
}
