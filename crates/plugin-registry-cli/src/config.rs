//! Configuration loading for the CLI.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use plugin_registry_config::Config;

use crate::AppError;

pub(crate) trait ConfigLoader {
    /// Loads configuration from the full argument vector, program name
    /// included.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}
