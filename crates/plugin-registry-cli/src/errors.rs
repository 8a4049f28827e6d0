//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use plugin_registry::RegistryError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to register plugin: {0}")]
    Registry(#[from] RegistryError),
    #[error("failed to serialise plugin catalog: {0}")]
    SerialiseCatalog(serde_json::Error),
    #[error("failed to emit plugin catalog: {0}")]
    EmitCatalog(io::Error),
}
