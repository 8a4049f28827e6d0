//! A fixture plugin that exercises every registration path of
//! `plugin-registry`.
//!
//! The dummy plugin declares eight semantic types (including the `Kennel`
//! container), eleven formats, and methods, visualizers and pipelines whose
//! signatures cover unions, optional metadata, choice-restricted parameters
//! and nested pipelines. It is built two ways: in code by [`dummy_plugin`],
//! and as data by [`manifest`] together with [`function_table`]. Both yield
//! the same catalog.
//!
//! # Example
//!
//! ```
//! let plugin = dummy_plugin::dummy_plugin()?;
//! assert_eq!(plugin.metadata().name, "dummy-plugin");
//! assert!(plugin.action("typical_pipeline").is_ok());
//! # Ok::<(), plugin_registry::RegistryError>(())
//! ```

mod args;
mod formats;
mod methods;
mod pipelines;
mod types;
mod visualizers;


use plugin_registry::{
    ActionSpec, FunctionTable, Plugin, PluginDocument, PluginMetadata, RegistryError,
};

pub use self::pipelines::FAILURE_MODES;
pub use self::types::{
    CAT, DOG, FOUR_INTS, INT_SEQUENCE1, INT_SEQUENCE2, KENNEL, MAPPING, SINGLE_INT,
};

/// Plugin document describing the dummy plugin as data.
pub const MANIFEST: &str = include_str!("../manifests/dummy-plugin.yaml");

/// Returns the dummy plugin's identity.
#[must_use]
pub fn metadata() -> PluginMetadata {
    PluginMetadata::new("dummy-plugin", "0.0.0-dev")
        .with_description("Description of dummy plugin.")
        .with_short_description("Dummy plugin for testing.")
        .with_website("https://github.com/qiime2/qiime2")
        .with_package("qiime2.core.testing")
        .with_citation_text("No relevant citation.")
        .with_user_support_text("For help, see https://qiime2.org")
}

fn action_specs() -> impl Iterator<Item = ActionSpec> {
    methods::specs()
        .into_iter()
        .chain(visualizers::specs())
        .chain(pipelines::specs())
}

/// Builds the dummy plugin in code.
///
/// # Errors
///
/// Returns a [`RegistryError`] if any declaration is rejected, which would
/// indicate a regression in the registry.
pub fn dummy_plugin() -> Result<Plugin, RegistryError> {
    let mut plugin = Plugin::new(metadata())?;
    plugin.register_semantic_types(types::semantic_types())?;
    plugin.register_formats(formats::formats())?;
    for (semantic_type, format) in types::bindings() {
        plugin.register_semantic_type_to_format(&semantic_type, format)?;
    }
    for spec in methods::specs() {
        plugin.methods().register_function(spec)?;
    }
    for spec in visualizers::specs() {
        plugin.visualizers().register_function(spec)?;
    }
    for spec in pipelines::specs() {
        plugin.pipelines().register_function(spec)?;
    }
    Ok(plugin)
}

/// Returns every callable the dummy plugin offers, keyed by identifier.
#[must_use]
pub fn function_table() -> FunctionTable {
    action_specs().map(|spec| spec.callable().clone()).collect()
}

/// Parses [`MANIFEST`].
///
/// # Errors
///
/// Returns [`RegistryError::Document`] if the embedded document is malformed.
pub fn manifest() -> Result<PluginDocument, RegistryError> {
    PluginDocument::from_yaml_str(MANIFEST)
}
