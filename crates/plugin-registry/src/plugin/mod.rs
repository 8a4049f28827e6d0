//! The plugin aggregate.
//!
//! A [`Plugin`] owns one type registry, one format registry and one action
//! registry under a single identity. Registration happens through `&mut
//! Plugin` during initialisation; [`Plugin::seal`] then yields a shared,
//! read-only [`SealedPlugin`] for the rest of the process.

mod catalog;
mod metadata;

#[cfg(test)]
mod tests;

use std::ops::Deref;
use std::sync::Arc;

use tracing::info;

use crate::action::{Action, ActionKind, ActionRegistry, ActionSpec};
use crate::error::RegistryError;
use crate::format::{Format, FormatRegistry};
use crate::semantic::{SemanticType, TypeExpr, TypeRegistry};

pub use self::catalog::{ActionEntry, BindingEntry, PluginCatalog};
pub use self::metadata::PluginMetadata;

/// A plugin under construction.
///
/// # Example
///
/// ```
/// use plugin_registry::{
///     ActionSpec, Arguments, Callable, Format, Plugin, PluginMetadata, SemanticType, TypeExpr,
/// };
///
/// let mut plugin = Plugin::new(PluginMetadata::new("example", "1.0.0"))?;
/// plugin.register_semantic_types([SemanticType::plain("Mapping")])?;
/// plugin.register_formats([
///     Format::file("MappingFormat").with_views(["dict"]),
///     Format::single_file_directory("MappingDirectoryFormat", "mapping.tsv", "MappingFormat")
///         .with_views(["dict"]),
/// ])?;
/// plugin.register_semantic_type_to_format(&TypeExpr::leaf("Mapping"), "MappingDirectoryFormat")?;
///
/// let identity = Callable::new("identity", 1, |args: &Arguments| {
///     Ok(args.values().cloned().collect())
/// });
/// plugin.methods().register_function(
///     ActionSpec::new(identity, "Identity", "Returns its input.")
///         .input("mapping", TypeExpr::leaf("Mapping"))
///         .output("out", TypeExpr::leaf("Mapping")),
/// )?;
///
/// let sealed = plugin.seal();
/// assert_eq!(sealed.actions().len(), 1);
/// # Ok::<(), plugin_registry::RegistryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Plugin {
    metadata: PluginMetadata,
    types: TypeRegistry,
    formats: FormatRegistry,
    actions: ActionRegistry,
}

impl Plugin {
    /// Creates an empty plugin.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Metadata`] when the name or version is blank.
    pub fn new(metadata: PluginMetadata) -> Result<Self, RegistryError> {
        metadata.validate()?;
        Ok(Self {
            metadata,
            types: TypeRegistry::new(),
            formats: FormatRegistry::new(),
            actions: ActionRegistry::new(),
        })
    }

    /// Registers a batch of semantic types.
    ///
    /// # Errors
    ///
    /// See [`TypeRegistry::register_types`].
    pub fn register_semantic_types<I>(&mut self, types: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = SemanticType>,
    {
        self.types.register_types(types)
    }

    /// Registers a batch of formats.
    ///
    /// # Errors
    ///
    /// See [`FormatRegistry::register_formats`].
    pub fn register_formats<I>(&mut self, formats: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = Format>,
    {
        self.formats.register_formats(formats)
    }

    /// Binds a semantic type expression to its artifact format.
    ///
    /// # Errors
    ///
    /// See [`FormatRegistry::bind`].
    pub fn register_semantic_type_to_format(
        &mut self,
        semantic_type: &TypeExpr,
        format: &str,
    ) -> Result<(), RegistryError> {
        self.formats.bind(&self.types, semantic_type, format)
    }

    /// Returns the registrar for methods.
    #[must_use]
    pub const fn methods(&mut self) -> ActionRegistrar<'_> {
        self.registrar(ActionKind::Method)
    }

    /// Returns the registrar for visualizers.
    #[must_use]
    pub const fn visualizers(&mut self) -> ActionRegistrar<'_> {
        self.registrar(ActionKind::Visualizer)
    }

    /// Returns the registrar for pipelines.
    #[must_use]
    pub const fn pipelines(&mut self) -> ActionRegistrar<'_> {
        self.registrar(ActionKind::Pipeline)
    }

    const fn registrar(&mut self, kind: ActionKind) -> ActionRegistrar<'_> {
        ActionRegistrar { plugin: self, kind }
    }

    /// Registers an action of the given kind.
    ///
    /// # Errors
    ///
    /// See [`ActionRegistry::register_action`].
    pub fn register_action(
        &mut self,
        kind: ActionKind,
        spec: ActionSpec,
    ) -> Result<(), RegistryError> {
        self.actions.register_action(kind, spec, &self.types)
    }

    /// Returns the plugin metadata.
    #[must_use]
    pub const fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    /// Returns the type registry.
    #[must_use]
    pub const fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Returns the format registry.
    #[must_use]
    pub const fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    /// Returns the action registry.
    #[must_use]
    pub const fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Looks up an action by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownAction`] if no action has that
    /// identifier.
    pub fn action(&self, id: &str) -> Result<&Action, RegistryError> {
        self.actions.resolve(id)
    }

    /// Returns the artifact format bound to a concrete semantic type.
    #[must_use]
    pub fn format_for(&self, semantic_type: &TypeExpr) -> Option<&Format> {
        self.formats.format_for(semantic_type)
    }

    /// Builds a serialisable snapshot of the registrations.
    #[must_use]
    pub fn catalog(&self) -> PluginCatalog {
        PluginCatalog::from(self)
    }

    /// Ends the registration phase.
    #[must_use]
    pub fn seal(self) -> SealedPlugin {
        info!(
            plugin = %self.metadata.name,
            version = %self.metadata.version,
            types = self.types.len(),
            formats = self.formats.len(),
            actions = self.actions.len(),
            "plugin sealed"
        );
        SealedPlugin(Arc::new(self))
    }
}

/// Registers actions of one kind on a plugin.
#[derive(Debug)]
pub struct ActionRegistrar<'p> {
    plugin: &'p mut Plugin,
    kind: ActionKind,
}

impl ActionRegistrar<'_> {
    /// Returns the kind of action this registrar records.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Registers `spec` as an action of this registrar's kind.
    ///
    /// # Errors
    ///
    /// See [`ActionRegistry::register_action`].
    pub fn register_function(self, spec: ActionSpec) -> Result<(), RegistryError> {
        self.plugin.register_action(self.kind, spec)
    }
}

/// A read-only plugin shared between readers.
///
/// Cloning is cheap and every clone observes the same registrations.
#[derive(Debug, Clone)]
pub struct SealedPlugin(Arc<Plugin>);

impl Deref for SealedPlugin {
    type Target = Plugin;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
