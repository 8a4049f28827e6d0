//! Declarative registry of plugin capabilities.
//!
//! The `plugin-registry` crate lets a plugin declare, under one identity, the
//! semantic types it understands, the formats those types are stored in, and
//! the typed actions it offers. Every declaration is validated when it is
//! registered so that a host framework can trust the resulting catalog
//! without re-checking it.
//!
//! # Architecture
//!
//! A [`Plugin`] owns three append-only registries:
//!
//! - [`TypeRegistry`] holds plain and container semantic types. Type
//!   expressions ([`TypeExpr`]) combine them with unions (`A | B`) and
//!   container parameterisation (`Kennel[Dog | Cat]`).
//! - [`FormatRegistry`] holds file and directory formats and binds each
//!   concrete semantic type to exactly one directory format.
//! - [`ActionRegistry`] holds methods, visualizers and pipelines, each a
//!   [`Callable`] with a typed [`Signature`].
//!
//! Registration happens once through `&mut Plugin`; [`Plugin::seal`] then
//! produces a [`SealedPlugin`] that many readers can share. Plugins can also
//! be written as data and loaded with [`PluginDocument`]. The registry never
//! executes actions.
//!
//! # Example
//!
//! ```
//! use plugin_registry::{Format, Plugin, PluginMetadata, SemanticType, TypeExpr};
//!
//! let mut plugin = Plugin::new(PluginMetadata::new("kennels", "1.0.0"))?;
//! plugin.register_semantic_types([
//!     SemanticType::plain("Dog"),
//!     SemanticType::plain("Cat"),
//!     SemanticType::container("Kennel", TypeExpr::leaf("Dog") | TypeExpr::leaf("Cat")),
//! ])?;
//! plugin.register_formats([
//!     Format::file("MappingFormat").with_views(["dict"]),
//!     Format::single_file_directory("MappingDirectoryFormat", "mapping.tsv", "MappingFormat")
//!         .with_views(["dict"]),
//! ])?;
//!
//! let kennel: TypeExpr = "Kennel[Dog | Cat]".parse()?;
//! plugin.register_semantic_type_to_format(&kennel, "MappingDirectoryFormat")?;
//!
//! let dog_kennel: TypeExpr = "Kennel[Dog]".parse()?;
//! let format = plugin.format_for(&dog_kennel).map(Format::name);
//! assert_eq!(format, Some("MappingDirectoryFormat"));
//! # Ok::<(), plugin_registry::RegistryError>(())
//! ```

pub mod action;
pub mod document;
pub mod error;
pub mod format;
pub mod plugin;
pub mod semantic;

#[cfg(test)]
mod tests;

pub use self::action::{
    Action, ActionKind, ActionMetadata, ActionRegistry, ActionSpec, Arguments, Callable,
    ChoiceValue, Choices, FunctionTable, OutputType, ParameterSpec, Primitive, Signature,
};
pub use self::document::{ActionDeclaration, BindingDeclaration, PluginDocument};
pub use self::error::{ActionFailure, RegistryError};
pub use self::format::{DirectoryMember, Format, FormatLayout, FormatRegistry};
pub use self::plugin::{ActionRegistrar, Plugin, PluginCatalog, PluginMetadata, SealedPlugin};
pub use self::semantic::{MAX_NESTING, SemanticType, TypeExpr, TypeRegistry};
