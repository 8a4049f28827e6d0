//! Format declarations and semantic type to format bindings.
//!
//! A [`Format`] names an on-disk layout (a single file, a directory of files,
//! or a directory wrapping one file) together with the in-memory view types it
//! can import and export. The [`FormatRegistry`] stores format declarations
//! and the artifact format bound to each concrete semantic type.

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RegistryError;
use crate::semantic::{TypeExpr, TypeRegistry, is_identifier};

/// A file inside a directory format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMember {
    pattern: String,
    format: String,
}

impl DirectoryMember {
    /// Creates a member matching `pattern` stored in `format`.
    #[must_use]
    pub fn new(pattern: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            format: format.into(),
        }
    }

    /// Returns the path or path pattern of the member.
    #[must_use]
    pub const fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the file format name of the member.
    #[must_use]
    pub const fn format(&self) -> &str {
        self.format.as_str()
    }
}

/// On-disk layout of a format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum FormatLayout {
    /// A single file.
    File,
    /// A directory holding the listed member files.
    Directory {
        /// Files making up the directory.
        members: Vec<DirectoryMember>,
    },
    /// A directory holding exactly one file of another format.
    SingleFileDirectory {
        /// Fixed file name inside the directory.
        path: String,
        /// Format of the wrapped file.
        file_format: String,
    },
}

/// A named format declaration.
///
/// # Example
///
/// ```
/// use plugin_registry::Format;
///
/// let file = Format::file("IntSequenceFormat").with_views(["list[int]"]);
/// let dir = Format::single_file_directory("IntSequenceDirectoryFormat", "ints.tsv", "IntSequenceFormat")
///     .with_views(["list[int]"]);
///
/// assert!(!file.is_directory());
/// assert!(dir.is_directory());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    name: String,
    #[serde(flatten)]
    layout: FormatLayout,
    #[serde(default)]
    views: Vec<String>,
    #[serde(default = "default_importable")]
    importable: bool,
}

const fn default_importable() -> bool {
    true
}

impl Format {
    fn with_layout(name: impl Into<String>, layout: FormatLayout) -> Self {
        Self {
            name: name.into(),
            layout,
            views: Vec::new(),
            importable: true,
        }
    }

    /// Declares a single-file format.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self::with_layout(name, FormatLayout::File)
    }

    /// Declares a directory format with the given member files.
    #[must_use]
    pub fn directory(name: impl Into<String>, members: Vec<DirectoryMember>) -> Self {
        Self::with_layout(name, FormatLayout::Directory { members })
    }

    /// Declares a directory format wrapping one file of `file_format`.
    #[must_use]
    pub fn single_file_directory(
        name: impl Into<String>,
        path: impl Into<String>,
        file_format: impl Into<String>,
    ) -> Self {
        Self::with_layout(
            name,
            FormatLayout::SingleFileDirectory {
                path: path.into(),
                file_format: file_format.into(),
            },
        )
    }

    /// Declares the view types the format can import and export.
    #[must_use]
    pub fn with_views<I, S>(mut self, views: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.views = views.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the format as not importable by users.
    #[must_use]
    pub const fn unimportable(mut self) -> Self {
        self.importable = false;
        self
    }

    /// Returns the format name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the on-disk layout.
    #[must_use]
    pub const fn layout(&self) -> &FormatLayout {
        &self.layout
    }

    /// Returns the declared view types.
    #[must_use]
    pub fn views(&self) -> &[String] {
        &self.views
    }

    /// Returns `true` when users may import data in this format.
    #[must_use]
    pub const fn is_importable(&self) -> bool {
        self.importable
    }

    /// Returns `true` for directory layouts, the only layouts usable as
    /// artifact formats.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        !matches!(self.layout, FormatLayout::File)
    }

    /// Returns the names of the file formats this format is built from.
    #[must_use]
    pub fn referenced_formats(&self) -> Vec<&str> {
        match &self.layout {
            FormatLayout::File => Vec::new(),
            FormatLayout::Directory { members } => {
                members.iter().map(DirectoryMember::format).collect()
            }
            FormatLayout::SingleFileDirectory { file_format, .. } => vec![file_format.as_str()],
        }
    }
}

/// Registry of formats and artifact format bindings.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: BTreeMap<String, Format>,
    bindings: BTreeMap<TypeExpr, String>,
}

impl FormatRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a batch of formats.
    ///
    /// Directory formats may reference file formats that are already
    /// registered or that appear in the same batch. Nothing from the batch is
    /// kept when any format is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateFormat`] for repeated names,
    /// [`RegistryError::UndefinedReference`] for unknown member formats and
    /// [`RegistryError::InvalidFormat`] for malformed declarations.
    pub fn register_formats<I>(&mut self, formats: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = Format>,
    {
        let batch: Vec<Format> = formats.into_iter().collect();
        self.check_batch(&batch)?;
        for format in batch {
            debug!(format = format.name(), "registered format");
            self.formats.insert(format.name.clone(), format);
        }
        Ok(())
    }

    fn check_batch(&self, batch: &[Format]) -> Result<(), RegistryError> {
        let mut pending: BTreeMap<&str, &Format> = BTreeMap::new();
        for format in batch {
            let name = format.name();
            if !is_identifier(name) {
                return Err(invalid_format(name, "not a valid format name"));
            }
            if self.formats.contains_key(name) || pending.insert(name, format).is_some() {
                return Err(RegistryError::DuplicateFormat {
                    name: name.to_owned(),
                });
            }
            if format.is_importable() && format.views.is_empty() {
                return Err(invalid_format(
                    name,
                    "importable formats must declare at least one view type",
                ));
            }
            if matches!(&format.layout, FormatLayout::Directory { members } if members.is_empty())
            {
                return Err(invalid_format(name, "directory formats need at least one member"));
            }
        }

        for format in batch {
            for reference in format.referenced_formats() {
                let target = self
                    .formats
                    .get(reference)
                    .or_else(|| pending.get(reference).copied())
                    .ok_or_else(|| RegistryError::UndefinedReference {
                        declaration: format.name().to_owned(),
                        reference: reference.to_owned(),
                    })?;
                if target.is_directory() {
                    return Err(invalid_format(
                        format.name(),
                        format!("member format '{reference}' is not a file format"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Looks up a format by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Format> {
        self.formats.get(name)
    }

    /// Resolves a format by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnregisteredFormat`] if no format has that
    /// name.
    pub fn resolve(&self, name: &str) -> Result<&Format, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::UnregisteredFormat {
                name: name.to_owned(),
            })
    }

    /// Binds `semantic_type` to the directory format `format`.
    ///
    /// Composite expressions bind every concrete member. Members already
    /// bound to the same format are left untouched; the binding is rejected
    /// as a whole when any member is bound elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnregisteredType`] or
    /// [`RegistryError::UnregisteredFormat`] when either side is unknown,
    /// [`RegistryError::InvalidTypeExpr`] when a container appears without a
    /// parameter, [`RegistryError::InvalidFormat`] when the format is not a
    /// directory format, [`RegistryError::ConflictingBinding`] when a member
    /// is bound to a different format and [`RegistryError::AlreadyBound`]
    /// when nothing new would be bound.
    pub fn bind(
        &mut self,
        types: &TypeRegistry,
        semantic_type: &TypeExpr,
        format: &str,
    ) -> Result<(), RegistryError> {
        types.validate(semantic_type).map_err(|error| match error {
            RegistryError::UnknownType { .. } => RegistryError::UnregisteredType {
                type_expr: semantic_type.to_string(),
            },
            other => other,
        })?;
        if let Some(container) = bare_container(semantic_type, types) {
            return Err(RegistryError::InvalidTypeExpr {
                expr: semantic_type.to_string(),
                message: format!("container '{container}' must be parameterised"),
            });
        }
        let target = self.resolve(format)?;
        if !target.is_directory() {
            return Err(invalid_format(
                format,
                "artifact formats must be directory formats",
            ));
        }

        let members = semantic_type.concrete_members();
        let mut fresh = Vec::new();
        for member in &members {
            match self.bindings.get(member) {
                Some(existing) if existing != format => {
                    return Err(if semantic_type.is_concrete() {
                        RegistryError::AlreadyBound {
                            type_expr: member.to_string(),
                            format: existing.clone(),
                        }
                    } else {
                        RegistryError::ConflictingBinding {
                            type_expr: member.to_string(),
                            existing: existing.clone(),
                            requested: format.to_owned(),
                        }
                    });
                }
                Some(_) => {}
                None => fresh.push(member.clone()),
            }
        }
        if fresh.is_empty() {
            return Err(RegistryError::AlreadyBound {
                type_expr: semantic_type.to_string(),
                format: format.to_owned(),
            });
        }

        for member in fresh {
            debug!(semantic_type = %member, format, "bound semantic type to format");
            self.bindings.insert(member, format.to_owned());
        }
        Ok(())
    }

    /// Returns the artifact format bound to a concrete semantic type.
    #[must_use]
    pub fn format_for(&self, semantic_type: &TypeExpr) -> Option<&Format> {
        self.bindings
            .get(semantic_type)
            .and_then(|name| self.formats.get(name))
    }

    /// Returns the concrete types bound to `format`.
    #[must_use]
    pub fn types_for(&self, format: &str) -> BTreeSet<&TypeExpr> {
        self.bindings
            .iter()
            .filter(|(_, bound)| bound.as_str() == format)
            .map(|(semantic_type, _)| semantic_type)
            .collect()
    }

    /// Iterates over bindings in type order.
    pub fn bindings(&self) -> impl Iterator<Item = (&TypeExpr, &str)> {
        self.bindings
            .iter()
            .map(|(semantic_type, format)| (semantic_type, format.as_str()))
    }

    /// Iterates over formats in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Format> {
        self.formats.values()
    }

    /// Returns the number of registered formats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Returns `true` when no formats are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

/// Finds a container used as a bare leaf, which denotes no concrete type.
fn bare_container<'e>(expr: &'e TypeExpr, types: &TypeRegistry) -> Option<&'e str> {
    match expr {
        TypeExpr::Leaf(name) => types
            .get(name)
            .filter(|declaration| declaration.is_container())
            .map(|_| name.as_str()),
        TypeExpr::Union(members) => members
            .iter()
            .find_map(|member| bare_container(member, types)),
        TypeExpr::Parameterized { field, .. } => bare_container(field, types),
    }
}

fn invalid_format(name: &str, message: impl Into<String>) -> RegistryError {
    RegistryError::InvalidFormat {
        name: name.to_owned(),
        message: message.into(),
    }
}
