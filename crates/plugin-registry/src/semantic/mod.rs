//! Semantic type declarations and the type registry.
//!
//! A [`SemanticType`] is either a plain named type or a container declared
//! over a field domain (`Kennel[Dog | Cat]`). The [`TypeRegistry`] stores
//! declarations keyed by name, rejects duplicates and dangling references, and
//! validates the [`TypeExpr`] values used by bindings and action signatures.

mod expr;
mod parse;


use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RegistryError;

pub use self::expr::TypeExpr;
pub use self::parse::MAX_NESTING;
pub(crate) use self::parse::is_identifier;

/// Reserved name of the visualization output marker.
pub const VISUALIZATION: &str = "Visualization";

/// A semantic type declaration.
///
/// # Example
///
/// ```
/// use plugin_registry::{SemanticType, TypeExpr};
///
/// let kennel = SemanticType::container("Kennel", TypeExpr::leaf("Dog") | TypeExpr::leaf("Cat"));
/// assert!(kennel.is_container());
/// assert_eq!(kennel.expr().to_string(), "Kennel[Cat | Dog]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticType {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field: Option<TypeExpr>,
}

impl SemanticType {
    /// Declares a plain type.
    #[must_use]
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: None,
        }
    }

    /// Declares a container type whose field ranges over `field`.
    #[must_use]
    pub fn container(name: impl Into<String>, field: TypeExpr) -> Self {
        Self {
            name: name.into(),
            field: Some(field),
        }
    }

    /// Returns the type name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the field domain of a container type.
    #[must_use]
    pub const fn field(&self) -> Option<&TypeExpr> {
        self.field.as_ref()
    }

    /// Returns `true` for container types.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.field.is_some()
    }

    /// Returns the declaration as a type expression.
    #[must_use]
    pub fn expr(&self) -> TypeExpr {
        self.field.as_ref().map_or_else(
            || TypeExpr::leaf(self.name.clone()),
            |field| TypeExpr::parameterized(self.name.clone(), field.clone()),
        )
    }
}

/// Registry of semantic type declarations.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, SemanticType>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a batch of type declarations.
    ///
    /// The batch is treated as a set: a container may reference types that
    /// are already registered or that appear in the same batch. Nothing from
    /// the batch is kept when any declaration is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateType`] when a name is already
    /// registered or repeated within the batch,
    /// [`RegistryError::UndefinedReference`] when a container references an
    /// unknown type, and [`RegistryError::InvalidTypeExpr`] for malformed
    /// names or field domains.
    pub fn register_types<I>(&mut self, types: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = SemanticType>,
    {
        let batch: Vec<SemanticType> = types.into_iter().collect();
        self.check_batch(&batch)?;
        for declaration in batch {
            debug!(semantic_type = %declaration.expr(), "registered semantic type");
            self.types.insert(declaration.name.clone(), declaration);
        }
        Ok(())
    }

    fn check_batch(&self, batch: &[SemanticType]) -> Result<(), RegistryError> {
        let mut pending: BTreeMap<&str, &SemanticType> = BTreeMap::new();
        for declaration in batch {
            let name = declaration.name();
            if !is_identifier(name) || name == VISUALIZATION {
                return Err(RegistryError::InvalidTypeExpr {
                    expr: name.to_owned(),
                    message: String::from("not a valid semantic type name"),
                });
            }
            if self.types.contains_key(name) || pending.insert(name, declaration).is_some() {
                return Err(RegistryError::DuplicateType {
                    name: name.to_owned(),
                });
            }
        }

        for declaration in batch {
            let Some(field) = declaration.field() else {
                continue;
            };
            if field.concrete_members().is_empty() {
                return Err(RegistryError::InvalidTypeExpr {
                    expr: declaration.expr().to_string(),
                    message: String::from("container field domain is empty"),
                });
            }
            for reference in field.referenced_names() {
                if reference == declaration.name() {
                    return Err(RegistryError::InvalidTypeExpr {
                        expr: declaration.expr().to_string(),
                        message: String::from("a container cannot range over itself"),
                    });
                }
                if !self.types.contains_key(reference) && !pending.contains_key(reference) {
                    return Err(RegistryError::UndefinedReference {
                        declaration: declaration.name().to_owned(),
                        reference: reference.to_owned(),
                    });
                }
            }
        }

        batch
            .iter()
            .find(|declaration| reaches_itself(declaration, &pending))
            .map_or(Ok(()), |declaration| {
                Err(RegistryError::InvalidTypeExpr {
                    expr: declaration.expr().to_string(),
                    message: String::from("container references form a cycle"),
                })
            })
    }

    /// Looks up a declaration by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SemanticType> {
        self.types.get(name)
    }

    /// Resolves a declaration by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownType`] if no type has that name.
    pub fn resolve(&self, name: &str) -> Result<&SemanticType, RegistryError> {
        self.get(name).ok_or_else(|| RegistryError::UnknownType {
            name: name.to_owned(),
        })
    }

    /// Validates that `expr` only uses registered types in a well-formed way.
    ///
    /// Every leaf must be registered, every parameterised head must be a
    /// container, and every concrete field member must belong to the
    /// container's declared domain.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownType`] for unregistered names and
    /// [`RegistryError::InvalidTypeExpr`] for structural violations.
    pub fn validate(&self, expr: &TypeExpr) -> Result<(), RegistryError> {
        match expr {
            TypeExpr::Leaf(name) => self.resolve(name).map(|_| ()),
            TypeExpr::Union(members) => {
                if members.is_empty() {
                    return Err(invalid(expr, "union has no members"));
                }
                members.iter().try_for_each(|member| self.validate(member))
            }
            TypeExpr::Parameterized { name, field } => {
                let declaration = self.resolve(name)?;
                let domain = declaration
                    .field()
                    .ok_or_else(|| invalid(expr, format!("'{name}' is not a container type")))?;
                self.validate(field)?;
                field
                    .concrete_members()
                    .into_iter()
                    .find(|member| !domain.admits(member))
                    .map_or(Ok(()), |rejected| {
                        Err(invalid(
                            expr,
                            format!("'{rejected}' is not admitted by {}", declaration.expr()),
                        ))
                    })
            }
        }
    }

    /// Iterates over declarations in name order.
    pub fn iter(&self) -> impl Iterator<Item = &SemanticType> {
        self.types.values()
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` when no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Follows container fields through the pending batch. Registered types
/// cannot refer back into a batch, so cycles only close inside it.
fn reaches_itself<'a>(
    start: &'a SemanticType,
    pending: &BTreeMap<&'a str, &'a SemanticType>,
) -> bool {
    let mut visited = BTreeSet::new();
    let mut frontier: Vec<&str> = start
        .field()
        .map(|field| field.referenced_names().into_iter().collect())
        .unwrap_or_default();
    while let Some(name) = frontier.pop() {
        if name == start.name() {
            return true;
        }
        if !visited.insert(name) {
            continue;
        }
        if let Some(field) = pending.get(name).copied().and_then(SemanticType::field) {
            frontier.extend(field.referenced_names());
        }
    }
    false
}

fn invalid(expr: &TypeExpr, message: impl Into<String>) -> RegistryError {
    RegistryError::InvalidTypeExpr {
        expr: expr.to_string(),
        message: message.into(),
    }
}
