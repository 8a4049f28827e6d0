//! Algebraic semantic type expressions.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::parse;
use crate::error::RegistryError;

/// A semantic type expression.
///
/// Expressions form a small tree: a named leaf (`IntSequence1`), a union of
/// expressions (`IntSequence1 | IntSequence2`), or a container applied to a
/// field expression (`Kennel[Dog | Cat]`). Unions are sets: member order is
/// irrelevant, nested unions are flattened and a union of one member collapses
/// to that member.
///
/// # Example
///
/// ```
/// use plugin_registry::TypeExpr;
///
/// let dog = TypeExpr::leaf("Dog");
/// let cat = TypeExpr::leaf("Cat");
/// let kennel = TypeExpr::parameterized("Kennel", dog.clone() | cat);
///
/// assert_eq!(kennel.to_string(), "Kennel[Cat | Dog]");
/// assert!(TypeExpr::parameterized("Kennel", dog).satisfies(&kennel));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeExpr {
    /// A named type.
    Leaf(String),
    /// A set of alternative types.
    Union(BTreeSet<TypeExpr>),
    /// A container type applied to a field expression.
    Parameterized {
        /// Container name.
        name: String,
        /// Field expression.
        field: Box<TypeExpr>,
    },
}

impl TypeExpr {
    /// Creates a leaf expression.
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::Leaf(name.into())
    }

    /// Creates a container expression over `field`.
    #[must_use]
    pub fn parameterized(name: impl Into<String>, field: Self) -> Self {
        Self::Parameterized {
            name: name.into(),
            field: Box::new(field),
        }
    }

    /// Creates a normalised union of `members`.
    #[must_use]
    pub fn union<I>(members: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut set = BTreeSet::new();
        for member in members {
            match member {
                Self::Union(inner) => set.extend(inner),
                other => {
                    set.insert(other);
                }
            }
        }
        if set.len() == 1 {
            if let Some(only) = set.pop_first() {
                return only;
            }
        }
        Self::Union(set)
    }

    /// Returns `true` when the expression denotes exactly one concrete type.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        match self {
            Self::Leaf(_) => true,
            Self::Union(_) => false,
            Self::Parameterized { field, .. } => field.is_concrete(),
        }
    }

    /// Expands the expression into the concrete types it denotes.
    ///
    /// `C[A | B]` expands to `{C[A], C[B]}` and `A | B` to `{A, B}`.
    #[must_use]
    pub fn concrete_members(&self) -> BTreeSet<Self> {
        match self {
            Self::Leaf(_) => BTreeSet::from([self.clone()]),
            Self::Union(members) => members.iter().flat_map(Self::concrete_members).collect(),
            Self::Parameterized { name, field } => field
                .concrete_members()
                .into_iter()
                .map(|member| Self::parameterized(name.clone(), member))
                .collect(),
        }
    }

    /// Returns `true` if the concrete type `concrete` is one of the types
    /// this expression admits.
    ///
    /// Union membership is checked member by member, so the cost is linear in
    /// the size of the union. A bare container leaf admits any
    /// parameterisation of that container.
    #[must_use]
    pub fn admits(&self, concrete: &Self) -> bool {
        match (self, concrete) {
            (Self::Union(members), _) => members.iter().any(|member| member.admits(concrete)),
            (Self::Leaf(expected), Self::Leaf(actual)) => expected == actual,
            (Self::Leaf(expected), Self::Parameterized { name, .. }) => expected == name,
            (
                Self::Parameterized {
                    name: expected,
                    field: domain,
                },
                Self::Parameterized { name, field },
            ) => {
                expected == name
                    && field
                        .concrete_members()
                        .iter()
                        .all(|member| domain.admits(member))
            }
            _ => false,
        }
    }

    /// Returns `true` if every concrete type denoted by `self` is admitted by
    /// `target`.
    #[must_use]
    pub fn satisfies(&self, target: &Self) -> bool {
        let members = self.concrete_members();
        !members.is_empty() && members.iter().all(|member| target.admits(member))
    }

    /// Returns every type name mentioned by the expression, containers
    /// included.
    #[must_use]
    pub fn referenced_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Self::Leaf(name) => {
                names.insert(name.as_str());
            }
            Self::Union(members) => {
                for member in members {
                    member.collect_names(names);
                }
            }
            Self::Parameterized { name, field } => {
                names.insert(name.as_str());
                field.collect_names(names);
            }
        }
    }
}

impl BitOr for TypeExpr {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::union([self, rhs])
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(name) => f.write_str(name),
            Self::Union(members) => {
                for (index, member) in members.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            Self::Parameterized { name, field } => write!(f, "{name}[{field}]"),
        }
    }
}

impl FromStr for TypeExpr {
    type Err = RegistryError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse::parse(input)
    }
}

impl TryFrom<String> for TypeExpr {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeExpr> for String {
    fn from(value: TypeExpr) -> Self {
        value.to_string()
    }
}
