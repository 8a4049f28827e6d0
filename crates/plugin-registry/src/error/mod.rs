//! Domain errors raised while registering or querying plugin capabilities.
//!
//! Every registration failure is surfaced synchronously as a
//! [`RegistryError`] variant carrying structured context so plugin authors
//! and tests can inspect the failure programmatically. I/O errors are wrapped
//! in `Arc` to satisfy the `result_large_err` Clippy lint.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising from plugin registration and lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A semantic type with the same name is already registered.
    #[error("semantic type '{name}' is already registered")]
    DuplicateType {
        /// Name of the rejected type.
        name: String,
    },

    /// A declaration references a type or format that has not been registered.
    #[error("'{declaration}' references unregistered '{reference}'")]
    UndefinedReference {
        /// Name of the declaration holding the reference.
        declaration: String,
        /// The unresolved name.
        reference: String,
    },

    /// The requested semantic type is not registered.
    #[error("semantic type '{name}' is not registered")]
    UnknownType {
        /// Name that was looked up.
        name: String,
    },

    /// A type expression is structurally invalid for this registry.
    #[error("invalid type expression '{expr}': {message}")]
    InvalidTypeExpr {
        /// Rendered type expression.
        expr: String,
        /// Description of the problem.
        message: String,
    },

    /// Type expression text could not be parsed.
    #[error("cannot parse type expression '{input}': {message}")]
    TypeSyntax {
        /// The offending input.
        input: String,
        /// Description of the parse failure.
        message: String,
    },

    /// A format with the same name is already registered.
    #[error("format '{name}' is already registered")]
    DuplicateFormat {
        /// Name of the rejected format.
        name: String,
    },

    /// A format declaration is malformed or unusable for the request.
    #[error("invalid format '{name}': {message}")]
    InvalidFormat {
        /// Format name.
        name: String,
        /// Description of the problem.
        message: String,
    },

    /// A binding names a semantic type that is not registered.
    #[error("cannot bind unregistered semantic type '{type_expr}'")]
    UnregisteredType {
        /// Rendered type expression.
        type_expr: String,
    },

    /// A binding names a format that is not registered.
    #[error("format '{name}' is not registered")]
    UnregisteredFormat {
        /// Format name.
        name: String,
    },

    /// The semantic type already has an artifact format in this plugin.
    #[error("semantic type '{type_expr}' is already bound to format '{format}'")]
    AlreadyBound {
        /// Rendered type expression.
        type_expr: String,
        /// Format already bound to the type.
        format: String,
    },

    /// A member of a composite type is bound to a different format.
    #[error(
        "cannot bind '{type_expr}' to '{requested}': member already bound to '{existing}'"
    )]
    ConflictingBinding {
        /// Concrete member whose binding conflicts.
        type_expr: String,
        /// Format the member is already bound to.
        existing: String,
        /// Format requested by the new binding.
        requested: String,
    },

    /// An action signature is invalid.
    #[error("invalid signature for action '{action}': {message}")]
    Signature {
        /// Action identifier.
        action: String,
        /// Description of the problem.
        message: String,
    },

    /// The callable's arity differs from the number of declared inputs and
    /// parameters.
    #[error("action '{action}' declares {expected} inputs and parameters but its callable takes {actual}")]
    ArityMismatch {
        /// Action identifier.
        action: String,
        /// Number of declared inputs plus parameters.
        expected: usize,
        /// Arity of the callable.
        actual: usize,
    },

    /// An action with the same identifier is already registered.
    #[error("action '{action}' is already registered")]
    DuplicateAction {
        /// Action identifier.
        action: String,
    },

    /// The requested action is not registered.
    #[error("action '{action}' is not registered")]
    UnknownAction {
        /// Action identifier that was looked up.
        action: String,
    },

    /// A plugin document references a callable the host did not supply.
    #[error("no callable named '{callable}' is available")]
    UnknownCallable {
        /// Callable identifier.
        callable: String,
    },

    /// Plugin metadata failed validation.
    #[error("plugin metadata error: {message}")]
    Metadata {
        /// Description of the validation failure.
        message: String,
    },

    /// A plugin document could not be parsed.
    #[error("failed to parse plugin document: {message}")]
    Document {
        /// Human-readable description of the parse failure.
        message: String,
    },

    /// A plugin document could not be read from disk.
    #[error("failed to read plugin document '{}': {source}", path.display())]
    DocumentIo {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

/// Failure reported by an action callable at execution time.
///
/// The registry never produces this error itself; it is the return type of
/// [`Callable::invoke`](crate::action::Callable::invoke) so execution engines
/// receive a uniform failure shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ActionFailure {
    message: String,
}

impl ActionFailure {
    /// Creates a failure with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the failure message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

#[cfg(test)]
mod tests;
