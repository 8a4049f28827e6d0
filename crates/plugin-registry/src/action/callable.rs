//! Callables backing registered actions.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{ActionFailure, RegistryError};

/// Named arguments passed to a callable: inputs and parameters by name.
pub type Arguments = BTreeMap<String, Value>;

type ActionBody = dyn Fn(&Arguments) -> Result<Vec<Value>, ActionFailure> + Send + Sync;

/// A function implementing an action.
///
/// The registry only inspects the identifier and the declared arity; the body
/// is invoked by an external execution engine. Outputs are returned in the
/// order the action declares them.
///
/// # Example
///
/// ```
/// use plugin_registry::{Arguments, Callable};
/// use serde_json::json;
///
/// let double = Callable::new("double", 1, |args: &Arguments| {
///     let n = args.get("n").and_then(|v| v.as_i64()).unwrap_or_default();
///     Ok(vec![json!(n * 2)])
/// });
///
/// let mut args = Arguments::new();
/// args.insert("n".into(), json!(21));
/// assert_eq!(double.invoke(&args).unwrap(), vec![json!(42)]);
/// ```
#[derive(Clone)]
pub struct Callable {
    id: String,
    arity: usize,
    body: Arc<ActionBody>,
}

impl Callable {
    /// Wraps `body` as a callable named `id` accepting `arity` arguments.
    pub fn new<F>(id: impl Into<String>, arity: usize, body: F) -> Self
    where
        F: Fn(&Arguments) -> Result<Vec<Value>, ActionFailure> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            arity,
            body: Arc::new(body),
        }
    }

    /// Returns the callable identifier, which becomes the action identifier.
    #[must_use]
    pub const fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the number of arguments the callable accepts.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Runs the callable.
    ///
    /// # Errors
    ///
    /// Returns whatever [`ActionFailure`] the body reports.
    pub fn invoke(&self, arguments: &Arguments) -> Result<Vec<Value>, ActionFailure> {
        (self.body)(arguments)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("id", &self.id)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Host-supplied callables available to declarative plugin documents.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    callables: HashMap<String, Callable>,
}

impl FunctionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a callable, replacing any callable with the same identifier.
    pub fn insert(&mut self, callable: Callable) {
        self.callables.insert(callable.id.clone(), callable);
    }

    /// Looks up a callable by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Callable> {
        self.callables.get(id)
    }

    /// Resolves a callable by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCallable`] if the table has no such
    /// callable.
    pub fn resolve(&self, id: &str) -> Result<Callable, RegistryError> {
        self.get(id)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownCallable {
                callable: id.to_owned(),
            })
    }

    /// Returns the number of callables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callables.len()
    }

    /// Returns `true` when the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callables.is_empty()
    }
}

impl FromIterator<Callable> for FunctionTable {
    fn from_iter<T: IntoIterator<Item = Callable>>(iter: T) -> Self {
        let mut table = Self::new();
        for callable in iter {
            table.insert(callable);
        }
        table
    }
}
