//! Typed actions and the action registry.
//!
//! An [`Action`] is a [`Callable`] registered under its identifier together
//! with a typed [`Signature`] and documentation. Actions come in three kinds:
//! methods (pure transforms producing artifacts), visualizers (producing a
//! single visualization) and pipelines (composing other registered actions).
//! The [`ActionRegistry`] validates signatures against a [`TypeRegistry`]
//! at registration time and never executes anything.

mod callable;
mod signature;


use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RegistryError;
use crate::semantic::{TypeExpr, TypeRegistry};

pub use self::callable::{Arguments, Callable, FunctionTable};
pub use self::signature::{
    ActionMetadata, ChoiceValue, Choices, Input, Output, OutputType, Parameter, ParameterSpec,
    Primitive, Signature,
};

/// Name of the output every visualizer produces.
pub const VISUALIZATION_OUTPUT: &str = "visualization";

/// Category of a registered action.
///
/// # Example
///
/// ```
/// use plugin_registry::ActionKind;
///
/// assert_eq!(ActionKind::Pipeline.as_str(), "pipeline");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// A pure transform producing artifacts.
    Method,
    /// Produces a visualization consumed by people, not by other actions.
    Visualizer,
    /// Composes other registered actions.
    Pipeline,
}

impl ActionKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Visualizer => "visualizer",
            Self::Pipeline => "pipeline",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a plugin author supplies when registering an action.
///
/// # Example
///
/// ```
/// use plugin_registry::{ActionSpec, Arguments, Callable, ParameterSpec, Primitive, TypeExpr};
///
/// let callable = Callable::new("split_ints", 1, |_: &Arguments| Ok(Vec::new()));
/// let spec = ActionSpec::new(callable, "Split sequence of integers in half", "Splits.")
///     .input("ints", TypeExpr::leaf("IntSequence1"))
///     .output("left", TypeExpr::leaf("IntSequence1"))
///     .output("right", TypeExpr::leaf("IntSequence1"));
///
/// assert_eq!(spec.id(), "split_ints");
/// assert_eq!(spec.signature().outputs().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ActionSpec {
    callable: Callable,
    signature: Signature,
    metadata: ActionMetadata,
    invokes: Vec<String>,
}

impl ActionSpec {
    /// Starts describing an action backed by `callable`.
    #[must_use]
    pub fn new(callable: Callable, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            callable,
            signature: Signature::new(),
            metadata: ActionMetadata {
                title: title.into(),
                description: description.into(),
                ..ActionMetadata::default()
            },
            invokes: Vec::new(),
        }
    }

    /// Declares an artifact input.
    #[must_use]
    pub fn input(mut self, name: impl Into<String>, semantic_type: TypeExpr) -> Self {
        self.signature.push_input(name.into(), semantic_type);
        self
    }

    /// Declares a primitive parameter.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, spec: impl Into<ParameterSpec>) -> Self {
        self.signature.push_parameter(name.into(), spec.into());
        self
    }

    /// Declares an output.
    #[must_use]
    pub fn output(mut self, name: impl Into<String>, output_type: impl Into<OutputType>) -> Self {
        self.signature.push_output(name.into(), output_type.into());
        self
    }

    /// Documents an input.
    #[must_use]
    pub fn input_description(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.metadata
            .input_descriptions
            .insert(name.into(), text.into());
        self
    }

    /// Documents a parameter.
    #[must_use]
    pub fn parameter_description(
        mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.metadata
            .parameter_descriptions
            .insert(name.into(), text.into());
        self
    }

    /// Documents an output.
    #[must_use]
    pub fn output_description(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.metadata
            .output_descriptions
            .insert(name.into(), text.into());
        self
    }

    /// Records that a pipeline invokes the registered action `action`.
    #[must_use]
    pub fn invokes(mut self, action: impl Into<String>) -> Self {
        self.invokes.push(action.into());
        self
    }

    /// Returns the action identifier.
    #[must_use]
    pub const fn id(&self) -> &str {
        self.callable.id()
    }

    /// Returns the callable implementing the action.
    #[must_use]
    pub const fn callable(&self) -> &Callable {
        &self.callable
    }

    /// Returns the signature declared so far.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Returns the documentation declared so far.
    #[must_use]
    pub const fn metadata(&self) -> &ActionMetadata {
        &self.metadata
    }
}

/// A registered action.
#[derive(Debug, Clone)]
pub struct Action {
    kind: ActionKind,
    callable: Callable,
    signature: Signature,
    metadata: ActionMetadata,
    invokes: Vec<String>,
}

impl Action {
    /// Returns the action identifier.
    #[must_use]
    pub const fn id(&self) -> &str {
        self.callable.id()
    }

    /// Returns the action kind.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Returns the callable implementing the action.
    #[must_use]
    pub const fn callable(&self) -> &Callable {
        &self.callable
    }

    /// Returns the typed signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Returns the documentation.
    #[must_use]
    pub const fn metadata(&self) -> &ActionMetadata {
        &self.metadata
    }

    /// Returns the actions a pipeline invokes.
    #[must_use]
    pub fn invokes(&self) -> &[String] {
        &self.invokes
    }
}

/// Registry of actions keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: BTreeMap<String, Action>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers an action of the given kind.
    ///
    /// Visualizers must not declare outputs; the registry records their
    /// single `visualization` output itself.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateAction`] if the identifier is taken,
    /// [`RegistryError::Signature`] for unresolved types, malformed names,
    /// kind violations or unknown invoked actions, and
    /// [`RegistryError::ArityMismatch`] when the callable arity differs from
    /// the number of inputs and parameters.
    pub fn register_action(
        &mut self,
        kind: ActionKind,
        spec: ActionSpec,
        types: &TypeRegistry,
    ) -> Result<(), RegistryError> {
        let ActionSpec {
            callable,
            mut signature,
            metadata,
            invokes,
        } = spec;
        let id = callable.id().to_owned();
        if self.actions.contains_key(&id) {
            return Err(RegistryError::DuplicateAction { action: id });
        }

        if kind == ActionKind::Visualizer {
            if !signature.outputs().is_empty() {
                return Err(signature_error(&id, "visualizers must not declare outputs"));
            }
            signature.push_output(VISUALIZATION_OUTPUT.to_owned(), OutputType::Visualization);
        }

        check_names(&id, &signature)?;
        check_types(&id, &signature, types)?;
        check_kind(&id, kind, &signature)?;
        check_descriptions(&id, &signature, &metadata)?;
        self.check_invokes(&id, kind, &invokes)?;

        let expected = signature.arity();
        if callable.arity() != expected {
            return Err(RegistryError::ArityMismatch {
                action: id,
                expected,
                actual: callable.arity(),
            });
        }

        debug!(action = %id, kind = %kind, "registered action");
        self.actions.insert(
            id,
            Action {
                kind,
                callable,
                signature,
                metadata,
                invokes,
            },
        );
        Ok(())
    }

    fn check_invokes(
        &self,
        id: &str,
        kind: ActionKind,
        invokes: &[String],
    ) -> Result<(), RegistryError> {
        if invokes.is_empty() {
            return Ok(());
        }
        if kind != ActionKind::Pipeline {
            return Err(signature_error(id, "only pipelines may invoke other actions"));
        }
        invokes
            .iter()
            .find(|name| !self.actions.contains_key(*name))
            .map_or(Ok(()), |missing| {
                Err(signature_error(
                    id,
                    format!("pipeline invokes unregistered action '{missing}'"),
                ))
            })
    }

    /// Looks up an action by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Action> {
        self.actions.get(id)
    }

    /// Resolves an action by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownAction`] if no action has that
    /// identifier.
    pub fn resolve(&self, id: &str) -> Result<&Action, RegistryError> {
        self.get(id).ok_or_else(|| RegistryError::UnknownAction {
            action: id.to_owned(),
        })
    }

    /// Returns the signature of an action.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownAction`] if no action has that
    /// identifier.
    pub fn signature(&self, id: &str) -> Result<&Signature, RegistryError> {
        self.resolve(id).map(Action::signature)
    }

    /// Returns every action of the given kind in identifier order.
    #[must_use]
    pub fn by_kind(&self, kind: ActionKind) -> Vec<&Action> {
        self.actions.values().filter(|a| a.kind == kind).collect()
    }

    /// Iterates over actions in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }

    /// Returns the number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` when no actions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

fn signature_error(id: &str, message: impl Into<String>) -> RegistryError {
    RegistryError::Signature {
        action: id.to_owned(),
        message: message.into(),
    }
}

fn check_names(id: &str, signature: &Signature) -> Result<(), RegistryError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for (role, name) in signature.names() {
        if name.trim().is_empty() {
            return Err(signature_error(id, format!("{role} names must not be empty")));
        }
        if !seen.insert(name) {
            return Err(signature_error(id, format!("name '{name}' is declared twice")));
        }
    }
    Ok(())
}

fn check_types(id: &str, signature: &Signature, types: &TypeRegistry) -> Result<(), RegistryError> {
    let inputs = signature
        .inputs()
        .iter()
        .map(|input| (&input.name, &input.semantic_type));
    let outputs = signature
        .outputs()
        .iter()
        .filter_map(|output| output.output_type.semantic_type().map(|t| (&output.name, t)));
    for (name, semantic_type) in inputs.chain(outputs) {
        types
            .validate(semantic_type)
            .map_err(|error| signature_error(id, format!("'{name}': {error}")))?;
    }
    for parameter in signature.parameters() {
        let primitive = parameter.spec.primitive();
        if parameter.spec.choices().is_some() && !primitive.supports_choices() {
            return Err(signature_error(
                id,
                format!(
                    "parameter '{}' is {primitive}, which cannot declare choices",
                    parameter.name
                ),
            ));
        }
        if let Some(choice) = parameter.spec.foreign_choices() {
            return Err(signature_error(
                id,
                format!(
                    "choice {choice:?} of parameter '{}' is not a {} value",
                    parameter.name,
                    parameter.spec.primitive()
                ),
            ));
        }
    }
    Ok(())
}

fn check_kind(id: &str, kind: ActionKind, signature: &Signature) -> Result<(), RegistryError> {
    match kind {
        ActionKind::Method => {
            if signature.outputs().is_empty() {
                return Err(signature_error(id, "methods must declare at least one output"));
            }
            if signature
                .outputs()
                .iter()
                .any(|o| o.output_type == OutputType::Visualization)
            {
                return Err(signature_error(id, "methods cannot produce visualizations"));
            }
            Ok(())
        }
        ActionKind::Pipeline => {
            if signature.outputs().is_empty() {
                return Err(signature_error(id, "pipelines must declare at least one output"));
            }
            Ok(())
        }
        ActionKind::Visualizer => Ok(()),
    }
}

fn check_descriptions(
    id: &str,
    signature: &Signature,
    metadata: &ActionMetadata,
) -> Result<(), RegistryError> {
    let described = [
        ("input", &metadata.input_descriptions),
        ("parameter", &metadata.parameter_descriptions),
        ("output", &metadata.output_descriptions),
    ];
    for (role, descriptions) in described {
        for name in descriptions.keys() {
            let declared = match role {
                "input" => signature.input(name).is_some(),
                "parameter" => signature.parameter(name).is_some(),
                _ => signature.output(name).is_some(),
            };
            if !declared {
                return Err(signature_error(
                    id,
                    format!("description given for undeclared {role} '{name}'"),
                ));
            }
        }
    }
    Ok(())
}
