//! Typed action signatures: inputs, parameters, outputs and descriptions.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::semantic::{TypeExpr, VISUALIZATION};

/// Primitive parameter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Boolean flag.
    Bool,
    /// Free-form text.
    Str,
    /// A whole metadata table.
    Metadata,
    /// A single metadata column.
    MetadataCategory,
}

impl Primitive {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Str => "str",
            Self::Metadata => "metadata",
            Self::MetadataCategory => "metadata_category",
        }
    }

    /// Returns `true` if `value` has the JSON shape of this primitive.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::Str => value.is_string(),
            Self::Metadata | Self::MetadataCategory => value.is_object(),
        }
    }

    /// Returns `true` if parameters of this primitive may carry [`Choices`].
    ///
    /// Only `int`, `bool` and `str` have a [`ChoiceValue`] form.
    #[must_use]
    pub const fn supports_choices(self) -> bool {
        matches!(self, Self::Int | Self::Bool | Self::Str)
    }

    fn admits_choice(self, choice: &ChoiceValue) -> bool {
        matches!(
            (self, choice),
            (Self::Int, ChoiceValue::Int(_))
                | (Self::Bool, ChoiceValue::Bool(_))
                | (Self::Str, ChoiceValue::Str(_))
        )
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value permitted by a [`Choices`] constraint.
///
/// Choices are exact-match sets, so there is no float form; `float`,
/// `metadata` and `metadata_category` parameters cannot declare choices.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    /// Boolean choice.
    Bool(bool),
    /// Integer choice.
    Int(i64),
    /// Text choice.
    Str(String),
}

impl ChoiceValue {
    /// Converts a JSON scalar into a choice value. Non-integral numbers have
    /// no choice form and yield `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(Self::Bool(*flag)),
            Value::Number(number) => number.as_i64().map(Self::Int),
            Value::String(text) => Some(Self::Str(text.clone())),
            _ => None,
        }
    }
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ChoiceValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ChoiceValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// An enumerated set of permitted parameter values.
///
/// # Example
///
/// ```
/// use plugin_registry::Choices;
///
/// let choices = Choices::new(["arity", "type"]);
/// assert!(choices.contains(&"arity".into()));
/// assert!(!choices.contains(&"internal".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Choices(BTreeSet<ChoiceValue>);

impl Choices {
    /// Creates a choice set.
    #[must_use]
    pub fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ChoiceValue>,
    {
        Self(values.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if `value` is one of the choices.
    #[must_use]
    pub fn contains(&self, value: &ChoiceValue) -> bool {
        self.0.contains(value)
    }

    /// Iterates over the choices in order.
    pub fn iter(&self) -> impl Iterator<Item = &ChoiceValue> {
        self.0.iter()
    }

    /// Returns the number of choices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Declared type of an action parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    primitive: Primitive,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    choices: Option<Choices>,
}

impl ParameterSpec {
    /// Declares an unconstrained parameter.
    #[must_use]
    pub const fn new(primitive: Primitive) -> Self {
        Self {
            primitive,
            choices: None,
        }
    }

    /// Restricts the parameter to an enumerated set of values.
    #[must_use]
    pub fn with_choices(mut self, choices: Choices) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Returns the primitive type.
    #[must_use]
    pub const fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// Returns the choice constraint, if any.
    #[must_use]
    pub const fn choices(&self) -> Option<&Choices> {
        self.choices.as_ref()
    }

    /// Returns `true` if `value` satisfies the primitive type and any choice
    /// constraint.
    ///
    /// Registration never calls this; it exists for execution engines that
    /// validate call arguments.
    #[must_use]
    pub fn admits(&self, value: &Value) -> bool {
        if !self.primitive.accepts(value) {
            return false;
        }
        self.choices.as_ref().is_none_or(|choices| {
            ChoiceValue::from_json(value).is_some_and(|choice| choices.contains(&choice))
        })
    }

    pub(crate) fn foreign_choices(&self) -> Option<&ChoiceValue> {
        self.choices
            .as_ref()
            .and_then(|choices| choices.iter().find(|c| !self.primitive.admits_choice(c)))
    }
}

impl From<Primitive> for ParameterSpec {
    fn from(value: Primitive) -> Self {
        Self::new(value)
    }
}

/// Declared type of an action output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputType {
    /// An artifact of the given semantic type.
    Artifact(TypeExpr),
    /// A visualization.
    Visualization,
}

impl OutputType {
    /// Returns the semantic type of artifact outputs.
    #[must_use]
    pub const fn semantic_type(&self) -> Option<&TypeExpr> {
        match self {
            Self::Artifact(semantic_type) => Some(semantic_type),
            Self::Visualization => None,
        }
    }
}

impl From<TypeExpr> for OutputType {
    fn from(value: TypeExpr) -> Self {
        Self::Artifact(value)
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Artifact(semantic_type) => write!(f, "{semantic_type}"),
            Self::Visualization => f.write_str(VISUALIZATION),
        }
    }
}

impl TryFrom<String> for OutputType {
    type Error = crate::error::RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim() == VISUALIZATION {
            Ok(Self::Visualization)
        } else {
            value.parse().map(Self::Artifact)
        }
    }
}

impl From<OutputType> for String {
    fn from(value: OutputType) -> Self {
        value.to_string()
    }
}

/// A named artifact input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Input name.
    pub name: String,
    /// Accepted semantic type.
    #[serde(rename = "type")]
    pub semantic_type: TypeExpr,
}

/// A named primitive parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared parameter type.
    #[serde(flatten)]
    pub spec: ParameterSpec,
}

/// A named output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Output name.
    pub name: String,
    /// Declared output type.
    #[serde(rename = "type")]
    pub output_type: OutputType,
}

/// The typed signature of an action.
///
/// Inputs, parameters and outputs keep the order in which they were
/// declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    inputs: Vec<Input>,
    #[serde(default)]
    parameters: Vec<Parameter>,
    #[serde(default)]
    outputs: Vec<Output>,
}

impl Signature {
    /// Creates an empty signature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_input(&mut self, name: String, semantic_type: TypeExpr) {
        self.inputs.push(Input {
            name,
            semantic_type,
        });
    }

    pub(crate) fn push_parameter(&mut self, name: String, spec: ParameterSpec) {
        self.parameters.push(Parameter { name, spec });
    }

    pub(crate) fn push_output(&mut self, name: String, output_type: OutputType) {
        self.outputs.push(Output { name, output_type });
    }

    /// Returns the declared inputs.
    #[must_use]
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    /// Returns the declared parameters.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns the declared outputs.
    #[must_use]
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Looks up an input type by name.
    #[must_use]
    pub fn input(&self, name: &str) -> Option<&TypeExpr> {
        self.inputs
            .iter()
            .find(|input| input.name == name)
            .map(|input| &input.semantic_type)
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters
            .iter()
            .find(|parameter| parameter.name == name)
            .map(|parameter| &parameter.spec)
    }

    /// Looks up an output type by name.
    #[must_use]
    pub fn output(&self, name: &str) -> Option<&OutputType> {
        self.outputs
            .iter()
            .find(|output| output.name == name)
            .map(|output| &output.output_type)
    }

    /// Returns the number of arguments a callable must accept.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.inputs.len() + self.parameters.len()
    }

    /// Iterates over every declared name with its role.
    pub(crate) fn names(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let inputs = self.inputs.iter().map(|i| ("input", i.name.as_str()));
        let parameters = self
            .parameters
            .iter()
            .map(|p| ("parameter", p.name.as_str()));
        let outputs = self.outputs.iter().map(|o| ("output", o.name.as_str()));
        inputs.chain(parameters).chain(outputs)
    }
}

/// Human-facing documentation attached to an action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMetadata {
    /// Short human-readable title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Descriptions keyed by input name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub input_descriptions: BTreeMap<String, String>,
    /// Descriptions keyed by parameter name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameter_descriptions: BTreeMap<String, String>,
    /// Descriptions keyed by output name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub output_descriptions: BTreeMap<String, String>,
}
