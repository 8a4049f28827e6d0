//! Declarative plugin documents.
//!
//! A [`PluginDocument`] describes a whole plugin as data: metadata, semantic
//! types, formats, bindings and actions, with type expressions written as
//! text (`Kennel[Dog | Cat]`). Actions name their implementation by callable
//! identifier; the host supplies the callables through a [`FunctionTable`]
//! when the document is turned into a [`Plugin`].


use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::action::{ActionKind, ActionSpec, FunctionTable, Input, Output, Parameter};
use crate::error::RegistryError;
use crate::format::Format;
use crate::plugin::{Plugin, PluginMetadata};
use crate::semantic::{SemanticType, TypeExpr};

/// A binding of a semantic type expression to an artifact format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingDeclaration {
    /// Type expression to bind.
    #[serde(rename = "type")]
    pub semantic_type: TypeExpr,
    /// Directory format name.
    pub format: String,
}

/// An action as written in a plugin document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionDeclaration {
    /// Identifier of the implementing callable.
    pub callable: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Artifact inputs in declaration order.
    #[serde(default)]
    pub inputs: Vec<Input>,
    /// Primitive parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Outputs in declaration order.
    #[serde(default)]
    pub outputs: Vec<Output>,
    /// Input descriptions keyed by name.
    #[serde(default)]
    pub input_descriptions: BTreeMap<String, String>,
    /// Parameter descriptions keyed by name.
    #[serde(default)]
    pub parameter_descriptions: BTreeMap<String, String>,
    /// Output descriptions keyed by name.
    #[serde(default)]
    pub output_descriptions: BTreeMap<String, String>,
    /// Actions a pipeline invokes.
    #[serde(default)]
    pub invokes: Vec<String>,
}

impl ActionDeclaration {
    /// Resolves the callable and builds the registration request.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCallable`] if `functions` has no
    /// callable with the declared identifier.
    pub fn to_spec(&self, functions: &FunctionTable) -> Result<ActionSpec, RegistryError> {
        let callable = functions.resolve(&self.callable)?;
        let mut spec = ActionSpec::new(callable, self.title.as_str(), self.description.as_str());
        for input in &self.inputs {
            spec = spec.input(input.name.as_str(), input.semantic_type.clone());
        }
        for parameter in &self.parameters {
            spec = spec.parameter(parameter.name.as_str(), parameter.spec.clone());
        }
        for output in &self.outputs {
            spec = spec.output(output.name.as_str(), output.output_type.clone());
        }
        for (name, text) in &self.input_descriptions {
            spec = spec.input_description(name.as_str(), text.as_str());
        }
        for (name, text) in &self.parameter_descriptions {
            spec = spec.parameter_description(name.as_str(), text.as_str());
        }
        for (name, text) in &self.output_descriptions {
            spec = spec.output_description(name.as_str(), text.as_str());
        }
        for action in &self.invokes {
            spec = spec.invokes(action.as_str());
        }
        Ok(spec)
    }
}

/// A complete plugin written as data.
///
/// # Example
///
/// ```
/// use plugin_registry::{FunctionTable, PluginDocument};
///
/// let document = PluginDocument::from_json_str(
///     r#"{
///         "metadata": {"name": "tiny", "version": "1.0"},
///         "types": [{"name": "Dog"}, {"name": "Cat"}, {"name": "Kennel", "field": "Dog | Cat"}]
///     }"#,
/// )?;
/// let plugin = document.into_plugin(&FunctionTable::new())?;
/// assert_eq!(plugin.types().len(), 3);
/// # Ok::<(), plugin_registry::RegistryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginDocument {
    /// Plugin identity.
    pub metadata: PluginMetadata,
    /// Semantic type declarations.
    #[serde(default)]
    pub types: Vec<SemanticType>,
    /// Format declarations.
    #[serde(default)]
    pub formats: Vec<Format>,
    /// Type to format bindings, applied in order.
    #[serde(default)]
    pub bindings: Vec<BindingDeclaration>,
    /// Methods, registered in order.
    #[serde(default)]
    pub methods: Vec<ActionDeclaration>,
    /// Visualizers, registered in order.
    #[serde(default)]
    pub visualizers: Vec<ActionDeclaration>,
    /// Pipelines, registered in order after methods and visualizers.
    #[serde(default)]
    pub pipelines: Vec<ActionDeclaration>,
}

impl PluginDocument {
    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Document`] when the text is not a valid
    /// document.
    pub fn from_json_str(text: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(text).map_err(|error| RegistryError::Document {
            message: error.to_string(),
        })
    }

    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Document`] when the text is not a valid
    /// document.
    pub fn from_yaml_str(text: &str) -> Result<Self, RegistryError> {
        serde_saphyr::from_str(text).map_err(|error| RegistryError::Document {
            message: error.to_string(),
        })
    }

    /// Reads a document from disk, choosing the syntax from the extension.
    ///
    /// `.json` files are parsed as JSON; `.yaml` and `.yml` files as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DocumentIo`] when the file cannot be read and
    /// [`RegistryError::Document`] for unsupported extensions or invalid
    /// content.
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, RegistryError> = match extension.as_deref() {
            Some("json") => Self::from_json_str,
            Some("yaml" | "yml") => Self::from_yaml_str,
            _ => {
                return Err(RegistryError::Document {
                    message: format!(
                        "'{}' must have a .json, .yaml or .yml extension",
                        path.display()
                    ),
                });
            }
        };
        let text = fs::read_to_string(path).map_err(|source| RegistryError::DocumentIo {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        parse(&text)
    }

    /// Builds a plugin from the document.
    ///
    /// Declarations are applied in the order types, formats, bindings,
    /// methods, visualizers, pipelines. The first rejected declaration aborts
    /// the whole plugin.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] raised by metadata validation,
    /// callable resolution or registration.
    pub fn into_plugin(self, functions: &FunctionTable) -> Result<Plugin, RegistryError> {
        let mut plugin = Plugin::new(self.metadata)?;
        plugin.register_semantic_types(self.types)?;
        plugin.register_formats(self.formats)?;
        for binding in &self.bindings {
            plugin.register_semantic_type_to_format(&binding.semantic_type, &binding.format)?;
        }

        let declared = [
            (ActionKind::Method, &self.methods),
            (ActionKind::Visualizer, &self.visualizers),
            (ActionKind::Pipeline, &self.pipelines),
        ];
        for (kind, declarations) in declared {
            for declaration in declarations {
                declaration
                    .to_spec(functions)
                    .and_then(|spec| plugin.register_action(kind, spec))
                    .inspect_err(|error| {
                        warn!(
                            action = %declaration.callable,
                            kind = %kind,
                            %error,
                            "rejected action declaration"
                        );
                    })?;
            }
        }
        Ok(plugin)
    }
}
