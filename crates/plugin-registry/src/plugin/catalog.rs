//! Serialisable snapshot of everything a plugin registered.

use serde::{Deserialize, Serialize};

use super::{Plugin, PluginMetadata};
use crate::action::{Action, ActionKind, ActionMetadata, Signature};
use crate::format::Format;
use crate::semantic::{SemanticType, TypeExpr};

/// A binding of one concrete semantic type to its artifact format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingEntry {
    /// Concrete semantic type.
    #[serde(rename = "type")]
    pub semantic_type: TypeExpr,
    /// Name of the bound directory format.
    pub format: String,
}

/// A registered action without its callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    /// Action identifier.
    pub id: String,
    /// Action kind.
    pub kind: ActionKind,
    /// Typed signature.
    pub signature: Signature,
    /// Documentation.
    pub metadata: ActionMetadata,
    /// Actions invoked by a pipeline.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invokes: Vec<String>,
}

impl From<&Action> for ActionEntry {
    fn from(action: &Action) -> Self {
        Self {
            id: action.id().to_owned(),
            kind: action.kind(),
            signature: action.signature().clone(),
            metadata: action.metadata().clone(),
            invokes: action.invokes().to_vec(),
        }
    }
}

/// Everything a plugin registered, in deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCatalog {
    /// Plugin metadata.
    pub metadata: PluginMetadata,
    /// Semantic types in name order.
    pub types: Vec<SemanticType>,
    /// Formats in name order.
    pub formats: Vec<Format>,
    /// Bindings in type order.
    pub bindings: Vec<BindingEntry>,
    /// Actions in identifier order.
    pub actions: Vec<ActionEntry>,
}

impl From<&Plugin> for PluginCatalog {
    fn from(plugin: &Plugin) -> Self {
        Self {
            metadata: plugin.metadata().clone(),
            types: plugin.types().iter().cloned().collect(),
            formats: plugin.formats().iter().cloned().collect(),
            bindings: plugin
                .formats()
                .bindings()
                .map(|(semantic_type, format)| BindingEntry {
                    semantic_type: semantic_type.clone(),
                    format: format.to_owned(),
                })
                .collect(),
            actions: plugin.actions().iter().map(ActionEntry::from).collect(),
        }
    }
}
