//! Descriptive plugin metadata.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Identity and attribution of a plugin.
///
/// Only `name` and `version` are required; the remaining fields are free-form
/// text surfaced to users of the host framework.
///
/// # Example
///
/// ```
/// use plugin_registry::PluginMetadata;
///
/// let metadata = PluginMetadata::new("dummy-plugin", "0.0.0-dev")
///     .with_website("https://example.com/dummy")
///     .with_citation_text("No citation available.");
/// assert!(metadata.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Plugin name.
    pub name: String,
    /// Plugin version string.
    pub version: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// One-line description.
    #[serde(default)]
    pub short_description: String,
    /// Project website.
    #[serde(default)]
    pub website: String,
    /// Package providing the plugin.
    #[serde(default)]
    pub package: String,
    /// How to cite the plugin.
    #[serde(default)]
    pub citation_text: String,
    /// Where users can get help.
    #[serde(default)]
    pub user_support_text: String,
}

impl PluginMetadata {
    /// Creates metadata with the required name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Sets the long description.
    #[must_use]
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Sets the one-line description.
    #[must_use]
    pub fn with_short_description(mut self, text: impl Into<String>) -> Self {
        self.short_description = text.into();
        self
    }

    /// Sets the project website.
    #[must_use]
    pub fn with_website(mut self, url: impl Into<String>) -> Self {
        self.website = url.into();
        self
    }

    /// Sets the providing package.
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Sets the citation text.
    #[must_use]
    pub fn with_citation_text(mut self, text: impl Into<String>) -> Self {
        self.citation_text = text.into();
        self
    }

    /// Sets the user support text.
    #[must_use]
    pub fn with_user_support_text(mut self, text: impl Into<String>) -> Self {
        self.user_support_text = text.into();
        self
    }

    /// Checks that the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Metadata`] when the name or version is blank.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::Metadata {
                message: String::from("plugin name must not be empty"),
            });
        }
        if self.version.trim().is_empty() {
            return Err(RegistryError::Metadata {
                message: format!("plugin '{}' has an empty version", self.name),
            });
        }
        Ok(())
    }
}
