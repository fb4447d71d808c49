use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Template directory unavailable: {path}: {reason}")]
    CatalogUnavailable { path: PathBuf, reason: String },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),
}

/// One pull request template.
///
/// `body` is `None` in listings and present when a single template is
/// fetched. `description` and `suitable_for` come from the directory's
/// `index.toml` when it has an entry for the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    pub identifier: String,
    pub title: String,
    pub file_name: String,
    pub description: String,
    #[serde(default)]
    pub suitable_for: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl TemplateDescriptor {
    /// Copy without the body, for list views
    pub fn summary(&self) -> Self {
        Self {
            body: None,
            ..self.clone()
        }
    }
}
