use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::metadata::TemplateIndex;
use crate::parser::{extract_title, template_identifier};
use crate::types::{CatalogError, TemplateDescriptor};

/// An immutable snapshot of the template directory, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, TemplateDescriptor>,
}

impl TemplateCatalog {
    /// Summaries sorted by identifier, bodies omitted
    pub fn summaries(&self) -> Vec<TemplateDescriptor> {
        self.templates.values().map(|t| t.summary()).collect()
    }

    /// Full descriptor for `identifier`
    pub fn get(&self, identifier: &str) -> Result<TemplateDescriptor, CatalogError> {
        self.templates
            .get(identifier)
            .cloned()
            .ok_or_else(|| CatalogError::TemplateNotFound(identifier.to_string()))
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Provides access to the template files in a fixed directory.
///
/// Each query loads a fresh [`TemplateCatalog`] so listing and lookup always
/// agree within one snapshot.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates_dir: PathBuf,
}

impl TemplateStore {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Scan the directory into a snapshot.
    ///
    /// A missing or unreadable directory is an error; an empty one is not.
    /// Individual files that cannot be read as UTF-8 text are skipped.
    /// Descriptions come from `index.toml` when present.
    pub fn load(&self) -> Result<TemplateCatalog, CatalogError> {
        let unavailable = |reason: String| CatalogError::CatalogUnavailable {
            path: self.templates_dir.clone(),
            reason,
        };

        if !self.templates_dir.is_dir() {
            return Err(unavailable("not a directory".to_string()));
        }

        let entries =
            std::fs::read_dir(&self.templates_dir).map_err(|e| unavailable(e.to_string()))?;

        let index = TemplateIndex::load(&self.templates_dir);
        let mut templates = BTreeMap::new();

        for entry in entries {
            let entry = entry.map_err(|e| unavailable(e.to_string()))?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let Some(identifier) = template_identifier(&path) else {
                continue;
            };

            let body = match std::fs::read_to_string(&path) {
                Ok(body) => body,
                Err(e) => {
                    warn!("Failed to read template {:?}: {}", path, e);
                    continue;
                }
            };

            let title = extract_title(&body).unwrap_or_else(|| identifier.clone());
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let (description, suitable_for) = index.describe(&identifier);

            templates.insert(
                identifier.clone(),
                TemplateDescriptor {
                    identifier,
                    title,
                    file_name,
                    description,
                    suitable_for,
                    body: Some(body),
                },
            );
        }

        debug!(
            dir = %self.templates_dir.display(),
            count = templates.len(),
            "Loaded template catalog"
        );

        Ok(TemplateCatalog { templates })
    }

    /// List templates sorted by identifier, bodies omitted.
    pub fn list_templates(&self) -> Result<Vec<TemplateDescriptor>, CatalogError> {
        Ok(self.load()?.summaries())
    }

    /// Get a template with its full body.
    pub fn get_template(&self, identifier: &str) -> Result<TemplateDescriptor, CatalogError> {
        self.load()?.get(identifier)
    }
}
