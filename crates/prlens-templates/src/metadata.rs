use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Optional side file describing the templates in a directory
pub const INDEX_FILE_NAME: &str = "index.toml";

/// Descriptive fields for one template, keyed by identifier in the index:
///
/// ```toml
/// [bugfix]
/// description = "For fixing bugs and issues"
/// suitable_for = ["Bug fixes", "Error handling improvements"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateMetadata {
    pub description: Option<String>,
    #[serde(default)]
    pub suitable_for: Vec<String>,
}

/// Parsed `index.toml`. Templates without an entry get defaults.
#[derive(Debug, Clone, Default)]
pub struct TemplateIndex {
    entries: BTreeMap<String, TemplateMetadata>,
}

impl TemplateIndex {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        Ok(Self {
            entries: toml::from_str(content)?,
        })
    }

    /// Read the index in `dir`. A missing file is an empty index; a file
    /// that cannot be read or parsed is logged and treated the same way.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(INDEX_FILE_NAME);
        if !path.is_file() {
            return Self::default();
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read template index {:?}: {}", path, e);
                return Self::default();
            }
        };

        Self::parse(&content).unwrap_or_else(|e| {
            warn!("Ignoring malformed template index {:?}: {}", path, e);
            Self::default()
        })
    }

    /// Description and suitability list for `identifier`
    pub fn describe(&self, identifier: &str) -> (String, Vec<String>) {
        let meta = self.entries.get(identifier).cloned().unwrap_or_default();
        let description = meta
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Template for {}", identifier));
        (description, meta.suitable_for)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_uses_entry() {
        let index = TemplateIndex::parse(
            r#"
[hotfix]
description = "For critical production issues"
suitable_for = ["Service outages"]
"#,
        )
        .unwrap();

        let (description, suitable_for) = index.describe("hotfix");
        assert_eq!(description, "For critical production issues");
        assert_eq!(suitable_for, vec!["Service outages".to_string()]);
    }

    #[test]
    fn test_describe_falls_back() {
        let index = TemplateIndex::parse("[docs]\nsuitable_for = [\"README updates\"]\n").unwrap();

        let (description, suitable_for) = index.describe("docs");
        assert_eq!(description, "Template for docs");
        assert_eq!(suitable_for, vec!["README updates".to_string()]);

        let (description, suitable_for) = index.describe("unlisted");
        assert_eq!(description, "Template for unlisted");
        assert!(suitable_for.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(TemplateIndex::parse("[docs]\ntitle = \"Docs\"\n").is_err());
    }
}
