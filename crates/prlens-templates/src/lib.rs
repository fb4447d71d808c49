//! # prlens-templates
//!
//! Pull request template catalog for prlens.
//!
//! Templates are plain Markdown files (`*.md`) in one directory. The file
//! stem is the template identifier and the first heading is its title.
//! An optional `index.toml` alongside them adds a description and a
//! "suitable for" list per template.
//! Nothing here decides which template fits a change; callers get the
//! list and the bodies and choose for themselves.
//!
//! ## Key Types
//!
//! - [`TemplateStore`] - The fixed template directory
//! - [`TemplateCatalog`] - Immutable snapshot loaded from the directory
//! - [`TemplateDescriptor`] - Identifier, title, description and (optionally) body
//! - [`TemplateIndex`] - Metadata read from `index.toml`

pub mod catalog;
pub mod metadata;
pub mod parser;
pub mod types;

pub use catalog::{TemplateCatalog, TemplateStore};
pub use metadata::{TemplateIndex, TemplateMetadata, INDEX_FILE_NAME};
pub use parser::{extract_title, template_identifier, TEMPLATE_EXTENSION};
pub use types::{CatalogError, TemplateDescriptor};
