use prlens_git::InspectError;
use prlens_templates::CatalogError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure categories reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "RepositoryNotFoundError")]
    RepositoryNotFound,
    #[serde(rename = "RevisionNotFoundError")]
    RevisionNotFound,
    #[serde(rename = "GitOperationError")]
    GitOperation,
    #[serde(rename = "CatalogUnavailableError")]
    CatalogUnavailable,
    #[serde(rename = "TemplateNotFoundError")]
    TemplateNotFound,
    #[serde(rename = "InvalidArgumentsError")]
    InvalidArguments,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::RepositoryNotFound => "RepositoryNotFoundError",
            ErrorKind::RevisionNotFound => "RevisionNotFoundError",
            ErrorKind::GitOperation => "GitOperationError",
            ErrorKind::CatalogUnavailable => "CatalogUnavailableError",
            ErrorKind::TemplateNotFound => "TemplateNotFoundError",
            ErrorKind::InvalidArguments => "InvalidArgumentsError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Inspect(#[from] InspectError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ToolError::InvalidArguments(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::InvalidArguments(_) => ErrorKind::InvalidArguments,
            ToolError::Inspect(e) => match e {
                InspectError::RepositoryNotFound(_) => ErrorKind::RepositoryNotFound,
                InspectError::RevisionNotFound(_) => ErrorKind::RevisionNotFound,
                InspectError::GitOperation(_) | InspectError::Unsupported(_) => {
                    ErrorKind::GitOperation
                }
            },
            ToolError::Catalog(e) => match e {
                CatalogError::CatalogUnavailable { .. } => ErrorKind::CatalogUnavailable,
                CatalogError::TemplateNotFound(_) => ErrorKind::TemplateNotFound,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err: ToolError = InspectError::RevisionNotFound("nope".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::RevisionNotFound);
        assert_eq!(err.to_string(), "Revision not found: nope");

        let err: ToolError = InspectError::Unsupported("bare".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::GitOperation);

        let err: ToolError = CatalogError::TemplateNotFound("x".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::TemplateNotFound);

        assert_eq!(
            ToolError::invalid("bad").kind(),
            ErrorKind::InvalidArguments
        );
    }

    #[test]
    fn test_kind_serializes_with_error_suffix() {
        let json = serde_json::to_value(ErrorKind::CatalogUnavailable).unwrap();
        assert_eq!(json, "CatalogUnavailableError");
        assert_eq!(ErrorKind::GitOperation.to_string(), "GitOperationError");
    }
}
