use prlens_git::{BranchInfo, ChangeSet, CommitInfo};
use prlens_templates::TemplateDescriptor;
use serde::Serialize;

use crate::error::{ErrorKind, ToolError};

/// Result data of a successful tool call
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    ChangeSet(ChangeSet),
    Templates(Vec<TemplateDescriptor>),
    Template(TemplateDescriptor),
    Branch(BranchInfo),
    Commits(Vec<CommitInfo>),
}

/// The envelope every invocation returns.
///
/// Serializes as `{"status": "success", "tool", "data"}` or
/// `{"status": "failure", "errorKind", "message"}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolResponse {
    Success {
        tool: String,
        data: ToolOutput,
    },
    #[serde(rename_all = "camelCase")]
    Failure {
        error_kind: ErrorKind,
        message: String,
    },
}

impl ToolResponse {
    pub fn success(tool: impl Into<String>, data: ToolOutput) -> Self {
        ToolResponse::Success {
            tool: tool.into(),
            data,
        }
    }

    pub fn failure(error: &ToolError) -> Self {
        ToolResponse::Failure {
            error_kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolResponse::Success { .. })
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            ToolResponse::Success { .. } => None,
            ToolResponse::Failure { error_kind, .. } => Some(*error_kind),
        }
    }
}
