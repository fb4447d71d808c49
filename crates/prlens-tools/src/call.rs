use prlens_git::{Revision, DEFAULT_COMMIT_LIMIT};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::error::ToolError;

/// Names of every tool, in definition order
pub const TOOL_NAMES: [&str; 5] = [
    "analyze_file_changes",
    "list_pr_templates",
    "get_pr_template",
    "get_git_status",
    "list_commits",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeArgs {
    pub repo_path: Option<PathBuf>,
    pub base: Revision,
    pub target: Revision,
    pub include_diff_text: bool,
    pub merge_base: bool,
    pub max_diff_bytes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCommitsArgs {
    pub repo_path: Option<PathBuf>,
    pub base: Revision,
    pub target: Revision,
    pub limit: usize,
}

/// A validated tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    AnalyzeFileChanges(AnalyzeArgs),
    ListPrTemplates,
    GetPrTemplate { identifier: String },
    GetGitStatus { repo_path: Option<PathBuf> },
    ListCommits(ListCommitsArgs),
}

impl ToolCall {
    /// Validate `arguments` for the tool called `name`.
    ///
    /// `arguments` must be a JSON object or null. Unknown fields are ignored.
    pub fn parse(name: &str, arguments: &Value) -> Result<Self, ToolError> {
        let args = Args::new(arguments)?;

        match name {
            "analyze_file_changes" => Ok(ToolCall::AnalyzeFileChanges(AnalyzeArgs {
                repo_path: args.optional_path("repoPath")?,
                base: Revision::from(args.required_str("baseRef")?),
                target: args.revision_or_working_tree("targetRef")?,
                include_diff_text: args.optional_bool("includeDiffText")?.unwrap_or(true),
                merge_base: args.optional_bool("mergeBase")?.unwrap_or(false),
                max_diff_bytes: args.optional_usize("maxDiffBytes")?,
            })),
            "list_pr_templates" => Ok(ToolCall::ListPrTemplates),
            "get_pr_template" => Ok(ToolCall::GetPrTemplate {
                identifier: args.required_str("identifier")?,
            }),
            "get_git_status" => Ok(ToolCall::GetGitStatus {
                repo_path: args.optional_path("repoPath")?,
            }),
            "list_commits" => {
                let limit = args
                    .optional_usize("limit")?
                    .unwrap_or(DEFAULT_COMMIT_LIMIT);
                if limit == 0 {
                    return Err(ToolError::invalid("Argument 'limit' must be at least 1"));
                }
                Ok(ToolCall::ListCommits(ListCommitsArgs {
                    repo_path: args.optional_path("repoPath")?,
                    base: Revision::from(args.required_str("baseRef")?),
                    target: args.revision_or_working_tree("targetRef")?,
                    limit,
                }))
            }
            other => Err(ToolError::invalid(format!("Unknown tool: {}", other))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::AnalyzeFileChanges(_) => "analyze_file_changes",
            ToolCall::ListPrTemplates => "list_pr_templates",
            ToolCall::GetPrTemplate { .. } => "get_pr_template",
            ToolCall::GetGitStatus { .. } => "get_git_status",
            ToolCall::ListCommits(_) => "list_commits",
        }
    }
}

/// Typed accessors over a JSON argument object
struct Args<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Args<'a> {
    fn new(arguments: &'a Value) -> Result<Self, ToolError> {
        match arguments {
            Value::Null => Ok(Self { map: None }),
            Value::Object(map) => Ok(Self { map: Some(map) }),
            _ => Err(ToolError::invalid("Arguments must be a JSON object")),
        }
    }

    /// Absent and explicit null are treated alike
    fn get(&self, field: &str) -> Option<&'a Value> {
        self.map
            .and_then(|m| m.get(field))
            .filter(|v| !v.is_null())
    }

    fn required_str(&self, field: &str) -> Result<String, ToolError> {
        match self.optional_str(field)? {
            Some(s) if s.trim().is_empty() => Err(ToolError::invalid(format!(
                "Argument '{}' must not be empty",
                field
            ))),
            Some(s) => Ok(s),
            None => Err(ToolError::invalid(format!(
                "Missing required argument: {}",
                field
            ))),
        }
    }

    fn optional_str(&self, field: &str) -> Result<Option<String>, ToolError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ToolError::invalid(format!(
                "Argument '{}' must be a string",
                field
            ))),
        }
    }

    fn optional_bool(&self, field: &str) -> Result<Option<bool>, ToolError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(ToolError::invalid(format!(
                "Argument '{}' must be a boolean",
                field
            ))),
        }
    }

    fn optional_usize(&self, field: &str) -> Result<Option<usize>, ToolError> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| {
                    ToolError::invalid(format!(
                        "Argument '{}' must be a non-negative integer",
                        field
                    ))
                }),
        }
    }

    fn optional_path(&self, field: &str) -> Result<Option<PathBuf>, ToolError> {
        Ok(self.optional_str(field)?.map(PathBuf::from))
    }

    fn revision_or_working_tree(&self, field: &str) -> Result<Revision, ToolError> {
        Ok(self
            .optional_str(field)?
            .map(Revision::from)
            .unwrap_or(Revision::WorkingTree))
    }
}
