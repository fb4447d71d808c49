use prlens_git::{ChangeSet, CommitInfo, RepositoryInspector};
use prlens_logging::{Logger, ToolEvent};
use prlens_templates::TemplateStore;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::call::{AnalyzeArgs, ListCommitsArgs, ToolCall};
use crate::error::ToolError;
use crate::response::{ToolOutput, ToolResponse};

/// Single entry point for tool invocations.
///
/// Holds the startup defaults (repository path, template directory and
/// inspector settings); nothing else survives between calls.
pub struct ToolFacade {
    inspector: RepositoryInspector,
    templates: TemplateStore,
    default_repo: PathBuf,
    logger: Option<Arc<Logger>>,
}

impl ToolFacade {
    pub fn new(default_repo: impl Into<PathBuf>, templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            inspector: RepositoryInspector::new(),
            templates: TemplateStore::new(templates_dir),
            default_repo: default_repo.into(),
            logger: None,
        }
    }

    pub fn with_inspector(mut self, inspector: RepositoryInspector) -> Self {
        self.inspector = inspector;
        self
    }

    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Validate and run one tool call. Every outcome, including bad input,
    /// comes back as a [`ToolResponse`].
    pub fn invoke(&self, name: &str, arguments: &Value) -> ToolResponse {
        let invocation_id = Uuid::new_v4().to_string();
        let started = Instant::now();

        self.emit(ToolEvent::ToolInvoked {
            invocation_id: invocation_id.clone(),
            tool: name.to_string(),
        });

        let result = ToolCall::parse(name, arguments).and_then(|call| self.execute(call));
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(data) => {
                self.emit(ToolEvent::ToolSucceeded {
                    invocation_id,
                    tool: name.to_string(),
                    duration_ms,
                });
                ToolResponse::success(name, data)
            }
            Err(err) => {
                let response = ToolResponse::failure(&err);
                self.emit(ToolEvent::ToolFailed {
                    invocation_id,
                    tool: name.to_string(),
                    error_kind: err.kind().to_string(),
                    message: err.to_string(),
                    duration_ms,
                });
                response
            }
        }
    }

    /// Run an already validated call
    pub fn execute(&self, call: ToolCall) -> Result<ToolOutput, ToolError> {
        match call {
            ToolCall::AnalyzeFileChanges(args) => {
                self.analyze_file_changes(args).map(ToolOutput::ChangeSet)
            }
            ToolCall::ListPrTemplates => Ok(ToolOutput::Templates(self.templates.list_templates()?)),
            ToolCall::GetPrTemplate { identifier } => {
                Ok(ToolOutput::Template(self.templates.get_template(&identifier)?))
            }
            ToolCall::GetGitStatus { repo_path } => {
                let repo = self.repo_path(repo_path.as_deref());
                Ok(ToolOutput::Branch(self.inspector.branch_info(repo)?))
            }
            ToolCall::ListCommits(args) => self.list_commits(args).map(ToolOutput::Commits),
        }
    }

    fn analyze_file_changes(&self, args: AnalyzeArgs) -> Result<ChangeSet, ToolError> {
        let repo = self.repo_path(args.repo_path.as_deref());
        let mut inspector = self.inspector.clone().with_merge_base(args.merge_base);
        // 0 lifts the cap, as in the config file
        if let Some(max) = args.max_diff_bytes {
            inspector = inspector.with_max_diff_bytes((max > 0).then_some(max));
        }

        debug!(
            repo = %repo.display(),
            base = %args.base,
            target = %args.target,
            include_diff_text = args.include_diff_text,
            "Analyzing file changes"
        );

        if args.include_diff_text {
            Ok(inspector.compare_revisions(repo, &args.base, &args.target)?)
        } else {
            let files = inspector.list_changed_files(repo, &args.base, &args.target)?;
            Ok(ChangeSet::from_files(&args.base, &args.target, files))
        }
    }

    fn list_commits(&self, args: ListCommitsArgs) -> Result<Vec<CommitInfo>, ToolError> {
        let repo = self.repo_path(args.repo_path.as_deref());
        Ok(self
            .inspector
            .list_commits(repo, &args.base, &args.target, args.limit)?)
    }

    fn repo_path<'a>(&'a self, requested: Option<&'a Path>) -> &'a Path {
        requested.unwrap_or(&self.default_repo)
    }

    fn emit(&self, event: ToolEvent) {
        if let Some(ref logger) = self.logger {
            logger.log(&event);
        }
    }
}
