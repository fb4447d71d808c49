//! # prlens-tools
//!
//! The tool boundary of prlens. An external agent calls tools by name with a
//! JSON argument object; [`ToolFacade::invoke`] validates the arguments,
//! delegates to the repository inspector or the template catalog and wraps
//! the result in a [`ToolResponse`] envelope.
//!
//! ## Tools
//!
//! - `analyze_file_changes` - change set between two revisions
//! - `list_pr_templates` - template identifiers and titles
//! - `get_pr_template` - one template's full body
//! - `get_git_status` - branch and cleanliness information
//! - `list_commits` - commits between two revisions
//!
//! Every failure is reported as one of the [`ErrorKind`]s.

mod call;
mod error;
mod facade;
mod response;
mod schemas;

pub use call::{AnalyzeArgs, ListCommitsArgs, ToolCall, TOOL_NAMES};
pub use error::{ErrorKind, ToolError};
pub use facade::ToolFacade;
pub use response::{ToolOutput, ToolResponse};
pub use schemas::tool_definitions;
