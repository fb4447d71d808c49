//! # prlens-git
//!
//! Read-only git change analysis for prlens.
//!
//! This crate compares two revisions of a local repository (or a revision
//! against the working tree) and reports what changed, file by file, so an
//! external agent can describe the change in a pull request.
//!
//! ## Key Types
//!
//! - [`RepositoryInspector`] - Computes change sets, file lists, commits and branch info
//! - [`ChangeSet`] - Ordered file changes plus aggregate statistics
//! - [`FileChange`] - One file's kind, line counts and unified diff
//! - [`Revision`] - A revspec or the [`WORKING_TREE`] sentinel
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prlens_git::{RepositoryInspector, Revision};
//! use std::path::Path;
//!
//! let inspector = RepositoryInspector::new();
//! let changes = inspector.compare_revisions(
//!     Path::new("."),
//!     &Revision::named("main"),
//!     &Revision::WorkingTree,
//! )?;
//!
//! println!("{} files, +{} -{}", changes.files_changed, changes.insertions, changes.deletions);
//! ```
//!
//! ## Detection
//!
//! Renames and copies are detected with a similarity threshold of
//! [`DEFAULT_SIMILARITY_THRESHOLD`] percent. Binary files are flagged and
//! carry no diff text. The repository is never written to.

mod error;
mod inspector;
mod types;

pub use error::InspectError;
pub use inspector::{
    RepositoryInspector, DEFAULT_COMMIT_LIMIT, DEFAULT_MAX_DIFF_BYTES,
    DEFAULT_SIMILARITY_THRESHOLD,
};
pub use types::{
    BranchInfo, ChangeKind, ChangeSet, ChangeSummary, CommitInfo, FileChange, Revision,
    WORKING_TREE,
};
