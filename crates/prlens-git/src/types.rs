use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel accepted wherever a revision is expected, meaning the current
/// working tree including staged, unstaged and untracked changes.
pub const WORKING_TREE: &str = "WORKING_TREE";

/// One side of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Revision {
    /// Uncommitted state of the files on disk
    WorkingTree,
    /// Branch, tag, commit hash or any revspec that peels to a commit
    Named(String),
}

impl Revision {
    pub fn named(spec: impl Into<String>) -> Self {
        Revision::Named(spec.into())
    }

    pub fn is_working_tree(&self) -> bool {
        matches!(self, Revision::WorkingTree)
    }
}

impl From<&str> for Revision {
    fn from(s: &str) -> Self {
        if s == WORKING_TREE {
            Revision::WorkingTree
        } else {
            Revision::Named(s.to_string())
        }
    }
}

impl From<String> for Revision {
    fn from(s: String) -> Self {
        if s == WORKING_TREE {
            Revision::WorkingTree
        } else {
            Revision::Named(s)
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::WorkingTree => write!(f, "{}", WORKING_TREE),
            Revision::Named(spec) => write!(f, "{}", spec),
        }
    }
}

/// How a single file changed between two revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Copied => "copied",
        }
    }

    /// Whether this kind carries an `old_path`
    pub fn has_origin(&self) -> bool {
        matches!(self, ChangeKind::Renamed | ChangeKind::Copied)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file's change within a [`ChangeSet`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    pub insertions: usize,
    pub deletions: usize,
    #[serde(default)]
    pub binary: bool,
    /// Unified diff text; `None` when not requested or for binary files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl FileChange {
    /// Copy of this entry with the diff text dropped
    pub fn without_diff(&self) -> Self {
        Self {
            diff: None,
            truncated: false,
            ..self.clone()
        }
    }

    /// Directory portion of the path, `None` for files at the repository root
    pub fn directory(&self) -> Option<&str> {
        self.path.rsplit_once('/').map(|(dir, _)| dir)
    }

    /// Extension of the file name, without the dot
    pub fn extension(&self) -> Option<&str> {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
            _ => None,
        }
    }
}

/// Descriptive counts over a change set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub renamed: usize,
    pub copied: usize,
    pub binary: usize,
    /// File extension histogram
    pub file_types: BTreeMap<String, usize>,
    /// Distinct parent directories touched, sorted
    pub directories: Vec<String>,
}

/// Result of comparing two revisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    pub base: String,
    pub target: String,
    pub files: Vec<FileChange>,
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
    pub summary: ChangeSummary,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl ChangeSet {
    /// Build a change set whose totals are derived from `files`.
    pub fn from_files(base: &Revision, target: &Revision, files: Vec<FileChange>) -> Self {
        let insertions = files.iter().map(|f| f.insertions).sum();
        let deletions = files.iter().map(|f| f.deletions).sum();
        let truncated = files.iter().any(|f| f.truncated);
        let summary = summarize(&files);

        Self {
            base: base.to_string(),
            target: target.to_string(),
            files_changed: files.len(),
            files,
            insertions,
            deletions,
            summary,
            truncated,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Look up a file entry by its (new) path
    pub fn file(&self, path: &str) -> Option<&FileChange> {
        self.files.iter().find(|f| f.path == path)
    }
}

fn summarize(files: &[FileChange]) -> ChangeSummary {
    let mut summary = ChangeSummary::default();
    let mut directories = std::collections::BTreeSet::new();

    for file in files {
        match file.kind {
            ChangeKind::Added => summary.added += 1,
            ChangeKind::Modified => summary.modified += 1,
            ChangeKind::Deleted => summary.deleted += 1,
            ChangeKind::Renamed => summary.renamed += 1,
            ChangeKind::Copied => summary.copied += 1,
        }
        if file.binary {
            summary.binary += 1;
        }
        if let Some(ext) = file.extension() {
            *summary.file_types.entry(ext.to_string()).or_insert(0) += 1;
        }
        if let Some(dir) = file.directory() {
            directories.insert(dir.to_string());
        }
    }

    summary.directories = directories.into_iter().collect();
    summary
}

/// A commit between two revisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub id: String,
    pub short_id: String,
    pub summary: String,
    pub author: String,
    /// Commit date as YYYY-MM-DD (UTC)
    pub date: String,
}

/// Branch state of a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchInfo {
    /// `None` when HEAD is detached or unborn
    pub current_branch: Option<String>,
    pub head_commit: Option<String>,
    pub local_branches: Vec<String>,
    pub remote_branches: Vec<String>,
    pub is_clean: bool,
}
