use git2::{
    BranchType, Commit, Delta, Diff, DiffFindOptions, DiffOptions, ErrorCode, Patch, Repository,
    Sort, StatusOptions, Tree,
};
use std::path::Path;
use tracing::debug;

use crate::error::InspectError;
use crate::types::{BranchInfo, ChangeKind, ChangeSet, CommitInfo, FileChange, Revision};

/// Similarity (percent) above which a delete/add pair is reported as a
/// rename, or an add as a copy. Matches git's own default.
pub const DEFAULT_SIMILARITY_THRESHOLD: u16 = 50;

/// Default cap on the total bytes of diff text returned for one change set
pub const DEFAULT_MAX_DIFF_BYTES: usize = 200_000;

/// Default number of commits returned by [`RepositoryInspector::list_commits`]
pub const DEFAULT_COMMIT_LIMIT: usize = 10;

/// Read-only change analysis over a local repository.
///
/// Every call opens the repository at the given path, computes its result
/// and drops the handle before returning.
#[derive(Debug, Clone)]
pub struct RepositoryInspector {
    similarity_threshold: u16,
    max_diff_bytes: Option<usize>,
    merge_base: bool,
}

impl Default for RepositoryInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryInspector {
    pub fn new() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_diff_bytes: Some(DEFAULT_MAX_DIFF_BYTES),
            merge_base: false,
        }
    }

    pub fn with_similarity_threshold(mut self, threshold: u16) -> Self {
        self.similarity_threshold = threshold.min(100);
        self
    }

    /// Cap the diff text of a change set; `None` disables truncation
    pub fn with_max_diff_bytes(mut self, max: Option<usize>) -> Self {
        self.max_diff_bytes = max;
        self
    }

    /// Compare against the merge base of `base` and the target instead of
    /// `base` itself (the `base...target` form).
    pub fn with_merge_base(mut self, enabled: bool) -> Self {
        self.merge_base = enabled;
        self
    }

    /// Compute the full change set, per-file diff text included
    pub fn compare_revisions(
        &self,
        repo_path: &Path,
        base: &Revision,
        target: &Revision,
    ) -> Result<ChangeSet, InspectError> {
        let files = self.collect(repo_path, base, target, true)?;
        let change_set = ChangeSet::from_files(base, target, files);

        debug!(
            base = %base,
            target = %target,
            files_changed = change_set.files_changed,
            insertions = change_set.insertions,
            deletions = change_set.deletions,
            truncated = change_set.truncated,
            "Computed change set"
        );

        Ok(change_set)
    }

    /// Same as [`compare_revisions`](Self::compare_revisions) without
    /// producing diff text
    pub fn list_changed_files(
        &self,
        repo_path: &Path,
        base: &Revision,
        target: &Revision,
    ) -> Result<Vec<FileChange>, InspectError> {
        let files = self.collect(repo_path, base, target, false)?;
        debug!(base = %base, target = %target, files = files.len(), "Listed changed files");
        Ok(files)
    }

    /// Commits reachable from `target` but not from `base`, newest first.
    /// The working tree stands for HEAD on either side.
    pub fn list_commits(
        &self,
        repo_path: &Path,
        base: &Revision,
        target: &Revision,
        limit: usize,
    ) -> Result<Vec<CommitInfo>, InspectError> {
        let repo = open_repository(repo_path)?;
        let base_commit = commit_for(&repo, base)?;
        let target_commit = commit_for(&repo, target)?;

        let mut walk = repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.push(target_commit.id())?;
        walk.hide(base_commit.id())?;

        let mut commits = Vec::new();
        for oid in walk.take(limit) {
            let commit = repo.find_commit(oid?)?;
            commits.push(commit_info(&commit));
        }

        debug!(base = %base, target = %target, count = commits.len(), "Listed commits");
        Ok(commits)
    }

    /// Current branch, branch lists and cleanliness of the working tree
    pub fn branch_info(&self, repo_path: &Path) -> Result<BranchInfo, InspectError> {
        let repo = open_repository(repo_path)?;

        let (current_branch, head_commit) = match repo.head() {
            Ok(head) => {
                let branch = if head.is_branch() {
                    head.shorthand().map(|s| s.to_string())
                } else {
                    None
                };
                (branch, head.target().map(|oid| oid.to_string()))
            }
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                (unborn_branch_name(&repo), None)
            }
            Err(e) => return Err(e.into()),
        };

        let is_clean = if repo.is_bare() {
            true
        } else {
            let mut opts = StatusOptions::new();
            opts.include_untracked(true).recurse_untracked_dirs(true);
            repo.statuses(Some(&mut opts))?.is_empty()
        };

        Ok(BranchInfo {
            current_branch,
            head_commit,
            local_branches: branch_names(&repo, BranchType::Local)?,
            remote_branches: branch_names(&repo, BranchType::Remote)?,
            is_clean,
        })
    }

    fn collect(
        &self,
        repo_path: &Path,
        base: &Revision,
        target: &Revision,
        with_text: bool,
    ) -> Result<Vec<FileChange>, InspectError> {
        let repo = open_repository(repo_path)?;
        let diff = match self.build_diff(&repo, base, target)? {
            Some(diff) => diff,
            None => return Ok(Vec::new()),
        };

        // Base on the working tree is diffed in reverse; untracked files
        // then exist only on the base side.
        let reversed = base.is_working_tree() && !target.is_working_tree();
        let mut budget = if with_text { self.max_diff_bytes } else { None };
        let mut files = Vec::with_capacity(diff.deltas().len());

        for idx in 0..diff.deltas().len() {
            let Some(delta) = diff.get_delta(idx) else {
                continue;
            };
            let Some(kind) = change_kind(delta.status(), reversed) else {
                continue;
            };

            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            let old_path = if kind.has_origin() {
                delta
                    .old_file()
                    .path()
                    .map(|p| p.to_string_lossy().into_owned())
            } else {
                None
            };

            let mut change = FileChange {
                path,
                kind,
                old_path,
                insertions: 0,
                deletions: 0,
                binary: delta.flags().is_binary(),
                diff: None,
                truncated: false,
            };

            // Loading the patch fills in the binary flag for content not yet inspected.
            if let Some(mut patch) = Patch::from_diff(&diff, idx)? {
                change.binary = change.binary || patch.delta().flags().is_binary();
                if !change.binary {
                    let (_, insertions, deletions) = patch.line_stats()?;
                    change.insertions = insertions;
                    change.deletions = deletions;
                    if with_text {
                        let buf = patch.to_buf()?;
                        let text = String::from_utf8_lossy(&buf).into_owned();
                        let (text, truncated) = apply_budget(text, &mut budget);
                        change.diff = Some(text);
                        change.truncated = truncated;
                    }
                }
            }

            files.push(change);
        }

        Ok(files)
    }

    fn build_diff<'r>(
        &self,
        repo: &'r Repository,
        base: &Revision,
        target: &Revision,
    ) -> Result<Option<Diff<'r>>, InspectError> {
        // Base is resolved first so that an error names it when both are bad.
        let base_commit = match base {
            Revision::Named(spec) => Some(resolve_commit(repo, spec)?),
            Revision::WorkingTree => None,
        };
        let target_commit = match target {
            Revision::Named(spec) => Some(resolve_commit(repo, spec)?),
            Revision::WorkingTree => None,
        };

        let mut opts = DiffOptions::new();
        opts.include_typechange(true);

        let mut diff = match (base_commit, target_commit) {
            (None, None) => return Ok(None),
            (Some(base_commit), Some(target_commit)) => {
                let base_tree = self.base_tree(repo, &base_commit, &target_commit)?;
                let target_tree = target_commit.tree()?;
                repo.diff_tree_to_tree(Some(&base_tree), Some(&target_tree), Some(&mut opts))?
            }
            (Some(base_commit), None) => {
                ensure_worktree(repo)?;
                let base_tree = if self.merge_base {
                    let head = head_commit(repo)?;
                    self.base_tree(repo, &base_commit, &head)?
                } else {
                    base_commit.tree()?
                };
                opts.include_untracked(true)
                    .recurse_untracked_dirs(true)
                    .show_untracked_content(true);
                repo.diff_tree_to_workdir_with_index(Some(&base_tree), Some(&mut opts))?
            }
            (None, Some(target_commit)) => {
                ensure_worktree(repo)?;
                let target_tree = target_commit.tree()?;
                opts.include_untracked(true)
                    .recurse_untracked_dirs(true)
                    .show_untracked_content(true)
                    .reverse(true);
                repo.diff_tree_to_workdir_with_index(Some(&target_tree), Some(&mut opts))?
            }
        };

        let mut find = DiffFindOptions::new();
        find.renames(true)
            .copies(true)
            .for_untracked(true)
            .rename_threshold(self.similarity_threshold)
            .copy_threshold(self.similarity_threshold);
        diff.find_similar(Some(&mut find))?;

        Ok(Some(diff))
    }

    fn base_tree<'r>(
        &self,
        repo: &'r Repository,
        base: &Commit<'r>,
        target: &Commit<'r>,
    ) -> Result<Tree<'r>, InspectError> {
        if !self.merge_base {
            return Ok(base.tree()?);
        }
        let oid = repo.merge_base(base.id(), target.id())?;
        debug!(merge_base = %oid, "Resolved merge base");
        Ok(repo.find_commit(oid)?.tree()?)
    }
}

fn open_repository(repo_path: &Path) -> Result<Repository, InspectError> {
    if !repo_path.is_dir() {
        return Err(InspectError::RepositoryNotFound(
            repo_path.display().to_string(),
        ));
    }
    match Repository::open(repo_path) {
        Ok(repo) => Ok(repo),
        Err(e) if e.code() == ErrorCode::NotFound => Err(InspectError::RepositoryNotFound(
            repo_path.display().to_string(),
        )),
        Err(e) => Err(InspectError::GitOperation(e)),
    }
}

fn resolve_commit<'r>(repo: &'r Repository, spec: &str) -> Result<Commit<'r>, InspectError> {
    let object = repo.revparse_single(spec).map_err(|e| match e.code() {
        ErrorCode::NotFound | ErrorCode::InvalidSpec | ErrorCode::Ambiguous => {
            InspectError::RevisionNotFound(spec.to_string())
        }
        _ => InspectError::GitOperation(e),
    })?;

    object.peel_to_commit().map_err(|e| match e.code() {
        ErrorCode::NotFound | ErrorCode::InvalidSpec | ErrorCode::Peel => {
            InspectError::RevisionNotFound(spec.to_string())
        }
        _ => InspectError::GitOperation(e),
    })
}

fn head_commit(repo: &Repository) -> Result<Commit<'_>, InspectError> {
    match repo.head() {
        Ok(head) => Ok(head.peel_to_commit()?),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            Err(InspectError::RevisionNotFound("HEAD".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn commit_for<'r>(repo: &'r Repository, revision: &Revision) -> Result<Commit<'r>, InspectError> {
    match revision {
        Revision::Named(spec) => resolve_commit(repo, spec),
        Revision::WorkingTree => head_commit(repo),
    }
}

fn ensure_worktree(repo: &Repository) -> Result<(), InspectError> {
    if repo.is_bare() {
        return Err(InspectError::Unsupported(
            "bare repository has no working tree".to_string(),
        ));
    }
    Ok(())
}

/// Map a libgit2 delta status onto the reported kinds; `None` for entries
/// that are not changes. `reversed` is set when the working tree is the base.
fn change_kind(status: Delta, reversed: bool) -> Option<ChangeKind> {
    match status {
        Delta::Untracked if reversed => Some(ChangeKind::Deleted),
        Delta::Added | Delta::Untracked => Some(ChangeKind::Added),
        Delta::Deleted => Some(ChangeKind::Deleted),
        Delta::Modified | Delta::Typechange | Delta::Conflicted => Some(ChangeKind::Modified),
        Delta::Renamed => Some(ChangeKind::Renamed),
        Delta::Copied => Some(ChangeKind::Copied),
        Delta::Unmodified | Delta::Ignored | Delta::Unreadable => None,
    }
}

fn commit_info(commit: &Commit<'_>) -> CommitInfo {
    let id = commit.id().to_string();
    let short_id = id.chars().take(7).collect();
    let author = commit.author();
    let date = chrono::DateTime::from_timestamp(commit.time().seconds(), 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    CommitInfo {
        short_id,
        summary: commit.summary().unwrap_or("").to_string(),
        author: author.name().unwrap_or("unknown").to_string(),
        date,
        id,
    }
}

fn unborn_branch_name(repo: &Repository) -> Option<String> {
    let head = repo.find_reference("HEAD").ok()?;
    head.symbolic_target()
        .and_then(|target| target.strip_prefix("refs/heads/"))
        .map(|name| name.to_string())
}

fn branch_names(repo: &Repository, kind: BranchType) -> Result<Vec<String>, InspectError> {
    let mut names = Vec::new();
    for entry in repo.branches(Some(kind))? {
        let (branch, _) = entry?;
        if let Some(name) = branch.name()? {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Spend the remaining diff budget on `text`. Once the budget runs out the
/// text is cut at a line boundary and ends with a marker naming the number
/// of dropped lines.
fn apply_budget(text: String, budget: &mut Option<usize>) -> (String, bool) {
    let Some(remaining) = budget.as_mut() else {
        return (text, false);
    };

    if text.len() <= *remaining {
        *remaining -= text.len();
        return (text, false);
    }

    let mut kept = String::new();
    let mut dropped = 0usize;
    for line in text.split_inclusive('\n') {
        if dropped == 0 && kept.len() + line.len() <= *remaining {
            kept.push_str(line);
        } else {
            dropped += 1;
        }
    }
    *remaining = 0;

    kept.push_str(&format!("... [diff truncated: {} more lines]\n", dropped));
    (kept, true)
}
