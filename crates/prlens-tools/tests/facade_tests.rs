use std::fs;
use std::path::{Path, PathBuf};

use git2::{IndexAddOption, Repository, RepositoryInitOptions, Signature};
use prlens_git::RepositoryInspector;
use prlens_tools::{ErrorKind, ToolFacade, ToolOutput, ToolResponse};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Helper: repository on `main` with one commit, plus uncommitted edits:
/// `a.txt` added (10 lines) and `b.txt` deleted (5 lines).
fn create_repo_with_changes() -> TempDir {
    let dir = TempDir::new().unwrap();
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Repository::init_opts(dir.path(), &opts).unwrap();

    let lines = |prefix: &str, n: usize| -> String {
        (1..=n).map(|i| format!("{} {}\n", prefix, i)).collect()
    };

    fs::write(dir.path().join("b.txt"), lines("bravo", 5)).unwrap();
    fs::write(dir.path().join("README.md"), "# Project\n").unwrap();

    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("Tester", "tester@example.com").unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap();

    fs::write(dir.path().join("a.txt"), lines("alpha", 10)).unwrap();
    fs::remove_file(dir.path().join("b.txt")).unwrap();

    dir
}

fn bundled_templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

fn facade_for(repo: &Path) -> ToolFacade {
    ToolFacade::new(repo, bundled_templates_dir())
}

fn expect_failure(response: &ToolResponse) -> (ErrorKind, String) {
    match response {
        ToolResponse::Failure {
            error_kind,
            message,
        } => (*error_kind, message.clone()),
        other => panic!("expected failure, got {:?}", other),
    }
}

fn expect_data(response: ToolResponse) -> ToolOutput {
    match response {
        ToolResponse::Success { data, .. } => data,
        ToolResponse::Failure { message, .. } => panic!("expected success: {}", message),
    }
}

// ============================================================
// analyze_file_changes
// ============================================================

#[test]
fn test_analyze_working_tree_scenario() {
    let repo = create_repo_with_changes();
    let facade = facade_for(repo.path());

    let response = facade.invoke("analyze_file_changes", &json!({"baseRef": "main"}));
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["status"], "success");
    assert_eq!(json["tool"], "analyze_file_changes");
    assert_eq!(json["data"]["filesChanged"], 2);
    assert_eq!(json["data"]["insertions"], 10);
    assert_eq!(json["data"]["deletions"], 5);
    assert_eq!(json["data"]["target"], "WORKING_TREE");

    let kinds: Vec<(&str, &str)> = json["data"]["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| (f["path"].as_str().unwrap(), f["kind"].as_str().unwrap()))
        .collect();
    assert!(kinds.contains(&("a.txt", "added")));
    assert!(kinds.contains(&("b.txt", "deleted")));
}

#[test]
fn test_include_diff_text_does_not_change_files_or_stats() {
    let repo = create_repo_with_changes();
    let facade = facade_for(repo.path());

    let with_diff = expect_data(facade.invoke(
        "analyze_file_changes",
        &json!({"baseRef": "main", "includeDiffText": true}),
    ));
    let without_diff = expect_data(facade.invoke(
        "analyze_file_changes",
        &json!({"baseRef": "main", "includeDiffText": false}),
    ));

    let (with_diff, without_diff) = match (with_diff, without_diff) {
        (ToolOutput::ChangeSet(a), ToolOutput::ChangeSet(b)) => (a, b),
        other => panic!("unexpected outputs {:?}", other),
    };

    assert_eq!(with_diff.files_changed, without_diff.files_changed);
    assert_eq!(with_diff.insertions, without_diff.insertions);
    assert_eq!(with_diff.deletions, without_diff.deletions);
    assert_eq!(with_diff.summary, without_diff.summary);

    let stripped: Vec<_> = with_diff.files.iter().map(|f| f.without_diff()).collect();
    assert_eq!(stripped, without_diff.files);
    assert!(with_diff.files.iter().all(|f| f.diff.is_some()));
    assert!(without_diff.files.iter().all(|f| f.diff.is_none()));
}

#[test]
fn test_unknown_base_ref_names_the_ref() {
    let repo = create_repo_with_changes();
    let facade = facade_for(repo.path());

    let response = facade.invoke(
        "analyze_file_changes",
        &json!({"baseRef": "no-such-branch"}),
    );
    let (kind, message) = expect_failure(&response);
    assert_eq!(kind, ErrorKind::RevisionNotFound);
    assert!(message.contains("no-such-branch"));

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "failure");
    assert_eq!(json["errorKind"], "RevisionNotFoundError");
}

#[test]
fn test_repo_path_argument_overrides_default() {
    let repo = create_repo_with_changes();
    let not_a_repo = TempDir::new().unwrap();
    let facade = facade_for(not_a_repo.path());

    let (kind, _) = expect_failure(&facade.invoke(
        "analyze_file_changes",
        &json!({"baseRef": "main"}),
    ));
    assert_eq!(kind, ErrorKind::RepositoryNotFound);

    let response = facade.invoke(
        "analyze_file_changes",
        &json!({"baseRef": "main", "repoPath": repo.path().to_str().unwrap()}),
    );
    assert!(response.is_success());
}

#[test]
fn test_max_diff_bytes_truncates() {
    let repo = create_repo_with_changes();
    let facade = facade_for(repo.path());

    let data = expect_data(facade.invoke(
        "analyze_file_changes",
        &json!({"baseRef": "main", "maxDiffBytes": 16}),
    ));
    match data {
        ToolOutput::ChangeSet(set) => {
            assert!(set.truncated);
            assert_eq!(set.insertions, 10);
            assert_eq!(set.deletions, 5);
        }
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn test_max_diff_bytes_zero_lifts_configured_cap() {
    let repo = create_repo_with_changes();
    let facade = ToolFacade::new(repo.path(), bundled_templates_dir())
        .with_inspector(RepositoryInspector::new().with_max_diff_bytes(Some(16)));

    let capped = expect_data(facade.invoke("analyze_file_changes", &json!({"baseRef": "main"})));
    assert!(matches!(capped, ToolOutput::ChangeSet(ref set) if set.truncated));

    let data = expect_data(facade.invoke(
        "analyze_file_changes",
        &json!({"baseRef": "main", "maxDiffBytes": 0}),
    ));
    match data {
        ToolOutput::ChangeSet(set) => {
            assert!(!set.truncated);
            assert!(set
                .files
                .iter()
                .all(|f| f.diff.as_deref().is_some_and(|d| !d.contains("[diff truncated"))));
        }
        other => panic!("unexpected output {:?}", other),
    }
}

// ============================================================
// Validation
// ============================================================

#[test]
fn test_missing_argument_is_invalid() {
    let facade = facade_for(Path::new("."));

    let (kind, message) = expect_failure(&facade.invoke("analyze_file_changes", &json!({})));
    assert_eq!(kind, ErrorKind::InvalidArguments);
    assert!(message.contains("baseRef"));

    let (kind, message) = expect_failure(&facade.invoke("get_pr_template", &Value::Null));
    assert_eq!(kind, ErrorKind::InvalidArguments);
    assert!(message.contains("identifier"));
}

#[test]
fn test_unknown_tool_is_invalid() {
    let facade = facade_for(Path::new("."));
    let (kind, message) = expect_failure(&facade.invoke("validate_pr_description", &json!({})));

    assert_eq!(kind, ErrorKind::InvalidArguments);
    assert!(message.contains("validate_pr_description"));
}

// ============================================================
// Templates
// ============================================================

#[test]
fn test_get_bugfix_template() {
    let facade = facade_for(Path::new("."));
    let data = expect_data(facade.invoke("get_pr_template", &json!({"identifier": "bugfix"})));

    match data {
        ToolOutput::Template(template) => {
            assert_eq!(template.identifier, "bugfix");
            assert!(template
                .body
                .unwrap()
                .contains("# Bug Fix: [Brief Description]"));
        }
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn test_list_templates_then_get_each() {
    let facade = facade_for(Path::new("."));
    let data = expect_data(facade.invoke("list_pr_templates", &Value::Null));

    let templates = match data {
        ToolOutput::Templates(t) => t,
        other => panic!("unexpected output {:?}", other),
    };
    assert!(!templates.is_empty());

    for template in templates {
        let response = facade.invoke(
            "get_pr_template",
            &json!({"identifier": template.identifier}),
        );
        assert!(response.is_success());
    }
}

#[test]
fn test_unknown_template() {
    let facade = facade_for(Path::new("."));
    let (kind, message) =
        expect_failure(&facade.invoke("get_pr_template", &json!({"identifier": "nope"})));

    assert_eq!(kind, ErrorKind::TemplateNotFound);
    assert!(message.contains("nope"));
}

#[test]
fn test_missing_template_dir() {
    let dir = TempDir::new().unwrap();
    let facade = ToolFacade::new(dir.path(), dir.path().join("missing"));

    let (kind, _) = expect_failure(&facade.invoke("list_pr_templates", &json!({})));
    assert_eq!(kind, ErrorKind::CatalogUnavailable);
}

// ============================================================
// Status and commits
// ============================================================

#[test]
fn test_git_status_reports_dirty_tree() {
    let repo = create_repo_with_changes();
    let facade = facade_for(repo.path());

    let json = serde_json::to_value(facade.invoke("get_git_status", &json!({}))).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["currentBranch"], "main");
    assert_eq!(json["data"]["isClean"], false);
}

#[test]
fn test_list_commits_between_same_ref_is_empty() {
    let repo = create_repo_with_changes();
    let facade = facade_for(repo.path());

    let data = expect_data(facade.invoke(
        "list_commits",
        &json!({"baseRef": "main", "targetRef": "main"}),
    ));
    match data {
        ToolOutput::Commits(commits) => assert!(commits.is_empty()),
        other => panic!("unexpected output {:?}", other),
    }
}

// ============================================================
// Environment errors
// ============================================================

#[test]
fn test_bare_repository_working_tree_is_git_operation_error() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init_bare(dir.path()).unwrap();
    let sig = Signature::now("Tester", "tester@example.com").unwrap();
    let tree = repo
        .find_tree(repo.treebuilder(None).unwrap().write().unwrap())
        .unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap();

    let facade = facade_for(dir.path());
    let response = facade.invoke("analyze_file_changes", &json!({"baseRef": "HEAD"}));

    let (kind, _) = expect_failure(&response);
    assert_eq!(kind, ErrorKind::GitOperation);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["errorKind"], "GitOperationError");
}

#[test]
fn test_working_tree_base_reports_untracked_as_deleted() {
    let repo = create_repo_with_changes();
    let facade = facade_for(repo.path());

    let json = serde_json::to_value(facade.invoke(
        "analyze_file_changes",
        &json!({"baseRef": "WORKING_TREE", "targetRef": "main", "includeDiffText": false}),
    ))
    .unwrap();

    let files = json["data"]["files"].as_array().unwrap();
    let kind_of = |path: &str| {
        files
            .iter()
            .find(|f| f["path"] == path)
            .map(|f| f["kind"].as_str().unwrap().to_string())
    };
    assert_eq!(kind_of("a.txt").as_deref(), Some("deleted"));
    assert_eq!(kind_of("b.txt").as_deref(), Some("added"));
    assert_eq!(json["data"]["insertions"], 5);
    assert_eq!(json["data"]["deletions"], 10);
}
