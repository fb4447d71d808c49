use prlens_git::{DEFAULT_COMMIT_LIMIT, WORKING_TREE};
use serde_json::{json, Value};

/// Descriptors for every tool: `name`, `description` and a JSON schema
/// under `inputSchema`.
pub fn tool_definitions() -> Vec<Value> {
    vec![
        analyze_file_changes_schema(),
        list_pr_templates_schema(),
        get_pr_template_schema(),
        get_git_status_schema(),
        list_commits_schema(),
    ]
}

fn repo_path_property() -> Value {
    json!({
        "type": "string",
        "description": "Path to the git repository (defaults to the service's repository)"
    })
}

fn analyze_file_changes_schema() -> Value {
    json!({
        "name": "analyze_file_changes",
        "description": "Compare two revisions and return the changed files with per-file insertions, deletions, change kind and optional unified diff text.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "repoPath": repo_path_property(),
                "baseRef": {
                    "type": "string",
                    "description": "Base branch, tag or commit"
                },
                "targetRef": {
                    "type": "string",
                    "description": format!(
                        "Target branch, tag or commit; {} (default) compares against uncommitted changes",
                        WORKING_TREE
                    )
                },
                "includeDiffText": {
                    "type": "boolean",
                    "description": "Include unified diff text per file (default true)"
                },
                "mergeBase": {
                    "type": "boolean",
                    "description": "Compare from the merge base of baseRef and the target (default false)"
                },
                "maxDiffBytes": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Cap on total diff text; later diffs are truncated. 0 means no cap"
                }
            },
            "required": ["baseRef"]
        }
    })
}

fn list_pr_templates_schema() -> Value {
    json!({
        "name": "list_pr_templates",
        "description": "List available pull request templates (identifier and title).",
        "inputSchema": {
            "type": "object",
            "properties": {}
        }
    })
}

fn get_pr_template_schema() -> Value {
    json!({
        "name": "get_pr_template",
        "description": "Return the full content of one pull request template.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "identifier": {
                    "type": "string",
                    "description": "Template identifier as returned by list_pr_templates"
                }
            },
            "required": ["identifier"]
        }
    })
}

fn get_git_status_schema() -> Value {
    json!({
        "name": "get_git_status",
        "description": "Current branch, head commit, local and remote branches, and whether the working tree is clean.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "repoPath": repo_path_property()
            }
        }
    })
}

fn list_commits_schema() -> Value {
    json!({
        "name": "list_commits",
        "description": "Commits reachable from targetRef but not from baseRef, newest first.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "repoPath": repo_path_property(),
                "baseRef": {
                    "type": "string",
                    "description": "Base branch, tag or commit"
                },
                "targetRef": {
                    "type": "string",
                    "description": "Target revision (defaults to HEAD)"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "description": format!("Maximum commits to return (default {})", DEFAULT_COMMIT_LIMIT)
                }
            },
            "required": ["baseRef"]
        }
    })
}
