use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("Not a git repository: {0}")]
    RepositoryNotFound(String),

    #[error("Revision not found: {0}")]
    RevisionNotFound(String),

    #[error("Git operation failed: {0}")]
    GitOperation(#[from] git2::Error),

    #[error("Git operation failed: {0}")]
    Unsupported(String),
}
