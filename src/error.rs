use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Git command failed: {0}")]
    GitCommandError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("No files selected")]
    NoSelection,

    #[error("No staged changes to describe")]
    NoStagedChanges,

    #[error("Commit message is empty")]
    EmptyMessage,

    #[error("Delegate request failed: {0}")]
    Delegate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
