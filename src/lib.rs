pub use config::{resolve_working_dir, DelegateConfig, MessageSource, DEFAULT_DELEGATE_TIMEOUT};
pub use diff::parse_diff;
pub use error::{Error, Result};
pub use git::{Git, GitCli};
pub use message::compose_message;
pub use session::CommitSession;
pub use status::{reconcile, reconcile_status};
pub use types::{ChangedFiles, DiffFacts, FileChangeRecord, FileState, GeneratedMessage, RawStatus};

use std::path::Path;

mod config;
pub mod delegate;
pub mod diff;
mod error;
mod git;
mod message;
mod session;
mod status;
mod types;

/// Opens a `CommitSession` on a local repository.
///
/// # Arguments
///
/// * `dir`: The directory to work in. Defaults to the current directory.
///
/// # Errors
///
/// Returns an error if no directory can be resolved or if it is not a Git repository.
pub fn open(dir: Option<&Path>) -> Result<CommitSession> {
    CommitSession::open(dir)
}
