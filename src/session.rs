use crate::config::{resolve_working_dir, MessageSource};
use crate::delegate::DelegateClient;
use crate::diff::parse_diff;
use crate::error::{Error, Result};
use crate::git::{Git, GitCli};
use crate::message::compose_message;
use crate::status::reconcile_status;
use crate::types::{FileChangeRecord, GeneratedMessage};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// A working directory bound to the Git collaborator that operates on it.
///
/// Front ends hold one session per selected directory and pass it into every
/// operation; nothing about the directory lives outside of it.
pub struct CommitSession<G: Git = GitCli> {
    repo_path: PathBuf,
    git: G,
}

impl CommitSession<GitCli> {
    /// Opens a session on `dir_override`, or on the current directory when
    /// no override is given.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No working directory can be resolved
    /// - The directory is not inside a Git work tree
    #[instrument(skip(dir_override))]
    pub fn open(dir_override: Option<&Path>) -> Result<Self> {
        let repo_path = resolve_working_dir(dir_override)?;
        debug!(path = %repo_path.display(), "Opening session");

        let git = GitCli::new(repo_path.clone());
        if !git.is_repository() {
            return Err(Error::NotARepository(repo_path));
        }
        Ok(Self { repo_path, git })
    }
}

impl<G: Git> CommitSession<G> {
    /// Creates a session around an existing Git collaborator
    pub const fn with_git(repo_path: PathBuf, git: G) -> Self {
        Self { repo_path, git }
    }

    #[must_use]
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub const fn git(&self) -> &G {
        &self.git
    }

    /// Lists the working tree changes available for selection.
    ///
    /// # Errors
    ///
    /// When the status query fails.
    #[instrument(skip(self), fields(repo_path = %self.repo_path.display()))]
    pub fn list_changes(&self) -> Result<Vec<FileChangeRecord>> {
        let status = self.git.status()?;
        Ok(reconcile_status(&status))
    }

    /// Stages `selected` and produces a commit message for the staged diff.
    ///
    /// The message is composed locally or requested from the delegate
    /// depending on `source`. Requires `&mut self` so a session runs at most
    /// one generation at a time. Staged files stay staged if a later step
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `selected` is empty (nothing is staged in that case)
    /// - Staging or the diff query fails
    /// - The staged diff is empty
    /// - The delegate request fails
    #[instrument(skip(self, selected, instructions, source), fields(selected = selected.len()))]
    pub async fn generate_message(
        &mut self,
        selected: &[String],
        instructions: Option<&str>,
        source: &MessageSource,
    ) -> Result<GeneratedMessage> {
        if selected.is_empty() {
            return Err(Error::NoSelection);
        }

        self.git.stage(selected)?;
        let diff = self.git.staged_diff()?.ok_or(Error::NoStagedChanges)?;
        let facts = parse_diff(&diff);

        let message = match source {
            MessageSource::Local => compose_message(&facts, instructions),
            MessageSource::Delegate(config) => {
                debug!(endpoint = %config.endpoint, "Requesting message from delegate");
                DelegateClient::new(config)?
                    .generate(&diff, instructions)
                    .await?
            }
        };

        debug!(message = %message, "Message generated");
        Ok(GeneratedMessage { message, facts })
    }

    /// Commits whatever is staged with `message`.
    ///
    /// # Errors
    ///
    /// When the message is blank or the commit fails.
    #[instrument(skip(self, message), fields(repo_path = %self.repo_path.display()))]
    pub fn commit(&self, message: &str) -> Result<()> {
        if message.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }
        self.git.commit(message)
    }
}
