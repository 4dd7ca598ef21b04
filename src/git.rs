use std::path::PathBuf;
use std::process::{Command, Output};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::types::RawStatus;

/// Trait defining Git operations required by the library
pub trait Git {
    /// Whether the working directory is inside a Git work tree
    fn is_repository(&self) -> bool;

    /// Query the working tree status as modified, untracked and newly created paths
    ///
    /// # Errors
    ///
    /// Returns an error if the status cannot be retrieved
    fn status(&self) -> Result<RawStatus>;

    /// Add the given paths to the index
    ///
    /// # Errors
    ///
    /// Returns an error if any path cannot be staged
    fn stage(&self, paths: &[String]) -> Result<()>;

    /// Get the unified diff of staged content, `None` when nothing is staged
    ///
    /// # Errors
    ///
    /// Returns an error if the diff cannot be retrieved
    fn staged_diff(&self) -> Result<Option<String>>;

    /// Commit staged content with the given message
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails
    fn commit(&self, message: &str) -> Result<()>;

    /// Run a Git command with the given arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the git command cannot be executed
    fn run_git_command(&self, args: &[&str]) -> Result<String>;
}

/// Implementation of Git operations using the local Git CLI
pub struct GitCli {
    repo_path: PathBuf,
}

impl GitCli {
    /// Creates a new `GitCli` instance with the given repository path
    #[must_use]
    pub const fn new(repo_path: PathBuf) -> Self {
        Self { repo_path }
    }

    /// Runs git and returns its raw stdout, failing on a non-zero exit.
    fn output(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .map_err(|e| Error::GitCommandError(e.to_string()))?;

        check_status(&output)?;
        Ok(output.stdout)
    }
}

/// Fails with git's own explanation. Some commands (`git commit` with nothing
/// staged) report on stdout and leave stderr empty.
fn check_status(output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let error = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout)
    } else {
        stderr
    };
    debug!(error = %error, "Git command failed");
    Err(Error::GitCommandError(error.trim().to_string()))
}

impl Git for GitCli {
    #[instrument(skip(self), fields(repo_path = %self.repo_path.display()))]
    fn is_repository(&self) -> bool {
        let inside = self
            .run_git_command(&["rev-parse", "--is-inside-work-tree"])
            .is_ok_and(|out| out == "true");
        debug!(inside, "Checked repository");
        inside
    }

    #[instrument(skip(self), fields(repo_path = %self.repo_path.display()))]
    fn status(&self) -> Result<RawStatus> {
        let stdout = self.output(&["status", "--porcelain=v1", "-z", "--untracked-files=all"])?;
        let text = String::from_utf8_lossy(&stdout);
        let status = parse_porcelain_status(&text);
        debug!(
            modified = status.modified.len(),
            untracked = status.untracked.len(),
            created = status.created.len(),
            "Status retrieved"
        );
        Ok(status)
    }

    #[instrument(skip(self), fields(paths = paths.len(), repo_path = %self.repo_path.display()))]
    fn stage(&self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.output(&args)?;
        debug!("Files staged");
        Ok(())
    }

    #[instrument(skip(self), fields(repo_path = %self.repo_path.display()))]
    fn staged_diff(&self) -> Result<Option<String>> {
        let stdout = self.output(&["diff", "--cached", "--no-color", "--no-ext-diff"])?;
        // Content may be in any encoding; only ASCII line prefixes are parsed
        let diff = String::from_utf8_lossy(&stdout).into_owned();
        debug!(diff_length = diff.len(), "Staged diff retrieved");
        if diff.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(diff))
    }

    #[instrument(skip(self, message), fields(repo_path = %self.repo_path.display()))]
    fn commit(&self, message: &str) -> Result<()> {
        self.output(&["commit", "-m", message])?;
        debug!("Commit created");
        Ok(())
    }

    #[instrument(skip(self), fields(args = ?args, repo_path = %self.repo_path.display()))]
    fn run_git_command(&self, args: &[&str]) -> Result<String> {
        let stdout = self.output(args)?;
        let result = String::from_utf8(stdout)
            .map(|s| s.trim().to_string())
            .map_err(|e| Error::GitCommandError(e.to_string()))?;

        debug!(
            output_length = result.len(),
            "Git command completed successfully"
        );
        Ok(result)
    }
}

/// Splits `git status --porcelain=v1 -z` output into the three status lists.
///
/// A path lands in `modified` when either column is `M`, in `untracked` for
/// `??` and in `created` when the index column is `A`. Rename and copy
/// entries carry their source path as the next field, which is skipped.
///
/// Entries fitting none of the three lists (pure renames, deletions, type
/// changes, conflicts) are dropped, so they cannot be selected.
fn parse_porcelain_status(output: &str) -> RawStatus {
    let mut status = RawStatus::default();
    let mut entries = output.split('\0').filter(|entry| !entry.is_empty());

    while let Some(entry) = entries.next() {
        if entry.len() < 4 {
            continue;
        }
        let bytes = entry.as_bytes();
        let (index, worktree) = (bytes[0], bytes[1]);
        let path = &entry[3..];

        if matches!(index, b'R' | b'C') {
            entries.next();
        }

        if index == b'?' && worktree == b'?' {
            status.untracked.push(path.to_string());
        } else if index == b'M' || worktree == b'M' {
            status.modified.push(path.to_string());
        } else if index == b'A' {
            status.created.push(path.to_string());
        } else {
            debug!(
                path = %path,
                code = %String::from_utf8_lossy(&bytes[..2]),
                "Dropping status entry outside the modified/untracked/created lists"
            );
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_porcelain_status() {
        let output = " M src/lib.rs\0M  Cargo.toml\0A  src/new.rs\0?? notes.txt\0 D gone.rs\0";
        let status = parse_porcelain_status(output);

        assert_eq!(status.modified, vec!["src/lib.rs", "Cargo.toml"]);
        assert_eq!(status.untracked, vec!["notes.txt"]);
        assert_eq!(status.created, vec!["src/new.rs"]);
    }

    #[test]
    fn test_parse_porcelain_added_then_modified_is_modified() {
        let status = parse_porcelain_status("AM src/new.rs\0");
        assert_eq!(status.modified, vec!["src/new.rs"]);
        assert!(status.created.is_empty());
    }

    #[test]
    fn test_parse_porcelain_skips_rename_source() {
        let output = "RM src/renamed.rs\0src/original.rs\0?? a b.txt\0";
        let status = parse_porcelain_status(output);

        assert_eq!(status.modified, vec!["src/renamed.rs"]);
        assert_eq!(status.untracked, vec!["a b.txt"]);
        assert!(status.created.is_empty());
    }

    #[test]
    fn test_parse_porcelain_drops_entries_outside_the_lists() {
        let output = "R  src/moved.rs\0src/old.rs\0 D gone.rs\0D  removed.rs\0 T link\0UU both.rs\0";
        assert_eq!(parse_porcelain_status(output), RawStatus::default());
    }

    #[test]
    fn test_parse_porcelain_empty() {
        assert_eq!(parse_porcelain_status(""), RawStatus::default());
    }
}
