use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Display state of a file in the working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileState {
    Staged,
    Modified,
    Untracked,
}

impl FileState {
    /// Single character marker used by list renderings.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Staged => 'S',
            Self::Modified => 'M',
            Self::Untracked => '?',
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Staged => write!(f, "staged"),
            Self::Modified => write!(f, "modified"),
            Self::Untracked => write!(f, "untracked"),
        }
    }
}

/// One entry of the reconciled working tree status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChangeRecord {
    /// Repository-relative path exactly as git reported it
    pub path: String,
    pub staged: bool,
    pub modified: bool,
}

impl FileChangeRecord {
    /// Staged wins over modified; a record with neither flag is untracked.
    #[must_use]
    pub const fn state(&self) -> FileState {
        if self.staged {
            FileState::Staged
        } else if self.modified {
            FileState::Modified
        } else {
            FileState::Untracked
        }
    }
}

/// The three path lists a status query yields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawStatus {
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
    pub created: Vec<String>,
}

/// Set of file base names that keeps first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangedFiles {
    names: Vec<String>,
    #[serde(skip)]
    index: HashSet<String>,
}

impl ChangedFiles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.index.contains(name) {
            return false;
        }
        self.index.insert(name.to_string());
        self.names.push(name.to_string());
        true
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}

impl<S: AsRef<str>> FromIterator<S> for ChangedFiles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut files = Self::new();
        for name in iter {
            files.insert(name.as_ref());
        }
        files
    }
}

/// Structural facts extracted from a unified diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffFacts {
    pub changed_files: ChangedFiles,
    pub additions: usize,
    pub deletions: usize,
}

/// Result of a message generation, handed back to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedMessage {
    pub message: String,
    pub facts: DiffFacts,
}
