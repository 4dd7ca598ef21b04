use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Timeout applied to delegate requests unless configured otherwise.
pub const DEFAULT_DELEGATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the commit message comes from.
#[derive(Debug, Clone, Default)]
pub enum MessageSource {
    /// Compose locally from the parsed diff
    #[default]
    Local,
    /// Forward the diff to an external text-generation endpoint
    Delegate(DelegateConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl DelegateConfig {
    /// Validates `endpoint` and builds a config with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the endpoint is empty or is not an
    /// `http`/`https` URL.
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::Configuration(
                "delegate endpoint must not be empty".to_string(),
            ));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::Configuration(format!(
                "delegate endpoint must be an http(s) URL, got `{endpoint}`"
            )));
        }
        Ok(Self {
            endpoint: endpoint.to_string(),
            timeout: DEFAULT_DELEGATE_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Picks the directory a session works in: `dir_override` when given,
/// otherwise the process working directory.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when no override is given and the current
/// directory cannot be determined.
pub fn resolve_working_dir(dir_override: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = dir_override {
        debug!(dir = %dir.display(), "Using working directory override");
        return Ok(dir.to_path_buf());
    }

    let dir = std::env::current_dir().map_err(|e| {
        Error::Configuration(format!("no working directory could be resolved: {e}"))
    })?;
    debug!(dir = %dir.display(), "Using current directory");
    Ok(dir)
}
