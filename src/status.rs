use crate::types::{FileChangeRecord, RawStatus};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Merges the three status lists into one record list.
///
/// Records come out in `modified`, `untracked`, `created` order, each marked
/// `staged = false, modified = true`. A path listed more than once keeps only
/// its first occurrence.
#[instrument(skip_all, fields(
    modified = modified.len(),
    untracked = untracked.len(),
    created = created.len()
))]
pub fn reconcile(
    modified: &[String],
    untracked: &[String],
    created: &[String],
) -> Vec<FileChangeRecord> {
    let total = modified.len() + untracked.len() + created.len();
    let mut seen = HashSet::with_capacity(total);
    let mut records = Vec::with_capacity(total);

    for path in modified.iter().chain(untracked).chain(created) {
        if !seen.insert(path.as_str()) {
            debug!(path = %path, "Skipping duplicate status entry");
            continue;
        }
        records.push(FileChangeRecord {
            path: path.clone(),
            staged: false,
            modified: true,
        });
    }

    debug!(records = records.len(), "Status reconciled");
    records
}

/// Reconciles a [`RawStatus`] as returned by [`crate::Git::status`].
#[must_use]
pub fn reconcile_status(status: &RawStatus) -> Vec<FileChangeRecord> {
    reconcile(&status.modified, &status.untracked, &status.created)
}
