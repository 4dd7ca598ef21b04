//! Unified diff parsing.
//!
//! Only line prefixes are inspected: `+++`/`---` file headers name the files,
//! every other `+`/`-` line is counted as an added/removed content line.

use crate::types::DiffFacts;
use tracing::{debug, instrument};

/// Marker git uses for the missing side of an added or deleted file.
pub const NO_FILE: &str = "/dev/null";

const NEW_FILE_HEADER: &str = "+++";
const OLD_FILE_HEADER: &str = "---";

/// Parses `diff` into [`DiffFacts`].
///
/// File names are reduced to their base name, so `src/index.ts` and
/// `web/index.ts` count as a single changed file. A deleted file (new side is
/// [`NO_FILE`]) is named after its old side header instead.
#[instrument(skip_all, fields(diff_length = diff.len()))]
pub fn parse_diff(diff: &str) -> DiffFacts {
    let mut facts = DiffFacts::default();
    let mut old_side: Option<&str> = None;

    for line in diff.lines() {
        if let Some(rest) = line.strip_prefix(NEW_FILE_HEADER) {
            if rest.is_empty() {
                continue;
            }
            let path = header_path(rest);
            let named = if path == NO_FILE {
                old_side.take().filter(|old| *old != NO_FILE)
            } else {
                Some(path)
            };
            if let Some(path) = named {
                facts.changed_files.insert(base_name(path));
            }
            old_side = None;
        } else if let Some(rest) = line.strip_prefix(OLD_FILE_HEADER) {
            // A removed `-- ...` content line also lands here; the next `+++`
            // header overwrites or clears whatever it left in `old_side`.
            if !rest.is_empty() {
                old_side = Some(header_path(rest));
            }
        } else if line.starts_with('+') {
            facts.additions += 1;
        } else if line.starts_with('-') {
            facts.deletions += 1;
        }
    }

    debug!(
        files = facts.changed_files.len(),
        additions = facts.additions,
        deletions = facts.deletions,
        "Diff parsed"
    );
    facts
}

/// Path named by a `+++`/`---` header, after the marker itself.
///
/// Drops the separating space, anything after a tab (timestamps from
/// non-git diff tools) and git's `a/` or `b/` side prefix.
fn header_path(rest: &str) -> &str {
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    let rest = rest.split('\t').next().unwrap_or(rest);
    if rest == NO_FILE {
        return rest;
    }
    rest.strip_prefix("a/")
        .or_else(|| rest.strip_prefix("b/"))
        .unwrap_or(rest)
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
