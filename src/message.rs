use crate::types::DiffFacts;

const DEFAULT_PREFIX: &str = "Update";
const MAX_LISTED_FILES: usize = 3;

/// Builds the commit message for `facts`.
///
/// `instructions` replaces the default `Update` prefix, verbatim, whenever it
/// is non-empty. Files are listed in the order they were first seen in
/// the diff.
#[must_use]
pub fn compose_message(facts: &DiffFacts, instructions: Option<&str>) -> String {
    let prefix = instructions
        .filter(|text| !text.is_empty())
        .unwrap_or(DEFAULT_PREFIX);
    let counts = format!("(+{} -{})", facts.additions, facts.deletions);

    let files = &facts.changed_files;
    match files.len() {
        0 => format!("{prefix}: Changes in repository"),
        1 => {
            let file = files.iter().next().unwrap_or_default();
            format!("{prefix}: Changes in {file} {counts}")
        }
        count => {
            let listed = files
                .iter()
                .take(MAX_LISTED_FILES)
                .collect::<Vec<_>>()
                .join(", ");
            let ellipsis = if count > MAX_LISTED_FILES { "..." } else { "" };
            format!("{prefix}: Changes in multiple files ({listed}{ellipsis}) {counts}")
        }
    }
}
