//! `## Related Notes` link maintenance

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const SECTION: &str = "## Related Notes";

/// Add `- [[stem]]` at the end of the related-notes section.
///
/// Returns `None` when the link is already present. A missing section is
/// appended to the end of the note.
pub fn insert_related_link(content: &str, stem: &str) -> Option<String> {
    let link = format!("- [[{}]]", stem);
    if content.contains(&link) {
        return None;
    }

    let Some(start) = content.find(SECTION) else {
        return Some(format!("{}\n\n{}\n\n{}\n", content.trim_end(), SECTION, link));
    };

    let body_start = start + SECTION.len();
    let end = content[body_start..]
        .find("\n## ")
        .map(|offset| body_start + offset)
        .unwrap_or(content.len());

    let sep = if content[body_start..end].ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    };

    Some(format!("{}{}{}{}", &content[..end], sep, link, &content[end..]))
}

/// Rewrite the note at `path` with the link added; false if it was already there
pub fn append_related_link(path: &Path, stem: &str) -> Result<bool> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read note: {}", path.display()))?;

    match insert_related_link(&content, stem) {
        Some(updated) => {
            fs::write(path, updated)
                .with_context(|| format!("Failed to update note: {}", path.display()))?;
            log::debug!("Linked [[{}]] from {}", stem, path.display());
            Ok(true)
        }
        None => Ok(false),
    }
}
