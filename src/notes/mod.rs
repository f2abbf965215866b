//! Markdown note scaffolding: templates, slugs, BibTeX and cross-links

pub mod bibtex;
pub mod links;
pub mod slug;
pub mod templates;

use anyhow::{bail, Context, Result};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

pub use bibtex::BibEntry;
pub use links::append_related_link;
pub use slug::slugify;

/// Write `content` to a file that must not exist yet
pub fn write_new(path: &Path, content: &str) -> Result<()> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            bail!("File already exists: {}", path.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create: {}", path.display()));
        }
    };

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_write_new_refuses_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "keep me").unwrap();

        let err = write_new(&path, "overwrite").unwrap_err();
        assert!(err.to_string().starts_with("File already exists"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn test_write_new_creates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        write_new(&path, "hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }
}
