//! Environment-driven configuration and paths

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// AnkiConnect listens here unless told otherwise
pub const DEFAULT_ANKI_CONNECT_URL: &str = "http://localhost:8765";

/// Protocol version sent with every bridge request
pub const ANKI_CONNECT_VERSION: u64 = 6;

/// Resolve the bridge URL: explicit flag, then `ANKI_CONNECT_URL`, then the default
pub fn bridge_url(flag: Option<&str>) -> Result<Url> {
    let raw = match flag {
        Some(url) => url.to_string(),
        None => std::env::var("ANKI_CONNECT_URL")
            .unwrap_or_else(|_| DEFAULT_ANKI_CONNECT_URL.to_string()),
    };
    Url::parse(&raw).with_context(|| format!("Invalid AnkiConnect URL: {}", raw))
}

/// Get the notes root directory
/// - `--root` flag if given
/// - `NOTES_ROOT` environment variable
/// - current working directory
pub fn notes_root(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = flag {
        return Ok(root.to_path_buf());
    }
    if let Ok(root) = std::env::var("NOTES_ROOT") {
        return Ok(PathBuf::from(root));
    }
    std::env::current_dir().context("Failed to get current directory")
}

/// Get the BibTeX library used by the literature note tool
/// - `--bib` flag if given
/// - `BIBTEX_FILE` environment variable
/// - `<root>/references.bib` when present
/// - Better BibTeX export: ~/Zotero/better-bibtex/My Library.bib
pub fn bibtex_path(flag: Option<&Path>, root: &Path) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("BIBTEX_FILE") {
        return Ok(PathBuf::from(path));
    }

    let local = root.join("references.bib");
    if local.exists() {
        return Ok(local);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join("Zotero")
        .join("better-bibtex")
        .join("My Library.bib"))
}
