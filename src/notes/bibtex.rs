//! Reference list from a Zotero / Better BibTeX export
//!
//! Parsing (including `@string` macros and month abbreviations) is done by
//! `biblatex`; this module only flattens entries into display strings.

use anyhow::{anyhow, bail, Context, Result};
use biblatex::{Bibliography, ChunksExt, Entry};
use regex::Regex;
use std::cmp::Reverse;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use super::slug::clean_title;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());

/// A reference ready for display and templating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    pub citekey: String,
    pub title: String,
    pub year: String,
    pub entry_type: String,
    pub authors: String,
    pub keywords: String,
}

impl BibEntry {
    /// Entries without a title are dropped
    pub fn from_entry(entry: &Entry) -> Option<Self> {
        let field = |name: &str| {
            entry
                .get(name)
                .map(|chunks| chunks.format_verbatim())
                .unwrap_or_default()
        };

        let title = clean_title(&field("title"));
        if title.is_empty() {
            return None;
        }

        let year = match field("year").trim() {
            "" => YEAR_RE
                .find(&field("date"))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            year => year.to_string(),
        };

        Some(Self {
            citekey: entry.key.trim().to_string(),
            title,
            year,
            entry_type: entry.entry_type.to_string().to_lowercase(),
            authors: clean_title(&field("author")).replace(" and ", ", "),
            keywords: field("keywords").trim().to_string(),
        })
    }

    /// Numeric year for sorting; 0 when missing or not a number
    pub fn year_key(&self) -> u32 {
        if !self.year.is_empty() && self.year.chars().all(|c| c.is_ascii_digit()) {
            self.year.parse().unwrap_or(0)
        } else {
            0
        }
    }
}

/// Titled entries of a `.bib` source, in file order
pub fn parse(src: &str) -> Result<Vec<BibEntry>> {
    let bibliography =
        Bibliography::parse(src).map_err(|e| anyhow!("Malformed BibTeX: {:?}", e))?;
    Ok(bibliography.iter().filter_map(BibEntry::from_entry).collect())
}

/// Read a `.bib` file, newest references first
pub fn load(path: &Path) -> Result<Vec<BibEntry>> {
    if !path.exists() {
        bail!("BibTeX file not found: {}", path.display());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;

    let mut entries =
        parse(&content).with_context(|| format!("Failed to parse: {}", path.display()))?;
    entries.sort_by_key(|entry| Reverse(entry.year_key()));
    Ok(entries)
}
