//! File-name and title cleanup

use regex::Regex;
use std::sync::LazyLock;

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lowercase, `&` -> `and`, everything else non-alphanumeric collapsed to `-`
pub fn slugify(text: &str) -> String {
    let cleaned = text.trim().to_lowercase().replace('&', "and");
    let cleaned = NON_SLUG_RE.replace_all(&cleaned, "-");
    let cleaned = cleaned.trim_matches('-');
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Drop BibTeX braces and collapse whitespace
pub fn clean_title(text: &str) -> String {
    let cleaned = text.replace(['{', '}'], "");
    WHITESPACE_RE.replace_all(&cleaned, " ").trim().to_string()
}

/// `smith_2020` with year `2020` -> `smith`
pub fn strip_year_suffix(citekey: &str, year: &str) -> String {
    if year.is_empty() {
        return citekey.to_string();
    }
    match citekey.strip_suffix(year) {
        Some(base) if base.ends_with(['_', '-']) => base[..base.len() - 1]
            .trim_end_matches(['.', '_', '-'])
            .to_string(),
        _ => citekey.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Linear Algebra: Week 3"), "linear-algebra-week-3");
        assert_eq!(slugify("  R&D notes  "), "randd-notes");
        assert_eq!(slugify("Ünïcode!"), "n-code");
        assert_eq!(slugify("???"), "untitled");
        assert_eq!(slugify(""), "untitled");
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(
            clean_title("{The} Art of\n   {Computer} Programming"),
            "The Art of Computer Programming"
        );
    }

    #[test]
    fn test_strip_year_suffix() {
        assert_eq!(strip_year_suffix("smith_2020", "2020"), "smith");
        assert_eq!(strip_year_suffix("smith-2020", "2020"), "smith");
        assert_eq!(strip_year_suffix("smith.et.al_-2020", "2020"), "smith.et.al");
        assert_eq!(strip_year_suffix("smith2020", "2020"), "smith2020");
        assert_eq!(strip_year_suffix("smith_2020", ""), "smith_2020");
        assert_eq!(strip_year_suffix("smith_2019", "2020"), "smith_2019");
    }
}
