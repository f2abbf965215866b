//! Shared utilities for commands

use chrono::Local;
use owo_colors::OwoColorize;
use std::path::Path;

/// Local time as `YYYY-MM-DD HH:MM` for front matter
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}

/// `✓ Created <what>: <path>`
pub fn report_created(what: &str, path: &Path) {
    println!(
        "{} Created {}: {}",
        "✓".green().bold(),
        what,
        path.display().cyan()
    );
}

/// `i <message>`
pub fn report_info(message: &str) {
    println!("{} {}", "i".cyan(), message);
}

/// `! <message>` on stderr
pub fn report_warning(message: &str) {
    eprintln!("{} {}", "!".yellow(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp();
        assert_eq!(ts.len(), 16);
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, "%Y-%m-%d %H:%M").is_ok());
    }
}
