//! Numbered menu for non-interactive input (pipes, redirected stdin)

use anyhow::{bail, Result};
use std::io::{BufRead, Write};

/// Options listed per round
const PAGE_SIZE: usize = 20;

/// Offer `options` as a numbered list read line by line.
///
/// A number picks from the full list. Anything else narrows the listing to
/// options containing it (case-insensitive); a search with no hits resets the
/// listing. End of input is an error.
pub fn prompt_numbered<R: BufRead, W: Write>(
    title: &str,
    options: &[String],
    input: &mut R,
    out: &mut W,
) -> Result<usize> {
    let all: Vec<(usize, &String)> = options.iter().enumerate().collect();
    let mut filtered = all.clone();

    loop {
        writeln!(out, "{}", title)?;
        writeln!(out, "Type a number, or enter a search term to filter.\n")?;

        let shown = filtered.len().min(PAGE_SIZE);
        for (idx, option) in &filtered[..shown] {
            writeln!(out, "  {}. {}", idx + 1, option)?;
        }
        if filtered.len() > shown {
            writeln!(out, "\nShowing {} of {} matches.", shown, filtered.len())?;
        }
        writeln!(out)?;
        write!(out, "Select number or search: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("No selection made (end of input)");
        }
        let selection = line.trim();

        if !selection.is_empty() && selection.chars().all(|c| c.is_ascii_digit()) {
            match selection.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => {
                    writeln!(out, "Invalid selection. Try again.")?;
                    continue;
                }
            }
        }
        if selection.is_empty() {
            continue;
        }

        let term = selection.to_lowercase();
        filtered = all
            .iter()
            .filter(|(_, option)| option.to_lowercase().contains(&term))
            .copied()
            .collect();
        if filtered.is_empty() {
            writeln!(out, "No matches. Try another search.")?;
            filtered = all.clone();
        }
    }
}
