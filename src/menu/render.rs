//! Menu layout: visible window, truncation and the rendered lines

use owo_colors::OwoColorize;
use std::ops::Range;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Title, two help lines, the "Showing" line and a blank line
pub const HEADER_LINES: usize = 5;
pub const MAX_VISIBLE: usize = 15;
pub const MIN_VISIBLE: usize = 5;

/// Columns taken by the `  > ` / `    ` prefix plus a margin
const OPTION_INDENT: usize = 6;

/// Number of option rows that fit under the header
pub fn visible_rows(term_height: usize) -> usize {
    term_height
        .saturating_sub(HEADER_LINES)
        .min(MAX_VISIBLE)
        .max(MIN_VISIBLE)
}

/// Slice of options to draw, centered on `current` and clipped to the list
pub fn window(total: usize, current: usize, term_height: usize) -> Range<usize> {
    let height = visible_rows(term_height);
    if total <= height {
        return 0..total;
    }

    let start = current.saturating_sub(height / 2);
    let end = (start + height).min(total);
    end.saturating_sub(height)..end
}

/// Shorten `text` to `max_width` display columns, ending in `...` when cut
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return take_columns(text, max_width);
    }
    format!("{}...", take_columns(text, max_width - 3))
}

fn take_columns(text: &str, columns: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= columns
        })
        .collect()
}

/// Build every line of one menu frame
pub fn frame(
    title: &str,
    options: &[String],
    current: usize,
    (term_width, term_height): (usize, usize),
) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", "?".green().bold(), title.bold()),
        "  Use j/k (or arrows) to move, Enter to select."
            .dimmed()
            .to_string(),
        "  gg: top, G: bottom, q: quit.".dimmed().to_string(),
    ];

    let range = window(options.len(), current, term_height);
    lines.push(
        format!(
            "  Showing {}-{} of {}.",
            range.start + 1,
            range.end,
            options.len()
        )
        .dimmed()
        .to_string(),
    );
    lines.push(String::new());

    let max_width = term_width.saturating_sub(OPTION_INDENT);
    for idx in range {
        let option = truncate(&options[idx], max_width);
        if idx == current {
            lines.push(format!("  {} {}", ">".green().bold(), option.cyan()));
        } else {
            lines.push(format!("    {}", option));
        }
    }

    lines
}
