//! Plain line prompts: text, yes/no, tags

use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use std::io::{self, BufRead, IsTerminal, Write};

use super::state::Key;
use super::terminal::{self, RawModeGuard};

fn question(label: &str) -> String {
    format!("{} {}", "?".green().bold(), label)
}

fn read_trimmed<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("Unexpected end of input");
    }
    Ok(line.trim().to_string())
}

/// Ask until a non-empty answer is given
pub fn read_text<R: BufRead, W: Write>(label: &str, input: &mut R, out: &mut W) -> Result<String> {
    loop {
        write!(out, "{}: ", question(label))?;
        out.flush()?;
        let value = read_trimmed(input)?;
        if !value.is_empty() {
            return Ok(value);
        }
        writeln!(out, "{}", "Value cannot be empty.".yellow())?;
    }
}

/// Ask a y/n question; an empty answer takes `default`
pub fn read_yes_no<R: BufRead, W: Write>(
    label: &str,
    default: bool,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    let suffix = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        write!(out, "{} {}: ", question(label), suffix.dimmed())?;
        out.flush()?;
        match read_trimmed(input)?.to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(out, "{}", "Please enter y or n.".yellow())?,
        }
    }
}

/// Ask for comma-separated tags and render them for front matter
pub fn read_tags<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<String> {
    write!(
        out,
        "{} {}: ",
        question("Tags"),
        "(comma-separated, optional)".dimmed()
    )?;
    out.flush()?;
    Ok(tags_yaml(&read_trimmed(input)?))
}

/// `a, b` -> "\n  - a\n  - b"; nothing -> "[]"
pub fn tags_yaml(raw: &str) -> String {
    let tags: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect();

    if tags.is_empty() {
        return "[]".to_string();
    }

    tags.iter().map(|tag| format!("\n  - {}", tag)).collect()
}

pub fn prompt_text(label: &str) -> Result<String> {
    read_text(label, &mut io::stdin().lock(), &mut io::stdout())
}

pub fn prompt_yes_no(label: &str, default: bool) -> Result<bool> {
    read_yes_no(label, default, &mut io::stdin().lock(), &mut io::stdout())
}

pub fn prompt_tags() -> Result<String> {
    read_tags(&mut io::stdin().lock(), &mut io::stdout())
}

/// Read a line, except that a lone `q` as the first keystroke exits at once
pub fn read_line_quick_quit(prompt: &str) -> Result<String> {
    let mut out = io::stdout();
    write!(out, "{}", prompt)?;
    out.flush()?;

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return read_trimmed(&mut stdin.lock());
    }

    let first = {
        let _raw = RawModeGuard::acquire(false)?;
        terminal::read_key()?
    };

    match first {
        Key::Char('q') | Key::Char('Q') | Key::Interrupt => {
            writeln!(out)?;
            std::process::exit(0);
        }
        Key::Enter => {
            writeln!(out)?;
            Ok(String::new())
        }
        Key::Char(c) => {
            write!(out, "{}", c)?;
            out.flush()?;
            let rest = read_trimmed(&mut stdin.lock())?;
            Ok(format!("{}{}", c, rest).trim().to_string())
        }
        _ => read_trimmed(&mut stdin.lock()),
    }
}
