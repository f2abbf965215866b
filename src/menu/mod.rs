//! Interactive selection menu and line prompts
//!
//! On a terminal the menu is a vi-style list (j/k, arrows, gg, G, Enter, q)
//! repainted in place. Without one, the same options are offered as a
//! numbered list read line by line.

pub mod fallback;
pub mod prompt;
pub mod render;
pub mod state;
pub mod terminal;

use anyhow::{bail, Context, Result};
use std::io::{self, IsTerminal};

pub use prompt::{prompt_tags, prompt_text, prompt_yes_no, read_line_quick_quit};
pub use state::{Key, MenuState, Step};
pub use terminal::{install_signal_handlers, restore_terminal, RawModeGuard};

/// Let the user pick one of `options` and return its index.
///
/// `q` cancels and Ctrl-C interrupts; both restore the terminal and exit the
/// process with status 0. An empty option list is an error and leaves the
/// terminal untouched.
pub fn prompt_choice(title: &str, options: &[String]) -> Result<usize> {
    if options.is_empty() {
        bail!("No options available.");
    }

    if !io::stdin().is_terminal() {
        return fallback::prompt_numbered(title, options, &mut io::stdin().lock(), &mut io::stdout());
    }

    select_interactive(title, options)
}

fn select_interactive(title: &str, options: &[String]) -> Result<usize> {
    let mut state = MenuState::new(options.len());
    let mut out = io::stdout();

    let guard = RawModeGuard::acquire(true).context("Failed to switch terminal to raw mode")?;
    let mut lines = terminal::repaint(
        &mut out,
        0,
        &render::frame(title, options, state.selected(), terminal::size()),
    )?;

    loop {
        match state.handle(terminal::read_key()?) {
            Step::Continue => {
                let frame = render::frame(title, options, state.selected(), terminal::size());
                lines = terminal::repaint(&mut out, lines, &frame)?;
            }
            Step::Select(index) => {
                terminal::clear_lines(&mut out, lines)?;
                drop(guard);
                return Ok(index);
            }
            Step::Cancel => {
                terminal::clear_lines(&mut out, lines)?;
                drop(guard);
                println!("Cancelled.");
                std::process::exit(0);
            }
            Step::Interrupt => {
                drop(guard);
                println!();
                std::process::exit(0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_is_usage_error() {
        let err = prompt_choice("Pick", &[]).unwrap_err();
        assert_eq!(err.to_string(), "No options available.");
    }
}
