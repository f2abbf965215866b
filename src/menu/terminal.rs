//! Raw-mode terminal session
//!
//! The menu puts the terminal in raw mode and hides the cursor. Both must be
//! undone on every way out: normal return, cancel, error, panic unwind,
//! SIGINT and SIGTERM. [`RawModeGuard`] restores on drop, and the signal
//! handler calls the same [`restore_terminal`], which acts at most once per
//! session.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use log::warn;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use super::state::Key;

static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);
static SIGNAL_HANDLERS: Once = Once::new();

/// Mark a raw-mode session as started
fn begin_session() {
    SESSION_ACTIVE.store(true, Ordering::SeqCst);
}

/// Claim the session for restoration. Only the first caller gets `true`.
fn end_session() -> bool {
    SESSION_ACTIVE.swap(false, Ordering::SeqCst)
}

/// Leave raw mode and show the cursor if a session is active
pub fn restore_terminal() {
    if end_session() {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), cursor::Show);
    }
}

/// Register SIGINT/SIGTERM handlers that restore the terminal and exit 0
pub fn install_signal_handlers() {
    SIGNAL_HANDLERS.call_once(|| {
        let result = ctrlc::set_handler(|| {
            restore_terminal();
            println!();
            std::process::exit(0);
        });
        if let Err(e) = result {
            warn!("Could not install signal handlers: {}", e);
        }
    });
}

/// Raw mode (and optionally a hidden cursor) for as long as the guard lives
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn acquire(hide_cursor: bool) -> io::Result<Self> {
        install_signal_handlers();
        begin_session();

        let entered = if hide_cursor {
            execute!(io::stdout(), cursor::Hide).and_then(|_| terminal::enable_raw_mode())
        } else {
            terminal::enable_raw_mode()
        };

        match entered {
            Ok(()) => Ok(Self { _private: () }),
            Err(e) => {
                restore_terminal();
                Err(e)
            }
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Block until the next keystroke. Resizes come back as [`Key::Other`] so the
/// caller repaints.
pub fn read_key() -> io::Result<Key> {
    loop {
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => return Ok(decode(key)),
            Event::Resize(..) => return Ok(Key::Other),
            _ => {}
        }
    }
}

fn decode(key: KeyEvent) -> Key {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        _ => Key::Other,
    }
}

/// Current terminal size as (columns, rows), 80x24 when unknown
pub fn size() -> (usize, usize) {
    terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((80, 24))
}

/// Move up over `prev_lines` and redraw `lines` in place
pub fn repaint<W: Write>(out: &mut W, prev_lines: usize, lines: &[String]) -> io::Result<usize> {
    if prev_lines > 0 {
        crossterm::queue!(out, cursor::MoveUp(prev_lines as u16))?;
    }
    for line in lines {
        crossterm::queue!(
            out,
            terminal::Clear(terminal::ClearType::CurrentLine),
            crossterm::style::Print(line),
            crossterm::style::Print("\r\n")
        )?;
    }
    crossterm::queue!(out, terminal::Clear(terminal::ClearType::FromCursorDown))?;
    out.flush()?;
    Ok(lines.len())
}

/// Erase the last `lines` lines and leave the cursor where they started
pub fn clear_lines<W: Write>(out: &mut W, lines: usize) -> io::Result<()> {
    if lines > 0 {
        crossterm::queue!(
            out,
            cursor::MoveToColumn(0),
            cursor::MoveUp(lines as u16),
            terminal::Clear(terminal::ClearType::FromCursorDown)
        )?;
    }
    out.flush()
}
