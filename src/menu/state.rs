//! Keystroke state machine behind the selection menu

/// A keystroke, already decoded from the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Enter,
    /// Ctrl-C while the terminal is in raw mode
    Interrupt,
    Other,
}

/// What the menu should do after a keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Re-render and keep reading
    Continue,
    /// The user picked this index
    Select(usize),
    /// `q` / `Q`
    Cancel,
    Interrupt,
}

/// Highlighted index plus the pending half of a `gg` chord
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    selected: usize,
    len: usize,
    pending_g: bool,
}

impl MenuState {
    /// Start at index 0. `len` must be at least 1.
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0, "menu needs at least one option");
        Self {
            selected: 0,
            len,
            pending_g: false,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn handle(&mut self, key: Key) -> Step {
        let was_pending = std::mem::take(&mut self.pending_g);

        match key {
            Key::Enter => return Step::Select(self.selected),
            Key::Char('q') | Key::Char('Q') => return Step::Cancel,
            Key::Interrupt => return Step::Interrupt,
            Key::Down | Key::Char('j') => self.selected = (self.selected + 1) % self.len,
            Key::Up | Key::Char('k') => self.selected = (self.selected + self.len - 1) % self.len,
            Key::Char('G') => self.selected = self.len - 1,
            Key::Char('g') => {
                if was_pending {
                    self.selected = 0;
                } else {
                    self.pending_g = true;
                }
            }
            _ => {}
        }

        Step::Continue
    }
}
