//! CLI commands

pub mod add_notes;
pub mod literature;
pub mod new_note;
pub mod replicate;
pub mod send;
pub mod utils;
