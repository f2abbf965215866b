//! Field formatting for generated cards
//!
//! Tutors mark the interesting word with `**bold**`. Depending on the note
//! type, the marked span is turned into a colored HTML span or hidden behind
//! a `[...]` placeholder.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::anki::model::Fields;

pub const ORANGE: &str = "rgb(251, 159, 42)";
pub const LIGHT_ORANGE: &str = "rgb(255, 170, 127)";

const PLACEHOLDER: &str = "[...]";

/// Pattern notes carry up to this many sentence/answer pairs
const MAX_PATTERNS: usize = 5;

// Shortest span between two `**` markers on one line
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

/// The note types with dedicated formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Cloze,
    Pattern,
    Polysemy,
    Vocab,
    Other,
}

impl NoteKind {
    /// Accepts both `language_vocab` and the bare `vocab`
    pub fn from_name(name: &str) -> Self {
        match name.strip_prefix("language_").unwrap_or(name) {
            "cloze" => Self::Cloze,
            "pattern" => Self::Pattern,
            "polysemy" => Self::Polysemy,
            "vocab" => Self::Vocab,
            _ => Self::Other,
        }
    }
}

/// `<span style="color: {color};">{text}</span>`
pub fn color_span(color: &str, text: &str) -> String {
    format!(r#"<span style="color: {};">{}</span>"#, color, text)
}

/// Replace every `**word**` with `word` wrapped in a colored span
pub fn bold_to_span(text: &str, color: &str) -> String {
    BOLD_RE
        .replace_all(text, |caps: &Captures| color_span(color, &caps[1]))
        .into_owned()
}

/// Replace every `**word**` with a colored `[...]` placeholder
pub fn bold_to_placeholder(text: &str, color: &str) -> String {
    BOLD_RE
        .replace_all(text, |_: &Captures| color_span(color, PLACEHOLDER))
        .into_owned()
}

/// Apply note-type-specific formatting. Unknown types pass through unchanged.
pub fn format_fields(note_type: &str, fields: &Fields) -> Fields {
    match NoteKind::from_name(note_type) {
        NoteKind::Cloze | NoteKind::Polysemy | NoteKind::Other => fields.clone(),
        NoteKind::Pattern => format_pattern(fields),
        NoteKind::Vocab => format_vocab(fields),
    }
}

fn format_pattern(fields: &Fields) -> Fields {
    let mut formatted = fields.clone();

    for i in 1..=MAX_PATTERNS {
        if let Some(sentence) = non_empty(fields, &format!("sentence{}", i)) {
            formatted.insert(format!("sentence{}", i), bold_to_placeholder(sentence, ORANGE));
        }
        if let Some(answer) = non_empty(fields, &format!("sentenceAnswer{}", i)) {
            formatted.insert(format!("sentenceAnswer{}", i), bold_to_span(answer, ORANGE));
        }
    }

    formatted
}

fn format_vocab(fields: &Fields) -> Fields {
    let mut formatted = fields.clone();

    for key in ["front", "back"] {
        if let Some(text) = non_empty(fields, key) {
            formatted.insert(key.to_string(), bold_to_span(text, LIGHT_ORANGE));
        }
    }

    formatted
}

fn non_empty<'a>(fields: &'a Fields, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}
