//! YAML note input produced by the language tutor agents
//!
//! A note looks like:
//!
//! ```yaml
//! note_type: language_vocab
//! deck: English
//! fields:
//!   front: "Someone who is a bit more **reserved**."
//!   back: "A reserved person is quiet and shy"
//! tags:
//!   - language::english::vocabulary
//! ```
//!
//! A file may hold one such mapping or a sequence of them.

use anyhow::{bail, Context, Result};
use log::debug;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

use crate::anki::model::{AnkiNote, Fields};
use crate::cards::formatter;

/// A note that passed [`validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub note_type: String,
    pub deck: String,
    pub fields: Fields,
    pub tags: Vec<String>,
}

/// Parse a YAML string. Empty input parses to `null`.
pub fn parse_single(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(text).context("Malformed YAML")
}

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("YAML file not found: {}", path.display());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read: {}", path.display()))
}

/// Parse a YAML file
pub fn parse_file(path: &Path) -> Result<Value> {
    let content = read_file(path)?;
    parse_single(&content).with_context(|| format!("Failed to parse: {}", path.display()))
}

/// Parse a YAML file holding one note or many, as [`parse_multi`] does
pub fn parse_multi_file(path: &Path) -> Result<Vec<Value>> {
    let content = read_file(path)?;
    parse_multi(&content).with_context(|| format!("Failed to parse: {}", path.display()))
}

/// Check that `note_type`, `deck`, `fields` and `tags` exist with the shapes
/// string, string, mapping and sequence. Field contents are not inspected.
pub fn validate(note: &Value) -> bool {
    let Some(map) = note.as_mapping() else {
        return false;
    };
    matches!(map.get("note_type"), Some(Value::String(_)))
        && matches!(map.get("deck"), Some(Value::String(_)))
        && matches!(map.get("fields"), Some(Value::Mapping(_)))
        && matches!(map.get("tags"), Some(Value::Sequence(_)))
}

/// Parse YAML holding one note or many.
///
/// - A top-level sequence is returned as-is, element by element, without
///   validation.
/// - A single valid note mapping becomes a one-element vector.
/// - Anything else yields an empty vector.
pub fn parse_multi(text: &str) -> Result<Vec<Value>> {
    match parse_single(text)? {
        Value::Sequence(items) => Ok(items),
        note @ Value::Mapping(_) if validate(&note) => Ok(vec![note]),
        _ => Ok(Vec::new()),
    }
}

/// The `fields` mapping of a valid note
pub fn extract_fields(note: &Value) -> Option<&Mapping> {
    if !validate(note) {
        return None;
    }
    note.get("fields")?.as_mapping()
}

/// Keep only the conforming notes, dropping the rest silently
pub fn into_records(values: &[Value]) -> Vec<NoteRecord> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let record = NoteRecord::from_value(value);
            if record.is_none() {
                debug!("Dropping note #{}: missing or mistyped keys", i + 1);
            }
            record
        })
        .collect()
}

impl NoteRecord {
    pub fn from_value(note: &Value) -> Option<Self> {
        if !validate(note) {
            return None;
        }

        let fields = note
            .get("fields")?
            .as_mapping()?
            .iter()
            .filter_map(|(key, value)| Some((scalar_text(key)?, scalar_text(value)?)))
            .collect();

        let tags = note
            .get("tags")?
            .as_sequence()?
            .iter()
            .filter_map(scalar_text)
            .collect();

        Some(Self {
            note_type: note.get("note_type")?.as_str()?.to_string(),
            deck: note.get("deck")?.as_str()?.to_string(),
            fields,
            tags,
        })
    }

    /// Convert into `addNotes` form with note-type formatting applied
    pub fn to_anki_note(&self) -> AnkiNote {
        AnkiNote {
            deck_name: self.deck.clone(),
            model_name: self.note_type.clone(),
            fields: formatter::format_fields(&self.note_type, &self.fields),
            tags: self.tags.clone(),
        }
    }
}

/// Render a scalar as field text; nested values are skipped
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = r#"
note_type: language_vocab
deck: English
fields:
  front: "Someone who is a bit more reserved."
  back: "A reserved person is quiet and shy"
  pronunciation: "ri'zervd"
tags:
  - language::english::vocabulary
"#;

    const THREE: &str = r#"
- note_type: language_cloze
  deck: English
  fields:
    Text: "Before we go, {{c1::do you have any questions::any questions}}?"
  tags: [language::english::phrases]
- note_type: language_vocab
  deck: English
  fields: {front: reserved, back: quiet and shy}
  tags: []
- note_type: language_pattern
  deck: English::Patterns
  fields: {source: efficient}
  tags: [a, b]
"#;

    const MIXED: &str = r#"
- note_type: language_vocab
  deck: English
  fields: {front: a}
  tags: []
- note_type: language_vocab
  fields: {front: missing deck}
"#;

    #[test]
    fn test_single_note_is_valid() {
        let note = parse_single(SINGLE).unwrap();
        assert!(validate(&note));
        let fields = extract_fields(&note).unwrap();
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_validate_rejects_wrong_shapes() {
        let wrong_tags = parse_single("note_type: a\ndeck: b\nfields: {}\ntags: nope").unwrap();
        let wrong_deck = parse_single("note_type: a\ndeck: [b]\nfields: {}\ntags: []").unwrap();
        let missing = parse_single("note_type: a\nfields: {front: x}").unwrap();
        assert!(!validate(&wrong_tags));
        assert!(!validate(&wrong_deck));
        assert!(!validate(&missing));
        assert!(!validate(&Value::Null));
        assert!(extract_fields(&missing).is_none());
    }

    #[test]
    fn test_multi_keeps_order() {
        let notes = parse_multi(THREE).unwrap();
        assert_eq!(notes.len(), 3);
        let records = into_records(&notes);
        let types: Vec<_> = records.iter().map(|r| r.note_type.as_str()).collect();
        assert_eq!(
            types,
            vec!["language_cloze", "language_vocab", "language_pattern"]
        );
    }

    #[test]
    fn test_top_level_sequence_is_returned_verbatim() {
        let notes = parse_multi(MIXED).unwrap();
        assert_eq!(notes.len(), 2);
        assert!(!validate(&notes[1]));
    }

    #[test]
    fn test_lenient_records_drop_non_conforming() {
        let notes = parse_multi(MIXED).unwrap();
        let records = into_records(&notes);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields["front"], "a");
    }

    #[test]
    fn test_single_mapping_wrapped_or_dropped() {
        assert_eq!(parse_multi(SINGLE).unwrap().len(), 1);
        assert!(parse_multi("note_type: a\nfields: {}").unwrap().is_empty());
        assert!(parse_multi("just a string").unwrap().is_empty());
        assert!(parse_multi("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        assert!(parse_multi("key: [unclosed").is_err());
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file(Path::new("/nonexistent/notes.yaml")).unwrap_err();
        assert!(err.to_string().contains("YAML file not found"));
        let err = parse_multi_file(Path::new("/nonexistent/notes.yaml")).unwrap_err();
        assert!(err.to_string().contains("YAML file not found"));
    }

    #[test]
    fn test_parse_multi_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.yaml");

        fs::write(&path, SINGLE).unwrap();
        assert_eq!(parse_multi_file(&path).unwrap().len(), 1);
        assert_eq!(parse_file(&path).unwrap(), parse_single(SINGLE).unwrap());

        fs::write(&path, "key: [unclosed").unwrap();
        let err = parse_multi_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_record_scalars_become_text() {
        let note = parse_single(
            "note_type: t\ndeck: d\nfields: {count: 3, flag: true, empty: ~, nested: [1]}\ntags: [1, x]",
        )
        .unwrap();
        let record = NoteRecord::from_value(&note).unwrap();
        assert_eq!(record.fields["count"], "3");
        assert_eq!(record.fields["flag"], "true");
        assert_eq!(record.fields["empty"], "");
        assert!(!record.fields.contains_key("nested"));
        assert_eq!(record.tags, vec!["1", "x"]);
    }

    #[test]
    fn test_to_anki_note_formats_fields() {
        let note = parse_single(
            "note_type: language_vocab\ndeck: English\nfields: {front: 'a **word**'}\ntags: []",
        )
        .unwrap();
        let anki = NoteRecord::from_value(&note).unwrap().to_anki_note();
        assert_eq!(anki.model_name, "language_vocab");
        assert_eq!(anki.deck_name, "English");
        assert!(anki.fields["front"].contains("rgb(255, 170, 127)"));
    }
}
