//! Add-notes command - Submit YAML notes to Anki in one batch

use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

use crate::anki::model::AnkiNote;
use crate::anki::{AnkiClient, Transport};
use crate::cards::yaml;
use crate::config::{self, ANKI_CONNECT_VERSION};

/// Execute the add-notes command. The bridge URL is only resolved when
/// notes are actually sent.
pub fn execute(url: Option<&str>, file: &Path, dry_run: bool) -> Result<()> {
    let notes = load_notes(file)?;
    if notes.is_empty() {
        bail!("No valid notes found in {}", file.display());
    }

    if dry_run {
        let payload = json!({
            "action": "addNotes",
            "version": ANKI_CONNECT_VERSION,
            "params": { "notes": notes },
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        println!("\n{}", "(DRY-RUN) No notes sent.".blue());
        return Ok(());
    }

    let client = AnkiClient::connect(config::bridge_url(url)?)?;
    let ids = submit(&client, &notes)?;

    let added = ids.iter().filter(|id| id.is_some()).count();
    for (note, id) in notes.iter().zip(&ids) {
        match id {
            Some(id) => println!("  {} {} ({})", "+".green(), note.deck_name, id.to_string().dimmed()),
            None => eprintln!("  {} {} rejected by Anki", "!".yellow(), note.deck_name),
        }
    }
    println!("\nAdded {} of {} note(s)", added.to_string().green(), notes.len());
    Ok(())
}

/// Parse a YAML note file into formatted `addNotes` notes.
/// Non-conforming records are dropped.
pub fn load_notes(path: &Path) -> Result<Vec<AnkiNote>> {
    let values = yaml::parse_multi_file(path)?;
    let records = yaml::into_records(&values);
    if records.len() < values.len() {
        eprintln!(
            "{} Skipped {} malformed note(s)",
            "Warning:".yellow(),
            values.len() - records.len()
        );
    }

    Ok(records.iter().map(|record| record.to_anki_note()).collect())
}

/// Ensure every target deck exists, then send all notes in one call
pub fn submit<T: Transport>(client: &AnkiClient<T>, notes: &[AnkiNote]) -> Result<Vec<Option<u64>>> {
    let mut decks: Vec<&str> = Vec::new();
    for note in notes {
        if !decks.contains(&note.deck_name.as_str()) {
            decks.push(&note.deck_name);
        }
    }

    for deck in decks {
        client
            .ensure_deck(deck)
            .with_context(|| format!("Failed to ensure deck {}", deck))?;
    }

    Ok(client.add_notes(notes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anki::testing::FakeBridge;
    use std::fs;

    const NOTES: &str = r#"
- note_type: language_vocab
  deck: English::Vocab
  fields:
    front: "Someone who is a bit more **reserved**."
    back: "A **reserved** person is quiet"
  tags: ["language::english::vocabulary"]
- note_type: language_cloze
  deck: English::Cloze
  fields:
    Text: "{{c1::reserved}} people"
  tags: []
- deck: missing-note-type
  fields: {}
  tags: []
- note_type: language_pattern
  deck: English::Vocab
  fields:
    sentence1: "I **used to** run"
    sentenceAnswer1: "I **used to** run"
  tags: []
"#;

    fn write_notes(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.yaml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_notes_formats_and_drops() {
        let (_dir, path) = write_notes(NOTES);
        let notes = load_notes(&path).unwrap();
        assert_eq!(notes.len(), 3);

        assert_eq!(notes[0].model_name, "language_vocab");
        assert_eq!(
            notes[0].fields["back"],
            r#"A <span style="color: rgb(255, 170, 127);">reserved</span> person is quiet"#
        );
        assert_eq!(notes[1].fields["Text"], "{{c1::reserved}} people");
        assert_eq!(
            notes[2].fields["sentence1"],
            r#"I <span style="color: rgb(251, 159, 42);">[...]</span> run"#
        );
    }

    #[test]
    fn test_single_mapping_file() {
        let (_dir, path) = write_notes(
            "note_type: language_polysemy\ndeck: English\nfields:\n  word: run\ntags:\n  - a\n",
        );
        let notes = load_notes(&path).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].tags, vec!["a"]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_notes(Path::new("/nonexistent/notes.yaml")).unwrap_err();
        assert!(err.to_string().contains("YAML file not found"));
    }

    #[test]
    fn test_dry_run_does_not_resolve_url() {
        let (_dir, path) = write_notes(NOTES);
        assert!(execute(Some("not a url"), &path, true).is_ok());

        let err = execute(Some("not a url"), &path, false).unwrap_err();
        assert!(err.to_string().contains("Invalid AnkiConnect URL"));
    }

    #[test]
    fn test_submit_ensures_each_deck_once() {
        let (_dir, path) = write_notes(NOTES);
        let notes = load_notes(&path).unwrap();
        let client = AnkiClient::with_transport(FakeBridge::with_decks(&["English::Cloze"]));

        let ids = submit(&client, &notes).unwrap();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);

        let bridge = client.transport();
        assert_eq!(bridge.count_action("deckNames"), 2);
        assert_eq!(bridge.count_action("createDeck"), 1);
        assert_eq!(bridge.count_action("addNotes"), 1);
        assert_eq!(bridge.notes()[0]["deckName"], "English::Vocab");
        assert_eq!(bridge.notes()[0]["modelName"], "language_vocab");
    }

    #[test]
    fn test_submit_error_is_aggregate() {
        let (_dir, path) = write_notes(NOTES);
        let notes = load_notes(&path).unwrap();
        let bridge = FakeBridge::default();
        bridge.fail_action("addNotes", "cannot create note because it is a duplicate");
        let client = AnkiClient::with_transport(bridge);

        let err = submit(&client, &notes).unwrap_err();
        assert!(err.to_string().contains("addNotes failed"));
        assert!(client.transport().notes().is_empty());
    }
}
