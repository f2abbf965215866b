//! Replicate command - Recreate decks and note types from JSON exports

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use log::info;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::anki::model::{DecksFile, NoteType, NoteTypesFile};
use crate::anki::{AnkiClient, Transport};

/// Used when `--decks` is not given
pub const DEFAULT_DECKS_FILE: &str = "data/decks.json";

/// Options for the replicate command
#[derive(Debug, Clone)]
pub struct ReplicateOptions {
    pub note_types: PathBuf,
    /// `None` means [`DEFAULT_DECKS_FILE`]
    pub decks: Option<PathBuf>,
    pub update_existing: bool,
}

/// What happened to one deck or note type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyExists,
    /// Existing note type with `--update-existing`; AnkiConnect cannot update models
    UpdateUnsupported,
}

/// One row of the final summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replicated {
    pub kind: &'static str,
    pub name: String,
    pub outcome: Outcome,
}

/// Execute the replicate command
pub fn execute(url: Url, options: &ReplicateOptions) -> Result<()> {
    eprintln!("Connecting to AnkiConnect at {}...", url);
    let client = AnkiClient::connect(url)?;

    let summary = replicate(&client, options)?;

    eprintln!("\n{}", "Replication complete!".green());
    if !summary.is_empty() {
        println!("{}", format_summary(&summary));
    }
    Ok(())
}

/// Create decks first, then note types. Existing ones are left alone.
pub fn replicate<T: Transport>(
    client: &AnkiClient<T>,
    options: &ReplicateOptions,
) -> Result<Vec<Replicated>> {
    if !options.note_types.exists() {
        bail!("Note types file not found: {}", options.note_types.display());
    }

    eprintln!("Loading note types from {}...", options.note_types.display());
    let note_types = NoteTypesFile::read(&options.note_types)?.note_types;
    if note_types.is_empty() {
        eprintln!("{} No note types found in JSON file.", "Warning:".yellow());
    } else {
        eprintln!("Found {} note type(s) in export.", note_types.len());
    }

    let decks = match resolve_decks_path(options.decks.as_deref()) {
        Some(path) => {
            eprintln!("Loading decks from {}...", path.display());
            let decks = DecksFile::read(&path)?.decks;
            if decks.is_empty() {
                eprintln!("{} No decks found in JSON file.", "Warning:".yellow());
            } else {
                eprintln!("Found {} deck(s) in configuration.", decks.len());
            }
            decks
        }
        None => Vec::new(),
    };

    let mut summary = Vec::new();
    if !decks.is_empty() {
        summary.extend(replicate_decks(client, &decks)?);
    }
    if !note_types.is_empty() {
        summary.extend(replicate_note_types(client, &note_types, options.update_existing)?);
    }
    Ok(summary)
}

/// The decks file to read, if any.
///
/// A missing default file is skipped silently; a missing explicit one with a warning.
fn resolve_decks_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(path) => {
            eprintln!(
                "{} Decks file not found: {}. Skipping deck creation.",
                "Warning:".yellow(),
                path.display()
            );
            None
        }
        None => {
            let default = PathBuf::from(DEFAULT_DECKS_FILE);
            default.exists().then_some(default)
        }
    }
}

fn replicate_decks<T: Transport>(client: &AnkiClient<T>, decks: &[String]) -> Result<Vec<Replicated>> {
    eprintln!("Creating {} deck(s)...", decks.len());

    let mut done = Vec::with_capacity(decks.len());
    for (i, name) in decks.iter().enumerate() {
        eprintln!("  [{}/{}] Creating deck: {}", i + 1, decks.len(), name);
        let created = client
            .ensure_deck(name)
            .with_context(|| format!("Error creating deck {}", name))?;
        eprintln!("    Deck '{}' ready", name);

        done.push(Replicated {
            kind: "deck",
            name: name.clone(),
            outcome: if created {
                Outcome::Created
            } else {
                Outcome::AlreadyExists
            },
        });
    }
    Ok(done)
}

fn replicate_note_types<T: Transport>(
    client: &AnkiClient<T>,
    note_types: &[NoteType],
    update_existing: bool,
) -> Result<Vec<Replicated>> {
    eprintln!("Creating {} note type(s)...", note_types.len());

    let mut done = Vec::with_capacity(note_types.len());
    for (i, note_type) in note_types.iter().enumerate() {
        eprintln!(
            "  [{}/{}] Creating note type: {}",
            i + 1,
            note_types.len(),
            note_type.name
        );
        let outcome = create_note_type(client, note_type, update_existing)
            .with_context(|| format!("Error creating note type {}", note_type.name))?;

        done.push(Replicated {
            kind: "note type",
            name: note_type.name.clone(),
            outcome,
        });
    }
    Ok(done)
}

fn create_note_type<T: Transport>(
    client: &AnkiClient<T>,
    note_type: &NoteType,
    update_existing: bool,
) -> Result<Outcome> {
    let existing = client.model_names()?;
    if existing.iter().any(|name| name == &note_type.name) {
        if update_existing {
            eprintln!("    Model {} already exists. Updating...", note_type.name);
            eprintln!(
                "    {} Cannot update existing model {}. Skipping.",
                "Warning:".yellow(),
                note_type.name
            );
            return Ok(Outcome::UpdateUnsupported);
        }
        eprintln!("    Model {} already exists. Skipping.", note_type.name);
        info!("skipped existing model {}", note_type.name);
        return Ok(Outcome::AlreadyExists);
    }

    client.create_model(&note_type.to_create_model())?;
    eprintln!("    Created model {}", note_type.name);
    Ok(Outcome::Created)
}

/// Render the created/skipped table
pub fn format_summary(summary: &[Replicated]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Kind"), Cell::new("Name"), Cell::new("Status")]);

    for item in summary {
        let status = match item.outcome {
            Outcome::Created => Cell::new("created").fg(Color::Green),
            Outcome::AlreadyExists => Cell::new("exists, skipped"),
            Outcome::UpdateUnsupported => Cell::new("exists, update unsupported").fg(Color::Yellow),
        };
        table.add_row(vec![Cell::new(item.kind), Cell::new(&item.name), status]);
    }

    table.to_string()
}
