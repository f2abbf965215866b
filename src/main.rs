//! studykit: CLI for Anki card automation and markdown study notes
//!
//! Talks to a running Anki through the AnkiConnect add-on and scaffolds
//! class, brainstorm, temp and literature notes.

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use studykit::{commands, config};

#[derive(Parser)]
#[command(name = "studykit")]
#[command(about = "Anki card automation and markdown note scaffolding", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recreate decks and note types from JSON exports
    Replicate {
        /// Note types JSON file (`{"note_types": [...]}`)
        #[arg(short, long)]
        note_types: PathBuf,

        /// Decks JSON file (default: data/decks.json)
        #[arg(short, long)]
        decks: Option<PathBuf>,

        /// AnkiConnect URL (default: $ANKI_CONNECT_URL or http://localhost:8765)
        #[arg(long)]
        url: Option<String>,

        /// Try to update note types that already exist (AnkiConnect cannot; they are skipped)
        #[arg(long)]
        update_existing: bool,
    },

    /// Send a raw JSON request to AnkiConnect and print the reply
    Send {
        /// Payload file (reads stdin if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Treat a payload without "action" as the params of this action
        #[arg(short, long)]
        action: Option<String>,

        /// AnkiConnect URL (default: $ANKI_CONNECT_URL or http://localhost:8765)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Add notes from a YAML file (one note or a list)
    AddNotes {
        /// YAML note file
        file: PathBuf,

        /// Print the addNotes payload instead of sending it
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// AnkiConnect URL (default: $ANKI_CONNECT_URL or http://localhost:8765)
        #[arg(long)]
        url: Option<String>,
    },

    /// Create a class, brainstorm or temp note
    NewNote {
        /// Notes root holding projects/ (default: $NOTES_ROOT or current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Create a reference note or a chapter/section/concept subnote
    LiteratureNote {
        /// Notes root holding literature-notebook/ (default: $NOTES_ROOT or current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// BibTeX library (default: $BIBTEX_FILE, <root>/references.bib, then the Better BibTeX export)
        #[arg(long)]
        bib: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replicate {
            note_types,
            decks,
            url,
            update_existing,
        } => {
            let url = config::bridge_url(url.as_deref())?;
            let options = commands::replicate::ReplicateOptions {
                note_types,
                decks,
                update_existing,
            };
            commands::replicate::execute(url, &options)?;
        }

        Commands::Send { file, action, url } => {
            let url = config::bridge_url(url.as_deref())?;
            commands::send::execute(url, file.as_deref(), action.as_deref())?;
        }

        Commands::AddNotes { file, dry_run, url } => {
            if dry_run {
                println!("{}", "(DRY-RUN MODE - nothing will be sent)".blue());
            }
            commands::add_notes::execute(url.as_deref(), &file, dry_run)?;
        }

        Commands::NewNote { root } => {
            commands::new_note::execute(root.as_deref())?;
        }

        Commands::LiteratureNote { root, bib } => {
            commands::literature::execute(root.as_deref(), bib.as_deref())?;
        }
    }

    Ok(())
}
