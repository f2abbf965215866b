//! Literature-note command - Reference notes and their chapter/section/concept subnotes
//!
//! References come from a BibTeX library. Each reference gets a directory
//! under `literature-notebook/` holding the reference note and its subnotes,
//! which are linked back through `## Related Notes` sections.

use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use std::fs;
use std::path::{Path, PathBuf};

use super::utils::{self, report_created, report_info, report_warning};
use crate::config;
use crate::menu;
use crate::notes::slug::strip_year_suffix;
use crate::notes::templates::{self, Header};
use crate::notes::{append_related_link, bibtex, slugify, write_new, BibEntry};

/// Directory under the notes root holding one directory per reference
pub const NOTEBOOK_DIR: &str = "literature-notebook";

/// References listed per selection round
const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateReference,
    CreateSubnote,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::CreateReference, Action::CreateSubnote];

    pub fn label(self) -> &'static str {
        match self {
            Action::CreateReference => "create-reference",
            Action::CreateSubnote => "create-subnote",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubnoteKind {
    Chapter,
    Section,
    Concept,
}

impl SubnoteKind {
    pub const ALL: [SubnoteKind; 3] = [SubnoteKind::Chapter, SubnoteKind::Section, SubnoteKind::Concept];

    pub fn label(self) -> &'static str {
        match self {
            SubnoteKind::Chapter => "chapter",
            SubnoteKind::Section => "section",
            SubnoteKind::Concept => "concept",
        }
    }
}

/// Where a reference lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePaths {
    pub dir: PathBuf,
    pub note: PathBuf,
}

/// A reference directory, with its reference note when one exists
#[derive(Debug, Clone)]
struct ReferenceContext {
    dir: PathBuf,
    reference_note: Option<PathBuf>,
}

/// Execute the literature-note command
pub fn execute(root: Option<&Path>, bib: Option<&Path>) -> Result<()> {
    menu::install_signal_handlers();
    let root = config::notes_root(root)?;

    let labels: Vec<String> = Action::ALL.iter().map(|a| a.label().to_string()).collect();
    let action = Action::ALL[menu::prompt_choice("Select action:", &labels)?];

    let bib_path = config::bibtex_path(bib, &root)?;
    let entries = bibtex::load(&bib_path)?;
    log::debug!("Loaded {} references from {}", entries.len(), bib_path.display());
    if entries.is_empty() {
        bail!("No references with a title found in {}", bib_path.display());
    }

    match action {
        Action::CreateReference => {
            let entry = select_entry(&entries)?;
            let path = create_reference(&root, entry)?;
            report_created("reference note", &path);
            Ok(())
        }
        Action::CreateSubnote => create_subnote(&root, &entries),
    }
}

/// `literature-notebook/<key>-<year>-<title>/<key>-<year>-reference-note.md`
pub fn reference_paths(root: &Path, entry: &BibEntry) -> ReferencePaths {
    let year = if entry.year.is_empty() {
        "unknown"
    } else {
        entry.year.as_str()
    };
    let base_key = strip_year_suffix(&entry.citekey, year);
    let slug_key = slugify(if base_key.is_empty() {
        &entry.citekey
    } else {
        &base_key
    });
    let slug_title = slugify(&entry.title);

    let dir = root
        .join(NOTEBOOK_DIR)
        .join(format!("{}-{}-{}", slug_key, year, slug_title));
    let note = dir.join(format!("{}-{}-reference-note.md", slug_key, year));
    ReferencePaths { dir, note }
}

/// Create the reference note. An existing one is an error.
pub fn create_reference(root: &Path, entry: &BibEntry) -> Result<PathBuf> {
    let paths = reference_paths(root, entry);
    if paths.note.exists() {
        bail!("Reference note already exists: {}", paths.note.display());
    }

    fs::create_dir_all(&paths.dir)
        .with_context(|| format!("Failed to create directory: {}", paths.dir.display()))?;
    write_new(&paths.note, &templates::reference_note(entry))?;
    Ok(paths.note)
}

/// Create the reference note unless it is already there
fn ensure_reference(root: &Path, entry: &BibEntry) -> Result<PathBuf> {
    let paths = reference_paths(root, entry);
    if paths.note.exists() {
        report_info(&format!("Reference note already exists: {}", paths.note.display()));
        return Ok(paths.note);
    }
    let path = create_reference(root, entry)?;
    report_created("reference note", &path);
    Ok(path)
}

/// Outcome of one line typed at the reference prompt
#[derive(Debug, PartialEq, Eq)]
pub enum Selection<'a> {
    Chosen(&'a BibEntry),
    /// Show these instead
    Narrowed(Vec<&'a BibEntry>),
    /// Number outside the shown list
    Invalid,
    NoMatches,
    Empty,
}

/// Interpret `raw` against the shown list and the full library.
///
/// Numbers index the shown list. An exact citekey (case-insensitive) selects
/// directly; anything else searches citekeys and titles.
pub fn resolve_selection<'a>(entries: &'a [BibEntry], shown: &[&'a BibEntry], raw: &str) -> Selection<'a> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Selection::Empty;
    }

    if raw.chars().all(|c| c.is_ascii_digit()) {
        return match raw.parse::<usize>() {
            Ok(n) if (1..=shown.len()).contains(&n) => Selection::Chosen(shown[n - 1]),
            _ => Selection::Invalid,
        };
    }

    let term = raw.to_lowercase();
    if let Some(entry) = entries.iter().find(|e| e.citekey.to_lowercase() == term) {
        return Selection::Chosen(entry);
    }

    let matches: Vec<&BibEntry> = entries
        .iter()
        .filter(|e| e.citekey.to_lowercase().contains(&term) || e.title.to_lowercase().contains(&term))
        .take(RECENT_LIMIT)
        .collect();
    if matches.is_empty() {
        Selection::NoMatches
    } else {
        Selection::Narrowed(matches)
    }
}

fn select_entry(entries: &[BibEntry]) -> Result<&BibEntry> {
    let mut shown: Vec<&BibEntry> = entries.iter().take(RECENT_LIMIT).collect();

    loop {
        println!("\n{}", "Recent references:".bold());
        for (i, entry) in shown.iter().enumerate() {
            let year = if entry.year.is_empty() {
                "n.d."
            } else {
                entry.year.as_str()
            };
            println!(
                "  {} {} {} - {}",
                format!("{}.", i + 1).green(),
                entry.citekey,
                format!("({})", year).dimmed(),
                entry.title
            );
        }

        let prompt = format!(
            "\n{} Select by number or search {}: ",
            "?".green().bold(),
            "(q to quit)".dimmed()
        );
        let raw = menu::read_line_quick_quit(&prompt)?;

        match resolve_selection(entries, &shown, &raw) {
            Selection::Chosen(entry) => return Ok(entry),
            Selection::Narrowed(matches) => shown = matches,
            Selection::Invalid => println!("{}", "Invalid selection.".yellow()),
            Selection::NoMatches => println!("{}", "No matches found. Try another search.".yellow()),
            Selection::Empty => {}
        }
    }
}

/// Pick a reference and make sure its directory exists.
/// `None` means the user chose to stop.
fn reference_context(root: &Path, entries: &[BibEntry]) -> Result<Option<ReferenceContext>> {
    let entry = select_entry(entries)?;
    let paths = reference_paths(root, entry);
    let dir_name = paths
        .dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if paths.dir.exists() {
        let mut reference_note = paths.note.exists().then(|| paths.note.clone());
        if reference_note.is_some() {
            report_info(&format!("Using existing reference: {}", dir_name.bold()));
        } else {
            report_warning(&format!("Directory exists but no reference note: {}", dir_name));
            if menu::prompt_yes_no("Create reference note?", true)? {
                reference_note = Some(ensure_reference(root, entry)?);
            }
        }
        return Ok(Some(ReferenceContext {
            dir: paths.dir,
            reference_note,
        }));
    }

    let short_title: String = entry.title.chars().take(60).collect();
    report_info(&format!("No existing directory for: {}...", short_title));
    if !menu::prompt_yes_no("Create reference note first?", true)? {
        println!("{}", "Cannot create subnote without reference directory.".dimmed());
        return Ok(None);
    }

    let note = ensure_reference(root, entry)?;
    if !menu::prompt_yes_no("Continue to create subnote?", true)? {
        println!("{} Done.", "✓".green().bold());
        return Ok(None);
    }

    Ok(Some(ReferenceContext {
        dir: paths.dir,
        reference_note: Some(note),
    }))
}

fn create_subnote(root: &Path, entries: &[BibEntry]) -> Result<()> {
    let Some(context) = reference_context(root, entries)? else {
        return Ok(());
    };

    let labels: Vec<String> = SubnoteKind::ALL.iter().map(|k| k.label().to_string()).collect();
    let kind = SubnoteKind::ALL[menu::prompt_choice("Select sub-note type:", &labels)?];

    let created = utils::timestamp();
    let tags_yaml = menu::prompt_tags()?;
    let meta = NoteMeta {
        created: &created,
        tags_yaml: &tags_yaml,
    };

    match kind {
        SubnoteKind::Chapter => {
            let number = menu::prompt_text("Chapter number (e.g., 1)")?;
            let title = menu::prompt_text("Chapter title")?;
            let path = chapter_note(&context.dir, &number, &title, &meta)?;
            if let Some(reference) = &context.reference_note {
                append_related_link(reference, &stem(&path))?;
            }
            report_created("chapter note", &path);
        }
        SubnoteKind::Section => {
            let number = menu::prompt_text("Section number (e.g., 2.5)")?;
            let title = menu::prompt_text("Section title")?;
            let path = section_note(&context.dir, &number, &title, &meta)?;

            let chapter = chapter_of_section(&number);
            let mut chapter_note_path = find_chapter_note(&context.dir, &chapter)?;
            if chapter_note_path.is_none() {
                let question = format!(
                    "No chapter found for ch{}. Create one now (otherwise link to main reference note)?",
                    chapter
                );
                if menu::prompt_yes_no(&question, false)? {
                    let chapter_title = menu::prompt_text("Chapter title")?;
                    let created = chapter_note(&context.dir, &chapter, &chapter_title, &meta)?;
                    if let Some(reference) = &context.reference_note {
                        append_related_link(reference, &stem(&created))?;
                    }
                    chapter_note_path = Some(created);
                }
            }

            match (&chapter_note_path, &context.reference_note) {
                (Some(chapter), _) => {
                    append_related_link(chapter, &stem(&path))?;
                }
                (None, Some(reference)) => {
                    append_related_link(reference, &stem(&path))?;
                }
                (None, None) => report_warning(
                    "No chapter or reference note found to link. Skipping link insertion.",
                ),
            }
            report_created("section note", &path);
        }
        SubnoteKind::Concept => {
            let notes = notes_in_dir(&context.dir)?;
            let stems: Vec<String> = notes.iter().map(|p| stem(p)).collect();
            let target = &notes[menu::prompt_choice("Select a note to link:", &stems)?];

            let title = menu::prompt_text("Concept title")?;
            let path = concept_note(&context.dir, &title, &meta)?;
            append_related_link(target, &stem(&path))?;
            report_created("concept note", &path);
        }
    }
    Ok(())
}

/// Front matter values shared by the subnotes of one run
#[derive(Debug, Clone, Copy)]
pub struct NoteMeta<'a> {
    pub created: &'a str,
    pub tags_yaml: &'a str,
}

impl NoteMeta<'_> {
    fn header<'t>(&'t self, title: &'t str) -> Header<'t> {
        Header {
            title,
            project: None,
            created: self.created,
            tags_yaml: self.tags_yaml,
        }
    }
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `ch<N>-<slug>.md`, created only if it does not exist yet
pub fn chapter_note(dir: &Path, number: &str, title: &str, meta: &NoteMeta) -> Result<PathBuf> {
    let path = dir.join(format!("ch{}-{}.md", number, slugify(title)));
    if !path.exists() {
        let display = format!("ch{} {}", number, title);
        write_new(&path, &templates::chapter_section_note(&meta.header(&display)))?;
    }
    Ok(path)
}

/// `sec<N with dots as underscores>-<slug>.md`. An existing file is an error.
pub fn section_note(dir: &Path, number: &str, title: &str, meta: &NoteMeta) -> Result<PathBuf> {
    let path = dir.join(format!("sec{}-{}.md", number.replace('.', "_"), slugify(title)));
    let display = format!("sec{} {}", number, title);
    write_new(&path, &templates::chapter_section_note(&meta.header(&display)))?;
    Ok(path)
}

/// `<slug>.md`. An existing file is an error.
pub fn concept_note(dir: &Path, title: &str, meta: &NoteMeta) -> Result<PathBuf> {
    let path = dir.join(format!("{}.md", slugify(title)));
    write_new(&path, &templates::concept_note(&meta.header(title)))?;
    Ok(path)
}

/// Leading digits of a section number: `2.5` -> `2`
pub fn chapter_of_section(number: &str) -> String {
    let digits: String = number.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        number.to_string()
    } else {
        digits
    }
}

/// First note named `ch<N>` or `ch<N>-...` in `dir`
pub fn find_chapter_note(dir: &Path, chapter: &str) -> Result<Option<PathBuf>> {
    let exact = format!("ch{}", chapter);
    let prefix = format!("ch{}-", chapter);
    Ok(notes_in(dir)?
        .into_iter()
        .find(|path| {
            let stem = stem(path);
            stem == exact || stem.starts_with(&prefix)
        }))
}

/// Markdown notes in `dir`, sorted; none is an error
pub fn notes_in_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let notes = notes_in(dir)?;
    if notes.is_empty() {
        bail!("No notes found in {}", dir.display());
    }
    Ok(notes)
}

fn notes_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read: {}", dir.display()))?;
    let mut notes: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    notes.sort();
    Ok(notes)
}
