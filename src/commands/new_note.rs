//! New-note command - Scaffold a class, brainstorm or temp note

use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use std::fs;
use std::path::{Path, PathBuf};

use super::utils;
use crate::config;
use crate::menu;
use crate::notes::templates::{self, Header};
use crate::notes::{slugify, write_new};

/// Kinds offered by the note type menu, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Class,
    Brainstorm,
    Temp,
}

impl NoteKind {
    pub const ALL: [NoteKind; 3] = [NoteKind::Class, NoteKind::Brainstorm, NoteKind::Temp];

    pub fn label(self) -> &'static str {
        match self {
            NoteKind::Class => "class",
            NoteKind::Brainstorm => "brainstorm",
            NoteKind::Temp => "temp",
        }
    }
}

/// Where the note goes and which project it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub dir: PathBuf,
    /// Directory name used as the `project` front matter value
    pub project: String,
    /// Picked from `projects/` rather than the current directory
    pub in_projects: bool,
}

impl Location {
    pub fn current(dir: PathBuf) -> Self {
        let project = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            dir,
            project,
            in_projects: false,
        }
    }

    pub fn project(dir: PathBuf) -> Self {
        Self {
            in_projects: true,
            ..Self::current(dir)
        }
    }
}

/// Execute the new-note command
pub fn execute(root: Option<&Path>) -> Result<()> {
    menu::install_signal_handlers();
    let root = config::notes_root(root)?;

    let location = choose_location(&root)?;

    let labels: Vec<String> = NoteKind::ALL.iter().map(|k| k.label().to_string()).collect();
    let kind = NoteKind::ALL[menu::prompt_choice("Select note type:", &labels)?];

    let title = menu::prompt_text("Note title")?;
    let tags_yaml = menu::prompt_tags()?;

    let path = create_note(&location, kind, &title, &tags_yaml, &utils::timestamp())?;
    println!("{} {}", "Created:".green().bold(), path.display().cyan());
    Ok(())
}

fn choose_location(root: &Path) -> Result<Location> {
    let current = std::env::current_dir().context("Failed to get current directory")?;
    let projects_dir = root.join("projects");

    let options = vec![
        format!("Current directory ({})", current.display()),
        format!("projects/ ({})", projects_dir.display()),
    ];
    if menu::prompt_choice("Where do you want to save the note?", &options)? == 0 {
        return Ok(Location::current(current));
    }

    let projects = list_project_dirs(&projects_dir)?;
    if projects.is_empty() {
        bail!("No project directories found under projects/.");
    }

    let names: Vec<String> = projects
        .iter()
        .filter_map(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    let index = menu::prompt_choice("Select a project directory:", &names)?;
    Ok(Location::project(projects[index].clone()))
}

/// Non-hidden subdirectories of `projects_dir`, sorted case-insensitively
pub fn list_project_dirs(projects_dir: &Path) -> Result<Vec<PathBuf>> {
    if !projects_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(projects_dir)
        .with_context(|| format!("Failed to read: {}", projects_dir.display()))?;

    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .collect();

    dirs.sort_by_key(|dir| {
        dir.file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    Ok(dirs)
}

/// Render the note body for `kind`
pub fn render(kind: NoteKind, location: &Location, title: &str, tags_yaml: &str, created: &str) -> String {
    let project = match kind {
        NoteKind::Temp if !location.in_projects => None,
        _ => Some(location.project.as_str()),
    };
    let header = Header {
        title,
        project,
        created,
        tags_yaml,
    };

    match kind {
        NoteKind::Class => templates::class_note(&header),
        NoteKind::Brainstorm => templates::brainstorm_note(&header),
        NoteKind::Temp => templates::temp_note(&header),
    }
}

/// Write the note as `<slug>.md` in the location. An existing file is an error.
pub fn create_note(
    location: &Location,
    kind: NoteKind,
    title: &str,
    tags_yaml: &str,
    created: &str,
) -> Result<PathBuf> {
    let path = location.dir.join(format!("{}.md", slugify(title)));
    write_new(&path, &render(kind, location, title, tags_yaml, created))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATED: &str = "2025-03-04 10:00";

    #[test]
    fn test_list_project_dirs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["beta", "Alpha", ".hidden", "gamma"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("file.md"), "").unwrap();

        let names: Vec<String> = list_project_dirs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Alpha", "beta", "gamma"]);

        assert!(list_project_dirs(&dir.path().join("missing")).unwrap().is_empty());
    }

    #[test]
    fn test_create_class_note() {
        let dir = tempfile::tempdir().unwrap();
        let location = Location::current(dir.path().join("linalg"));
        fs::create_dir(&location.dir).unwrap();

        let path = create_note(&location, NoteKind::Class, "Week 1: Vectors & Spaces", "[]", CREATED).unwrap();
        assert_eq!(path.file_name().unwrap(), "week-1-vectors-and-spaces.md");

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("---\ntitle: \"Week 1: Vectors & Spaces\"\nproject: \"linalg\"\n"));
        assert!(content.contains("## Cue (Keywords / Questions)"));
    }

    #[test]
    fn test_temp_note_project_only_under_projects() {
        let location = Location::current(PathBuf::from("/tmp/somewhere"));
        let note = render(NoteKind::Temp, &location, "Scratch", "[]", CREATED);
        assert!(!note.contains("project:"));
        assert!(note.contains("title: Scratch\n"));

        let location = Location::project(PathBuf::from("/notes/projects/thesis"));
        let note = render(NoteKind::Temp, &location, "Scratch", "[]", CREATED);
        assert!(note.contains("project: \"thesis\"\n"));
    }

    #[test]
    fn test_existing_note_is_left_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let location = Location::project(dir.path().to_path_buf());
        let existing = dir.path().join("plan.md");
        fs::write(&existing, "my careful notes").unwrap();

        let err = create_note(&location, NoteKind::Brainstorm, "Plan", "[]", CREATED).unwrap_err();
        assert!(err.to_string().contains("File already exists"));
        assert_eq!(fs::read_to_string(&existing).unwrap(), "my careful notes");
    }

    #[test]
    fn test_menu_labels() {
        let labels: Vec<_> = NoteKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["class", "brainstorm", "temp"]);
    }
}
