//! Markdown skeletons for each note kind

use super::bibtex::BibEntry;

/// Front matter shared by the scaffolded notes
#[derive(Debug, Clone)]
pub struct Header<'a> {
    pub title: &'a str,
    pub project: Option<&'a str>,
    /// `YYYY-MM-DD HH:MM`
    pub created: &'a str,
    /// Output of [`crate::menu::prompt::tags_yaml`]
    pub tags_yaml: &'a str,
}

impl Header<'_> {
    fn front_matter(&self, quote_title: bool) -> String {
        let mut out = String::from("---\n");
        if quote_title {
            out.push_str(&format!("title: \"{}\"\n", self.title));
        } else {
            out.push_str(&format!("title: {}\n", self.title));
        }
        if let Some(project) = self.project {
            out.push_str(&format!("project: \"{}\"\n", project));
        }
        out.push_str(&format!("created: {}\n", self.created));
        out.push_str(&format!("tags: {}\n", self.tags_yaml));
        out.push_str("---\n");
        out
    }
}

const CLASS_BODY: &str = "\
## Readings

## Cue (Keywords / Questions)
<!-- Left column: prompts, keywords, or questions. Use short bullets. -->
### English Vocabulary

### Keywords

## Notes (Lecture Notes)
<!-- Right column: main lecture notes. Use concise bullets, examples, formulas. -->

## Summary (After Class)
<!-- Bottom summary: 3-5 sentence synthesis of the session. -->

## Questions

## Assignments / Next Steps
<!-- Homework, readings, or actions before next session. -->
";

const BRAINSTORM_BODY: &str = "\
## Brief
<!-- What is the assignment asking? Scope, deliverables, evaluation criteria. -->

## Brainstorm
<!-- Ideas, angles, frameworks, hypotheses, possible contributions. -->

## Questions
<!-- Clarifications needed, assumptions, unknowns to resolve. -->

## Data & Constraints
<!-- Datasets, access, time constraints, tools, dependencies. -->

## Plan (Draft Outline)
<!-- Sections, key arguments, methods, expected results. -->
";

const REFERENCE_BODY: &str = "\
## Related Notes

## Before You Read

1. Why am I reading this?

2. What are the authors trying to do in writing this?

3. What are the authors saying that is relevant to what I want to find out?

4. How convincing is what the authors saying?

5. In conclusion, what use can I make of this?

## Notes

### Keywords

### Memo

### Summary

## Post-Reading Assessment

## Questions

";

const CHAPTER_SECTION_BODY: &str = "\
## Related Notes

## Keywords
<!-- Keywords found in reading -->

## Memo
<!-- Memo while reading -->

## Summary
<!-- Brief summary of this chapter -->

## Key Concepts
<!-- List of key concepts introduced in this chapter -->

## Important Formulas/Theorems
<!-- Important formulas, theorems, or principles -->

## Examples
<!-- Notable examples from the chapter -->

## Questions

";

const CONCEPT_BODY: &str = "\
## Related Notes

## Memo
<!-- Memo while reading -->

## Definition
<!-- Clear definition of the concept -->

## Examples
<!-- Examples that illustrate the concept -->

## Applications
<!-- How this concept is applied -->

## Questions

";

pub fn class_note(header: &Header) -> String {
    format!("{}\n{}", header.front_matter(true), CLASS_BODY)
}

pub fn brainstorm_note(header: &Header) -> String {
    format!("{}{}", header.front_matter(true), BRAINSTORM_BODY)
}

/// Front matter only; the title is left unquoted
pub fn temp_note(header: &Header) -> String {
    header.front_matter(false)
}

pub fn reference_note(entry: &BibEntry) -> String {
    format!(
        "---\n\
         title: \"{title}\"\n\
         authors: {authors}\n\
         year: {year}\n\
         type: {entry_type}\n\
         keywords: {keywords}\n\
         citekey: {citekey}\n\
         tags:\n\
         printed:\n\
         ---\n\
         # {title}\n\
         \n\
         {body}",
        title = entry.title,
        authors = entry.authors,
        year = entry.year,
        entry_type = entry.entry_type,
        keywords = entry.keywords,
        citekey = entry.citekey,
        body = REFERENCE_BODY,
    )
}

/// Chapter and section notes share one skeleton
pub fn chapter_section_note(header: &Header) -> String {
    format!(
        "{}# {}\n\n{}",
        header.front_matter(true),
        header.title,
        CHAPTER_SECTION_BODY
    )
}

pub fn concept_note(header: &Header) -> String {
    format!(
        "{}# {}\n\n{}",
        header.front_matter(true),
        header.title,
        CONCEPT_BODY
    )
}
