//! Note types, decks and notes as AnkiConnect sees them

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Field name -> field content
pub type Fields = BTreeMap<String, String>;

/// Note type export file: `{"note_types": [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct NoteTypesFile {
    #[serde(default)]
    pub note_types: Vec<NoteType>,
}

/// Deck list file: `{"decks": [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct DecksFile {
    #[serde(default)]
    pub decks: Vec<String>,
}

/// A note type (model) definition as exported from Anki
#[derive(Debug, Clone, Deserialize)]
pub struct NoteType {
    pub name: String,

    /// Field names in display order
    pub fields: Vec<String>,

    /// Card templates keyed by label, e.g. `{"Card 1": {"Name", "Front", "Back"}}`
    #[serde(default)]
    pub templates: Map<String, Value>,

    #[serde(default)]
    pub css: String,

    #[serde(default)]
    pub is_cloze: bool,
}

/// One card template in `createModel` form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CardTemplate {
    pub name: String,
    pub front: String,
    pub back: String,
}

/// Parameters of the `createModel` action
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModel {
    pub model_name: String,
    pub in_order_fields: Vec<String>,
    pub card_templates: Vec<CardTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_cloze: bool,
}

/// A note in `addNotes` form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnkiNote {
    pub deck_name: String,
    pub model_name: String,
    pub fields: Fields,
    pub tags: Vec<String>,
}

impl NoteTypesFile {
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse note types: {}", path.display()))
    }
}

impl DecksFile {
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse decks: {}", path.display()))
    }
}

impl NoteType {
    /// Convert the label-keyed export templates into `createModel` order.
    /// Entries that are not objects are dropped.
    pub fn card_templates(&self) -> Vec<CardTemplate> {
        self.templates
            .iter()
            .filter_map(|(label, data)| {
                let data = data.as_object()?;
                let text = |key: &str| data.get(key).and_then(Value::as_str).map(str::to_string);
                Some(CardTemplate {
                    name: text("Name").unwrap_or_else(|| label.clone()),
                    front: text("Front").unwrap_or_default(),
                    back: text("Back").unwrap_or_default(),
                })
            })
            .collect()
    }

    pub fn to_create_model(&self) -> CreateModel {
        CreateModel {
            model_name: self.name.clone(),
            in_order_fields: self.fields.clone(),
            card_templates: self.card_templates(),
            css: (!self.css.is_empty()).then(|| self.css.clone()),
            is_cloze: self.is_cloze,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vocab_type() -> NoteType {
        serde_json::from_value(json!({
            "name": "language_vocab",
            "fields": ["front", "back"],
            "templates": {
                "Card 1": {"Name": "Recognition", "Front": "{{front}}", "Back": "{{back}}"},
                "Card 2": {"Front": "{{back}}"},
                "broken": "not an object"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_card_templates_keep_order_and_defaults() {
        let templates = vocab_type().card_templates();
        assert_eq!(
            templates,
            vec![
                CardTemplate {
                    name: "Recognition".into(),
                    front: "{{front}}".into(),
                    back: "{{back}}".into(),
                },
                CardTemplate {
                    name: "Card 2".into(),
                    front: "{{back}}".into(),
                    back: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_create_model_omits_empty_css_and_cloze() {
        let params = serde_json::to_value(vocab_type().to_create_model()).unwrap();
        assert_eq!(params["modelName"], "language_vocab");
        assert_eq!(params["inOrderFields"], json!(["front", "back"]));
        assert!(params.get("css").is_none());
        assert!(params.get("isCloze").is_none());
    }

    #[test]
    fn test_create_model_cloze_with_css() {
        let mut note_type = vocab_type();
        note_type.css = ".card { color: red; }".into();
        note_type.is_cloze = true;
        let params = serde_json::to_value(note_type.to_create_model()).unwrap();
        assert_eq!(params["css"], ".card { color: red; }");
        assert_eq!(params["isCloze"], true);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let types: NoteTypesFile = serde_json::from_str("{}").unwrap();
        let decks: DecksFile = serde_json::from_str("{}").unwrap();
        assert!(types.note_types.is_empty());
        assert!(decks.decks.is_empty());
    }

    #[test]
    fn test_anki_note_serializes_camel_case() {
        let note = AnkiNote {
            deck_name: "English".into(),
            model_name: "language_vocab".into(),
            fields: Fields::from([("front".into(), "hi".into())]),
            tags: vec!["language::english".into()],
        };
        let value = serde_json::to_value(note).unwrap();
        assert_eq!(value["deckName"], "English");
        assert_eq!(value["modelName"], "language_vocab");
        assert_eq!(value["fields"]["front"], "hi");
    }
}
