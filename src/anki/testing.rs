//! In-memory stand-in for the AnkiConnect bridge

use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;

use super::client::{BridgeError, BridgeResponse, Transport};

#[derive(Debug, Default)]
struct State {
    decks: Vec<String>,
    models: Vec<String>,
    notes: Vec<Value>,
    requests: Vec<Value>,
    canned: HashMap<String, BridgeResponse>,
}

/// Keeps decks, models and notes in memory and records every request
#[derive(Debug, Default)]
pub struct FakeBridge {
    state: RefCell<State>,
}

impl FakeBridge {
    pub fn with_decks(decks: &[&str]) -> Self {
        let bridge = Self::default();
        bridge.state.borrow_mut().decks = decks.iter().map(|d| d.to_string()).collect();
        bridge
    }

    pub fn with_models(self, models: &[&str]) -> Self {
        self.state.borrow_mut().models = models.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Answer `action` with `result` instead of simulating it
    pub fn respond(&self, action: &str, result: Value) {
        self.state.borrow_mut().canned.insert(
            action.to_string(),
            BridgeResponse {
                result,
                error: None,
            },
        );
    }

    /// Answer `action` with a bridge-level error
    pub fn fail_action(&self, action: &str, message: &str) {
        self.state.borrow_mut().canned.insert(
            action.to_string(),
            BridgeResponse {
                result: Value::Null,
                error: Some(message.to_string()),
            },
        );
    }

    pub fn decks(&self) -> Vec<String> {
        self.state.borrow().decks.clone()
    }

    pub fn models(&self) -> Vec<String> {
        self.state.borrow().models.clone()
    }

    pub fn notes(&self) -> Vec<Value> {
        self.state.borrow().notes.clone()
    }

    pub fn requests(&self) -> Vec<Value> {
        self.state.borrow().requests.clone()
    }

    pub fn count_action(&self, action: &str) -> usize {
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|r| r["action"] == action)
            .count()
    }
}

impl Transport for FakeBridge {
    fn post(&self, payload: &Value) -> Result<BridgeResponse, BridgeError> {
        let mut state = self.state.borrow_mut();
        state.requests.push(payload.clone());

        let action = payload["action"].as_str().unwrap_or_default().to_string();
        if let Some(canned) = state.canned.get(&action) {
            return Ok(canned.clone());
        }

        let params = &payload["params"];
        let result = match action.as_str() {
            "version" => json!(6),
            "deckNames" => json!(state.decks),
            "createDeck" => {
                let deck = params["deck"].as_str().unwrap_or_default().to_string();
                if !state.decks.contains(&deck) {
                    state.decks.push(deck);
                }
                json!(1_700_000_000_000u64 + state.decks.len() as u64)
            }
            "modelNames" => json!(state.models),
            "createModel" => {
                let name = params["modelName"].as_str().unwrap_or_default().to_string();
                state.models.push(name.clone());
                json!({ "name": name })
            }
            "addNotes" => {
                let notes = params["notes"].as_array().cloned().unwrap_or_default();
                let start = state.notes.len() as u64;
                state.notes.extend(notes.iter().cloned());
                json!((0..notes.len() as u64).map(|i| start + i + 1).collect::<Vec<_>>())
            }
            _ => {
                return Ok(BridgeResponse {
                    result: Value::Null,
                    error: Some("unsupported action".to_string()),
                })
            }
        };

        Ok(BridgeResponse {
            result,
            error: None,
        })
    }
}
