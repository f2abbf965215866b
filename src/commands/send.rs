//! Send command - Post a raw JSON payload to AnkiConnect

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;
use url::Url;

use crate::anki::{AnkiClient, Transport};
use crate::config::ANKI_CONNECT_VERSION;

/// A payload resolved to one bridge call
#[derive(Debug, Clone, PartialEq)]
pub struct RawRequest {
    pub action: String,
    pub params: Option<Value>,
    pub version: u64,
}

/// Execute the send command
pub fn execute(url: Url, file: Option<&Path>, action: Option<&str>) -> Result<()> {
    let text = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload: {}", path.display()))?,
        None => {
            let mut stdin = io::stdin();
            if stdin.is_terminal() {
                eprintln!("Reading from stdin... (Ctrl-D to end)");
            }
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("Failed to read payload from stdin")?;
            text
        }
    };

    let payload: Value = serde_json::from_str(&text).context("Payload is not valid JSON")?;
    let request = build_request(payload, action)?;

    let client = AnkiClient::connect(url)?;
    let output = send(&client, &request)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Read `action`, `params` and `version` from a payload.
///
/// A payload without `action` is taken as the params of `wrap_action`.
pub fn build_request(payload: Value, wrap_action: Option<&str>) -> Result<RawRequest> {
    match payload.get("action") {
        Some(Value::String(action)) => Ok(RawRequest {
            action: action.clone(),
            params: payload.get("params").cloned(),
            version: payload
                .get("version")
                .and_then(Value::as_u64)
                .unwrap_or(ANKI_CONNECT_VERSION),
        }),
        Some(other) => bail!("Payload 'action' must be a string, got {}", other),
        None => match wrap_action {
            Some(action) => Ok(RawRequest {
                action: action.to_string(),
                params: Some(payload),
                version: ANKI_CONNECT_VERSION,
            }),
            None => bail!("Payload must include 'action' or provide --action to wrap params."),
        },
    }
}

/// Perform the call and return `{result, error}` as the bridge sent it
pub fn send<T: Transport>(client: &AnkiClient<T>, request: &RawRequest) -> Result<Value> {
    let response = client.invoke_versioned(&request.action, request.params.clone(), request.version)?;
    Ok(json!({ "result": response.result, "error": response.error }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anki::testing::FakeBridge;

    #[test]
    fn test_payload_with_action() {
        let request = build_request(
            json!({"action": "deckNames", "version": 5, "params": {"x": 1}}),
            Some("ignored"),
        )
        .unwrap();
        assert_eq!(request.action, "deckNames");
        assert_eq!(request.version, 5);
        assert_eq!(request.params, Some(json!({"x": 1})));
    }

    #[test]
    fn test_bare_params_are_wrapped() {
        let request = build_request(json!({"deck": "English"}), Some("createDeck")).unwrap();
        assert_eq!(request.action, "createDeck");
        assert_eq!(request.version, 6);
        assert_eq!(request.params, Some(json!({"deck": "English"})));
    }

    #[test]
    fn test_bare_params_without_action_flag() {
        let err = build_request(json!({"deck": "English"}), None).unwrap_err();
        assert!(err.to_string().contains("--action"));
        assert!(build_request(json!({"action": 3}), None).is_err());
    }

    #[test]
    fn test_send_reports_bridge_error_verbatim() {
        let client = AnkiClient::with_transport(FakeBridge::with_decks(&["Default"]));

        let ok = send(&client, &build_request(json!({"action": "deckNames"}), None).unwrap()).unwrap();
        assert_eq!(ok, json!({"result": ["Default"], "error": null}));

        let failed = send(&client, &build_request(json!({"action": "guiBrowse"}), None).unwrap()).unwrap();
        assert_eq!(failed["error"], "unsupported action");

        let requests = client.transport().requests();
        assert!(requests[0].get("params").is_none());
    }
}
