//! Minimal AnkiConnect client
//!
//! Every call is one blocking JSON POST of `{action, version, params}` answered
//! by `{result, error}`. Nothing is retried.

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use super::model::{AnkiNote, CreateModel};
use crate::config::ANKI_CONNECT_VERSION;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("request to AnkiConnect failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{action} failed: {message}")]
    Action { action: String, message: String },

    #[error("unexpected result from {action}: {source}")]
    Decode {
        action: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw bridge reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<String>,
}

impl BridgeResponse {
    /// Turn a non-null `error` into [`BridgeError::Action`]
    pub fn into_result(self, action: &str) -> Result<Value, BridgeError> {
        match self.error {
            Some(message) => Err(BridgeError::Action {
                action: action.to_string(),
                message,
            }),
            None => Ok(self.result),
        }
    }
}

/// Delivers one request payload and returns the decoded reply
pub trait Transport {
    fn post(&self, payload: &Value) -> Result<BridgeResponse, BridgeError>;
}

/// HTTP transport backed by a blocking reqwest client
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    url: Url,
}

impl HttpTransport {
    pub fn new(url: Url) -> Result<Self, BridgeError> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client, url })
    }
}

impl Transport for HttpTransport {
    fn post(&self, payload: &Value) -> Result<BridgeResponse, BridgeError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(payload)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }
}

/// AnkiConnect client
pub struct AnkiClient<T = HttpTransport> {
    transport: T,
}

impl AnkiClient<HttpTransport> {
    /// Client talking HTTP to `url`
    pub fn connect(url: Url) -> Result<Self, BridgeError> {
        Ok(Self::with_transport(HttpTransport::new(url)?))
    }
}

impl<T: Transport> AnkiClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform one request/response cycle with the default protocol version
    pub fn invoke(&self, action: &str, params: Option<Value>) -> Result<BridgeResponse, BridgeError> {
        self.invoke_versioned(action, params, ANKI_CONNECT_VERSION)
    }

    /// Perform one request/response cycle with an explicit protocol version
    pub fn invoke_versioned(
        &self,
        action: &str,
        params: Option<Value>,
        version: u64,
    ) -> Result<BridgeResponse, BridgeError> {
        let mut payload = json!({ "action": action, "version": version });
        if let Some(params) = params {
            payload["params"] = params;
        }

        debug!("AnkiConnect request: {}", payload);
        let response = self.transport.post(&payload)?;
        debug!(
            "AnkiConnect response for {}: result={} error={:?}",
            action, response.result, response.error
        );
        Ok(response)
    }

    /// Invoke and decode the result, mapping a bridge error to [`BridgeError::Action`]
    pub fn call<R: DeserializeOwned>(&self, action: &str, params: Option<Value>) -> Result<R, BridgeError> {
        let result = self.invoke(action, params)?.into_result(action)?;
        serde_json::from_value(result).map_err(|source| BridgeError::Decode {
            action: action.to_string(),
            source,
        })
    }

    pub fn deck_names(&self) -> Result<Vec<String>, BridgeError> {
        let names: Option<Vec<String>> = self.call("deckNames", None)?;
        Ok(names.unwrap_or_default())
    }

    pub fn model_names(&self) -> Result<Vec<String>, BridgeError> {
        let names: Option<Vec<String>> = self.call("modelNames", None)?;
        Ok(names.unwrap_or_default())
    }

    /// Create `name` unless it already exists. Returns whether it was created.
    ///
    /// Check and create are two separate calls, not one atomic step.
    pub fn ensure_deck(&self, name: &str) -> Result<bool, BridgeError> {
        if self.deck_names()?.iter().any(|deck| deck == name) {
            return Ok(false);
        }
        let _: Value = self.call("createDeck", Some(json!({ "deck": name })))?;
        Ok(true)
    }

    pub fn create_model(&self, params: &CreateModel) -> Result<Value, BridgeError> {
        let params = serde_json::to_value(params).map_err(|source| BridgeError::Decode {
            action: "createModel".to_string(),
            source,
        })?;
        self.call("createModel", Some(params))
    }

    /// Submit all notes in one `addNotes` call.
    ///
    /// Anki reports `null` in place of an id for each note it rejected.
    pub fn add_notes(&self, notes: &[AnkiNote]) -> Result<Vec<Option<u64>>, BridgeError> {
        let params = json!({ "notes": notes });
        let ids: Option<Vec<Option<u64>>> = self.call("addNotes", Some(params))?;
        Ok(ids.unwrap_or_default())
    }
}
