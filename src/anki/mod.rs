//! AnkiConnect bridge operations

pub mod client;
pub mod model;

#[cfg(test)]
pub mod testing;

pub use client::{AnkiClient, BridgeError, BridgeResponse, HttpTransport, Transport};
