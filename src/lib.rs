//! studykit library
//!
//! AnkiConnect automation (deck and note type replication, raw requests,
//! YAML note submission) and interactive markdown note scaffolding.

pub mod anki;
pub mod cards;
pub mod commands;
pub mod config;
pub mod menu;
pub mod notes;
