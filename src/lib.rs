//! xmlconf - XML configuration loader.
//!
//! Loads hierarchical configuration from XML documents linked by import
//! directives, merges them into one tree with deterministic precedence,
//! caches the merged result on disk keyed to the source file path, and
//! answers slash-delimited path lookups.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
