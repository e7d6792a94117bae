//! Storage infrastructure: the client's TOML configuration file.
//!
//! The `config` sub-module reads `client.toml` from the platform config
//! directory, falls back to defaults when it does not exist yet, and merges
//! command-line overrides into the domain `ClientConfig`.

pub mod config;
