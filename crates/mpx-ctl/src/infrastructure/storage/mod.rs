//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module owns everything that touches the disk:
//!
//! - Reading `config.toml` and `devices.toml` from the platform config
//!   directory (or an override).
//! - Writing changes back after seats or device mappings are modified.
//! - Providing sensible defaults when the files do not exist yet (first run).

pub mod config;
