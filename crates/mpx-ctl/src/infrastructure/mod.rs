//! Infrastructure layer for the control tool.
//!
//! Contains the adapters that touch the outside world: config file storage and
//! console text rendering.
//!
//! - **`storage`** – `ConfigStore`, which the controller uses to load and save
//!   `config.toml` and `devices.toml`.
//! - **`console`** – text layouts for the controller's query results.
//!
//! Neither module is imported by `mpx_core`.

pub mod console;
pub mod storage;
