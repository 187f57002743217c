//! Infrastructure layer of the simulator.
//!
//! **Dependency rule**: this layer may depend on `mpx_core`, but MUST NOT be
//! imported by the `domain` or `application` layers.
//!
//! # Sub-modules
//!
//! - **`input_source`** – the `InputSource` abstraction over anything that
//!   produces raw device events, plus `ScriptedInputSource` which replays a
//!   fixed script.
//! - **`pump`** – `InputPump`, a Tokio task that drains raw events into a
//!   `SharedRegistry` in arrival order.

pub mod input_source;
pub mod pump;
