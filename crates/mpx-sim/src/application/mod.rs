//! Application layer of the simulator.
//!
//! # What lives where
//!
//! - **`compositor`** – `SimulatedCompositor`, which owns a `SeatRegistry` and
//!   keeps virtual devices and windows in step with it.  Every action is
//!   recorded in an event log.
//! - **`render`** – the ASCII display view and the textual state summary.
//! - **`scenario`** – scripted step lists, the pre-built multi-seat scenarios
//!   and the `ScenarioRunner` that executes them and formats a report.

pub mod compositor;
pub mod render;
pub mod scenario;
