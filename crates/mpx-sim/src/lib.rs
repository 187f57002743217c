//! mpx-sim library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does mpx-sim do? (for beginners)
//!
//! Testing multi-seat input normally needs several physical mice and
//! keyboards plus a running compositor.  The simulator replaces both:
//!
//! 1. `VirtualDevice`s stand in for hardware and `VirtualWindow`s for client
//!    surfaces.
//! 2. A `SimulatedCompositor` feeds their events through the real
//!    `mpx_core::SeatRegistry`, exactly as a compositor would.
//! 3. Scenarios script sequences of actions and check the resulting seat
//!    state, so multi-pointer behaviour can be verified headlessly.
//! 4. An `InputPump` shows the threaded shape of a real backend: raw events
//!    arrive on a channel and are routed through a `SharedRegistry`.

/// Domain layer: virtual devices and windows.
pub mod domain;

/// Application layer: the simulated compositor, rendering and scenarios.
pub mod application;

/// Infrastructure layer: raw event sources and the async input pump.
pub mod infrastructure;
