//! # mpx-core
//!
//! Multi-seat input routing for a Wayland compositor: the registry that decides
//! which physical input device drives which logical seat, routes per-device
//! input to the owning seat, and arbitrates per-seat grabs.
//!
//! This crate is used by both the `mpx-ctl` control tool and the `mpx-sim`
//! simulator.  It has no dependencies on a compositor, libinput, or a display
//! server.
//!
//! # Architecture overview (for beginners)
//!
//! Classic desktops have exactly one pointer and one keyboard focus.  With
//! *multi-pointer* (MPX) input, several people share one screen, each with
//! their own mouse, keyboard and cursor.  Each person's bundle of input state
//! is a **seat**.
//!
//! - **`domain`** – Plain data: `InputDevice`, `Seat`, `Cursor`, `Grab`,
//!   `DisplayBounds`.
//!
//! - **`registry`** – The `SeatRegistry`.  It owns every seat and device, keeps
//!   the "each device belongs to at most one seat" invariant, moves cursors,
//!   and publishes a `RegistryEvent` for every change.
//!
//! ```text
//!  mouse1 ──┐                 ┌──► seat0 cursor (x, y)
//!           ├─► SeatRegistry ─┤
//!  mouse2 ──┘                 └──► aux   cursor (x, y)
//! ```

pub mod domain;
pub mod registry;

// Re-export the most-used types at the crate root so callers can write
// `mpx_core::SeatRegistry` instead of `mpx_core::registry::seat_registry::SeatRegistry`.
pub use domain::device::{DeviceCapabilities, DeviceId, DeviceType, InputDevice};
pub use domain::geometry::{DisplayBounds, Position};
pub use domain::seat::{Cursor, FocusState, Grab, GrabMode, Seat, SeatId, SeatState};
pub use registry::{
    ChannelSink, ErrorKind, EventKind, EventSink, ListenerError, RecordingSink, RegistryError,
    RegistryEvent, RegistryStatus, SeatRegistry, SharedRegistry, DEFAULT_SEAT_NAME,
};
