//! The seat registry and everything it publishes.
//!
//! - [`seat_registry`] – `SeatRegistry`, the authoritative owner of seats and
//!   devices, plus its error type.
//! - [`events`] – `RegistryEvent` and the `EventSink` trait listeners
//!   implement.
//! - [`status`] – serializable snapshots for presentation layers.
//! - [`shared`] – a mutex-guarded handle for multi-threaded callers.

pub mod events;
pub mod seat_registry;
pub mod shared;
pub mod status;

pub use events::{ChannelSink, EventKind, EventSink, ListenerError, RecordingSink, RegistryEvent};
pub use seat_registry::{ErrorKind, RegistryError, SeatRegistry, DEFAULT_SEAT_NAME};
pub use shared::SharedRegistry;
pub use status::{CursorPosition, DeviceStatus, RegistryStatus, SeatStatus};
