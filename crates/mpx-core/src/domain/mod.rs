//! Domain entities for multi-pointer seats.
//!
//! This module contains pure data types with no infrastructure dependencies:
//! devices, seats, cursors, grabs and the display rectangle used for cursor
//! clamping.
//!
//! # What lives where
//!
//! - [`geometry`] – `Position` and `DisplayBounds`, the 2-D primitives shared
//!   by every seat.
//! - [`device`] – `InputDevice` and its capability flags.  A device is created
//!   by an input backend and handed to the registry; the registry alone decides
//!   which seat owns it.
//! - [`seat`] – `Seat` plus the per-seat state it aggregates (`Cursor`,
//!   `FocusState`, pointer and keyboard `Grab`s).
//!
//! Types here expose read access freely, but every method that changes
//! seat/device relationships is `pub(crate)`: only
//! [`SeatRegistry`](crate::registry::SeatRegistry) may call them, which is how
//! the system-wide "a device belongs to at most one seat" invariant is kept.

pub mod device;
pub mod geometry;
pub mod seat;
