//! SeatRegistry: owns every seat and device, routes input, arbitrates grabs.
//!
//! The registry is the single source of truth for seat/device relationships.
//! Every operation follows the same pattern:
//!
//! ```text
//! validate ──► mutate ──► publish one RegistryEvent
//! ```
//!
//! Validation happens before anything is touched, so a failed call never
//! leaves partial state behind.
//!
//! # Routing (for beginners)
//!
//! An input backend reports events per *device*: "mouse2 moved by (+3, -1)".
//! Routing looks up which seat currently owns `mouse2`, checks that the seat is
//! active, and applies the event to that seat only.  This is what lets two
//! people use two mice on one screen with two independent cursors.
//!
//! # Event payloads
//!
//! | Kind                 | `data` keys                                   |
//! |----------------------|-----------------------------------------------|
//! | `SeatCreated`        | `name`                                        |
//! | `SeatDestroyed`      | `name`, `released_devices`                    |
//! | `SeatStateChanged`   | `old_state`, `new_state`                      |
//! | `DeviceAdded`        | `name`, `type`, `replaced`                    |
//! | `DeviceRemoved`      | `name`                                        |
//! | `DeviceAssigned`     | `device_name`, `seat_name`                    |
//! | `DeviceUnassigned`   | `device_name`                                 |
//! | `PointerMotion`      | `dx`, `dy`, `x`, `y` (+ `warp` for warps)     |
//! | `PointerButton`      | `button`, `pressed`                           |
//! | `PointerAxis`        | `horizontal`, `vertical`                      |
//! | `KeyboardKey`        | `key`, `pressed`                              |
//! | `GrabStarted`        | `type`, `mode`, `client_id`, `surface_id`     |
//! | `GrabEnded`          | `type`, `client_id`                           |
//! | `FocusChanged`       | `type`, `old`, `new`                          |

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use super::events::{EventKind, EventSink, RegistryEvent};
use super::status::{DeviceStatus, RegistryStatus, SeatStatus};
use crate::domain::{
    device::{DeviceCapabilities, DeviceId, InputDevice},
    geometry::{DisplayBounds, Position},
    seat::{Grab, GrabMode, Seat, SeatId, SeatState},
};

/// Name given to the seat created with the registry.
pub const DEFAULT_SEAT_NAME: &str = "seat0";

/// Coarse classification of [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A seat or device id is unknown.  Always a caller bug or stale reference.
    NotFound,
    /// The device already has a seat and `force` was not requested.
    AlreadyAssigned,
    /// The operation would break a registry invariant.  Never retryable.
    InvariantViolation,
}

/// Errors returned by registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("seat not found: {0}")]
    SeatNotFound(SeatId),

    #[error("device not found: {0}")]
    DeviceNotFound(DeviceId),

    #[error("device {device_id} is already assigned to seat {seat_id}")]
    AlreadyAssigned { device_id: DeviceId, seat_id: SeatId },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::SeatNotFound(_) | RegistryError::DeviceNotFound(_) => ErrorKind::NotFound,
            RegistryError::AlreadyAssigned { .. } => ErrorKind::AlreadyAssigned,
            RegistryError::InvariantViolation(_) => ErrorKind::InvariantViolation,
        }
    }
}

/// The seat/device registry.
///
/// Seats and devices are kept in insertion order so listings and status
/// snapshots are deterministic.
pub struct SeatRegistry {
    seats: HashMap<SeatId, Seat>,
    seat_order: Vec<SeatId>,
    devices: HashMap<DeviceId, InputDevice>,
    device_order: Vec<DeviceId>,
    default_seat_id: SeatId,
    display_bounds: DisplayBounds,
    listeners: Vec<Arc<dyn EventSink>>,
}

impl Default for SeatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SeatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeatRegistry")
            .field("seats", &self.seat_order.len())
            .field("devices", &self.device_order.len())
            .field("default_seat_id", &self.default_seat_id)
            .field("display_bounds", &self.display_bounds)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SeatRegistry {
    /// Creates a registry whose default seat is named `seat0`.
    pub fn new() -> Self {
        Self::with_default_seat_name(DEFAULT_SEAT_NAME)
    }

    pub fn with_default_seat_name(name: &str) -> Self {
        Self::with_sinks(name, Vec::new())
    }

    /// Creates a registry with sinks attached before the default seat exists,
    /// so they observe its `SeatCreated` event.
    pub fn with_sinks(name: &str, sinks: impl IntoIterator<Item = Arc<dyn EventSink>>) -> Self {
        let mut registry = Self {
            seats: HashMap::new(),
            seat_order: Vec::new(),
            devices: HashMap::new(),
            device_order: Vec::new(),
            default_seat_id: Uuid::nil(),
            display_bounds: DisplayBounds::default(),
            listeners: sinks.into_iter().collect(),
        };
        registry.default_seat_id = registry.create_seat(name);
        registry
    }

    // ── Listeners ─────────────────────────────────────────────────────────────

    pub fn add_listener(&mut self, sink: Arc<dyn EventSink>) {
        self.listeners.push(sink);
    }

    /// Removes a previously added sink, compared by pointer identity.
    ///
    /// Returns `false` if the sink was not registered.
    pub fn remove_listener(&mut self, sink: &Arc<dyn EventSink>) -> bool {
        match self.listeners.iter().position(|l| Arc::ptr_eq(l, sink)) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn emit(&self, event: RegistryEvent) {
        for listener in &self.listeners {
            match panic::catch_unwind(AssertUnwindSafe(|| listener.publish(&event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(kind = ?event.kind, error = %e, "event listener error"),
                Err(_) => error!(kind = ?event.kind, "event listener panicked"),
            }
        }
    }

    // ── Display bounds ────────────────────────────────────────────────────────

    /// Replaces the clamping rectangle for all seats.
    ///
    /// Existing cursor positions are left as they are until their next move.
    pub fn set_display_bounds(&mut self, bounds: DisplayBounds) {
        info!(
            x = bounds.x,
            y = bounds.y,
            width = bounds.width,
            height = bounds.height,
            "display bounds set"
        );
        self.display_bounds = bounds;
    }

    pub fn display_bounds(&self) -> &DisplayBounds {
        &self.display_bounds
    }

    // ── Seats ─────────────────────────────────────────────────────────────────

    pub fn default_seat_id(&self) -> SeatId {
        self.default_seat_id
    }

    pub fn default_seat(&self) -> &Seat {
        // The default seat is created in the constructor and never removed.
        &self.seats[&self.default_seat_id]
    }

    /// All seats in creation order.
    pub fn seats(&self) -> impl Iterator<Item = &Seat> + '_ {
        self.seat_order.iter().filter_map(|id| self.seats.get(id))
    }

    pub fn seat_count(&self) -> usize {
        self.seat_order.len()
    }

    /// Creates a seat and returns its fresh id.  Names need not be unique.
    pub fn create_seat(&mut self, name: &str) -> SeatId {
        let seat = Seat::new(name);
        let seat_id = seat.id;
        self.seats.insert(seat_id, seat);
        self.seat_order.push(seat_id);

        info!(%seat_id, name, "created seat");
        self.emit(RegistryEvent::new(EventKind::SeatCreated).seat(seat_id).with("name", name));
        seat_id
    }

    /// Destroys a seat.  Devices assigned to it stay registered but become
    /// unassigned.
    ///
    /// # Errors
    ///
    /// [`RegistryError::SeatNotFound`] for an unknown id and
    /// [`RegistryError::InvariantViolation`] for the default seat.
    pub fn destroy_seat(&mut self, seat_id: SeatId) -> Result<(), RegistryError> {
        if !self.seats.contains_key(&seat_id) {
            return Err(RegistryError::SeatNotFound(seat_id));
        }
        if seat_id == self.default_seat_id {
            return Err(RegistryError::InvariantViolation(
                "cannot destroy the default seat".to_string(),
            ));
        }

        let mut released = Vec::new();
        for device_id in &self.device_order {
            if let Some(device) = self.devices.get_mut(device_id) {
                if device.seat_id() == Some(seat_id) {
                    device.set_seat(None);
                    released.push(device_id.clone());
                }
            }
        }

        let name = self
            .seats
            .remove(&seat_id)
            .map(|seat| seat.name)
            .unwrap_or_default();
        self.seat_order.retain(|id| *id != seat_id);

        info!(%seat_id, name = %name, released = released.len(), "destroyed seat");
        self.emit(
            RegistryEvent::new(EventKind::SeatDestroyed)
                .seat(seat_id)
                .with("name", name)
                .with("released_devices", released),
        );
        Ok(())
    }

    pub fn get_seat(&self, seat_id: SeatId) -> Result<&Seat, RegistryError> {
        self.seats.get(&seat_id).ok_or(RegistryError::SeatNotFound(seat_id))
    }

    /// Returns the first seat (in creation order) named `name`.
    pub fn get_seat_by_name(&self, name: &str) -> Option<&Seat> {
        self.seats().find(|seat| seat.name == name)
    }

    /// Replaces a seat's activity state.  Only `Active` seats receive routed
    /// input.
    pub fn set_seat_state(&mut self, seat_id: SeatId, state: SeatState) -> Result<(), RegistryError> {
        let seat = self
            .seats
            .get_mut(&seat_id)
            .ok_or(RegistryError::SeatNotFound(seat_id))?;
        let old_state = std::mem::replace(&mut seat.state, state);

        info!(%seat_id, %old_state, new_state = %state, "seat state changed");
        self.emit(
            RegistryEvent::new(EventKind::SeatStateChanged)
                .seat(seat_id)
                .with("old_state", old_state.as_str())
                .with("new_state", state.as_str()),
        );
        Ok(())
    }

    // ── Devices ───────────────────────────────────────────────────────────────

    /// All devices in registration order.
    pub fn devices(&self) -> impl Iterator<Item = &InputDevice> + '_ {
        self.device_order.iter().filter_map(|id| self.devices.get(id))
    }

    pub fn unassigned_devices(&self) -> impl Iterator<Item = &InputDevice> + '_ {
        self.devices().filter(|d| !d.is_assigned())
    }

    pub fn get_device(&self, device_id: &str) -> Result<&InputDevice, RegistryError> {
        self.devices
            .get(device_id)
            .ok_or_else(|| RegistryError::DeviceNotFound(device_id.to_string()))
    }

    /// The seat `device_id` is assigned to, if both exist.
    pub fn seat_for_device(&self, device_id: &str) -> Option<&Seat> {
        let seat_id = self.devices.get(device_id)?.seat_id()?;
        self.seats.get(&seat_id)
    }

    /// Registers a device.  Always enters the registry unassigned.
    ///
    /// Re-registering an existing id replaces the old record ("last write
    /// wins").  If the old record was assigned it is unassigned first, so no
    /// seat is left listing a device the registry no longer describes.
    pub fn register_device(&mut self, mut device: InputDevice) {
        device.set_seat(None);
        let device_id = device.id.clone();

        let replaced = self.devices.contains_key(&device_id);
        if replaced {
            self.detach(&device_id);
        } else {
            self.device_order.push(device_id.clone());
        }

        let event = RegistryEvent::new(EventKind::DeviceAdded)
            .device(device_id.as_str())
            .with("name", device.name.as_str())
            .with("type", device.device_type.as_str())
            .with("replaced", replaced);
        info!(device_id = %device_id, name = %device.name, replaced, "registered device");
        self.devices.insert(device_id, device);
        self.emit(event);
    }

    /// Removes a device, unassigning it first if needed.
    pub fn unregister_device(&mut self, device_id: &str) -> Result<(), RegistryError> {
        if !self.devices.contains_key(device_id) {
            return Err(RegistryError::DeviceNotFound(device_id.to_string()));
        }

        self.detach(device_id);
        let name = self
            .devices
            .remove(device_id)
            .map(|device| device.name)
            .unwrap_or_default();
        self.device_order.retain(|id| id != device_id);

        info!(device_id, name = %name, "unregistered device");
        self.emit(
            RegistryEvent::new(EventKind::DeviceRemoved)
                .device(device_id)
                .with("name", name),
        );
        Ok(())
    }

    /// Assigns a device to a seat.
    ///
    /// The device joins the seat's pointer set if it has the `POINTER`
    /// capability and the keyboard set if it has `KEYBOARD` (possibly both).
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DeviceNotFound`] / [`RegistryError::SeatNotFound`]
    /// - [`RegistryError::AlreadyAssigned`] if the device has a seat and
    ///   `force` is `false`.  With `force`, the device is first unassigned from
    ///   its current seat.
    pub fn assign_device(
        &mut self,
        device_id: &str,
        seat_id: SeatId,
        force: bool,
    ) -> Result<(), RegistryError> {
        let current = self.get_device(device_id)?.seat_id();
        self.get_seat(seat_id)?;
        if let Some(current) = current {
            if !force {
                return Err(RegistryError::AlreadyAssigned {
                    device_id: device_id.to_string(),
                    seat_id: current,
                });
            }
            self.detach(device_id);
        }

        let (Some(device), Some(seat)) = (self.devices.get_mut(device_id), self.seats.get_mut(&seat_id))
        else {
            return Err(RegistryError::DeviceNotFound(device_id.to_string()));
        };

        device.set_seat(Some(seat_id));
        if device.has_capability(DeviceCapabilities::POINTER) {
            seat.pointer_devices.insert(device_id.to_string());
        }
        if device.has_capability(DeviceCapabilities::KEYBOARD) {
            seat.keyboard_devices.insert(device_id.to_string());
        }

        info!(device_id, %seat_id, seat_name = %seat.name, "assigned device");
        let event = RegistryEvent::new(EventKind::DeviceAssigned)
            .seat(seat_id)
            .device(device_id)
            .with("device_name", device.name.as_str())
            .with("seat_name", seat.name.as_str());
        self.emit(event);
        Ok(())
    }

    /// Unassigns a device.  A device with no seat is left alone and no event
    /// is published.
    pub fn unassign_device(&mut self, device_id: &str) -> Result<(), RegistryError> {
        self.get_device(device_id)?;
        self.detach(device_id);
        Ok(())
    }

    /// Assigns a device to the default seat (without `force`).
    pub fn auto_assign_device(&mut self, device_id: &str) -> Result<SeatId, RegistryError> {
        let seat_id = self.default_seat_id;
        self.assign_device(device_id, seat_id, false)?;
        Ok(seat_id)
    }

    /// Clears a device's assignment and publishes `DeviceUnassigned`.
    ///
    /// Returns the seat it was removed from, or `None` if there was nothing to do.
    fn detach(&mut self, device_id: &str) -> Option<SeatId> {
        let device = self.devices.get_mut(device_id)?;
        let seat_id = device.seat_id()?;
        device.set_seat(None);
        let device_name = device.name.clone();

        if let Some(seat) = self.seats.get_mut(&seat_id) {
            seat.remove_device(device_id);
        }

        info!(device_id, %seat_id, "unassigned device");
        self.emit(
            RegistryEvent::new(EventKind::DeviceUnassigned)
                .seat(seat_id)
                .device(device_id)
                .with("device_name", device_name),
        );
        Some(seat_id)
    }

    // ── Routing ───────────────────────────────────────────────────────────────

    /// The seat an event from `device_id` should go to, if any.
    fn routable_seat(&self, device_id: &str) -> Option<SeatId> {
        let seat_id = self.devices.get(device_id)?.seat_id()?;
        let seat = self.seats.get(&seat_id)?;
        (seat.state == SeatState::Active).then_some(seat_id)
    }

    /// Moves the owning seat's cursor by `(dx, dy)`, clamped to the display.
    ///
    /// Returns `None` (and changes nothing) if the device is unknown or
    /// unassigned, its seat is missing or not active, or the delta is not
    /// finite.
    pub fn route_pointer_motion(&mut self, device_id: &str, dx: f64, dy: f64) -> Option<SeatId> {
        if !Position::new(dx, dy).is_finite() {
            warn!(device_id, dx, dy, "dropping non-finite pointer motion");
            return None;
        }
        let seat_id = self.routable_seat(device_id)?;
        let seat = self.seats.get_mut(&seat_id)?;
        seat.cursor.move_by(dx, dy, &self.display_bounds);
        let position = seat.cursor.position();

        trace!(device_id, %seat_id, x = position.x, y = position.y, "pointer motion");
        self.emit(
            RegistryEvent::new(EventKind::PointerMotion)
                .seat(seat_id)
                .device(device_id)
                .with("dx", dx)
                .with("dy", dy)
                .with("x", position.x)
                .with("y", position.y),
        );
        Some(seat_id)
    }

    pub fn route_pointer_button(&mut self, device_id: &str, button: u32, pressed: bool) -> Option<SeatId> {
        let seat_id = self.routable_seat(device_id)?;

        trace!(device_id, %seat_id, button, pressed, "pointer button");
        self.emit(
            RegistryEvent::new(EventKind::PointerButton)
                .seat(seat_id)
                .device(device_id)
                .with("button", button)
                .with("pressed", pressed),
        );
        Some(seat_id)
    }

    /// Routes a scroll event.  Axis values are in scroll units, positive =
    /// right / down.
    pub fn route_pointer_axis(&mut self, device_id: &str, horizontal: f64, vertical: f64) -> Option<SeatId> {
        let seat_id = self.routable_seat(device_id)?;

        trace!(device_id, %seat_id, horizontal, vertical, "pointer axis");
        self.emit(
            RegistryEvent::new(EventKind::PointerAxis)
                .seat(seat_id)
                .device(device_id)
                .with("horizontal", horizontal)
                .with("vertical", vertical),
        );
        Some(seat_id)
    }

    pub fn route_keyboard_key(&mut self, device_id: &str, key: u32, pressed: bool) -> Option<SeatId> {
        let seat_id = self.routable_seat(device_id)?;

        trace!(device_id, %seat_id, key, pressed, "keyboard key");
        self.emit(
            RegistryEvent::new(EventKind::KeyboardKey)
                .seat(seat_id)
                .device(device_id)
                .with("key", key)
                .with("pressed", pressed),
        );
        Some(seat_id)
    }

    /// Moves a seat's cursor to an absolute position, clamped to the display.
    ///
    /// Unlike device routing this addresses the seat directly and ignores its
    /// activity state, which is what a compositor does when it warps the
    /// pointer on behalf of a client.
    ///
    /// A non-finite target leaves the cursor where it is: the current position
    /// is returned and no event is published.
    pub fn warp_pointer(&mut self, seat_id: SeatId, x: f64, y: f64) -> Result<Position, RegistryError> {
        let seat = self
            .seats
            .get_mut(&seat_id)
            .ok_or(RegistryError::SeatNotFound(seat_id))?;
        let before = seat.cursor.position();
        if !Position::new(x, y).is_finite() {
            warn!(%seat_id, x, y, "ignoring non-finite pointer warp");
            return Ok(before);
        }
        seat.cursor.move_to(x, y, &self.display_bounds);
        let after = seat.cursor.position();

        debug!(%seat_id, x = after.x, y = after.y, "pointer warped");
        self.emit(
            RegistryEvent::new(EventKind::PointerMotion)
                .seat(seat_id)
                .with("dx", after.x - before.x)
                .with("dy", after.y - before.y)
                .with("x", after.x)
                .with("y", after.y)
                .with("warp", true),
        );
        Ok(after)
    }

    // ── Grabs ─────────────────────────────────────────────────────────────────

    /// Requests an exclusive pointer grab on one seat.
    ///
    /// Returns `Ok(false)` without changing anything when the seat's pointer is
    /// already grabbed (contention is an expected outcome, not an error) or
    /// when `mode` is [`GrabMode::None`].  Other seats are never consulted.
    pub fn request_pointer_grab(
        &mut self,
        seat_id: SeatId,
        client_id: &str,
        mode: GrabMode,
        surface_id: Option<&str>,
    ) -> Result<bool, RegistryError> {
        let seat = self
            .seats
            .get_mut(&seat_id)
            .ok_or(RegistryError::SeatNotFound(seat_id))?;

        if seat.is_pointer_grabbed() {
            warn!(%seat_id, seat_name = %seat.name, client_id, "pointer already grabbed");
            return Ok(false);
        }
        if mode == GrabMode::None {
            warn!(%seat_id, client_id, "ignoring pointer grab request with mode NONE");
            return Ok(false);
        }

        seat.set_pointer_grab(Grab::new(mode, client_id, surface_id.map(str::to_string)));

        info!(%seat_id, seat_name = %seat.name, client_id, %mode, "pointer grab granted");
        self.emit(
            RegistryEvent::new(EventKind::GrabStarted)
                .seat(seat_id)
                .with("type", "pointer")
                .with("mode", mode.as_str())
                .with("client_id", client_id)
                .with("surface_id", surface_id),
        );
        Ok(true)
    }

    /// Releases the seat's pointer grab.  No-op when nothing is grabbed.
    pub fn release_pointer_grab(&mut self, seat_id: SeatId) -> Result<(), RegistryError> {
        let seat = self
            .seats
            .get_mut(&seat_id)
            .ok_or(RegistryError::SeatNotFound(seat_id))?;
        if !seat.is_pointer_grabbed() {
            return Ok(());
        }
        let client_id = seat.pointer_grab.take().map(|g| g.client_id);

        info!(%seat_id, seat_name = %seat.name, "pointer grab released");
        self.emit(
            RegistryEvent::new(EventKind::GrabEnded)
                .seat(seat_id)
                .with("type", "pointer")
                .with("client_id", client_id),
        );
        Ok(())
    }

    /// Requests an exclusive keyboard grab.  Same contention rules as
    /// [`request_pointer_grab`](Self::request_pointer_grab); independent of it.
    pub fn request_keyboard_grab(
        &mut self,
        seat_id: SeatId,
        client_id: &str,
        surface_id: Option<&str>,
    ) -> Result<bool, RegistryError> {
        let seat = self
            .seats
            .get_mut(&seat_id)
            .ok_or(RegistryError::SeatNotFound(seat_id))?;

        if seat.is_keyboard_grabbed() {
            warn!(%seat_id, seat_name = %seat.name, client_id, "keyboard already grabbed");
            return Ok(false);
        }

        seat.set_keyboard_grab(client_id.to_string(), surface_id.map(str::to_string));

        info!(%seat_id, seat_name = %seat.name, client_id, "keyboard grab granted");
        self.emit(
            RegistryEvent::new(EventKind::GrabStarted)
                .seat(seat_id)
                .with("type", "keyboard")
                .with("mode", GrabMode::Keyboard.as_str())
                .with("client_id", client_id)
                .with("surface_id", surface_id),
        );
        Ok(true)
    }

    pub fn release_keyboard_grab(&mut self, seat_id: SeatId) -> Result<(), RegistryError> {
        let seat = self
            .seats
            .get_mut(&seat_id)
            .ok_or(RegistryError::SeatNotFound(seat_id))?;
        if !seat.is_keyboard_grabbed() {
            return Ok(());
        }
        let client_id = seat.keyboard_grab.take().map(|g| g.client_id);

        info!(%seat_id, seat_name = %seat.name, "keyboard grab released");
        self.emit(
            RegistryEvent::new(EventKind::GrabEnded)
                .seat(seat_id)
                .with("type", "keyboard")
                .with("client_id", client_id),
        );
        Ok(())
    }

    /// Every seat holding an active pointer grab, with its mode.
    pub fn get_active_grabs(&self) -> BTreeMap<SeatId, GrabMode> {
        self.seats()
            .filter_map(|seat| {
                seat.pointer_grab
                    .as_ref()
                    .filter(|grab| grab.is_active())
                    .map(|grab| (seat.id, grab.mode))
            })
            .collect()
    }

    // ── Focus ─────────────────────────────────────────────────────────────────

    pub fn set_pointer_focus(&mut self, seat_id: SeatId, surface_id: Option<&str>) -> Result<(), RegistryError> {
        self.set_focus(seat_id, surface_id, FocusSlot::Pointer)
    }

    pub fn set_keyboard_focus(&mut self, seat_id: SeatId, surface_id: Option<&str>) -> Result<(), RegistryError> {
        self.set_focus(seat_id, surface_id, FocusSlot::Keyboard)
    }

    fn set_focus(&mut self, seat_id: SeatId, surface_id: Option<&str>, slot: FocusSlot) -> Result<(), RegistryError> {
        let seat = self
            .seats
            .get_mut(&seat_id)
            .ok_or(RegistryError::SeatNotFound(seat_id))?;
        let target = match slot {
            FocusSlot::Pointer => &mut seat.focus.pointer_focus,
            FocusSlot::Keyboard => &mut seat.focus.keyboard_focus,
        };
        if target.as_deref() == surface_id {
            return Ok(());
        }
        let old = std::mem::replace(target, surface_id.map(str::to_string));

        debug!(%seat_id, focus = slot.as_str(), old = ?old, new = ?surface_id, "focus changed");
        self.emit(
            RegistryEvent::new(EventKind::FocusChanged)
                .seat(seat_id)
                .with("type", slot.as_str())
                .with("old", old)
                .with("new", surface_id),
        );
        Ok(())
    }

    // ── Status ────────────────────────────────────────────────────────────────

    /// A serializable snapshot of all seats and devices.
    pub fn get_status(&self) -> RegistryStatus {
        RegistryStatus {
            seats: self.seats().map(SeatStatus::from).collect(),
            devices: self.devices().map(DeviceStatus::from).collect(),
            default_seat_id: self.default_seat_id,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FocusSlot {
    Pointer,
    Keyboard,
}

impl FocusSlot {
    fn as_str(self) -> &'static str {
        match self {
            FocusSlot::Pointer => "pointer",
            FocusSlot::Keyboard => "keyboard",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
