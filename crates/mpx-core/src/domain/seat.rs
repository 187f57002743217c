//! Seats and their per-seat input state.
//!
//! A seat is one user's independent interaction context: its own cursor, its
//! own keyboard/pointer focus and its own grabs.  Several seats can coexist on
//! one display, each driven by a different set of physical devices.
//!
//! # Grabs (for beginners)
//!
//! A *grab* lets one client capture a class of input exclusively.  A game that
//! wants mouselook asks for a `PointerLock` grab; a drag-to-select region asks
//! for `PointerConfine`.  Grabs are per seat: a game grabbing the first seat's
//! pointer has no effect on a second user's pointer.
//!
//! Absence of a grab is modelled as `None`, never as a `Grab` whose mode is
//! [`GrabMode::None`].

use std::collections::BTreeSet;
use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::device::DeviceId;
use super::geometry::{DisplayBounds, Position};

/// Opaque seat identifier, generated by the registry (UUID v4).
pub type SeatId = Uuid;

/// Whether a seat currently routes input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SeatState {
    /// Routing input.
    #[default]
    Active,
    /// Exists but does not route.
    Inactive,
    /// Temporarily not routing, e.g. while its user's session is locked.
    Suspended,
}

impl SeatState {
    pub fn as_str(self) -> &'static str {
        match self {
            SeatState::Active => "ACTIVE",
            SeatState::Inactive => "INACTIVE",
            SeatState::Suspended => "SUSPENDED",
        }
    }
}

impl fmt::Display for SeatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of exclusive capture held by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrabMode {
    None,
    /// Pointer locked in place; the client receives relative motion only.
    PointerLock,
    /// Pointer confined to a region of the client's surface.
    PointerConfine,
    Keyboard,
}

impl GrabMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GrabMode::None => "NONE",
            GrabMode::PointerLock => "POINTER_LOCK",
            GrabMode::PointerConfine => "POINTER_CONFINE",
            GrabMode::Keyboard => "KEYBOARD",
        }
    }
}

impl fmt::Display for GrabMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An exclusive capture of one device class by one client.
#[derive(Debug, Clone, PartialEq)]
pub struct Grab {
    pub mode: GrabMode,
    /// The grabbing client or window.
    pub client_id: String,
    /// The surface the grab is bound to, if any.
    pub surface_id: Option<String>,
    pub started_at: SystemTime,
}

impl Grab {
    pub fn new(mode: GrabMode, client_id: impl Into<String>, surface_id: Option<String>) -> Self {
        Self {
            mode,
            client_id: client_id.into(),
            surface_id,
            started_at: SystemTime::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.mode != GrabMode::None
    }
}

/// Which surfaces currently hold pointer and keyboard focus for a seat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    pub pointer_focus: Option<String>,
    pub keyboard_focus: Option<String>,
}

/// Visual pointer state of a seat.
///
/// The position can only change through [`move_to`](Self::move_to) and
/// [`move_by`](Self::move_by), and both clamp into the display before the new
/// position becomes visible.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    position: Position,
    pub visible: bool,
    pub theme: String,
    /// Cursor glyph name from the theme, e.g. `"left_ptr"`.
    pub name: String,
    pub hotspot_x: i32,
    pub hotspot_y: i32,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            position: Position::ORIGIN,
            visible: true,
            theme: "default".to_string(),
            name: "left_ptr".to_string(),
            hotspot_x: 0,
            hotspot_y: 0,
        }
    }
}

impl Cursor {
    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn move_to(&mut self, x: f64, y: f64, bounds: &DisplayBounds) {
        self.position = bounds.clamp(Position::new(x, y));
    }

    pub(crate) fn move_by(&mut self, dx: f64, dy: f64, bounds: &DisplayBounds) {
        self.position = bounds.clamp(self.position.translate(dx, dy));
    }
}

/// A logical seat (the `wl_seat` equivalent).
///
/// Identity and equality are defined by [`id`](Self::id) alone.
#[derive(Debug, Clone)]
pub struct Seat {
    pub id: SeatId,
    /// Human-readable name such as `"seat0"` or `"aux"`.  Not unique.
    pub name: String,
    pub state: SeatState,
    pub cursor: Cursor,
    pub focus: FocusState,
    pub pointer_grab: Option<Grab>,
    pub keyboard_grab: Option<Grab>,
    pub pointer_devices: BTreeSet<DeviceId>,
    pub keyboard_devices: BTreeSet<DeviceId>,
}

impl Seat {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            state: SeatState::Active,
            cursor: Cursor::default(),
            focus: FocusState::default(),
            pointer_grab: None,
            keyboard_grab: None,
            pointer_devices: BTreeSet::new(),
            keyboard_devices: BTreeSet::new(),
        }
    }

    pub fn has_pointer(&self) -> bool {
        !self.pointer_devices.is_empty()
    }

    pub fn has_keyboard(&self) -> bool {
        !self.keyboard_devices.is_empty()
    }

    /// `true` when the seat has at least one pointer and one keyboard.
    pub fn is_complete(&self) -> bool {
        self.has_pointer() && self.has_keyboard()
    }

    pub fn is_pointer_grabbed(&self) -> bool {
        self.pointer_grab.as_ref().is_some_and(Grab::is_active)
    }

    pub fn is_keyboard_grabbed(&self) -> bool {
        self.keyboard_grab.as_ref().is_some_and(Grab::is_active)
    }

    /// Returns `true` if `device_id` is in either device set.
    pub fn holds_device(&self, device_id: &str) -> bool {
        self.pointer_devices.contains(device_id) || self.keyboard_devices.contains(device_id)
    }

    pub(crate) fn remove_device(&mut self, device_id: &str) {
        self.pointer_devices.remove(device_id);
        self.keyboard_devices.remove(device_id);
    }

    pub(crate) fn set_pointer_grab(&mut self, grab: Grab) {
        self.pointer_grab = grab.is_active().then_some(grab);
    }

    pub(crate) fn set_keyboard_grab(&mut self, client_id: String, surface_id: Option<String>) {
        self.keyboard_grab = Some(Grab::new(GrabMode::Keyboard, client_id, surface_id));
    }
}

impl PartialEq for Seat {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Seat {}

impl std::hash::Hash for Seat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
