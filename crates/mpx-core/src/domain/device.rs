//! Physical input devices.
//!
//! An [`InputDevice`] mirrors what an input backend (libinput, evdev, a test
//! harness) knows about one piece of hardware.  The backend builds the value
//! and registers it with the registry; from then on the registry owns it and
//! is the only component that can change its seat assignment.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::seat::SeatId;

/// Stable device identifier, e.g. a libinput sysname or `"mouse1"`.
pub type DeviceId = String;

/// Primary type of an input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    /// Mouse, trackpad, trackball.
    Pointer,
    Keyboard,
    Touch,
    /// Graphics tablet.
    Tablet,
    Unknown,
}

impl DeviceType {
    /// Upper-case name used in status output.
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceType::Pointer => "POINTER",
            DeviceType::Keyboard => "KEYBOARD",
            DeviceType::Touch => "TOUCH",
            DeviceType::Tablet => "TABLET",
            DeviceType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Event classes a device is able to produce.
    ///
    /// Assignment only looks at `POINTER` and `KEYBOARD`: those decide which of
    /// a seat's device sets the device joins.  The remaining flags are carried
    /// for reporting.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceCapabilities: u8 {
        const POINTER = 1 << 0;
        const KEYBOARD = 1 << 1;
        const TOUCH = 1 << 2;
        const TABLET_TOOL = 1 << 3;
        const TABLET_PAD = 1 << 4;
        const GESTURE = 1 << 5;
        const SWITCH = 1 << 6;
    }
}

impl DeviceCapabilities {
    /// Flag names in declaration order, e.g. `["POINTER", "GESTURE"]`.
    pub fn names(self) -> Vec<String> {
        self.iter_names().map(|(name, _)| name.to_string()).collect()
    }
}

/// A registered physical input device.
///
/// Identity and equality are defined by [`id`](Self::id) alone: two values
/// with the same id describe the same device even if their names differ.
#[derive(Debug, Clone)]
pub struct InputDevice {
    pub id: DeviceId,
    pub name: String,
    pub device_type: DeviceType,
    pub capabilities: DeviceCapabilities,
    /// USB vendor id, when the backend knows it.
    pub vendor_id: Option<u16>,
    /// USB product id, when the backend knows it.
    pub product_id: Option<u16>,
    /// Kernel path such as `/sys/class/input/event4`.
    pub sysfs_path: Option<String>,
    /// `false` once the device has been unplugged but not yet unregistered.
    pub is_available: bool,
    seat_id: Option<SeatId>,
}

impl InputDevice {
    /// Creates an available, unassigned device with no capabilities.
    pub fn new(id: impl Into<DeviceId>, name: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            device_type,
            capabilities: DeviceCapabilities::empty(),
            vendor_id: None,
            product_id: None,
            sysfs_path: None,
            is_available: true,
            seat_id: None,
        }
    }

    /// Shorthand for a plain mouse: type `Pointer`, capability `POINTER`.
    pub fn pointer(id: impl Into<DeviceId>, name: impl Into<String>) -> Self {
        Self::new(id, name, DeviceType::Pointer).with_capabilities(DeviceCapabilities::POINTER)
    }

    /// Shorthand for a plain keyboard: type `Keyboard`, capability `KEYBOARD`.
    pub fn keyboard(id: impl Into<DeviceId>, name: impl Into<String>) -> Self {
        Self::new(id, name, DeviceType::Keyboard).with_capabilities(DeviceCapabilities::KEYBOARD)
    }

    pub fn with_capabilities(mut self, capabilities: DeviceCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_usb_ids(mut self, vendor_id: u16, product_id: u16) -> Self {
        self.vendor_id = Some(vendor_id);
        self.product_id = Some(product_id);
        self
    }

    pub fn with_sysfs_path(mut self, path: impl Into<String>) -> Self {
        self.sysfs_path = Some(path.into());
        self
    }

    pub fn with_availability(mut self, is_available: bool) -> Self {
        self.is_available = is_available;
        self
    }

    /// The seat this device is currently assigned to, if any.
    pub fn seat_id(&self) -> Option<SeatId> {
        self.seat_id
    }

    pub fn is_assigned(&self) -> bool {
        self.seat_id.is_some()
    }

    pub fn has_capability(&self, capability: DeviceCapabilities) -> bool {
        self.capabilities.contains(capability)
    }

    pub(crate) fn set_seat(&mut self, seat_id: Option<SeatId>) {
        self.seat_id = seat_id;
    }
}

impl PartialEq for InputDevice {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for InputDevice {}

impl std::hash::Hash for InputDevice {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
