//! Virtual input devices driven by scenarios instead of hardware.
//!
//! A [`VirtualDevice`] remembers where *it* believes the pointer is and which
//! buttons/keys it is holding.  That state is local to the device: the seat
//! cursor it drives lives in the registry and is clamped to the display, so
//! the two can disagree after the cursor hits an edge.

use std::collections::BTreeSet;

use mpx_core::{DeviceCapabilities, DeviceId, DeviceType, InputDevice, Position};

/// A simulated mouse, keyboard or combined device.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualDevice {
    pub id: DeviceId,
    pub name: String,
    pub device_type: DeviceType,
    pub capabilities: DeviceCapabilities,
    pub is_connected: bool,
    /// Unclamped position accumulated from every motion this device produced.
    pub position: Position,
    pub buttons_pressed: BTreeSet<u32>,
    pub keys_pressed: BTreeSet<u32>,
}

impl VirtualDevice {
    pub fn new(
        id: impl Into<DeviceId>,
        name: impl Into<String>,
        device_type: DeviceType,
        capabilities: DeviceCapabilities,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            device_type,
            capabilities,
            is_connected: false,
            position: Position::ORIGIN,
            buttons_pressed: BTreeSet::new(),
            keys_pressed: BTreeSet::new(),
        }
    }

    pub fn mouse(id: impl Into<DeviceId>, name: impl Into<String>) -> Self {
        Self::new(id, name, DeviceType::Pointer, DeviceCapabilities::POINTER)
    }

    pub fn keyboard(id: impl Into<DeviceId>, name: impl Into<String>) -> Self {
        Self::new(id, name, DeviceType::Keyboard, DeviceCapabilities::KEYBOARD)
    }

    /// The registry record for this device.  Availability follows the
    /// connected flag; the record always starts unassigned.
    pub fn to_input_device(&self) -> InputDevice {
        InputDevice::new(self.id.clone(), self.name.clone(), self.device_type)
            .with_capabilities(self.capabilities)
            .with_availability(self.is_connected)
    }
}

/// The standard device set used by the pre-built scenarios:
/// `mouse1`, `mouse2`, `keyboard1`, `keyboard2`.
pub fn standard_test_devices() -> Vec<VirtualDevice> {
    vec![
        VirtualDevice::mouse("mouse1", "Virtual Mouse 1"),
        VirtualDevice::mouse("mouse2", "Virtual Mouse 2"),
        VirtualDevice::keyboard("keyboard1", "Virtual Keyboard 1"),
        VirtualDevice::keyboard("keyboard2", "Virtual Keyboard 2"),
    ]
}

// ── Tests ─────────────────────────────────────────────────────────────────────
