//! Read-only, serializable projection of registry state.
//!
//! These DTOs are what presentation collaborators (the `mpx-ctl` tool, status
//! displays) consume.  They contain only plain, JSON-friendly fields and carry
//! no handle back into the registry, so they cannot be used to mutate it.

use serde::{Deserialize, Serialize};

use crate::domain::{device::InputDevice, seat::Seat, seat::SeatId};

/// Snapshot of every seat and device plus the default seat id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryStatus {
    pub seats: Vec<SeatStatus>,
    pub devices: Vec<DeviceStatus>,
    pub default_seat_id: SeatId,
}

impl RegistryStatus {
    /// Number of devices that currently have a seat.
    pub fn assigned_device_count(&self) -> usize {
        self.devices.iter().filter(|d| d.seat_id.is_some()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatStatus {
    pub id: SeatId,
    pub name: String,
    /// `"ACTIVE"`, `"INACTIVE"` or `"SUSPENDED"`.
    pub state: String,
    pub cursor_position: CursorPosition,
    pub pointer_devices: Vec<String>,
    pub keyboard_devices: Vec<String>,
    pub pointer_grabbed: bool,
    pub keyboard_grabbed: bool,
}

impl From<&Seat> for SeatStatus {
    fn from(seat: &Seat) -> Self {
        let position = seat.cursor.position();
        Self {
            id: seat.id,
            name: seat.name.clone(),
            state: seat.state.as_str().to_string(),
            cursor_position: CursorPosition {
                x: position.x,
                y: position.y,
            },
            pointer_devices: seat.pointer_devices.iter().cloned().collect(),
            keyboard_devices: seat.keyboard_devices.iter().cloned().collect(),
            pointer_grabbed: seat.is_pointer_grabbed(),
            keyboard_grabbed: seat.is_keyboard_grabbed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub capabilities: Vec<String>,
    pub seat_id: Option<SeatId>,
    pub available: bool,
}

impl From<&InputDevice> for DeviceStatus {
    fn from(device: &InputDevice) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            device_type: device.device_type.as_str().to_string(),
            capabilities: device.capabilities.names(),
            seat_id: device.seat_id(),
            available: device.is_available,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
