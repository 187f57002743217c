//! Raw device event sources.
//!
//! A real backend (libinput, evdev) reads hardware on its own thread and
//! hands events over a channel.  [`InputSource`] captures that shape so the
//! rest of the simulator does not care whether events come from hardware or
//! from a script.
//!
//! # Testability
//!
//! [`scripted::ScriptedInputSource`] replays a fixed list of events and lets
//! tests inject more after start-up.

use std::sync::mpsc;

use mpx_core::{DeviceId, SeatId, SeatRegistry};

pub mod scripted;

/// One event as read from a device, before seat routing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent {
    /// Relative pointer motion.
    Motion { device_id: DeviceId, dx: f64, dy: f64 },
    /// A pointer button changed state.  Buttons use Linux input codes or
    /// `1`/`2`/`3` for left/middle/right.
    Button {
        device_id: DeviceId,
        button: u32,
        pressed: bool,
    },
    /// A key changed state.
    Key {
        device_id: DeviceId,
        key: u32,
        pressed: bool,
    },
    /// Scroll; positive values are right / down.
    Axis {
        device_id: DeviceId,
        horizontal: f64,
        vertical: f64,
    },
}

impl RawInputEvent {
    pub fn device_id(&self) -> &str {
        match self {
            RawInputEvent::Motion { device_id, .. }
            | RawInputEvent::Button { device_id, .. }
            | RawInputEvent::Key { device_id, .. }
            | RawInputEvent::Axis { device_id, .. } => device_id,
        }
    }

    /// Routes this event through the matching `route_*` registry call.
    ///
    /// Returns the receiving seat, or `None` if the registry dropped it.
    pub fn route(&self, registry: &mut SeatRegistry) -> Option<SeatId> {
        match self {
            RawInputEvent::Motion { device_id, dx, dy } => {
                registry.route_pointer_motion(device_id, *dx, *dy)
            }
            RawInputEvent::Button {
                device_id,
                button,
                pressed,
            } => registry.route_pointer_button(device_id, *button, *pressed),
            RawInputEvent::Key {
                device_id,
                key,
                pressed,
            } => registry.route_keyboard_key(device_id, *key, *pressed),
            RawInputEvent::Axis {
                device_id,
                horizontal,
                vertical,
            } => registry.route_pointer_axis(device_id, *horizontal, *vertical),
        }
    }
}

/// Error type for input source operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("input source is already running")]
    AlreadyStarted,
    #[error("input source has not been started")]
    NotStarted,
    #[error("input source has been stopped")]
    Stopped,
}

/// Trait abstracting raw event production.
pub trait InputSource: Send {
    /// Starts the source and returns a receiver for its events.  The channel
    /// closes when the source stops.
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, SourceError>;
    /// Stops the source.  Calling it on a stopped source does nothing.
    fn stop(&self);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mpx_core::InputDevice;

    fn registry_with(device: InputDevice) -> (SeatRegistry, SeatId) {
        let mut registry = SeatRegistry::new();
        let id = device.id.clone();
        registry.register_device(device);
        let seat = registry.auto_assign_device(&id).unwrap();
        (registry, seat)
    }

    #[test]
    fn test_device_id_for_every_variant() {
        let events = [
            RawInputEvent::Motion { device_id: "a".into(), dx: 0.0, dy: 0.0 },
            RawInputEvent::Button { device_id: "b".into(), button: 1, pressed: true },
            RawInputEvent::Key { device_id: "c".into(), key: 30, pressed: false },
            RawInputEvent::Axis { device_id: "d".into(), horizontal: 0.0, vertical: 1.0 },
        ];
        let ids: Vec<&str> = events.iter().map(RawInputEvent::device_id).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_route_motion_moves_owning_cursor() {
        // Arrange
        let (mut registry, seat) = registry_with(InputDevice::pointer("mouse1", "Mouse"));
        let event = RawInputEvent::Motion { device_id: "mouse1".into(), dx: 12.0, dy: 8.0 };

        // Act
        let routed = event.route(&mut registry);

        // Assert
        assert_eq!(routed, Some(seat));
        let position = registry.get_seat(seat).unwrap().cursor.position();
        assert_eq!((position.x, position.y), (12.0, 8.0));
    }

    #[test]
    fn test_route_key_and_unknown_device() {
        let (mut registry, seat) = registry_with(InputDevice::keyboard("kbd", "Keyboard"));

        let key = RawInputEvent::Key { device_id: "kbd".into(), key: 30, pressed: true };
        let stray = RawInputEvent::Button { device_id: "ghost".into(), button: 1, pressed: true };

        assert_eq!(key.route(&mut registry), Some(seat));
        assert_eq!(stray.route(&mut registry), None);
    }
}
