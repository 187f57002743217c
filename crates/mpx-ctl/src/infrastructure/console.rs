//! Human-readable rendering of controller results.
//!
//! Every function returns a `String` instead of printing, so `main` decides
//! where output goes and tests can assert on exact text.  JSON output does not
//! pass through here: `main` serializes the same values with `serde_json`.

use std::fmt::Write as _;

use mpx_core::registry::status::{DeviceStatus, SeatStatus};
use mpx_core::RegistryStatus;

use crate::application::controller::ConfigReport;

/// First eight characters of an id, as shown in listings.
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub fn format_seats(seats: &[SeatStatus]) -> String {
    let mut out = String::from("Seats:\n");
    for seat in seats {
        let mut grabbed = String::new();
        if seat.pointer_grabbed {
            grabbed.push_str(" [POINTER GRABBED]");
        }
        if seat.keyboard_grabbed {
            grabbed.push_str(" [KEYBOARD GRABBED]");
        }

        let id = seat.id.to_string();
        let _ = writeln!(out, "  {} ({}...)", seat.name, short_id(&id));
        let _ = writeln!(out, "    State: {}{}", seat.state, grabbed);
        let _ = writeln!(
            out,
            "    Cursor: ({:.0}, {:.0})",
            seat.cursor_position.x, seat.cursor_position.y
        );
        let _ = writeln!(out, "    Pointers: {} devices", seat.pointer_devices.len());
        let _ = writeln!(out, "    Keyboards: {} devices", seat.keyboard_devices.len());
        out.push('\n');
    }
    out
}

pub fn format_devices(devices: &[DeviceStatus]) -> String {
    let mut out = String::from("Devices:\n");
    for device in devices {
        let assignment = match device.seat_id {
            Some(seat_id) => format!("-> {}...", short_id(&seat_id.to_string())),
            None => "(unassigned)".to_string(),
        };
        let availability = if device.available { "" } else { " [UNAVAILABLE]" };

        let _ = writeln!(out, "  {}", device.name);
        let _ = writeln!(out, "    ID: {}", device.id);
        let _ = writeln!(
            out,
            "    Type: {} ({})",
            device.device_type,
            device.capabilities.join(", ")
        );
        let _ = writeln!(out, "    Assignment: {}{}", assignment, availability);
        out.push('\n');
    }
    out
}

pub fn format_status(status: &RegistryStatus) -> String {
    let assigned = status.assigned_device_count();
    let default_id = status.default_seat_id.to_string();

    let mut out = String::from("MPX Status\n");
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out, "Default seat: {}...", short_id(&default_id));
    let _ = writeln!(out, "Total seats: {}", status.seats.len());
    let _ = writeln!(out, "Total devices: {}", status.devices.len());
    let _ = writeln!(out, "Assigned devices: {}", assigned);
    let _ = writeln!(out, "Unassigned devices: {}", status.devices.len() - assigned);
    out
}

pub fn format_config(report: &ConfigReport) -> String {
    let global = &report.global;
    let mut out = String::from("Configuration\n");
    let _ = writeln!(out, "{}", "=".repeat(40));

    out.push_str("\nGlobal settings:\n");
    let _ = writeln!(out, "  auto_assign_new_devices: {}", global.auto_assign_new_devices);
    let _ = writeln!(out, "  default_seat: {}", global.default_seat);
    let _ = writeln!(out, "  verbose: {}", global.verbose);

    out.push_str("\nConfigured seats:\n");
    for seat in &report.seats {
        let _ = writeln!(
            out,
            "  {}: enabled={}, cursor_size={}",
            seat.name, seat.enabled, seat.cursor_size
        );
    }

    out.push_str("\nDevice mappings:\n");
    if report.device_mappings.is_empty() {
        out.push_str("  (none)\n");
    }
    for mapping in &report.device_mappings {
        let _ = writeln!(
            out,
            "  {} -> {} ({})",
            mapping.device_id, mapping.seat_name, mapping.device_name
        );
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::config::{create_default_config, DeviceMapping};
    use mpx_core::{GrabMode, InputDevice, SeatRegistry};

    #[test]
    fn test_format_seats_marks_grabs_and_rounds_cursor() {
        // Arrange
        let mut registry = SeatRegistry::new();
        let seat = registry.default_seat_id();
        registry.warp_pointer(seat, 100.4, 99.6).unwrap();
        registry
            .request_pointer_grab(seat, "game", GrabMode::PointerLock, None)
            .unwrap();

        // Act
        let text = format_seats(&registry.get_status().seats);

        // Assert
        assert!(text.starts_with("Seats:\n  seat0 ("));
        assert!(text.contains("    State: ACTIVE [POINTER GRABBED]\n"));
        assert!(text.contains("    Cursor: (100, 100)\n"));
        assert!(text.contains("    Pointers: 0 devices\n"));
    }

    #[test]
    fn test_format_devices_shows_assignment() {
        let mut registry = SeatRegistry::new();
        registry.register_device(InputDevice::pointer("mouse1", "Test Mouse"));
        registry.register_device(InputDevice::keyboard("kbd1", "Test Keyboard").with_availability(false));
        registry.auto_assign_device("mouse1").unwrap();

        let text = format_devices(&registry.get_status().devices);

        assert!(text.contains("  Test Mouse\n    ID: mouse1\n    Type: POINTER (POINTER)\n"));
        assert!(text.contains("    Assignment: -> "));
        assert!(text.contains("    Assignment: (unassigned) [UNAVAILABLE]\n"));
    }

    #[test]
    fn test_format_status_counts_devices() {
        let mut registry = SeatRegistry::new();
        registry.register_device(InputDevice::pointer("mouse1", "Mouse"));
        registry.register_device(InputDevice::pointer("mouse2", "Mouse"));
        registry.auto_assign_device("mouse1").unwrap();

        let text = format_status(&registry.get_status());

        assert!(text.contains("Total seats: 1\n"));
        assert!(text.contains("Total devices: 2\n"));
        assert!(text.contains("Assigned devices: 1\n"));
        assert!(text.contains("Unassigned devices: 1\n"));
    }

    #[test]
    fn test_format_config_lists_mappings_or_none() {
        let config = create_default_config();
        let mut report = ConfigReport {
            global: config.global,
            seats: config.seats,
            device_mappings: Vec::new(),
        };
        assert!(format_config(&report).contains("Device mappings:\n  (none)\n"));

        report
            .device_mappings
            .push(DeviceMapping::new("mouse1", "aux").with_device_name("Mouse"));
        let text = format_config(&report);
        assert!(text.contains("  aux: enabled=true, cursor_size=24\n"));
        assert!(text.contains("  mouse1 -> aux (Mouse)\n"));
    }

    #[test]
    fn test_short_id_handles_short_strings() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("0123456789"), "01234567");
    }
}
