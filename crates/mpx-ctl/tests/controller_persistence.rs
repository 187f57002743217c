//! Integration tests for configuration persistence across controller runs.
//!
//! Each `mpx-ctl` invocation builds a fresh controller from the files on disk,
//! so these tests model consecutive invocations by creating one controller per
//! step over the same temp directory.

use std::path::PathBuf;

use mpx_ctl::application::controller::{ControlError, DeviceKind, MpxController};
use mpx_ctl::infrastructure::storage::config::{ConfigStore, CONFIG_FILE_NAME, DEVICE_MAP_FILE_NAME};
use uuid::Uuid;

/// A unique temp directory that is removed when dropped.
struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("mpx_ctl_it_{}", Uuid::new_v4())))
    }

    fn controller(&self) -> MpxController {
        MpxController::new(ConfigStore::new(&self.0)).expect("controller must load")
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

#[test]
fn test_created_seat_exists_in_next_invocation() {
    // Arrange
    let dir = TempDir::new();
    dir.controller().create_seat("gaming", true).unwrap();

    // Act
    let next = dir.controller();

    // Assert
    let names: Vec<_> = next.list_seats().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["seat0".to_string(), "gaming".to_string()]);
    assert!(dir.0.join(CONFIG_FILE_NAME).exists());
}

#[test]
fn test_destroyed_seat_is_gone_in_next_invocation() {
    let dir = TempDir::new();
    dir.controller().create_seat("gaming", true).unwrap();
    dir.controller().destroy_seat("gaming", true).unwrap();

    let next = dir.controller();

    assert!(next.registry().get_seat_by_name("gaming").is_none());
    assert_eq!(next.registry().seat_count(), 1);
}

#[test]
fn test_assignment_is_replayed_when_device_reappears() {
    // Arrange: first run creates a seat and assigns a device to it.
    let dir = TempDir::new();
    {
        let mut first = dir.controller();
        first.create_seat("aux", true).unwrap();
        first
            .register_device(DeviceKind::Pointer.build("mouse2", "Second Mouse"))
            .unwrap();
        first.assign_device("mouse2", "aux", true).unwrap();
    }
    assert!(dir.0.join(DEVICE_MAP_FILE_NAME).exists());

    // Act: a later run sees the same device again.
    let mut second = dir.controller();
    let placed = second
        .register_device(DeviceKind::Pointer.build("mouse2", "Second Mouse"))
        .unwrap();

    // Assert
    let aux = second.registry().get_seat_by_name("aux").map(|s| s.id);
    assert_eq!(placed, aux);
    assert!(aux.is_some());
    assert_eq!(
        second.registry_mut().route_pointer_motion("mouse2", 10.0, 10.0),
        aux
    );
}

#[test]
fn test_unassign_forgets_mapping_for_next_invocation() {
    let dir = TempDir::new();
    {
        let mut first = dir.controller();
        first.create_seat("aux", true).unwrap();
        first
            .register_device(DeviceKind::Pointer.build("mouse2", "Second Mouse"))
            .unwrap();
        first.assign_device("mouse2", "aux", true).unwrap();
        first.unassign_device("mouse2", true).unwrap();
    }

    let mut second = dir.controller();
    let placed = second
        .register_device(DeviceKind::Pointer.build("mouse2", "Second Mouse"))
        .unwrap();

    // No mapping left, so auto-assignment puts it on the default seat.
    assert_eq!(placed, Some(second.registry().default_seat_id()));
}

#[test]
fn test_assign_unknown_device_reports_registry_error() {
    let dir = TempDir::new();
    let mut controller = dir.controller();

    let result = controller.assign_device("ghost", "seat0", true);

    assert!(matches!(result, Err(ControlError::Registry(_))));
}

#[test]
fn test_reset_config_restores_two_seat_setup() {
    let dir = TempDir::new();
    {
        let mut first = dir.controller();
        first.create_seat("gaming", true).unwrap();
        first.reset_config().unwrap();
    }

    let next = dir.controller();

    let names: Vec<_> = next.list_seats().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["seat0".to_string(), "aux".to_string()]);
}
