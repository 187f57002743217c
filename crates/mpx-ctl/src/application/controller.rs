//! `MpxController`: the use cases behind every `mpx-ctl` subcommand.
//!
//! The controller owns one [`SeatRegistry`] and one [`ConfigStore`] and keeps
//! them consistent:
//!
//! ```text
//! MpxController::new()
//!  ├─ load config.toml
//!  ├─ SeatRegistry::with_default_seat_name(global.default_seat)
//!  └─ create every enabled configured seat except the default one
//!
//! create/destroy/assign/unassign
//!  ├─ call the registry (validate → mutate → event)
//!  └─ optionally persist the change to config.toml / devices.toml
//! ```
//!
//! Seats are addressed by *name* here, because names are what users type.  The
//! registry allows duplicate names; the controller always resolves to the
//! first seat with that name.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use mpx_core::registry::status::{DeviceStatus, SeatStatus};
use mpx_core::{
    DeviceCapabilities, DeviceType, InputDevice, RegistryError, RegistryStatus, SeatId,
    SeatRegistry,
};

use crate::infrastructure::storage::config::{
    device_identifier, ConfigError, ConfigStore, DeviceMapping, GlobalConfig, SeatConfig,
};

/// Errors surfaced to the command-line layer.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("seat '{0}' not found")]
    UnknownSeatName(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What kind of device `register-device` creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DeviceKind {
    #[default]
    Pointer,
    Keyboard,
    /// A combined device, e.g. a keyboard with a built-in trackpad.
    Both,
}

impl DeviceKind {
    /// The registry device this kind describes.
    pub fn build(self, device_id: &str, name: &str) -> InputDevice {
        match self {
            DeviceKind::Pointer => InputDevice::pointer(device_id, name),
            DeviceKind::Keyboard => InputDevice::keyboard(device_id, name),
            DeviceKind::Both => InputDevice::new(device_id, name, DeviceType::Unknown)
                .with_capabilities(DeviceCapabilities::POINTER | DeviceCapabilities::KEYBOARD),
        }
    }
}

/// Serializable view of both config files, printed by `mpx-ctl config`.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub global: GlobalConfig,
    pub seats: Vec<SeatConfig>,
    pub device_mappings: Vec<DeviceMapping>,
}

/// Bridges command-line requests to the registry and the config files.
#[derive(Debug)]
pub struct MpxController {
    registry: SeatRegistry,
    store: ConfigStore,
}

impl MpxController {
    /// Loads the configuration and builds a registry with the configured seats.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Config`] if the config file exists but cannot be
    /// read.
    pub fn new(mut store: ConfigStore) -> Result<Self, ControlError> {
        let config = store.load_config()?.clone();
        let mut registry = SeatRegistry::with_default_seat_name(&config.global.default_seat);

        for seat in config.seats.iter().filter(|s| s.enabled) {
            if seat.name == config.global.default_seat {
                continue;
            }
            registry.create_seat(&seat.name);
        }
        debug!(seats = registry.seat_count(), "controller ready");

        Ok(Self { registry, store })
    }

    pub fn registry(&self) -> &SeatRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SeatRegistry {
        &mut self.registry
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn list_seats(&self) -> Vec<SeatStatus> {
        self.registry.get_status().seats
    }

    pub fn list_devices(&self) -> Vec<DeviceStatus> {
        self.registry.get_status().devices
    }

    pub fn status(&self) -> RegistryStatus {
        self.registry.get_status()
    }

    pub fn config_report(&mut self) -> Result<ConfigReport, ControlError> {
        let config = self.store.load_config()?.clone();
        Ok(ConfigReport {
            global: config.global,
            seats: config.seats,
            device_mappings: self.store.all_mappings()?,
        })
    }

    // ── Seats ─────────────────────────────────────────────────────────────────

    /// Creates a seat and, with `save`, adds it to `config.toml`.
    ///
    /// A seat name already present in the file is not an error: the file just
    /// keeps its existing entry.
    pub fn create_seat(&mut self, name: &str, save: bool) -> Result<SeatId, ControlError> {
        let seat_id = self.registry.create_seat(name);

        if save {
            match self.store.add_seat(SeatConfig::new(name)) {
                Ok(()) => {}
                Err(ConfigError::DuplicateSeat(_)) => {
                    debug!(name, "seat already in configuration");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(seat_id)
    }

    /// Destroys the first seat named `name` and, with `save`, removes it from
    /// `config.toml`.
    pub fn destroy_seat(&mut self, name: &str, save: bool) -> Result<(), ControlError> {
        let seat_id = self.seat_id_by_name(name)?;
        self.registry.destroy_seat(seat_id)?;

        if save {
            match self.store.remove_seat(name) {
                Ok(()) => {}
                Err(e @ (ConfigError::SeatNotFound(_) | ConfigError::DefaultSeat(_))) => {
                    debug!(name, reason = %e, "seat not removed from configuration");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    // ── Devices ───────────────────────────────────────────────────────────────

    /// Registers a device and places it on a seat.
    ///
    /// Placement order: a persisted mapping for the device id, then one for its
    /// `vvvv:pppp` identifier, then (with `auto_assign_new_devices`) the default
    /// seat.  Returns the seat the device ended up on, if any.
    ///
    /// Both config files are read before the registry is touched, so a config
    /// error leaves the device unregistered.
    pub fn register_device(&mut self, device: InputDevice) -> Result<Option<SeatId>, ControlError> {
        let device_id = device.id.clone();
        let vendor_product = device
            .vendor_id
            .zip(device.product_id)
            .map(|(vendor, product)| device_identifier(vendor, product));
        let mapped = self
            .store
            .seat_for_device(&device_id, vendor_product.as_deref())?;
        let auto_assign = self.store.load_config()?.global.auto_assign_new_devices;

        self.registry.register_device(device);
        if let Some(seat_name) = mapped {
            match self.registry.get_seat_by_name(&seat_name).map(|s| s.id) {
                Some(seat_id) => {
                    self.registry.assign_device(&device_id, seat_id, true)?;
                    info!(device_id = %device_id, seat = %seat_name, "applied device mapping");
                    return Ok(Some(seat_id));
                }
                None => warn!(device_id = %device_id, seat = %seat_name, "mapped seat does not exist"),
            }
        }

        if auto_assign {
            return Ok(Some(self.registry.auto_assign_device(&device_id)?));
        }
        Ok(None)
    }

    /// Assigns a device to the named seat, moving it if it already has one.
    ///
    /// With `save` the assignment is recorded in `devices.toml`.  The device
    /// map is read before the registry changes; a failure to write it back is
    /// reported after the assignment has already been applied.
    pub fn assign_device(&mut self, device_id: &str, seat_name: &str, save: bool) -> Result<(), ControlError> {
        let seat_id = self.seat_id_by_name(seat_name)?;
        let device_name = self.registry.get_device(device_id)?.name.clone();
        if save {
            self.store.load_device_map()?;
        }
        self.registry.assign_device(device_id, seat_id, true)?;

        if save {
            self.store
                .add_device_mapping(DeviceMapping::new(device_id, seat_name).with_device_name(device_name))?;
        }
        Ok(())
    }

    /// Unassigns a device and, with `save`, forgets its mapping.
    pub fn unassign_device(&mut self, device_id: &str, save: bool) -> Result<(), ControlError> {
        self.registry.unassign_device(device_id)?;
        if save {
            self.store.remove_device_mapping(device_id)?;
        }
        Ok(())
    }

    /// Overwrites both config files with the stock two-seat setup.
    pub fn reset_config(&mut self) -> Result<(), ControlError> {
        self.store.reset_to_defaults()?;
        Ok(())
    }

    fn seat_id_by_name(&self, name: &str) -> Result<SeatId, ControlError> {
        self.registry
            .get_seat_by_name(name)
            .map(|seat| seat.id)
            .ok_or_else(|| ControlError::UnknownSeatName(name.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::config::{create_default_config, MpxConfig};
    use mpx_core::ErrorKind;
    use uuid::Uuid;

    fn temp_store() -> ConfigStore {
        ConfigStore::new(std::env::temp_dir().join(format!("mpx_ctl_test_{}", Uuid::new_v4())))
    }

    fn controller_with(config: MpxConfig) -> MpxController {
        let mut store = temp_store();
        store.save_config(config).expect("save config");
        MpxController::new(store).expect("controller")
    }

    fn cleanup(controller: &mut MpxController) {
        std::fs::remove_dir_all(controller.store_mut().dir()).ok();
    }

    #[test]
    fn test_new_creates_enabled_configured_seats() {
        // Arrange
        let mut config = create_default_config();
        let mut disabled = SeatConfig::new("disabled");
        disabled.enabled = false;
        config.seats.push(disabled);

        // Act
        let mut controller = controller_with(config);

        // Assert
        let names: Vec<_> = controller.list_seats().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["seat0".to_string(), "aux".to_string()]);
        cleanup(&mut controller);
    }

    #[test]
    fn test_create_and_destroy_seat_persist() {
        let mut controller = MpxController::new(temp_store()).unwrap();

        controller.create_seat("gaming", true).unwrap();
        assert!(controller.store_mut().get_seat_config("gaming").unwrap().is_some());

        controller.destroy_seat("gaming", true).unwrap();
        assert!(controller.store_mut().get_seat_config("gaming").unwrap().is_none());
        assert!(controller.registry().get_seat_by_name("gaming").is_none());
        cleanup(&mut controller);
    }

    #[test]
    fn test_create_seat_already_in_config_is_not_an_error() {
        let mut controller = controller_with(create_default_config());
        // "aux" exists both in the file and (after startup) in the registry.
        controller.create_seat("aux", true).unwrap();
        assert_eq!(controller.registry().seat_count(), 3);
        cleanup(&mut controller);
    }

    #[test]
    fn test_destroy_unknown_or_default_seat_fails() {
        let mut controller = MpxController::new(temp_store()).unwrap();

        assert!(matches!(
            controller.destroy_seat("ghost", false),
            Err(ControlError::UnknownSeatName(_))
        ));
        match controller.destroy_seat("seat0", false) {
            Err(ControlError::Registry(e)) => assert_eq!(e.kind(), ErrorKind::InvariantViolation),
            other => panic!("expected invariant violation, got {other:?}"),
        }
    }

    #[test]
    fn test_register_device_auto_assigns_to_default_seat() {
        let mut controller = MpxController::new(temp_store()).unwrap();

        let seat = controller
            .register_device(DeviceKind::Pointer.build("mouse1", "Mouse"))
            .unwrap();

        assert_eq!(seat, Some(controller.registry().default_seat_id()));
    }

    #[test]
    fn test_register_device_without_auto_assign_stays_unassigned() {
        let mut config = MpxConfig::default();
        config.global.auto_assign_new_devices = false;
        let mut controller = controller_with(config);

        let seat = controller
            .register_device(DeviceKind::Keyboard.build("kbd1", "Keyboard"))
            .unwrap();

        assert_eq!(seat, None);
        assert_eq!(controller.registry().unassigned_devices().count(), 1);
        cleanup(&mut controller);
    }

    #[test]
    fn test_register_device_applies_vendor_product_mapping() {
        // Arrange
        let mut controller = controller_with(create_default_config());
        controller
            .store_mut()
            .add_device_mapping(DeviceMapping::new("046d:c52b", "aux"))
            .unwrap();
        let device = DeviceKind::Pointer
            .build("event5", "Logitech Receiver")
            .with_usb_ids(0x046d, 0xc52b);

        // Act
        let seat = controller.register_device(device).unwrap();

        // Assert
        let aux = controller.registry().get_seat_by_name("aux").map(|s| s.id);
        assert_eq!(seat, aux);
        cleanup(&mut controller);
    }

    #[test]
    fn test_assign_moves_device_and_records_mapping() {
        let mut controller = controller_with(create_default_config());
        controller
            .register_device(DeviceKind::Both.build("combo", "Keyboard with trackpad"))
            .unwrap();

        controller.assign_device("combo", "aux", true).unwrap();

        let aux = controller.registry().get_seat_by_name("aux").unwrap();
        assert!(aux.pointer_devices.contains("combo"));
        assert!(aux.keyboard_devices.contains("combo"));
        let mappings = controller.store_mut().all_mappings().unwrap();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].seat_name, "aux");
        assert_eq!(mappings[0].device_name, "Keyboard with trackpad");
        cleanup(&mut controller);
    }

    #[test]
    fn test_register_device_with_unreadable_device_map_changes_nothing() {
        // Arrange
        let mut controller = controller_with(create_default_config());
        std::fs::create_dir_all(controller.store_mut().device_map_path()).unwrap();

        // Act
        let result = controller.register_device(DeviceKind::Pointer.build("mouse1", "Mouse"));

        // Assert
        assert!(matches!(result, Err(ControlError::Config(ConfigError::Io { .. }))));
        assert!(controller.registry().get_device("mouse1").is_err());
        cleanup(&mut controller);
    }

    #[test]
    fn test_assign_with_unreadable_device_map_keeps_old_seat() {
        // Arrange
        let mut controller = controller_with(create_default_config());
        controller
            .registry_mut()
            .register_device(InputDevice::pointer("mouse1", "Mouse"));
        controller.registry_mut().auto_assign_device("mouse1").unwrap();
        std::fs::create_dir_all(controller.store_mut().device_map_path()).unwrap();

        // Act
        let result = controller.assign_device("mouse1", "aux", true);

        // Assert
        assert!(matches!(result, Err(ControlError::Config(ConfigError::Io { .. }))));
        let default_seat = controller.registry().default_seat_id();
        assert_eq!(
            controller.registry().get_device("mouse1").unwrap().seat_id(),
            Some(default_seat)
        );
        cleanup(&mut controller);
    }

    #[test]
    fn test_assign_to_unknown_seat_fails() {
        let mut controller = MpxController::new(temp_store()).unwrap();
        controller
            .register_device(DeviceKind::Pointer.build("mouse1", "Mouse"))
            .unwrap();
        let result = controller.assign_device("mouse1", "ghost", false);
        assert!(matches!(result, Err(ControlError::UnknownSeatName(_))));
    }

    #[test]
    fn test_unassign_removes_mapping() {
        let mut controller = controller_with(create_default_config());
        controller
            .register_device(DeviceKind::Pointer.build("mouse1", "Mouse"))
            .unwrap();
        controller.assign_device("mouse1", "aux", true).unwrap();

        controller.unassign_device("mouse1", true).unwrap();

        assert!(!controller.registry().get_device("mouse1").unwrap().is_assigned());
        assert!(controller.store_mut().all_mappings().unwrap().is_empty());
        cleanup(&mut controller);
    }

    #[test]
    fn test_config_report_lists_seats_and_mappings() {
        let mut controller = controller_with(create_default_config());
        controller
            .store_mut()
            .add_device_mapping(DeviceMapping::new("mouse1", "aux"))
            .unwrap();

        let report = controller.config_report().unwrap();

        assert_eq!(report.seats.len(), 2);
        assert_eq!(report.device_mappings.len(), 1);
        assert_eq!(report.global.default_seat, "seat0");
        cleanup(&mut controller);
    }
}
