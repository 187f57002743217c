//! TOML-based persistence for seat configuration and device mappings.
//!
//! Two files live in the platform-appropriate config directory:
//! - Linux:    `~/.config/mpx-wayland/` (or `$XDG_CONFIG_HOME/mpx-wayland/`)
//! - Windows:  `%APPDATA%\MpxWayland\`
//! - macOS:    `~/Library/Application Support/MpxWayland/`
//!
//! | File           | Contents                                          |
//! |----------------|---------------------------------------------------|
//! | `config.toml`  | global options and the list of configured seats   |
//! | `devices.toml` | persistent "this device belongs to that seat" map |
//!
//! Example `config.toml`:
//!
//! ```toml
//! version = 1
//!
//! [global]
//! auto_assign_new_devices = true
//! default_seat = "seat0"
//!
//! [[seats]]
//! name = "seat0"
//!
//! [[seats]]
//! name = "aux"
//! cursor_size = 32
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = ..)]`, so a file written by an older
//! version (or by hand, with only a few keys) still loads.  A missing file is
//! not an error: first runs get the defaults.  A malformed file is logged and
//! replaced by the defaults in memory; it is only overwritten on the next save.
//!
//! # Device identifiers
//!
//! A mapping's `device_id` is either the backend's device id (e.g. a sysfs
//! name) or a `"vvvv:pppp"` USB vendor/product pair built by
//! [`device_identifier`].  Lookups try the exact id first, then the pair, so a
//! mapping for a model of mouse applies to every unit of that model.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use mpx_core::DEFAULT_SEAT_NAME;

/// Name of the seat configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Name of the device mapping file inside the config directory.
pub const DEVICE_MAP_FILE_NAME: &str = "devices.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("seat '{0}' already exists in the configuration")]
    DuplicateSeat(String),

    #[error("seat '{0}' not found in the configuration")]
    SeatNotFound(String),

    #[error("cannot remove the default seat '{0}'")]
    DefaultSeat(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Contents of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MpxConfig {
    /// Schema version – bump when breaking changes are introduced.
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub seats: Vec<SeatConfig>,
}

/// Options that apply to the whole multi-seat setup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalConfig {
    /// Put newly registered devices with no mapping on the default seat.
    #[serde(default = "default_true")]
    pub auto_assign_new_devices: bool,
    /// Name of the seat that always exists.
    #[serde(default = "default_seat_name")]
    pub default_seat: String,
    /// Log at `debug` level.
    #[serde(default)]
    pub verbose: bool,
    /// Log file path.  Empty = stderr only.
    #[serde(default)]
    pub log_file: String,
    /// IPC socket path.  Empty = the compositor's default.
    #[serde(default)]
    pub socket_path: String,
}

/// Configuration for one seat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeatConfig {
    pub name: String,
    /// Disabled seats are kept in the file but not created at startup.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cursor_theme")]
    pub cursor_theme: String,
    #[serde(default = "default_cursor_size")]
    pub cursor_size: u32,
    /// Pointer device identifiers (`vvvv:pppp` or sysfs path) for this seat.
    #[serde(default)]
    pub pointer_devices: Vec<String>,
    /// Keyboard device identifiers for this seat.
    #[serde(default)]
    pub keyboard_devices: Vec<String>,
}

/// Contents of `devices.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceMapConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub mappings: Vec<DeviceMapping>,
}

/// A persistent device → seat mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceMapping {
    /// Device id or `"vvvv:pppp"` identifier.
    pub device_id: String,
    pub seat_name: String,
    /// Human-readable device name, for reference only.
    #[serde(default)]
    pub device_name: String,
    /// Higher wins when several mappings match.
    #[serde(default)]
    pub priority: i32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_seat_name() -> String {
    DEFAULT_SEAT_NAME.to_string()
}
fn default_cursor_theme() -> String {
    "default".to_string()
}
fn default_cursor_size() -> u32 {
    24
}

impl Default for MpxConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            global: GlobalConfig::default(),
            seats: vec![SeatConfig::new(DEFAULT_SEAT_NAME)],
        }
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            auto_assign_new_devices: default_true(),
            default_seat: default_seat_name(),
            verbose: false,
            log_file: String::new(),
            socket_path: String::new(),
        }
    }
}

impl Default for DeviceMapConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            mappings: Vec::new(),
        }
    }
}

impl SeatConfig {
    /// An enabled seat with default cursor settings and no devices.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            cursor_theme: default_cursor_theme(),
            cursor_size: default_cursor_size(),
            pointer_devices: Vec::new(),
            keyboard_devices: Vec::new(),
        }
    }
}

impl DeviceMapping {
    pub fn new(device_id: impl Into<String>, seat_name: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            seat_name: seat_name.into(),
            device_name: String::new(),
            priority: 0,
        }
    }

    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Builds the `"vvvv:pppp"` identifier for a USB vendor/product pair.
pub fn device_identifier(vendor_id: u16, product_id: u16) -> String {
    format!("{vendor_id:04x}:{product_id:04x}")
}

/// Creates the stock two-seat configuration (`seat0` and `aux`).
pub fn create_default_config() -> MpxConfig {
    MpxConfig {
        seats: vec![SeatConfig::new(DEFAULT_SEAT_NAME), SeatConfig::new("aux")],
        ..MpxConfig::default()
    }
}

// ── Config store ──────────────────────────────────────────────────────────────

/// Reads, caches and writes the two config files of one directory.
///
/// Each file is read at most once; later reads return the cached value and
/// every modification writes the whole file back.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
    config: Option<MpxConfig>,
    device_map: Option<DeviceMapConfig>,
}

impl ConfigStore {
    /// A store rooted at `dir`.  Nothing is read until first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            config: None,
            device_map: None,
        }
    }

    /// A store rooted at the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPlatformConfigDir`] when the platform base
    /// directory cannot be determined from the environment.
    pub fn from_platform_dir() -> Result<Self, ConfigError> {
        Ok(Self::new(config_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    pub fn device_map_path(&self) -> PathBuf {
        self.dir.join(DEVICE_MAP_FILE_NAME)
    }

    /// Loads `config.toml`, caching the result.
    ///
    /// A config with no seats gets the default seat injected.
    ///
    /// # Errors
    ///
    /// Only I/O failures other than "not found" are errors; a malformed file is
    /// logged and yields the defaults.
    pub fn load_config(&mut self) -> Result<&MpxConfig, ConfigError> {
        self.config_mut().map(|config| &*config)
    }

    /// Reads only the `global.verbose` flag, without caching or logging.
    ///
    /// Lets a binary pick its log level before the subscriber exists.
    pub fn peek_verbose(&self) -> bool {
        std::fs::read_to_string(self.config_path())
            .ok()
            .and_then(|content| toml::from_str::<MpxConfig>(&content).ok())
            .is_some_and(|config| config.global.verbose)
    }

    /// Writes `config` to `config.toml` and makes it the cached value.
    pub fn save_config(&mut self, config: MpxConfig) -> Result<(), ConfigError> {
        write_toml(&self.config_path(), &config)?;
        info!(path = %self.config_path().display(), "saved config");
        self.config = Some(config);
        Ok(())
    }

    /// Loads `devices.toml`, caching the result.  Same error policy as
    /// [`load_config`](Self::load_config).
    pub fn load_device_map(&mut self) -> Result<&DeviceMapConfig, ConfigError> {
        self.device_map_mut().map(|device_map| &*device_map)
    }

    pub fn save_device_map(&mut self, device_map: DeviceMapConfig) -> Result<(), ConfigError> {
        write_toml(&self.device_map_path(), &device_map)?;
        info!(path = %self.device_map_path().display(), "saved device map");
        self.device_map = Some(device_map);
        Ok(())
    }

    // ── Seat configuration ────────────────────────────────────────────────────

    pub fn get_seat_config(&mut self, seat_name: &str) -> Result<Option<SeatConfig>, ConfigError> {
        Ok(self
            .config_mut()?
            .seats
            .iter()
            .find(|s| s.name == seat_name)
            .cloned())
    }

    /// Appends a seat and saves.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateSeat`] if a seat with the same name exists.
    pub fn add_seat(&mut self, seat: SeatConfig) -> Result<(), ConfigError> {
        let mut config = self.config_mut()?.clone();
        if config.seats.iter().any(|s| s.name == seat.name) {
            return Err(ConfigError::DuplicateSeat(seat.name));
        }
        config.seats.push(seat);
        self.save_config(config)
    }

    /// Removes a seat and saves.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DefaultSeat`] for the configured default seat and
    /// [`ConfigError::SeatNotFound`] for an unknown name.
    pub fn remove_seat(&mut self, seat_name: &str) -> Result<(), ConfigError> {
        let mut config = self.config_mut()?.clone();
        if seat_name == config.global.default_seat {
            return Err(ConfigError::DefaultSeat(seat_name.to_string()));
        }
        let before = config.seats.len();
        config.seats.retain(|s| s.name != seat_name);
        if config.seats.len() == before {
            return Err(ConfigError::SeatNotFound(seat_name.to_string()));
        }
        self.save_config(config)
    }

    /// Applies `update` to the named seat and saves.
    pub fn update_seat(
        &mut self,
        seat_name: &str,
        update: impl FnOnce(&mut SeatConfig),
    ) -> Result<(), ConfigError> {
        let mut config = self.config_mut()?.clone();
        let seat = config
            .seats
            .iter_mut()
            .find(|s| s.name == seat_name)
            .ok_or_else(|| ConfigError::SeatNotFound(seat_name.to_string()))?;
        update(seat);
        self.save_config(config)
    }

    // ── Device mappings ───────────────────────────────────────────────────────

    /// Adds a mapping, replacing any existing mapping for the same device id.
    pub fn add_device_mapping(&mut self, mapping: DeviceMapping) -> Result<(), ConfigError> {
        let mut device_map = self.device_map_mut()?.clone();
        device_map.mappings.retain(|m| m.device_id != mapping.device_id);
        device_map.mappings.push(mapping);
        self.save_device_map(device_map)
    }

    /// Removes the mapping for `device_id`.  Saves even if there was none.
    pub fn remove_device_mapping(&mut self, device_id: &str) -> Result<(), ConfigError> {
        let mut device_map = self.device_map_mut()?.clone();
        device_map.mappings.retain(|m| m.device_id != device_id);
        self.save_device_map(device_map)
    }

    /// The seat name configured for a device.
    ///
    /// Exact `device_id` matches win over `vendor_product` matches; within each
    /// pass the highest priority wins, and ties go to the earliest mapping.
    pub fn seat_for_device(
        &mut self,
        device_id: &str,
        vendor_product: Option<&str>,
    ) -> Result<Option<String>, ConfigError> {
        let mut by_priority: Vec<&DeviceMapping> = self.device_map_mut()?.mappings.iter().collect();
        by_priority.sort_by_key(|m| std::cmp::Reverse(m.priority));

        let exact = by_priority.iter().find(|m| m.device_id == device_id);
        let by_model = || {
            vendor_product.and_then(|vp| by_priority.iter().find(|m| m.device_id == vp))
        };
        Ok(exact.or_else(by_model).map(|m| m.seat_name.clone()))
    }

    pub fn all_mappings(&mut self) -> Result<Vec<DeviceMapping>, ConfigError> {
        Ok(self.device_map_mut()?.mappings.clone())
    }

    /// Overwrites both files with the stock configuration and no mappings.
    pub fn reset_to_defaults(&mut self) -> Result<(), ConfigError> {
        self.save_config(create_default_config())?;
        self.save_device_map(DeviceMapConfig::default())
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn config_mut(&mut self) -> Result<&mut MpxConfig, ConfigError> {
        if self.config.is_none() {
            let mut config = read_toml_or_default::<MpxConfig>(&self.config_path())?;
            if config.seats.is_empty() {
                config.seats.push(SeatConfig::new(DEFAULT_SEAT_NAME));
            }
            self.config = Some(config);
        }
        Ok(self.config.get_or_insert_with(MpxConfig::default))
    }

    fn device_map_mut(&mut self) -> Result<&mut DeviceMapConfig, ConfigError> {
        if self.device_map.is_none() {
            self.device_map = Some(read_toml_or_default(&self.device_map_path())?);
        }
        Ok(self.device_map.get_or_insert_with(DeviceMapConfig::default))
    }
}

/// Reads a TOML file, falling back to `T::default()` when the file is absent
/// or malformed.
fn read_toml_or_default<T>(path: &Path) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(value) => {
                info!(path = %path.display(), "loaded config file");
                Ok(value)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "malformed config file, using defaults");
                Ok(T::default())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "config file not found, using defaults");
            Ok(T::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Serializes `value` to `path`, creating the directory if needed.
fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(value)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Platform directory ────────────────────────────────────────────────────────

/// Determines the platform-appropriate config directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("MpxWayland"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("mpx-wayland"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("MpxWayland")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// A store in a fresh, not-yet-created temp directory.
    fn temp_store() -> ConfigStore {
        ConfigStore::new(std::env::temp_dir().join(format!("mpx_test_{}", Uuid::new_v4())))
    }

    fn cleanup(store: &ConfigStore) {
        std::fs::remove_dir_all(store.dir()).ok();
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_default_config_has_seat0_only() {
        let cfg = MpxConfig::default();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.seats.len(), 1);
        assert_eq!(cfg.seats[0].name, "seat0");
        assert!(cfg.global.auto_assign_new_devices);
        assert_eq!(cfg.global.default_seat, "seat0");
    }

    #[test]
    fn test_create_default_config_has_two_seats() {
        let cfg = create_default_config();
        let names: Vec<_> = cfg.seats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["seat0", "aux"]);
    }

    #[test]
    fn test_seat_config_defaults() {
        let seat = SeatConfig::new("aux");
        assert!(seat.enabled);
        assert_eq!(seat.cursor_theme, "default");
        assert_eq!(seat.cursor_size, 24);
    }

    #[test]
    fn test_device_identifier_is_lowercase_padded_hex() {
        assert_eq!(device_identifier(0x046d, 0xc52b), "046d:c52b");
        assert_eq!(device_identifier(0x1, 0xAB), "0001:00ab");
    }

    // ── TOML parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_deserialize_minimal_toml_uses_defaults() {
        // Arrange
        let toml_str = r#"
[[seats]]
name = "aux"
"#;

        // Act
        let cfg: MpxConfig = toml::from_str(toml_str).expect("deserialize minimal");

        // Assert
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.global, GlobalConfig::default());
        assert_eq!(cfg.seats[0].cursor_size, 24);
        assert!(cfg.seats[0].enabled);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        // Arrange
        let mut cfg = create_default_config();
        cfg.global.verbose = true;
        cfg.seats[1].pointer_devices.push("046d:c52b".to_string());

        // Act
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: MpxConfig = toml::from_str(&toml_str).expect("deserialize");

        // Assert
        assert_eq!(cfg, restored);
    }

    // ── Store: load / save ────────────────────────────────────────────────────

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        let mut store = temp_store();
        let cfg = store.load_config().expect("missing file is not an error");
        assert_eq!(*cfg, MpxConfig::default());
        assert!(!store.config_path().exists());
    }

    #[test]
    fn test_load_config_falls_back_to_default_when_malformed() {
        // Arrange
        let mut store = temp_store();
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.config_path(), "[[[ not valid toml").unwrap();

        // Act
        let cfg = store.load_config().expect("malformed file is not an error").clone();

        // Assert
        assert_eq!(cfg, MpxConfig::default());
        cleanup(&store);
    }

    #[test]
    fn test_load_config_injects_default_seat_when_none_configured() {
        let mut store = temp_store();
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.config_path(), "version = 1\nseats = []\n").unwrap();

        let cfg = store.load_config().unwrap().clone();

        assert_eq!(cfg.seats.len(), 1);
        assert_eq!(cfg.seats[0].name, "seat0");
        cleanup(&store);
    }

    #[test]
    fn test_saved_config_is_visible_to_a_new_store() {
        // Arrange
        let mut store = temp_store();
        let mut cfg = create_default_config();
        cfg.global.auto_assign_new_devices = false;

        // Act
        store.save_config(cfg.clone()).expect("save");
        let mut reopened = ConfigStore::new(store.dir());

        // Assert
        assert_eq!(*reopened.load_config().unwrap(), cfg);
        cleanup(&store);
    }

    #[test]
    fn test_peek_verbose_reads_flag_without_caching() {
        let mut store = temp_store();
        assert!(!store.peek_verbose());

        let mut cfg = MpxConfig::default();
        cfg.global.verbose = true;
        store.save_config(cfg).unwrap();

        assert!(ConfigStore::new(store.dir()).peek_verbose());
        cleanup(&store);
    }

    // ── Store: seats ──────────────────────────────────────────────────────────

    #[test]
    fn test_add_seat_rejects_duplicates() {
        let mut store = temp_store();
        store.add_seat(SeatConfig::new("aux")).unwrap();

        let err = store.add_seat(SeatConfig::new("aux")).unwrap_err();

        assert!(matches!(err, ConfigError::DuplicateSeat(name) if name == "aux"));
        assert!(store.get_seat_config("aux").unwrap().is_some());
        cleanup(&store);
    }

    #[test]
    fn test_remove_seat_protects_default_and_reports_unknown() {
        let mut store = temp_store();
        store.add_seat(SeatConfig::new("aux")).unwrap();

        assert!(matches!(store.remove_seat("seat0"), Err(ConfigError::DefaultSeat(_))));
        assert!(matches!(store.remove_seat("ghost"), Err(ConfigError::SeatNotFound(_))));

        store.remove_seat("aux").unwrap();
        assert!(store.get_seat_config("aux").unwrap().is_none());
        cleanup(&store);
    }

    #[test]
    fn test_update_seat_persists_changes() {
        let mut store = temp_store();
        store.add_seat(SeatConfig::new("aux")).unwrap();

        store
            .update_seat("aux", |seat| {
                seat.cursor_size = 48;
                seat.enabled = false;
            })
            .unwrap();

        let mut reopened = ConfigStore::new(store.dir());
        let seat = reopened.get_seat_config("aux").unwrap().unwrap();
        assert_eq!(seat.cursor_size, 48);
        assert!(!seat.enabled);
        assert!(matches!(
            store.update_seat("ghost", |_| {}),
            Err(ConfigError::SeatNotFound(_))
        ));
        cleanup(&store);
    }

    // ── Store: device mappings ────────────────────────────────────────────────

    #[test]
    fn test_add_device_mapping_replaces_existing_entry() {
        let mut store = temp_store();
        store.add_device_mapping(DeviceMapping::new("mouse1", "seat0")).unwrap();
        store.add_device_mapping(DeviceMapping::new("mouse1", "aux")).unwrap();

        let mappings = store.all_mappings().unwrap();

        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].seat_name, "aux");
        cleanup(&store);
    }

    #[test]
    fn test_seat_for_device_prefers_exact_id_then_vendor_product() {
        // Arrange
        let mut store = temp_store();
        store
            .add_device_mapping(DeviceMapping::new("046d:c52b", "aux").with_priority(10))
            .unwrap();
        store.add_device_mapping(DeviceMapping::new("event7", "seat0")).unwrap();

        // Act / Assert
        assert_eq!(
            store.seat_for_device("event7", Some("046d:c52b")).unwrap().as_deref(),
            Some("seat0")
        );
        assert_eq!(
            store.seat_for_device("event9", Some("046d:c52b")).unwrap().as_deref(),
            Some("aux")
        );
        assert_eq!(store.seat_for_device("event9", None).unwrap(), None);
        cleanup(&store);
    }

    #[test]
    fn test_seat_for_device_higher_priority_wins() {
        let mut store = temp_store();
        let mut map = DeviceMapConfig::default();
        map.mappings.push(DeviceMapping::new("046d:c52b", "low").with_priority(1));
        map.mappings.push(DeviceMapping::new("046d:c52b", "high").with_priority(5));
        store.save_device_map(map).unwrap();

        let seat = store.seat_for_device("event3", Some("046d:c52b")).unwrap();

        assert_eq!(seat.as_deref(), Some("high"));
        cleanup(&store);
    }

    #[test]
    fn test_remove_device_mapping() {
        let mut store = temp_store();
        store.add_device_mapping(DeviceMapping::new("mouse1", "aux")).unwrap();
        store.remove_device_mapping("mouse1").unwrap();
        assert!(store.all_mappings().unwrap().is_empty());
        cleanup(&store);
    }

    #[test]
    fn test_reset_to_defaults_overwrites_both_files() {
        // Arrange
        let mut store = temp_store();
        store.add_seat(SeatConfig::new("gaming")).unwrap();
        store.add_device_mapping(DeviceMapping::new("mouse1", "gaming")).unwrap();

        // Act
        store.reset_to_defaults().unwrap();

        // Assert
        let mut reopened = ConfigStore::new(store.dir());
        assert_eq!(*reopened.load_config().unwrap(), create_default_config());
        assert!(reopened.all_mappings().unwrap().is_empty());
        cleanup(&store);
    }

    // ── config_dir path formation ─────────────────────────────────────────────

    #[test]
    fn test_platform_config_dir_ends_with_app_directory() {
        if let Some(dir) = platform_config_dir() {
            let last = dir.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            assert!(last == "mpx-wayland" || last == "MpxWayland", "got {dir:?}");
        }
        // None is acceptable in a stripped environment with no HOME.
    }
}
