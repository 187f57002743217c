//! A compositor stand-in that drives a [`SeatRegistry`] with virtual hardware.
//!
//! # What is simulated (for beginners)
//!
//! A real Wayland compositor receives events from libinput, asks the seat
//! registry which seat each event belongs to and then delivers it to the
//! focused client window of that seat.  `SimulatedCompositor` keeps the middle
//! step real and fakes the two ends:
//!
//! ```text
//! scenario step ──► VirtualDevice ──► SeatRegistry::route_*() ──► seat cursor
//!                                         │
//!                    VirtualWindow ◄──────┘ (grabs, focus)
//! ```
//!
//! Every simulated action is appended to an event log and handed to any
//! registered observers, so tests can assert on *what happened* as well as on
//! the resulting registry state.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use mpx_core::{
    DeviceId, DisplayBounds, GrabMode, ListenerError, Position, RegistryError, Seat, SeatId,
    SeatRegistry,
};

use crate::application::render;
use crate::domain::{virtual_device::VirtualDevice, window::VirtualWindow};

pub const DEFAULT_DISPLAY_WIDTH: u32 = 1920;
pub const DEFAULT_DISPLAY_HEIGHT: u32 = 1080;

// ── Simulation events ─────────────────────────────────────────────────────────

/// What the compositor did on behalf of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationEventKind {
    DeviceConnected,
    DeviceDisconnected,
    PointerMove,
    PointerButton,
    PointerAxis,
    KeyboardKey,
    GrabRequest,
    GrabRelease,
    WindowFocus,
}

/// One entry of the compositor's event log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationEvent {
    /// Position in the log, starting at 0.
    pub seq: u64,
    pub kind: SimulationEventKind,
    pub device_id: Option<DeviceId>,
    pub data: BTreeMap<String, Value>,
}

impl SimulationEvent {
    fn new(kind: SimulationEventKind) -> Self {
        Self {
            seq: 0,
            kind,
            device_id: None,
            data: BTreeMap::new(),
        }
    }

    fn device(mut self, device_id: &str) -> Self {
        self.device_id = Some(device_id.to_string());
        self
    }

    fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Callback invoked for every [`SimulationEvent`].  A returned error is
/// logged and does not stop the simulation.
pub type Observer = Box<dyn Fn(&SimulationEvent) -> Result<(), ListenerError> + Send>;

/// Pointer motion as a scenario describes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Move by a delta.
    Relative { dx: f64, dy: f64 },
    /// Move to a point.  Converted into the delta from the virtual device's own
    /// position before routing, because the registry only accepts deltas.
    Absolute { x: f64, y: f64 },
}

fn seat_label(seat_id: Option<SeatId>) -> Value {
    seat_id.map(|id| id.to_string()).into()
}

/// Which parts of one seat's state name a given window.
#[derive(Debug, Clone, Copy)]
struct WindowClaims {
    pointer_grab: bool,
    keyboard_grab: bool,
    pointer_focus: bool,
    keyboard_focus: bool,
}

impl WindowClaims {
    fn of(seat: &Seat, window_id: &str) -> Self {
        let names = |value: Option<&str>| value == Some(window_id);
        Self {
            pointer_grab: names(seat.pointer_grab.as_ref().map(|g| g.client_id.as_str())),
            keyboard_grab: names(seat.keyboard_grab.as_ref().map(|g| g.client_id.as_str())),
            pointer_focus: names(seat.focus.pointer_focus.as_deref()),
            keyboard_focus: names(seat.focus.keyboard_focus.as_deref()),
        }
    }
}

// ── SimulatedCompositor ───────────────────────────────────────────────────────

/// Owns a registry plus the virtual devices and windows that exercise it.
pub struct SimulatedCompositor {
    registry: SeatRegistry,
    devices: Vec<VirtualDevice>,
    /// Stacking order: the last window is the topmost.
    windows: Vec<VirtualWindow>,
    event_log: Vec<SimulationEvent>,
    observers: Vec<Observer>,
}

impl fmt::Debug for SimulatedCompositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedCompositor")
            .field("registry", &self.registry)
            .field("devices", &self.devices)
            .field("windows", &self.windows)
            .field("events", &self.event_log.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for SimulatedCompositor {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_WIDTH, DEFAULT_DISPLAY_HEIGHT)
    }
}

impl SimulatedCompositor {
    /// Creates a compositor with a single `width × height` output at the
    /// origin and a registry holding only the default seat.
    pub fn new(width: u32, height: u32) -> Self {
        let mut registry = SeatRegistry::new();
        registry.set_display_bounds(DisplayBounds::with_size(width, height));
        info!(width, height, "simulated compositor ready");
        Self {
            registry,
            devices: Vec::new(),
            windows: Vec::new(),
            event_log: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn registry(&self) -> &SeatRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SeatRegistry {
        &mut self.registry
    }

    /// Id of the first seat called `name`.
    pub fn seat_id(&self, name: &str) -> Option<SeatId> {
        self.registry.get_seat_by_name(name).map(|seat| seat.id)
    }

    pub fn display_size(&self) -> (u32, u32) {
        let bounds = self.registry.display_bounds();
        (bounds.width, bounds.height)
    }

    // ── Event log ─────────────────────────────────────────────────────────

    pub fn add_observer(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    pub fn events(&self) -> &[SimulationEvent] {
        &self.event_log
    }

    pub fn clear_events(&mut self) {
        self.event_log.clear();
    }

    fn record(&mut self, mut event: SimulationEvent) {
        event.seq = self.event_log.len() as u64;
        for observer in &self.observers {
            if let Err(e) = observer(&event) {
                error!(kind = ?event.kind, "simulation observer failed: {e}");
            }
        }
        self.event_log.push(event);
    }

    // ── Devices ───────────────────────────────────────────────────────────

    pub fn devices(&self) -> impl Iterator<Item = &VirtualDevice> + '_ {
        self.devices.iter()
    }

    pub fn device(&self, device_id: &str) -> Option<&VirtualDevice> {
        self.devices.iter().find(|d| d.id == device_id)
    }

    /// Plugs a device in: registers it and, when a seat called `seat_name`
    /// exists, assigns it there.  Otherwise the device stays unassigned.
    ///
    /// Reconnecting a known id replaces the stored device in place.
    ///
    /// Returns the seat the device ended up on.
    pub fn connect_device(
        &mut self,
        mut device: VirtualDevice,
        seat_name: &str,
    ) -> Result<Option<SeatId>, RegistryError> {
        device.is_connected = true;
        self.registry.register_device(device.to_input_device());

        let seat_id = self.seat_id(seat_name);
        match seat_id {
            Some(seat_id) => self.registry.assign_device(&device.id, seat_id, false)?,
            None => warn!(
                device_id = %device.id,
                seat_name, "seat does not exist; device left unassigned"
            ),
        }

        info!(device_id = %device.id, device_name = %device.name, seat_name, "connected device");
        let event = SimulationEvent::new(SimulationEventKind::DeviceConnected)
            .device(&device.id)
            .with("seat", seat_name);

        match self.devices.iter_mut().find(|d| d.id == device.id) {
            Some(slot) => *slot = device,
            None => self.devices.push(device),
        }
        self.record(event);
        Ok(seat_id)
    }

    /// Unplugs a device.  The virtual device is kept (marked disconnected) so
    /// it can be reconnected; the registry forgets it.
    ///
    /// Returns `false` for an id the compositor has never seen.
    pub fn disconnect_device(&mut self, device_id: &str) -> Result<bool, RegistryError> {
        let Some(device) = self.devices.iter_mut().find(|d| d.id == device_id) else {
            return Ok(false);
        };
        if device.is_connected {
            device.is_connected = false;
            device.buttons_pressed.clear();
            device.keys_pressed.clear();
            self.registry.unregister_device(device_id)?;
            info!(device_id, "disconnected device");
        }
        self.record(SimulationEvent::new(SimulationEventKind::DeviceDisconnected).device(device_id));
        Ok(true)
    }

    // ── Windows ───────────────────────────────────────────────────────────

    pub fn windows(&self) -> impl Iterator<Item = &VirtualWindow> + '_ {
        self.windows.iter()
    }

    pub fn window(&self, window_id: &str) -> Option<&VirtualWindow> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    /// Maps a window.  A window with an existing id is replaced without
    /// changing its stacking position.
    pub fn create_window(&mut self, window: VirtualWindow) -> &VirtualWindow {
        info!(window_id = %window.id, title = %window.title, x = window.x, y = window.y, "created window");
        let index = match self.windows.iter().position(|w| w.id == window.id) {
            Some(index) => {
                self.windows[index] = window;
                index
            }
            None => {
                self.windows.push(window);
                self.windows.len() - 1
            }
        };
        &self.windows[index]
    }

    /// Unmaps a window, ending any grab it holds and clearing any focus that
    /// names it.
    pub fn destroy_window(&mut self, window_id: &str) -> Option<VirtualWindow> {
        let index = self.windows.iter().position(|w| w.id == window_id)?;
        let window = self.windows.remove(index);

        let claims: Vec<(SeatId, WindowClaims)> = self
            .registry
            .seats()
            .map(|seat| (seat.id, WindowClaims::of(seat, window_id)))
            .collect();
        for (seat_id, claims) in claims {
            if let Err(e) = self.drop_claims(seat_id, claims) {
                warn!(%seat_id, window_id, "failed to clean up after window: {e}");
            }
        }

        info!(window_id, title = %window.title, "destroyed window");
        Some(window)
    }

    /// The topmost window containing `pos`.
    pub fn window_at(&self, pos: Position) -> Option<&VirtualWindow> {
        self.windows.iter().rev().find(|w| w.contains(pos))
    }

    fn drop_claims(&mut self, seat_id: SeatId, claims: WindowClaims) -> Result<(), RegistryError> {
        if claims.pointer_grab {
            self.registry.release_pointer_grab(seat_id)?;
        }
        if claims.keyboard_grab {
            self.registry.release_keyboard_grab(seat_id)?;
        }
        if claims.pointer_focus {
            self.registry.set_pointer_focus(seat_id, None)?;
        }
        if claims.keyboard_focus {
            self.registry.set_keyboard_focus(seat_id, None)?;
        }
        Ok(())
    }

    // ── Input ─────────────────────────────────────────────────────────────

    /// Moves the pointer of the seat `device_id` is assigned to.
    ///
    /// Returns the seat that received the motion, `None` for an unknown or
    /// unassigned device or an inactive seat.
    pub fn move_pointer(&mut self, device_id: &str, motion: Motion) -> Option<SeatId> {
        let device = self.devices.iter_mut().find(|d| d.id == device_id)?;
        let (dx, dy, target) = match motion {
            Motion::Relative { dx, dy } => (dx, dy, device.position.translate(dx, dy)),
            Motion::Absolute { x, y } => (x - device.position.x, y - device.position.y, Position::new(x, y)),
        };
        // The registry drops non-finite motion; the device must not keep it either.
        if target.is_finite() {
            device.position = target;
        }

        let seat_id = self.registry.route_pointer_motion(device_id, dx, dy);
        debug!(device_id, dx, dy, routed = seat_id.is_some(), "simulated motion");
        self.record(
            SimulationEvent::new(SimulationEventKind::PointerMove)
                .device(device_id)
                .with("dx", dx)
                .with("dy", dy)
                .with("seat_id", seat_label(seat_id)),
        );
        seat_id
    }

    /// Presses or releases a pointer button (`1` left, `2` middle, `3` right).
    pub fn click_button(&mut self, device_id: &str, button: u32, pressed: bool) -> Option<SeatId> {
        let device = self.devices.iter_mut().find(|d| d.id == device_id)?;
        if pressed {
            device.buttons_pressed.insert(button);
        } else {
            device.buttons_pressed.remove(&button);
        }

        let seat_id = self.registry.route_pointer_button(device_id, button, pressed);
        self.record(
            SimulationEvent::new(SimulationEventKind::PointerButton)
                .device(device_id)
                .with("button", button)
                .with("pressed", pressed)
                .with("seat_id", seat_label(seat_id)),
        );
        seat_id
    }

    pub fn scroll(&mut self, device_id: &str, horizontal: f64, vertical: f64) -> Option<SeatId> {
        self.device(device_id)?;
        let seat_id = self.registry.route_pointer_axis(device_id, horizontal, vertical);
        self.record(
            SimulationEvent::new(SimulationEventKind::PointerAxis)
                .device(device_id)
                .with("horizontal", horizontal)
                .with("vertical", vertical)
                .with("seat_id", seat_label(seat_id)),
        );
        seat_id
    }

    pub fn press_key(&mut self, device_id: &str, key: u32, pressed: bool) -> Option<SeatId> {
        let device = self.devices.iter_mut().find(|d| d.id == device_id)?;
        if pressed {
            device.keys_pressed.insert(key);
        } else {
            device.keys_pressed.remove(&key);
        }

        let seat_id = self.registry.route_keyboard_key(device_id, key, pressed);
        self.record(
            SimulationEvent::new(SimulationEventKind::KeyboardKey)
                .device(device_id)
                .with("key", key)
                .with("pressed", pressed)
                .with("seat_id", seat_label(seat_id)),
        );
        seat_id
    }

    // ── Grabs and focus ───────────────────────────────────────────────────

    /// A window asks for the pointer of one seat.  The window id is used as
    /// both client and surface id.
    ///
    /// Returns `Ok(false)` for an unknown window or when the registry denies
    /// the grab.
    pub fn request_grab(
        &mut self,
        window_id: &str,
        seat_id: SeatId,
        mode: GrabMode,
    ) -> Result<bool, RegistryError> {
        let Some(index) = self.windows.iter().position(|w| w.id == window_id) else {
            warn!(window_id, "grab requested by unknown window");
            return Ok(false);
        };

        let granted = self
            .registry
            .request_pointer_grab(seat_id, window_id, mode, Some(window_id))?;
        if granted {
            self.windows[index].set_grab(Some(mode));
        }

        self.record(
            SimulationEvent::new(SimulationEventKind::GrabRequest)
                .with("window_id", window_id)
                .with("seat_id", seat_id.to_string())
                .with("mode", mode.as_str())
                .with("granted", granted),
        );
        Ok(granted)
    }

    /// Ends the pointer grab on `seat_id`.  The window's grab flag is cleared
    /// once no seat's pointer is grabbed by it any more.
    pub fn release_grab(&mut self, window_id: &str, seat_id: SeatId) -> Result<(), RegistryError> {
        self.registry.release_pointer_grab(seat_id)?;

        let still_grabbing = self.registry.seats().any(|seat| {
            seat.pointer_grab
                .as_ref()
                .is_some_and(|grab| grab.client_id == window_id)
        });
        if !still_grabbing {
            if let Some(window) = self.windows.iter_mut().find(|w| w.id == window_id) {
                window.set_grab(None);
            }
        }

        self.record(
            SimulationEvent::new(SimulationEventKind::GrabRelease)
                .with("window_id", window_id)
                .with("seat_id", seat_id.to_string()),
        );
        Ok(())
    }

    /// Gives `window_id` both pointer and keyboard focus of `seat_id`.
    ///
    /// Returns `Ok(false)` for an unknown window.
    pub fn focus_window(&mut self, window_id: &str, seat_id: SeatId) -> Result<bool, RegistryError> {
        if self.window(window_id).is_none() {
            return Ok(false);
        }
        self.registry.set_pointer_focus(seat_id, Some(window_id))?;
        self.registry.set_keyboard_focus(seat_id, Some(window_id))?;

        for window in &mut self.windows {
            window.has_focus = self
                .registry
                .seats()
                .any(|seat| seat.focus.keyboard_focus.as_deref() == Some(window.id.as_str()));
        }

        self.record(
            SimulationEvent::new(SimulationEventKind::WindowFocus)
                .with("window_id", window_id)
                .with("seat_id", seat_id.to_string()),
        );
        Ok(true)
    }

    // ── Presentation ──────────────────────────────────────────────────────

    /// Draws the display, windows and seat cursors as `width × height` text
    /// followed by a legend line.
    pub fn render_ascii(&self, width: usize, height: usize) -> String {
        render::render_ascii(self, width, height)
    }

    pub fn state_summary(&self) -> String {
        render::state_summary(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
