//! Registry event notification.
//!
//! Every state-changing registry operation publishes exactly one
//! [`RegistryEvent`] to each registered [`EventSink`], synchronously and in
//! registration order.  Sinks are injected into the registry instance; there
//! is no global listener list.
//!
//! # Failure isolation
//!
//! A sink that returns `Err` (or panics) is logged and skipped.  Delivery to the
//! remaining sinks continues and the registry operation that triggered the
//! event still succeeds.

use std::collections::BTreeMap;
use std::sync::{mpsc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{device::DeviceId, seat::SeatId};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    SeatCreated,
    SeatDestroyed,
    SeatStateChanged,
    DeviceAdded,
    DeviceRemoved,
    DeviceAssigned,
    DeviceUnassigned,
    PointerMotion,
    PointerButton,
    PointerAxis,
    KeyboardKey,
    GrabStarted,
    GrabEnded,
    FocusChanged,
}

/// One registry notification.
///
/// `data` is an open key/value payload; the keys used by each kind are listed
/// on the registry operation that emits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEvent {
    pub kind: EventKind,
    pub seat_id: Option<SeatId>,
    pub device_id: Option<DeviceId>,
    pub data: BTreeMap<String, Value>,
}

impl RegistryEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            seat_id: None,
            device_id: None,
            data: BTreeMap::new(),
        }
    }

    pub fn seat(mut self, seat_id: SeatId) -> Self {
        self.seat_id = Some(seat_id);
        self
    }

    pub fn device(mut self, device_id: impl Into<DeviceId>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Adds one payload entry.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(Value::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.data.get(key).and_then(Value::as_bool)
    }
}

/// Error a sink reports when it could not handle an event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("event listener failed: {0}")]
pub struct ListenerError(pub String);

/// Receiver of registry events.
///
/// Closures of the form `Fn(&RegistryEvent) -> Result<(), ListenerError>`
/// implement this trait directly.
#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &RegistryEvent) -> Result<(), ListenerError>;
}

impl<F> EventSink for F
where
    F: Fn(&RegistryEvent) -> Result<(), ListenerError> + Send + Sync,
{
    fn publish(&self, event: &RegistryEvent) -> Result<(), ListenerError> {
        self(event)
    }
}

/// A sink that stores every event it receives.
///
/// Used by tests and by the simulator's event log.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RegistryEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything received so far.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.lock().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.lock().iter().map(|e| e.kind).collect()
    }

    pub fn last(&self) -> Option<RegistryEvent> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RegistryEvent>> {
        // A panicking reader cannot leave the Vec half-written, so a poisoned
        // lock is still safe to use.
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &RegistryEvent) -> Result<(), ListenerError> {
        self.lock().push(event.clone());
        Ok(())
    }
}

/// A sink that forwards events into an `mpsc` channel.
///
/// Lets a consumer on another thread process events without running inside
/// the registry call.  Channel order equals publish order.
#[derive(Debug)]
pub struct ChannelSink {
    sender: mpsc::Sender<RegistryEvent>,
}

impl ChannelSink {
    /// Creates a sink plus the receiving end of its channel.
    pub fn new() -> (Self, mpsc::Receiver<RegistryEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, event: &RegistryEvent) -> Result<(), ListenerError> {
        self.sender
            .send(event.clone())
            .map_err(|_| ListenerError("event receiver has been dropped".to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_builder_sets_ids_and_payload() {
        let seat = Uuid::new_v4();
        let event = RegistryEvent::new(EventKind::PointerMotion)
            .seat(seat)
            .device("mouse1")
            .with("x", 10.5)
            .with("pressed", true)
            .with("name", "aux");

        assert_eq!(event.seat_id, Some(seat));
        assert_eq!(event.device_id.as_deref(), Some("mouse1"));
        assert_eq!(event.get_f64("x"), Some(10.5));
        assert_eq!(event.get_bool("pressed"), Some(true));
        assert_eq!(event.get_str("name"), Some("aux"));
        assert!(event.get("missing").is_none());
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.publish(&RegistryEvent::new(EventKind::SeatCreated)).unwrap();
        sink.publish(&RegistryEvent::new(EventKind::DeviceAdded)).unwrap();

        assert_eq!(sink.kinds(), vec![EventKind::SeatCreated, EventKind::DeviceAdded]);
        assert_eq!(sink.last().map(|e| e.kind), Some(EventKind::DeviceAdded));

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_closure_is_an_event_sink() {
        let sink = |event: &RegistryEvent| {
            if event.kind == EventKind::GrabStarted {
                Err(ListenerError("boom".to_string()))
            } else {
                Ok(())
            }
        };
        assert!(sink.publish(&RegistryEvent::new(EventKind::GrabEnded)).is_ok());
        assert!(sink.publish(&RegistryEvent::new(EventKind::GrabStarted)).is_err());
    }

    #[test]
    fn test_channel_sink_forwards_and_reports_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        sink.publish(&RegistryEvent::new(EventKind::KeyboardKey)).unwrap();
        assert_eq!(rx.recv().unwrap().kind, EventKind::KeyboardKey);

        drop(rx);
        let result = sink.publish(&RegistryEvent::new(EventKind::KeyboardKey));
        assert!(result.is_err());
    }

    #[test]
    fn test_event_serializes_to_json() {
        let event = RegistryEvent::new(EventKind::SeatCreated).with("name", "aux");
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"SeatCreated\""));
        assert!(json.contains("\"aux\""));
    }
}
