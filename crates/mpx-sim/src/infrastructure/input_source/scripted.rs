//! An input source that replays a fixed script.
//!
//! Used by the demo binary and by tests to inject synthetic
//! [`RawInputEvent`]s without real hardware.

use std::sync::{
    mpsc::{self, Sender},
    Mutex, MutexGuard, PoisonError,
};

use super::{InputSource, RawInputEvent, SourceError};

/// Replays its script on every [`start`](InputSource::start); further events
/// can be pushed with [`inject_event`](Self::inject_event) until
/// [`stop`](InputSource::stop).
#[derive(Debug, Default)]
pub struct ScriptedInputSource {
    script: Vec<RawInputEvent>,
    sender: Mutex<Option<Sender<RawInputEvent>>>,
}

impl ScriptedInputSource {
    pub fn new(script: impl IntoIterator<Item = RawInputEvent>) -> Self {
        Self {
            script: script.into_iter().collect(),
            sender: Mutex::new(None),
        }
    }

    pub fn script(&self) -> &[RawInputEvent] {
        &self.script
    }

    /// Sends one more event after the script.
    ///
    /// # Errors
    ///
    /// [`SourceError::NotStarted`] before `start()`, [`SourceError::Stopped`]
    /// once the receiver has been dropped.
    pub fn inject_event(&self, event: RawInputEvent) -> Result<(), SourceError> {
        let guard = self.sender();
        let sender = guard.as_ref().ok_or(SourceError::NotStarted)?;
        sender.send(event).map_err(|_| SourceError::Stopped)
    }

    pub fn is_running(&self) -> bool {
        self.sender().is_some()
    }

    fn sender(&self) -> MutexGuard<'_, Option<Sender<RawInputEvent>>> {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl InputSource for ScriptedInputSource {
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, SourceError> {
        let mut guard = self.sender();
        if guard.is_some() {
            return Err(SourceError::AlreadyStarted);
        }

        let (tx, rx) = mpsc::channel();
        for event in &self.script {
            tx.send(event.clone()).map_err(|_| SourceError::Stopped)?;
        }
        *guard = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Dropping the sender closes the channel.
        *self.sender() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion(dx: f64) -> RawInputEvent {
        RawInputEvent::Motion {
            device_id: "mouse1".into(),
            dx,
            dy: 0.0,
        }
    }

    #[test]
    fn test_start_replays_script_in_order() {
        // Arrange
        let source = ScriptedInputSource::new([motion(1.0), motion(2.0), motion(3.0)]);

        // Act
        let rx = source.start().unwrap();
        source.stop();

        // Assert
        let received: Vec<RawInputEvent> = rx.iter().collect();
        assert_eq!(received, vec![motion(1.0), motion(2.0), motion(3.0)]);
    }

    #[test]
    fn test_inject_after_start_follows_script() {
        // Arrange
        let source = ScriptedInputSource::new([motion(1.0)]);
        let rx = source.start().unwrap();

        // Act
        source.inject_event(motion(9.0)).unwrap();

        // Assert
        assert_eq!(rx.recv().unwrap(), motion(1.0));
        assert_eq!(rx.recv().unwrap(), motion(9.0));
    }

    #[test]
    fn test_inject_before_start_fails() {
        let source = ScriptedInputSource::default();
        let result = source.inject_event(motion(1.0));
        assert!(matches!(result, Err(SourceError::NotStarted)));
    }

    #[test]
    fn test_second_start_is_rejected_until_stopped() {
        let source = ScriptedInputSource::new([motion(1.0)]);
        let _rx = source.start().unwrap();

        assert!(matches!(source.start(), Err(SourceError::AlreadyStarted)));

        source.stop();
        assert!(!source.is_running());
        assert!(source.start().is_ok());
    }

    #[test]
    fn test_stop_closes_channel() {
        // Arrange
        let source = ScriptedInputSource::default();
        let rx = source.start().unwrap();

        // Act
        source.stop();

        // Assert
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_inject_after_receiver_dropped_reports_stopped() {
        let source = ScriptedInputSource::default();
        drop(source.start().unwrap());

        let result = source.inject_event(motion(1.0));
        assert!(matches!(result, Err(SourceError::Stopped)));
    }
}
