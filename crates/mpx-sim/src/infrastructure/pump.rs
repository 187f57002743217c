//! Async input pump: raw device events in, seat routing out.
//!
//! # Threading model (for beginners)
//!
//! ```text
//! backend thread                 tokio task
//! ──────────────                 ──────────
//! InputSource::start()
//!   std::mpsc::Receiver ──► forward_source() ──► tokio::mpsc ──► InputPump::run()
//!                          (dedicated thread,                    SharedRegistry::with(route)
//!                           blocking_send)
//! ```
//!
//! Backends block on hardware, so they live on ordinary threads.  The pump
//! is a single Tokio task that takes events one at a time and routes each
//! under the registry lock, which keeps the per-device order intact.  Other
//! tasks can hold clones of the same [`SharedRegistry`] to create seats or
//! reassign devices while the pump runs.

use std::thread::{self, JoinHandle};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

use mpx_core::SharedRegistry;

use super::input_source::{InputSource, RawInputEvent, SourceError};

/// Default capacity of the pump's channel.
pub const DEFAULT_PUMP_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum PumpError {
    #[error("input source failed to start: {0}")]
    Source(#[from] SourceError),
    #[error("failed to spawn forwarding thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Counters reported when the pump shuts down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub received: u64,
    /// Events a seat accepted.
    pub routed: u64,
    /// Events the registry dropped (unknown or unassigned device, inactive seat).
    pub dropped: u64,
}

/// Drains raw events into a registry.
#[derive(Debug, Clone)]
pub struct InputPump {
    registry: SharedRegistry,
}

impl InputPump {
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    /// Routes every event from `rx` until all senders are dropped.
    pub async fn run(self, mut rx: mpsc::Receiver<RawInputEvent>) -> PumpStats {
        let mut stats = PumpStats::default();
        while let Some(event) = rx.recv().await {
            stats.received += 1;
            match self.registry.with(|registry| event.route(registry)) {
                Some(_) => stats.routed += 1,
                None => {
                    stats.dropped += 1;
                    debug!(device_id = event.device_id(), "event dropped by registry");
                }
            }
        }
        info!(
            received = stats.received,
            routed = stats.routed,
            dropped = stats.dropped,
            "input pump stopped"
        );
        stats
    }

    /// Spawns [`run`](Self::run) on the current Tokio runtime.
    ///
    /// Returns the sending half of the pump's channel and the task handle.
    /// The task finishes once every clone of the sender is dropped.
    pub fn spawn(
        self,
        capacity: usize,
    ) -> (mpsc::Sender<RawInputEvent>, tokio::task::JoinHandle<PumpStats>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(self.run(rx));
        (tx, handle)
    }
}

/// Starts `source` and forwards its events into `tx` on a dedicated thread.
///
/// The thread ends when the source stops or the pump goes away, and returns
/// how many events it forwarded.
pub fn forward_source(
    source: &dyn InputSource,
    tx: mpsc::Sender<RawInputEvent>,
) -> Result<JoinHandle<u64>, PumpError> {
    let rx = source.start()?;
    let handle = thread::Builder::new()
        .name("mpx-input-forward".to_string())
        .spawn(move || {
            let mut forwarded: u64 = 0;
            for event in rx {
                if tx.blocking_send(event).is_err() {
                    // Pump dropped its receiver – shutting down.
                    break;
                }
                forwarded += 1;
            }
            debug!(forwarded, "input forwarder finished");
            forwarded
        })?;
    Ok(handle)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
