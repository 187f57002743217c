//! Thread-safe handle to a [`SeatRegistry`].
//!
//! The registry itself is a plain `&mut self` API.  Callers that need to reach
//! it from several threads or tasks (an input pump plus a control surface, for
//! example) wrap it in a `SharedRegistry`, which serializes every operation
//! behind one mutex.  Each call therefore appears atomic to every other caller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::seat_registry::SeatRegistry;

/// Cloneable, `Send + Sync` handle to one registry.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<SeatRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: SeatRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Locks the registry for the duration of the returned guard.
    ///
    /// Registry operations validate before mutating, so a panic inside a
    /// caller's critical section cannot leave a half-applied operation behind.
    /// A poisoned lock is therefore recovered instead of propagated.
    pub fn lock(&self) -> MutexGuard<'_, SeatRegistry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access and returns its result.
    pub fn with<R>(&self, f: impl FnOnce(&mut SeatRegistry) -> R) -> R {
        f(&mut self.lock())
    }
}

impl From<SeatRegistry> for SharedRegistry {
    fn from(registry: SeatRegistry) -> Self {
        Self::new(registry)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::InputDevice;
    use std::thread;

    #[test]
    fn test_concurrent_motion_is_serialized() {
        let shared = SharedRegistry::new(SeatRegistry::new());
        shared.with(|r| {
            r.register_device(InputDevice::pointer("mouse1", "Mouse"));
            r.auto_assign_device("mouse1")
        })
        .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        shared.with(|r| r.route_pointer_motion("mouse1", 1.0, 1.0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let position = shared.lock().default_seat().cursor.position();
        assert_eq!((position.x, position.y), (400.0, 400.0));
    }

    #[test]
    fn test_clones_share_one_registry() {
        let a = SharedRegistry::default();
        let b = a.clone();
        a.with(|r| r.create_seat("aux"));
        assert_eq!(b.lock().seat_count(), 2);
    }
}
