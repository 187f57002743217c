//! Simulation entities: the devices and windows a scenario manipulates.
//!
//! Neither type touches the registry directly; the
//! [`SimulatedCompositor`](crate::application::compositor::SimulatedCompositor)
//! keeps them in step with it.

pub mod virtual_device;
pub mod window;
