// src/lib.rs

//! Drivers for line-oriented physiological sensor hardware: request framing,
//! response decoding, a data-assurance retry loop for discrete sensors, a
//! start/stop stream handshake for continuous ECG, and normalization of
//! hardware ranges onto standard ones.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod common;
pub mod hub;
pub mod recorder;
pub mod transport;

// Re-export key types for convenience
pub use common::{ConfigError, LinkError, SensorKind, SensorSet};
pub use hub::{HubConfig, Overrides, SensorHub};
pub use transport::TransportPort;
