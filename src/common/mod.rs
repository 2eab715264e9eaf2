// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod error;
pub mod hal_traits;
pub mod kind;
pub mod range;
pub mod range_table;
pub mod reading;
pub mod request;
pub mod response;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

pub use error::{ConfigError, FieldError, LinkError};

pub use hal_traits::{LinkInstant, LinkTimer, SerialLink};

pub use kind::{SensorKind, SensorSet, NUM_DISCRETE};

pub use range::{is_in_range, linear_map, normalize_value, Range, RangeValue};
pub use range_table::{HardwareRanges, RangeTable, RangeUpdate, STANDARD_RANGES};

pub use reading::{DiscreteResult, GeoLocation, Measurement, SampleBuffer, SensorReading, Timestamp};

pub use request::{Delimiters, RequestSpec, StreamHandshake, StreamSpec, METADATA_FLAG};

// Timing constants stay under common::timing::*
