// src/common/response/mod.rs

pub mod extract;
pub mod metadata;
pub mod packet;

pub use extract::{extract_field, extract_latest, extractor_for, Extractor};
pub use metadata::{extract_metadata, fill_metadata, with_mandatory_keys, MANDATORY_KEYS, MANUFACTURER_KEY, SENSOR_ID_KEY};
pub use packet::split_packet;
