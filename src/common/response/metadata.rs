// src/common/response/metadata.rs

use super::packet::split_packet;
use crate::common::request::Delimiters;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Key of the hardware's own sensor identifier.
pub const SENSOR_ID_KEY: &str = "SensorId";
/// Key of the sensor manufacturer.
pub const MANUFACTURER_KEY: &str = "Manufacturer";
/// Keys every metadata answer carries first, in this order.
pub const MANDATORY_KEYS: [&str; 2] = [SENSOR_ID_KEY, MANUFACTURER_KEY];

/// [`MANDATORY_KEYS`] followed by `extra`.
pub fn with_mandatory_keys<'a>(extra: &[&'a str]) -> Vec<&'a str> {
    let mut keys = Vec::with_capacity(MANDATORY_KEYS.len() + extra.len());
    keys.extend_from_slice(&MANDATORY_KEYS);
    keys.extend_from_slice(extra);
    keys
}

/// Pairs the multi-value scalars of `fragment` with `keys`, position by position.
///
/// Only an exact count match fills the map.
pub fn fill_metadata(fragment: &str, multi_value: char, keys: &[&str]) -> Option<BTreeMap<String, String>> {
    if fragment.split(multi_value).count() != keys.len() {
        return None;
    }
    Some(
        keys.iter()
            .zip(fragment.split(multi_value))
            .map(|(k, v)| (k.to_string(), v.trim().to_string()))
            .collect(),
    )
}

/// Most recent fragment for `sensor_id` in `line` whose arity matches `keys`.
pub fn extract_metadata(
    line: &str,
    sensor_id: char,
    delimiters: &Delimiters,
    keys: &[&str],
) -> Option<BTreeMap<String, String>> {
    split_packet(line, sensor_id, delimiters)
        .into_iter()
        .rev()
        .find_map(|fragment| fill_metadata(fragment, delimiters.multi_value, keys))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_positional() {
        let map = fill_metadata("Acme%TX-100%celsius", '%', &["vendor", "model", "unit"]).unwrap();
        assert_eq!(map["vendor"], "Acme");
        assert_eq!(map["model"], "TX-100");
        assert_eq!(map["unit"], "celsius");
    }

    #[test]
    fn test_fill_requires_exact_count() {
        assert!(fill_metadata("Acme%TX-100", '%', &["vendor", "model", "unit"]).is_none());
        assert!(fill_metadata("a%b%c%d", '%', &["vendor", "model", "unit"]).is_none());
    }

    #[test]
    fn test_mandatory_keys_come_first() {
        assert_eq!(with_mandatory_keys(&["unit"]), ["SensorId", "Manufacturer", "unit"]);
        assert_eq!(with_mandatory_keys(&[]), MANDATORY_KEYS);
    }

    #[test]
    fn test_extract_from_line() {
        let d = Delimiters::default();
        let map = extract_metadata("T@Acme%v2#", 'T', &d, &["vendor", "firmware"]).unwrap();
        assert_eq!(map["firmware"], "v2");
        assert!(extract_metadata("P@Acme%v2#", 'T', &d, &["vendor", "firmware"]).is_none());
    }
}
