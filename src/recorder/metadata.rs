// src/recorder/metadata.rs

use crate::common::{
    error::LinkError,
    kind::SensorKind,
    request::{Delimiters, METADATA_FLAG},
    response::extract_metadata,
    timing,
};
use crate::transport::TransportPort;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::time::Duration;

/// Asks the hardware for descriptive values of one sensor.
///
/// The request byte is the sensor's bit plus [`METADATA_FLAG`]. The answer uses
/// the ordinary framing; its multi-value scalars are paired with `keys` by
/// position and only an exact count match is accepted. Gives up after
/// [`timing::METADATA_ATTEMPTS`] exchanges.
pub fn fetch_metadata<P>(
    port: &mut P,
    kind: SensorKind,
    sensor_id: char,
    delimiters: &Delimiters,
    keys: &[&str],
    timeout: Duration,
) -> Result<Option<BTreeMap<String, String>>, LinkError<P::Error>>
where
    P: TransportPort + ?Sized,
{
    let request = METADATA_FLAG | kind.request_bit();
    for attempt in 1..=timing::METADATA_ATTEMPTS {
        log::debug!("{} metadata attempt {}: request byte {:#010b}", kind, attempt, request);
        let line = port.send_and_await_line(request, timeout)?;
        if let Some(map) = extract_metadata(&line, sensor_id, delimiters, keys) {
            return Ok(Some(map));
        }
    }
    log::warn!("{} metadata not collected", kind);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockPort;
    use alloc::vec;

    #[test]
    fn test_metadata_request_byte_and_fill() {
        let mut port = MockPort::new();
        port.reply(&["P@Acme%PR-2#"]);
        let map = fetch_metadata(
            &mut port,
            SensorKind::PulseRate,
            'P',
            &Delimiters::default(),
            &["vendor", "model"],
            Duration::from_millis(100),
        )
        .unwrap()
        .unwrap();
        assert_eq!(port.sent, vec![0b1000_0100]);
        assert_eq!(map["model"], "PR-2");
    }

    #[test]
    fn test_metadata_gives_up_after_two_attempts() {
        let mut port = MockPort::new();
        port.always_reply(&["P@Acme#"]);
        let map = fetch_metadata(
            &mut port,
            SensorKind::PulseRate,
            'P',
            &Delimiters::default(),
            &["vendor", "model"],
            Duration::from_millis(100),
        )
        .unwrap();
        assert!(map.is_none());
        assert_eq!(port.sent.len(), 2);
    }

    #[test]
    fn test_ecg_metadata_uses_stream_bit() {
        let mut port = MockPort::new();
        port.reply(&[]);
        port.reply(&["E@250%lead-I#"]);
        let map = fetch_metadata(
            &mut port,
            SensorKind::Ecg,
            'E',
            &Delimiters::default(),
            &["rate", "lead"],
            Duration::from_millis(100),
        )
        .unwrap()
        .unwrap();
        assert_eq!(port.sent, vec![0b1010_0000, 0b1010_0000]);
        assert_eq!(map["rate"], "250");
    }
}
