// src/recorder/assurance.rs

use crate::common::{
    error::{ConfigError, LinkError},
    kind::SensorSet,
    range_table::RangeTable,
    reading::{DiscreteResult, SensorReading},
    request::RequestSpec,
    response::extract_latest,
};
use crate::transport::TransportPort;

/// Runs the data-assurance loop for every requested discrete sensor.
///
/// Each attempt asks only for kinds still missing; a kind obtained once is
/// never requested again. The loop ends when everything is in or the retry
/// limit is spent. Running out of attempts is not an error: the result holds
/// exactly what was obtained.
///
/// Requested kinds without a wire identifier are skipped for the whole run and
/// reported through [`DiscreteResult::unconfigured`]. A run where no requested
/// kind has an identifier fails with [`ConfigError::MissingIdentifier`].
pub fn fetch_discrete<P>(
    port: &mut P,
    spec: &RequestSpec,
    ranges: &RangeTable,
) -> Result<DiscreteResult, LinkError<P::Error>>
where
    P: TransportPort + ?Sized,
{
    let requested = spec.requested();
    if requested.is_empty() {
        return Err(ConfigError::NoSensorsRequested.into());
    }

    let mut result = DiscreteResult::new(requested);
    let configured = spec.configured();
    let unconfigured = requested.difference(configured);
    for kind in unconfigured.kinds() {
        log::error!("{}", ConfigError::MissingIdentifier(kind));
        result.mark_unconfigured(kind);
    }
    if configured.is_empty() {
        if let Some(kind) = unconfigured.kinds().first() {
            return Err(ConfigError::MissingIdentifier(*kind).into());
        }
    }

    let mut pending: SensorSet = configured;
    let mut remaining = spec.retry_limit;
    let mut attempts = 0;

    while remaining > 0 && !pending.is_empty() {
        let request = spec.build_request_byte(pending)?;
        if request == 0 {
            break;
        }

        attempts += 1;
        log::debug!("attempt {}: request byte {:#010b}", attempts, request);
        let line = port.send_and_await_line(request, spec.attempt_timeout)?;
        if line.is_empty() {
            log::debug!("attempt {}: no response within {:?}", attempts, spec.attempt_timeout);
        }

        for kind in pending.kinds() {
            let Some(id) = spec.identifier(kind) else {
                continue;
            };
            if let Some(measurement) = extract_latest(&line, kind, id, &spec.delimiters, ranges) {
                result.insert(SensorReading::new(measurement));
                pending.remove(kind);
            }
        }

        remaining -= 1;
    }

    result.set_attempts(attempts);
    if !pending.is_empty() {
        log::warn!(
            "data assurance gave up after {} attempts, still missing {:?}",
            attempts,
            pending.kinds().as_slice()
        );
    }
    Ok(result)
}
