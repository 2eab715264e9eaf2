// src/common/response/extract.rs

//! Per-sensor field extraction: split multi-value fields, parse each scalar in
//! its numeric domain and check it against the hardware range.

use super::packet::split_packet;
use crate::common::error::FieldError;
use crate::common::kind::{SensorKind, NUM_DISCRETE};
use crate::common::range::{Range, RangeValue};
use crate::common::range_table::RangeTable;
use crate::common::reading::Measurement;
use crate::common::request::Delimiters;
use arrayvec::ArrayVec;

/// Signature shared by every discrete extractor.
pub type Extractor = fn(&str, &Delimiters, &RangeTable) -> Result<Measurement, FieldError>;

/// Extractors indexed by `SensorKind` ordinal.
const EXTRACTORS: [Extractor; NUM_DISCRETE] = [
    extract_temperature,
    extract_blood_pressure,
    extract_pulse_rate,
    extract_oximeter,
    extract_gsr,
];

/// Extractor for a discrete kind, `None` for continuous kinds.
pub fn extractor_for(kind: SensorKind) -> Option<Extractor> {
    EXTRACTORS.get(kind.ordinal() as usize).copied()
}

// --- Scalar helpers ---

fn parse_checked<T: RangeValue>(raw: &str, range: &Range<T>) -> Result<T, FieldError> {
    let value: T = raw.trim().parse().map_err(|_| FieldError::Malformed)?;
    if !range.contains(value) {
        return Err(FieldError::OutOfRange);
    }
    Ok(value)
}

/// First `N` scalars of a multi-value field. Extra scalars are ignored.
fn split_scalars<const N: usize>(raw: &str, delimiter: char) -> Result<ArrayVec<&str, N>, FieldError> {
    let parts: ArrayVec<&str, N> = raw.split(delimiter).take(N).collect();
    if parts.len() < N {
        return Err(FieldError::MissingScalar {
            expected: N,
            got: parts.len(),
        });
    }
    Ok(parts)
}

// --- Extractors ---

pub fn extract_temperature(raw: &str, _: &Delimiters, ranges: &RangeTable) -> Result<Measurement, FieldError> {
    parse_checked(raw, &ranges.temperature).map(Measurement::Temperature)
}

pub fn extract_blood_pressure(
    raw: &str,
    delimiters: &Delimiters,
    ranges: &RangeTable,
) -> Result<Measurement, FieldError> {
    let parts = split_scalars::<2>(raw, delimiters.multi_value)?;
    let systolic = parse_checked(parts[0], &ranges.systolic)?;
    let diastolic = parse_checked(parts[1], &ranges.diastolic)?;
    Ok(Measurement::BloodPressure { systolic, diastolic })
}

pub fn extract_pulse_rate(raw: &str, _: &Delimiters, ranges: &RangeTable) -> Result<Measurement, FieldError> {
    parse_checked(raw, &ranges.pulse_rate).map(Measurement::PulseRate)
}

pub fn extract_oximeter(raw: &str, _: &Delimiters, ranges: &RangeTable) -> Result<Measurement, FieldError> {
    parse_checked(raw, &ranges.oximeter).map(Measurement::Oximeter)
}

pub fn extract_gsr(raw: &str, delimiters: &Delimiters, ranges: &RangeTable) -> Result<Measurement, FieldError> {
    let parts = split_scalars::<2>(raw, delimiters.multi_value)?;
    let conductance = parse_checked(parts[0], &ranges.gsr_conductance)?;
    let resistance = parse_checked(parts[1], &ranges.gsr_resistance)?;
    Ok(Measurement::Gsr { conductance, resistance })
}

/// One ECG sample line.
pub fn extract_ecg_sample(raw: &str, ranges: &RangeTable) -> Result<f32, FieldError> {
    parse_checked(raw, &ranges.ecg)
}

// --- Public wrappers ---

/// Extracts one raw fragment for `kind`. Absence is a normal outcome.
pub fn extract_field(
    kind: SensorKind,
    raw: &str,
    delimiters: &Delimiters,
    ranges: &RangeTable,
) -> Option<Measurement> {
    let extractor = extractor_for(kind)?;
    extractor(raw, delimiters, ranges).ok()
}

/// Picks the most recent fragment for `kind` in `line` that extracts cleanly.
///
/// Fragments are tried from last to first; earlier stale or malformed ones
/// are skipped.
pub fn extract_latest(
    line: &str,
    kind: SensorKind,
    sensor_id: char,
    delimiters: &Delimiters,
    ranges: &RangeTable,
) -> Option<Measurement> {
    let extractor = extractor_for(kind)?;
    for fragment in split_packet(line, sensor_id, delimiters).into_iter().rev() {
        match extractor(fragment, delimiters, ranges) {
            Ok(m) => return Some(m),
            Err(e) => log::trace!("{} fragment {:?} discarded: {}", kind, fragment, e),
        }
    }
    None
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::range_table::STANDARD_RANGES;

    fn d() -> Delimiters {
        Delimiters::default()
    }

    #[test]
    fn test_dispatch_table_matches_kinds() {
        let r = STANDARD_RANGES;
        for kind in SensorKind::DISCRETE {
            assert!(extractor_for(kind).is_some());
        }
        assert!(extractor_for(SensorKind::Ecg).is_none());
        assert_eq!(
            extract_field(SensorKind::PulseRate, "72", &d(), &r),
            Some(Measurement::PulseRate(72))
        );
        assert_eq!(extract_field(SensorKind::Ecg, "1.0", &d(), &r), None);
    }

    #[test]
    fn test_stale_fragment_last_valid_wins() {
        let m = extract_latest("T@19.0#T@21.0#", SensorKind::Temperature, 'T', &d(), &STANDARD_RANGES);
        assert_eq!(m, Some(Measurement::Temperature(21.0)));
    }

    #[test]
    fn test_malformed_latest_falls_back_to_earlier() {
        let m = extract_latest("T@19.0#T@2x.0#", SensorKind::Temperature, 'T', &d(), &STANDARD_RANGES);
        assert_eq!(m, Some(Measurement::Temperature(19.0)));
    }

    #[test]
    fn test_out_of_range_rejected_not_clamped() {
        let r = STANDARD_RANGES;
        assert_eq!(extract_temperature("250", &d(), &r), Err(FieldError::OutOfRange));
        assert_eq!(extract_latest("T@250#", SensorKind::Temperature, 'T', &d(), &r), None);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let r = STANDARD_RANGES;
        assert_eq!(extract_pulse_rate("20", &d(), &r), Ok(Measurement::PulseRate(20)));
        assert_eq!(extract_pulse_rate("200", &d(), &r), Ok(Measurement::PulseRate(200)));
        assert_eq!(extract_pulse_rate("201", &d(), &r), Err(FieldError::OutOfRange));
    }

    #[test]
    fn test_integer_domain_rejects_fractions() {
        assert_eq!(extract_pulse_rate("72.5", &d(), &STANDARD_RANGES), Err(FieldError::Malformed));
    }

    #[test]
    fn test_blood_pressure_pair() {
        let r = STANDARD_RANGES;
        assert_eq!(
            extract_blood_pressure("120%80", &d(), &r),
            Ok(Measurement::BloodPressure { systolic: 120, diastolic: 80 })
        );
        assert_eq!(
            extract_blood_pressure("120", &d(), &r),
            Err(FieldError::MissingScalar { expected: 2, got: 1 })
        );
        // Diastolic out of range discards the whole pair.
        assert_eq!(extract_blood_pressure("120%10", &d(), &r), Err(FieldError::OutOfRange));
    }

    #[test]
    fn test_gsr_pair_and_extra_scalars() {
        let r = STANDARD_RANGES;
        assert_eq!(
            extract_gsr("2.5%-500.0%9", &d(), &r),
            Ok(Measurement::Gsr { conductance: 2.5, resistance: -500.0 })
        );
        assert_eq!(extract_gsr("6.0%10.0", &d(), &r), Err(FieldError::OutOfRange));
    }

    #[test]
    fn test_multi_value_delimiter_is_configurable() {
        let delims = d().with_multi_value('/');
        assert_eq!(
            extract_blood_pressure("130/85", &delims, &STANDARD_RANGES),
            Ok(Measurement::BloodPressure { systolic: 130, diastolic: 85 })
        );
        assert!(extract_blood_pressure("130%85", &delims, &STANDARD_RANGES).is_err());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(
            extract_oximeter(" 97.5 ", &d(), &STANDARD_RANGES),
            Ok(Measurement::Oximeter(97.5))
        );
    }

    #[test]
    fn test_ecg_sample() {
        assert_eq!(extract_ecg_sample("2.5", &STANDARD_RANGES), Ok(2.5));
        assert_eq!(extract_ecg_sample("9", &STANDARD_RANGES), Err(FieldError::OutOfRange));
        assert_eq!(extract_ecg_sample("", &STANDARD_RANGES), Err(FieldError::Malformed));
    }
}
