// src/common/error.rs

use super::kind::SensorKind;

/// Errors surfaced by the transport and the protocol engines.
///
/// Generic over the I/O error of the underlying link so that HAL-level
/// failures pass through untouched.
#[derive(Debug, thiserror::Error)]
pub enum LinkError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the link implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// No link is established with the sensor hardware.
    #[error("no device connected")]
    NotConnected,

    /// A low-level write or flush did not complete in time.
    #[error("operation timed out")]
    Timeout,

    /// The request or stream configuration cannot be acted on.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl<E: core::fmt::Debug> LinkError<E> {
    /// True for faults caused by the link going away rather than bad data.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, LinkError::NotConnected | LinkError::Io(_))
    }
}

/// Configuration problems. Always fatal for the current operation, never
/// silently defaulted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The request has no sensors configured at all.
    #[error("no sensors requested")]
    NoSensorsRequested,

    /// A requested sensor has no wire identifier.
    #[error("sensor identifier is not defined for {} sensor", .0.name())]
    MissingIdentifier(SensorKind),

    /// A continuous sensor was used where only discrete ones are allowed.
    #[error("{} is not a discrete sensor", .0.name())]
    NotDiscrete(SensorKind),

    /// Mapping from a range whose bounds coincide.
    #[error("cannot map from a zero-width range")]
    ZeroWidthRange,

    /// Range with `lower > upper` or a NaN bound.
    #[error("range lower bound exceeds upper bound")]
    InvertedRange,

    /// Neither an explicit sample count nor sampling rate and duration.
    #[error("stream length or sampling rate and duration not specified")]
    UnresolvedStreamLength,
}

/// Why a single field could not be taken from a response on one attempt.
///
/// Recovered by the retry loop; never returned from the engines.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Scalar failed to parse in its numeric domain.
    #[error("malformed value")]
    Malformed,

    /// A multi-value field carried fewer scalars than the sensor needs.
    #[error("expected {expected} values, got {got}")]
    MissingScalar { expected: usize, got: usize },

    /// Parsed, but outside the configured hardware range.
    #[error("value outside hardware range")]
    OutOfRange,
}

impl From<core::num::ParseIntError> for FieldError {
    fn from(_: core::num::ParseIntError) -> Self {
        FieldError::Malformed
    }
}

impl From<core::num::ParseFloatError> for FieldError {
    fn from(_: core::num::ParseFloatError) -> Self {
        FieldError::Malformed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_config_error_names_sensor() {
        let e = ConfigError::MissingIdentifier(SensorKind::PulseRate);
        assert_eq!(e.to_string(), "sensor identifier is not defined for Pulse Rate sensor");
    }

    #[test]
    fn test_config_error_converts_into_link_error() {
        let e: LinkError<()> = ConfigError::ZeroWidthRange.into();
        assert!(matches!(e, LinkError::Configuration(ConfigError::ZeroWidthRange)));
        assert!(!e.is_connectivity());
        assert!(LinkError::<()>::NotConnected.is_connectivity());
    }

    #[test]
    fn test_parse_errors_become_malformed() {
        let e: FieldError = "x1".parse::<i32>().unwrap_err().into();
        assert_eq!(e, FieldError::Malformed);
        let e: FieldError = "1.2.3".parse::<f32>().unwrap_err().into();
        assert_eq!(e, FieldError::Malformed);
    }
}
