// src/common/request.rs

use super::error::ConfigError;
use super::kind::{SensorKind, SensorSet, NUM_DISCRETE};
use super::timing;
use alloc::string::String;
use core::time::Duration;

/// Bit 7 of a request byte marks a metadata request.
pub const METADATA_FLAG: u8 = 0x80;

// --- Delimiters ---

/// Characters that frame a response line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Delimiters {
    /// Between two sensors' fragments.
    pub sensor: char,
    /// Between a sensor identifier and its data.
    pub id_data: char,
    /// Between the scalars of a multi-value sensor.
    pub multi_value: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters {
            sensor: '#',
            id_data: '@',
            multi_value: '%',
        }
    }
}

impl Delimiters {
    pub fn with_sensor(mut self, c: char) -> Self {
        self.sensor = c;
        self
    }

    pub fn with_id_data(mut self, c: char) -> Self {
        self.id_data = c;
        self
    }

    pub fn with_multi_value(mut self, c: char) -> Self {
        self.multi_value = c;
        self
    }
}

// --- Discrete Requests ---

/// What a discrete fetch asks for and how the answer is framed.
///
/// Identifiers have no default; the hardware decides them.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    requested: SensorSet,
    identifiers: [Option<char>; NUM_DISCRETE],
    pub delimiters: Delimiters,
    pub retry_limit: usize,
    pub attempt_timeout: Duration,
}

impl Default for RequestSpec {
    fn default() -> Self {
        RequestSpec {
            requested: SensorSet::empty(),
            identifiers: [None; NUM_DISCRETE],
            delimiters: Delimiters::default(),
            retry_limit: timing::DEFAULT_RETRY_LIMIT,
            attempt_timeout: timing::DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl RequestSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requested(mut self, requested: SensorSet) -> Self {
        self.requested = requested;
        self
    }

    /// Sets the wire identifier of a discrete kind.
    pub fn with_identifier(mut self, kind: SensorKind, id: char) -> Result<Self, ConfigError> {
        self.set_identifier(kind, id)?;
        Ok(self)
    }

    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    pub fn with_retry_limit(mut self, retry_limit: usize) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    #[inline]
    pub fn requested(&self) -> SensorSet {
        self.requested
    }

    pub fn set_requested(&mut self, requested: SensorSet) {
        self.requested = requested;
    }

    pub fn identifier(&self, kind: SensorKind) -> Option<char> {
        if !kind.is_discrete() {
            return None;
        }
        self.identifiers[kind.ordinal() as usize]
    }

    pub fn set_identifier(&mut self, kind: SensorKind, id: char) -> Result<(), ConfigError> {
        if !kind.is_discrete() {
            return Err(ConfigError::NotDiscrete(kind));
        }
        self.identifiers[kind.ordinal() as usize] = Some(id);
        Ok(())
    }

    pub fn clear_identifier(&mut self, kind: SensorKind) {
        if kind.is_discrete() {
            self.identifiers[kind.ordinal() as usize] = None;
        }
    }

    /// Requested kinds that have a wire identifier.
    pub fn configured(&self) -> SensorSet {
        let mut set = SensorSet::empty();
        for kind in self.requested.kinds() {
            if self.identifier(kind).is_some() {
                let _ = set.insert(kind);
            }
        }
        set
    }

    /// Builds the request byte for the still-pending subset of kinds.
    ///
    /// Bit *i* is set for every pending kind *i* that has an identifier. An
    /// empty pending set gives `0`. Fails only when no sensors are requested
    /// at all.
    pub fn build_request_byte(&self, pending: SensorSet) -> Result<u8, ConfigError> {
        if self.requested.is_empty() {
            return Err(ConfigError::NoSensorsRequested);
        }
        let mut byte = 0u8;
        for kind in pending.kinds() {
            if self.identifier(kind).is_some() {
                byte |= kind.request_bit();
            }
        }
        Ok(byte)
    }
}

// --- Continuous Streams ---

/// Configuration of a continuous stream handshake.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSpec {
    pub kind: SensorKind,
    pub start_byte: u8,
    pub stop_byte: u8,
    /// Line the hardware sends once it has honoured the stop byte.
    pub stop_ack: String,
    /// Explicit number of samples; takes precedence over rate and duration.
    pub sample_count: Option<usize>,
    pub sampling_rate_hz: Option<usize>,
    pub duration_secs: Option<usize>,
    /// Bound on the collection window.
    pub timeout: Duration,
    /// Bound on the post-stop drain. `None` waits for the acknowledgement indefinitely.
    pub stop_ack_timeout: Option<Duration>,
    /// Framing used by metadata responses for this stream's sensor.
    pub identifier: char,
    pub id_data: char,
    pub multi_value: char,
}

impl Default for StreamSpec {
    fn default() -> Self {
        StreamSpec::for_kind(SensorKind::Ecg)
    }
}

impl StreamSpec {
    pub fn for_kind(kind: SensorKind) -> Self {
        StreamSpec {
            kind,
            start_byte: kind.request_bit(),
            stop_byte: b'Q',
            stop_ack: String::from("!"),
            sample_count: None,
            sampling_rate_hz: None,
            duration_secs: None,
            timeout: timing::DEFAULT_STREAM_TIMEOUT,
            stop_ack_timeout: Some(timing::DEFAULT_STOP_ACK_TIMEOUT),
            identifier: 'E',
            id_data: '@',
            multi_value: '%',
        }
    }

    pub fn with_sample_count(mut self, count: usize) -> Self {
        self.sample_count = Some(count);
        self
    }

    pub fn with_sampling(mut self, rate_hz: usize, duration_secs: usize) -> Self {
        self.sampling_rate_hz = Some(rate_hz);
        self.duration_secs = Some(duration_secs);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_stop_ack_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stop_ack_timeout = timeout;
        self
    }

    pub fn with_stop(mut self, stop_byte: u8, stop_ack: &str) -> Self {
        self.stop_byte = stop_byte;
        self.stop_ack = String::from(stop_ack);
        self
    }

    /// Number of samples to collect: the explicit count if non-zero, else
    /// `sampling_rate_hz * duration_secs`.
    pub fn resolve_length(&self) -> Result<usize, ConfigError> {
        if let Some(n) = self.sample_count.filter(|n| *n > 0) {
            return Ok(n);
        }
        match (self.sampling_rate_hz, self.duration_secs) {
            (Some(rate), Some(secs)) => rate
                .checked_mul(secs)
                .filter(|n| *n > 0)
                .ok_or(ConfigError::UnresolvedStreamLength),
            _ => Err(ConfigError::UnresolvedStreamLength),
        }
    }

    /// Wire-level part handed to the transport.
    pub fn handshake(&self) -> StreamHandshake<'_> {
        StreamHandshake {
            start_byte: self.start_byte,
            stop_byte: self.stop_byte,
            stop_ack: &self.stop_ack,
            stop_ack_timeout: self.stop_ack_timeout,
        }
    }
}

/// Bytes and tokens of one start/collect/stop exchange.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StreamHandshake<'a> {
    pub start_byte: u8,
    pub stop_byte: u8,
    pub stop_ack: &'a str,
    pub stop_ack_timeout: Option<Duration>,
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with(kinds: &[SensorKind]) -> RequestSpec {
        let mut spec = RequestSpec::new().with_requested(SensorSet::from_kinds(kinds).unwrap());
        for (kind, id) in SensorKind::DISCRETE.iter().zip(['T', 'B', 'P', 'O', 'G']) {
            spec.set_identifier(*kind, id).unwrap();
        }
        spec
    }

    #[test]
    fn test_defaults() {
        let spec = RequestSpec::default();
        assert_eq!(spec.delimiters, Delimiters { sensor: '#', id_data: '@', multi_value: '%' });
        assert_eq!(spec.retry_limit, 5);
        assert_eq!(spec.attempt_timeout, Duration::from_millis(1000));
        assert_eq!(spec.identifier(SensorKind::Temperature), None);
    }

    #[test]
    fn test_build_request_byte_sets_pending_bits() {
        let spec = spec_with(&[SensorKind::Temperature, SensorKind::Oximeter, SensorKind::GalvanicSkinResponse]);
        assert_eq!(spec.build_request_byte(spec.requested()), Ok(0b0001_1001));
        let pending = SensorSet::from_kinds(&[SensorKind::Oximeter]).unwrap();
        assert_eq!(spec.build_request_byte(pending), Ok(0b0000_1000));
        assert_eq!(spec.build_request_byte(SensorSet::empty()), Ok(0));
    }

    #[test]
    fn test_build_request_byte_requires_some_sensor() {
        let spec = RequestSpec::new();
        assert_eq!(spec.build_request_byte(SensorSet::all()), Err(ConfigError::NoSensorsRequested));
    }

    #[test]
    fn test_build_request_byte_skips_kinds_without_identifier() {
        let mut spec = spec_with(&[SensorKind::Temperature, SensorKind::PulseRate]);
        spec.clear_identifier(SensorKind::Temperature);
        assert_eq!(spec.build_request_byte(spec.requested()), Ok(0b0000_0100));
        assert_eq!(spec.configured().kinds().as_slice(), &[SensorKind::PulseRate]);
    }

    #[test]
    fn test_identifier_rejects_continuous_kind() {
        let mut spec = RequestSpec::new();
        assert_eq!(
            spec.set_identifier(SensorKind::Ecg, 'E'),
            Err(ConfigError::NotDiscrete(SensorKind::Ecg))
        );
    }

    #[test]
    fn test_stream_defaults() {
        let spec = StreamSpec::default();
        assert_eq!(spec.kind, SensorKind::Ecg);
        assert_eq!(spec.start_byte, 0b0010_0000);
        assert_eq!(spec.stop_byte, b'Q');
        assert_eq!(spec.stop_ack, "!");
        assert_eq!(spec.timeout, Duration::from_millis(120_000));
        assert_eq!(spec.identifier, 'E');
    }

    #[test]
    fn test_resolve_length() {
        assert_eq!(StreamSpec::default().resolve_length(), Err(ConfigError::UnresolvedStreamLength));
        assert_eq!(StreamSpec::default().with_sample_count(10).resolve_length(), Ok(10));
        assert_eq!(StreamSpec::default().with_sampling(250, 4).resolve_length(), Ok(1000));
        // Explicit count wins over rate and duration.
        assert_eq!(
            StreamSpec::default().with_sampling(250, 4).with_sample_count(7).resolve_length(),
            Ok(7)
        );
        // A zero count falls back to rate and duration.
        assert_eq!(
            StreamSpec::default().with_sample_count(0).with_sampling(2, 3).resolve_length(),
            Ok(6)
        );
        assert_eq!(
            StreamSpec::default().with_sampling(0, 3).resolve_length(),
            Err(ConfigError::UnresolvedStreamLength)
        );
        assert_eq!(
            StreamSpec::default().with_sampling(usize::MAX, 2).resolve_length(),
            Err(ConfigError::UnresolvedStreamLength)
        );
    }
}
