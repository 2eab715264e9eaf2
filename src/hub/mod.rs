// src/hub/mod.rs

//! The application-facing facade. A [`SensorHub`] owns the port and all
//! long-lived configuration; every operation takes `&mut self`, so protocol
//! exchanges on one hub never overlap.

use crate::common::{
    error::{ConfigError, LinkError},
    kind::{SensorKind, SensorSet},
    range::normalize_value,
    range_table::{HardwareRanges, RangeUpdate, STANDARD_RANGES},
    reading::{DiscreteResult, Measurement, SampleBuffer, SensorReading},
    request::{Delimiters, RequestSpec, StreamSpec},
    response::metadata::{with_mandatory_keys, MANDATORY_KEYS},
};
use crate::recorder;
use crate::transport::TransportPort;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::time::Duration;

// --- Configuration ---

/// Everything a hub needs besides the port.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HubConfig {
    pub request: RequestSpec,
    pub stream: StreamSpec,
    pub hardware: HardwareRanges,
}

impl HubConfig {
    pub fn with_request(mut self, request: RequestSpec) -> Self {
        self.request = request;
        self
    }

    pub fn with_stream(mut self, stream: StreamSpec) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_hardware_ranges(mut self, update: &RangeUpdate) -> Self {
        self.hardware.set(update);
        self
    }
}

/// Per-call parameter changes. Every present field is written into the hub's
/// configuration before the fetch runs and stays in effect afterwards.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Overrides {
    pub identifier: Option<char>,
    pub id_data: Option<char>,
    pub multi_value: Option<char>,
    pub sensor: Option<char>,
    pub timeout: Option<Duration>,
    pub ranges: RangeUpdate,
}

impl Overrides {
    pub fn with_identifier(mut self, id: char) -> Self {
        self.identifier = Some(id);
        self
    }

    pub fn with_id_data(mut self, c: char) -> Self {
        self.id_data = Some(c);
        self
    }

    pub fn with_multi_value(mut self, c: char) -> Self {
        self.multi_value = Some(c);
        self
    }

    pub fn with_sensor_delimiter(mut self, c: char) -> Self {
        self.sensor = Some(c);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_ranges(mut self, ranges: RangeUpdate) -> Self {
        self.ranges = ranges;
        self
    }
}

// --- Normalization ---

/// Rewrites every scalar of `measurement` from its hardware range onto the
/// standard range. Fields whose hardware range is the standard one are left
/// untouched.
pub fn normalize_measurement(measurement: &mut Measurement, hardware: &HardwareRanges) -> Result<(), ConfigError> {
    let hw = hardware.table();
    let standard = &STANDARD_RANGES;
    match measurement {
        Measurement::Temperature(v) => *v = normalize_value(*v, &hw.temperature, &standard.temperature)?,
        Measurement::BloodPressure { systolic, diastolic } => {
            *systolic = normalize_value(*systolic, &hw.systolic, &standard.systolic)?;
            *diastolic = normalize_value(*diastolic, &hw.diastolic, &standard.diastolic)?;
        }
        Measurement::PulseRate(v) => *v = normalize_value(*v, &hw.pulse_rate, &standard.pulse_rate)?,
        Measurement::Oximeter(v) => *v = normalize_value(*v, &hw.oximeter, &standard.oximeter)?,
        Measurement::Gsr { conductance, resistance } => {
            *conductance = normalize_value(*conductance, &hw.gsr_conductance, &standard.gsr_conductance)?;
            *resistance = normalize_value(*resistance, &hw.gsr_resistance, &standard.gsr_resistance)?;
        }
        Measurement::Ecg(samples) => normalize_samples(samples, hardware)?,
    }
    Ok(())
}

/// Streamed samples share one range; the whole buffer is skipped when it is
/// already standard.
pub fn normalize_samples(samples: &mut SampleBuffer<f32>, hardware: &HardwareRanges) -> Result<(), ConfigError> {
    let (hw, standard) = (&hardware.table().ecg, &STANDARD_RANGES.ecg);
    if hw == standard {
        return Ok(());
    }
    for s in samples.as_mut_slice() {
        *s = normalize_value(*s, hw, standard)?;
    }
    Ok(())
}

// --- Facade ---

/// Sensor hub on one transport port.
#[derive(Debug)]
pub struct SensorHub<P: TransportPort> {
    port: P,
    config: HubConfig,
}

impl<P: TransportPort> SensorHub<P> {
    pub fn new(port: P, config: HubConfig) -> Self {
        SensorHub { port, config }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn request_spec_mut(&mut self) -> &mut RequestSpec {
        &mut self.config.request
    }

    pub fn stream_spec_mut(&mut self) -> &mut StreamSpec {
        &mut self.config.stream
    }

    pub fn hardware_ranges(&self) -> &HardwareRanges {
        &self.config.hardware
    }

    /// Applies the present entries of `update`; absent ones keep their value.
    pub fn set_hardware_ranges(&mut self, update: &RangeUpdate) {
        self.config.hardware.set(update);
    }

    pub fn is_connected(&self) -> bool {
        self.port.is_connected()
    }

    // --- Aggregate ---

    /// Fetches every requested discrete sensor with data assurance, then
    /// normalizes what was obtained. Check presence per kind on the result.
    pub fn fetch_discrete(&mut self) -> Result<DiscreteResult, LinkError<P::Error>> {
        let mut result = recorder::fetch_discrete(&mut self.port, &self.config.request, self.config.hardware.table())?;
        for reading in result.readings_mut() {
            normalize_measurement(&mut reading.measurement, &self.config.hardware)?;
        }
        Ok(result)
    }

    /// As [`fetch_discrete`](Self::fetch_discrete), after applying `update` to
    /// the hardware ranges.
    pub fn fetch_discrete_with(&mut self, update: &RangeUpdate) -> Result<DiscreteResult, LinkError<P::Error>> {
        self.config.hardware.set(update);
        self.fetch_discrete()
    }

    // --- Per sensor ---

    /// Fetches a single discrete sensor, with data assurance, after applying
    /// `overrides`. `Ok(None)` when the sensor never answered validly.
    pub fn fetch_kind(
        &mut self,
        kind: SensorKind,
        overrides: &Overrides,
    ) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.apply_discrete_overrides(kind, overrides)?;
        if self.config.request.identifier(kind).is_none() {
            return Err(ConfigError::MissingIdentifier(kind).into());
        }

        let single = self
            .config
            .request
            .clone()
            .with_requested(SensorSet::from_kinds(&[kind])?);
        let mut result = recorder::fetch_discrete(&mut self.port, &single, self.config.hardware.table())?;
        let mut reading = result.take(kind);
        if let Some(r) = reading.as_mut() {
            normalize_measurement(&mut r.measurement, &self.config.hardware)?;
        }
        Ok(reading)
    }

    pub fn temperature(&mut self) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.fetch_kind(SensorKind::Temperature, &Overrides::default())
    }

    pub fn temperature_with(&mut self, overrides: &Overrides) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.fetch_kind(SensorKind::Temperature, overrides)
    }

    pub fn blood_pressure(&mut self) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.fetch_kind(SensorKind::BloodPressure, &Overrides::default())
    }

    pub fn blood_pressure_with(&mut self, overrides: &Overrides) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.fetch_kind(SensorKind::BloodPressure, overrides)
    }

    pub fn pulse_rate(&mut self) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.fetch_kind(SensorKind::PulseRate, &Overrides::default())
    }

    pub fn pulse_rate_with(&mut self, overrides: &Overrides) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.fetch_kind(SensorKind::PulseRate, overrides)
    }

    pub fn oximeter(&mut self) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.fetch_kind(SensorKind::Oximeter, &Overrides::default())
    }

    pub fn oximeter_with(&mut self, overrides: &Overrides) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.fetch_kind(SensorKind::Oximeter, overrides)
    }

    pub fn gsr(&mut self) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.fetch_kind(SensorKind::GalvanicSkinResponse, &Overrides::default())
    }

    pub fn gsr_with(&mut self, overrides: &Overrides) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.fetch_kind(SensorKind::GalvanicSkinResponse, overrides)
    }

    /// Streams ECG samples into a [`Measurement::Ecg`] reading. `Ok(None)`
    /// when no usable sample survived.
    pub fn ecg(&mut self) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.ecg_with(&Overrides::default())
    }

    pub fn ecg_with(&mut self, overrides: &Overrides) -> Result<Option<SensorReading>, LinkError<P::Error>> {
        self.apply_stream_overrides(overrides);
        let samples = recorder::fetch_stream(&mut self.port, &self.config.stream, self.config.hardware.table())?;
        if samples.is_empty() {
            log::warn!("{} stream produced no usable samples", self.config.stream.kind);
            return Ok(None);
        }
        let mut reading = SensorReading::new(Measurement::Ecg(samples));
        normalize_measurement(&mut reading.measurement, &self.config.hardware)?;
        Ok(Some(reading))
    }

    // --- Metadata ---

    /// Fetches descriptive values for `kind`.
    ///
    /// The answer is paired by position with [`MANDATORY_KEYS`] followed by
    /// `keys`. Discrete kinds use the request framing; the streamed kind uses
    /// the framing held in the stream configuration.
    pub fn fetch_metadata(
        &mut self,
        kind: SensorKind,
        keys: &[&str],
    ) -> Result<Option<BTreeMap<String, String>>, LinkError<P::Error>> {
        let request = &self.config.request;
        let (id, delimiters) = if kind.is_discrete() {
            let id = request.identifier(kind).ok_or(ConfigError::MissingIdentifier(kind))?;
            (id, request.delimiters)
        } else {
            let stream = &self.config.stream;
            let delimiters = Delimiters {
                sensor: request.delimiters.sensor,
                id_data: stream.id_data,
                multi_value: stream.multi_value,
            };
            (stream.identifier, delimiters)
        };
        let keys = with_mandatory_keys(keys);
        recorder::fetch_metadata(&mut self.port, kind, id, &delimiters, &keys, request.attempt_timeout)
    }

    // --- Overrides ---

    fn apply_discrete_overrides(&mut self, kind: SensorKind, o: &Overrides) -> Result<(), ConfigError> {
        let request = &mut self.config.request;
        if let Some(id) = o.identifier {
            request.set_identifier(kind, id)?;
        }
        if let Some(c) = o.id_data {
            request.delimiters.id_data = c;
        }
        if let Some(c) = o.multi_value {
            request.delimiters.multi_value = c;
        }
        if let Some(c) = o.sensor {
            request.delimiters.sensor = c;
        }
        if let Some(t) = o.timeout {
            request.attempt_timeout = t;
        }
        self.config.hardware.set(&o.ranges);
        Ok(())
    }

    fn apply_stream_overrides(&mut self, o: &Overrides) {
        let stream = &mut self.config.stream;
        if let Some(id) = o.identifier {
            stream.identifier = id;
        }
        if let Some(c) = o.id_data {
            stream.id_data = c;
        }
        if let Some(c) = o.multi_value {
            stream.multi_value = c;
        }
        if let Some(t) = o.timeout {
            stream.timeout = t;
        }
        self.config.hardware.set(&o.ranges);
    }
}
