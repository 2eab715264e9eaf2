// src/common/reading.rs

use super::kind::{SensorKind, SensorSet, NUM_DISCRETE};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

// --- Provenance (filled outside this crate) ---

/// Wall-clock capture time, as supplied by the provenance layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    /// Milliseconds since the Unix epoch.
    pub unix_millis: i64,
}

/// Capture location, as supplied by the provenance layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

// --- Sample Buffer ---

/// Samples collected from a continuous sensor.
///
/// `len()` is the usable length. It is shorter than `requested()` whenever the
/// stream timed out early or samples were dropped as invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer<T> {
    samples: Vec<T>,
    requested: usize,
}

impl<T> SampleBuffer<T> {
    pub fn with_capacity(requested: usize) -> Self {
        SampleBuffer {
            samples: Vec::with_capacity(requested),
            requested,
        }
    }

    /// Appends a sample unless the requested capacity is already reached.
    pub fn push(&mut self, sample: T) -> bool {
        if self.samples.len() >= self.requested {
            return false;
        }
        self.samples.push(sample);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.requested
    }

    pub fn as_slice(&self) -> &[T] {
        &self.samples
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.samples
    }

    pub fn into_vec(self) -> Vec<T> {
        self.samples
    }
}

// --- Readings ---

/// The value part of a reading, one variant per sensor kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    /// Degrees.
    Temperature(f32),
    BloodPressure { systolic: i32, diastolic: i32 },
    /// Beats per minute.
    PulseRate(i32),
    /// Oxygen saturation, percent.
    Oximeter(f32),
    /// Skin conductance and resistance.
    Gsr { conductance: f32, resistance: f32 },
    Ecg(SampleBuffer<f32>),
}

impl Measurement {
    pub fn kind(&self) -> SensorKind {
        match self {
            Measurement::Temperature(_) => SensorKind::Temperature,
            Measurement::BloodPressure { .. } => SensorKind::BloodPressure,
            Measurement::PulseRate(_) => SensorKind::PulseRate,
            Measurement::Oximeter(_) => SensorKind::Oximeter,
            Measurement::Gsr { .. } => SensorKind::GalvanicSkinResponse,
            Measurement::Ecg(_) => SensorKind::Ecg,
        }
    }

    pub fn temperature(&self) -> Option<f32> {
        match self {
            Measurement::Temperature(v) => Some(*v),
            _ => None,
        }
    }

    /// `(systolic, diastolic)`.
    pub fn blood_pressure(&self) -> Option<(i32, i32)> {
        match self {
            Measurement::BloodPressure { systolic, diastolic } => Some((*systolic, *diastolic)),
            _ => None,
        }
    }

    pub fn pulse_rate(&self) -> Option<i32> {
        match self {
            Measurement::PulseRate(v) => Some(*v),
            _ => None,
        }
    }

    pub fn oximeter(&self) -> Option<f32> {
        match self {
            Measurement::Oximeter(v) => Some(*v),
            _ => None,
        }
    }

    /// `(conductance, resistance)`.
    pub fn gsr(&self) -> Option<(f32, f32)> {
        match self {
            Measurement::Gsr { conductance, resistance } => Some((*conductance, *resistance)),
            _ => None,
        }
    }

    pub fn ecg(&self) -> Option<&SampleBuffer<f32>> {
        match self {
            Measurement::Ecg(samples) => Some(samples),
            _ => None,
        }
    }
}

/// A measurement plus the metadata and provenance slots that travel with it.
///
/// `timestamp` and `location` are never set by this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub measurement: Measurement,
    pub metadata: BTreeMap<String, String>,
    pub timestamp: Option<Timestamp>,
    pub location: Option<GeoLocation>,
}

impl SensorReading {
    pub fn new(measurement: Measurement) -> Self {
        SensorReading {
            measurement,
            metadata: BTreeMap::new(),
            timestamp: None,
            location: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> SensorKind {
        self.measurement.kind()
    }
}

// --- Discrete Result ---

/// Outcome of one data-assurance run.
///
/// Holds whatever was obtained; a run that ran out of attempts leaves the
/// missing kinds absent rather than failing. Check presence per kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteResult {
    requested: SensorSet,
    unconfigured: SensorSet,
    readings: [Option<SensorReading>; NUM_DISCRETE],
    attempts: usize,
}

impl DiscreteResult {
    pub(crate) fn new(requested: SensorSet) -> Self {
        DiscreteResult {
            requested,
            unconfigured: SensorSet::empty(),
            readings: Default::default(),
            attempts: 0,
        }
    }

    pub(crate) fn insert(&mut self, reading: SensorReading) {
        let kind = reading.kind();
        if kind.is_discrete() {
            self.readings[kind.ordinal() as usize] = Some(reading);
        }
    }

    pub(crate) fn mark_unconfigured(&mut self, kind: SensorKind) {
        // Only discrete kinds reach here; continuous ones are ignored by the set.
        let _ = self.unconfigured.insert(kind);
    }

    pub(crate) fn set_attempts(&mut self, attempts: usize) {
        self.attempts = attempts;
    }

    pub(crate) fn readings_mut(&mut self) -> impl Iterator<Item = &mut SensorReading> {
        self.readings.iter_mut().flatten()
    }

    /// Kinds the run was asked for.
    pub fn requested(&self) -> SensorSet {
        self.requested
    }

    /// Requested kinds skipped because no wire identifier was configured.
    pub fn unconfigured(&self) -> SensorSet {
        self.unconfigured
    }

    /// Number of request/response exchanges the run used.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn is_present(&self, kind: SensorKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn get(&self, kind: SensorKind) -> Option<&SensorReading> {
        if !kind.is_discrete() {
            return None;
        }
        self.readings[kind.ordinal() as usize].as_ref()
    }

    pub fn take(&mut self, kind: SensorKind) -> Option<SensorReading> {
        if !kind.is_discrete() {
            return None;
        }
        self.readings[kind.ordinal() as usize].take()
    }

    /// Requested kinds that are still absent.
    pub fn missing(&self) -> SensorSet {
        let mut present = SensorSet::empty();
        for kind in SensorKind::DISCRETE {
            if self.is_present(kind) {
                let _ = present.insert(kind);
            }
        }
        self.requested.difference(present)
    }

    /// True when every requested kind was obtained.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn temperature(&self) -> Option<f32> {
        self.get(SensorKind::Temperature)?.measurement.temperature()
    }

    /// `(systolic, diastolic)`.
    pub fn blood_pressure(&self) -> Option<(i32, i32)> {
        self.get(SensorKind::BloodPressure)?.measurement.blood_pressure()
    }

    pub fn pulse_rate(&self) -> Option<i32> {
        self.get(SensorKind::PulseRate)?.measurement.pulse_rate()
    }

    pub fn oximeter(&self) -> Option<f32> {
        self.get(SensorKind::Oximeter)?.measurement.oximeter()
    }

    /// `(conductance, resistance)`.
    pub fn gsr(&self) -> Option<(f32, f32)> {
        self.get(SensorKind::GalvanicSkinResponse)?.measurement.gsr()
    }
}
