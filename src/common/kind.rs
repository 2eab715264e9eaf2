// src/common/kind.rs

use super::error::ConfigError;
use arrayvec::ArrayVec;
use core::fmt;

/// Number of discrete (single-shot) sensor kinds. They occupy bits 0..5 of
/// the request byte.
pub const NUM_DISCRETE: usize = 5;

// --- Sensor Kinds ---

/// The sensors the protocol knows about.
///
/// The ordinal doubles as the bit index in request bytes. Discrete kinds come
/// first, continuous kinds after them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum SensorKind {
    Temperature = 0,
    BloodPressure = 1,
    PulseRate = 2,
    Oximeter = 3,
    GalvanicSkinResponse = 4,
    /// Single-lead ECG, streamed.
    Ecg = 5,
}

impl SensorKind {
    /// Discrete kinds in ordinal order.
    pub const DISCRETE: [SensorKind; NUM_DISCRETE] = [
        SensorKind::Temperature,
        SensorKind::BloodPressure,
        SensorKind::PulseRate,
        SensorKind::Oximeter,
        SensorKind::GalvanicSkinResponse,
    ];

    /// Tries to convert an ordinal into a SensorKind.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SensorKind::Temperature),
            1 => Some(SensorKind::BloodPressure),
            2 => Some(SensorKind::PulseRate),
            3 => Some(SensorKind::Oximeter),
            4 => Some(SensorKind::GalvanicSkinResponse),
            5 => Some(SensorKind::Ecg),
            _ => None,
        }
    }

    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Request-byte bit for this kind (`1 << ordinal`).
    #[inline]
    pub const fn request_bit(self) -> u8 {
        1 << (self as u8)
    }

    #[inline]
    pub const fn is_discrete(self) -> bool {
        (self as usize) < NUM_DISCRETE
    }

    pub const fn name(self) -> &'static str {
        match self {
            SensorKind::Temperature => "Temperature",
            SensorKind::BloodPressure => "Blood Pressure",
            SensorKind::PulseRate => "Pulse Rate",
            SensorKind::Oximeter => "Oximeter",
            SensorKind::GalvanicSkinResponse => "GSR",
            SensorKind::Ecg => "ECG",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// --- Discrete Sensor Set ---

/// Set of discrete sensor kinds, stored as the request bitmask itself.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct SensorSet(u8);

impl SensorSet {
    const MASK: u8 = (1 << NUM_DISCRETE) - 1;

    pub const fn empty() -> Self {
        SensorSet(0)
    }

    pub const fn all() -> Self {
        SensorSet(Self::MASK)
    }

    /// Builds a set from raw request bits. Bits outside the discrete range
    /// are dropped.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        SensorSet(bits & Self::MASK)
    }

    /// Builds a set from a list of kinds, rejecting continuous ones.
    pub fn from_kinds(kinds: &[SensorKind]) -> Result<Self, ConfigError> {
        let mut set = SensorSet::empty();
        for kind in kinds {
            set.insert(*kind)?;
        }
        Ok(set)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, kind: SensorKind) -> bool {
        kind.is_discrete() && self.0 & kind.request_bit() != 0
    }

    pub fn insert(&mut self, kind: SensorKind) -> Result<(), ConfigError> {
        if !kind.is_discrete() {
            return Err(ConfigError::NotDiscrete(kind));
        }
        self.0 |= kind.request_bit();
        Ok(())
    }

    pub fn remove(&mut self, kind: SensorKind) {
        if kind.is_discrete() {
            self.0 &= !kind.request_bit();
        }
    }

    /// Members of `self` not in `other`.
    pub const fn difference(self, other: SensorSet) -> SensorSet {
        SensorSet(self.0 & !other.0)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in ordinal order.
    pub fn kinds(self) -> ArrayVec<SensorKind, NUM_DISCRETE> {
        SensorKind::DISCRETE
            .iter()
            .copied()
            .filter(|k| self.contains(*k))
            .collect()
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_u8() {
        assert_eq!(SensorKind::from_u8(0), Some(SensorKind::Temperature));
        assert_eq!(SensorKind::from_u8(4), Some(SensorKind::GalvanicSkinResponse));
        assert_eq!(SensorKind::from_u8(5), Some(SensorKind::Ecg));
        assert_eq!(SensorKind::from_u8(6), None);
        for kind in SensorKind::DISCRETE {
            assert_eq!(SensorKind::from_u8(kind.ordinal()), Some(kind));
        }
    }

    #[test]
    fn test_request_bits() {
        assert_eq!(SensorKind::Temperature.request_bit(), 0b0000_0001);
        assert_eq!(SensorKind::GalvanicSkinResponse.request_bit(), 0b0001_0000);
        assert_eq!(SensorKind::Ecg.request_bit(), 0b0010_0000);
        assert!(!SensorKind::Ecg.is_discrete());
    }

    #[test]
    fn test_set_rejects_continuous() {
        let mut set = SensorSet::empty();
        assert_eq!(
            set.insert(SensorKind::Ecg),
            Err(ConfigError::NotDiscrete(SensorKind::Ecg))
        );
        assert!(set.is_empty());
    }

    #[test]
    fn test_set_membership_and_order() {
        let set = SensorSet::from_kinds(&[SensorKind::Oximeter, SensorKind::Temperature]).unwrap();
        assert_eq!(set.bits(), 0b0000_1001);
        assert_eq!(set.len(), 2);
        assert_eq!(set.kinds().as_slice(), &[SensorKind::Temperature, SensorKind::Oximeter]);

        let rest = set.difference(SensorSet::from_kinds(&[SensorKind::Temperature]).unwrap());
        assert_eq!(rest.kinds().as_slice(), &[SensorKind::Oximeter]);
    }

    #[test]
    fn test_from_bits_truncate_drops_metadata_bit() {
        assert_eq!(SensorSet::from_bits_truncate(0xFF), SensorSet::all());
        assert!(!SensorSet::all().contains(SensorKind::Ecg));
    }
}
