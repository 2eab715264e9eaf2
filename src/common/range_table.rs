// src/common/range_table.rs

use super::range::Range;

/// One range per scalar the sensors report.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RangeTable {
    pub temperature: Range<f32>,
    pub systolic: Range<i32>,
    pub diastolic: Range<i32>,
    pub pulse_rate: Range<i32>,
    pub oximeter: Range<f32>,
    pub gsr_conductance: Range<f32>,
    pub gsr_resistance: Range<f32>,
    pub ecg: Range<f32>,
}

/// Application-facing ranges every reading is normalized into.
pub const STANDARD_RANGES: RangeTable = RangeTable {
    temperature: Range::from_bounds(0.0, 100.0),
    systolic: Range::from_bounds(50, 250),
    diastolic: Range::from_bounds(20, 150),
    pulse_rate: Range::from_bounds(20, 200),
    oximeter: Range::from_bounds(0.0, 100.0),
    gsr_conductance: Range::from_bounds(0.0, 5.0),
    gsr_resistance: Range::from_bounds(-100_000.0, 1_000_000.0),
    ecg: Range::from_bounds(0.0, 5.0),
};

/// Partial update for [`HardwareRanges`]. `None` keeps the current entry.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RangeUpdate {
    pub temperature: Option<Range<f32>>,
    pub systolic: Option<Range<i32>>,
    pub diastolic: Option<Range<i32>>,
    pub pulse_rate: Option<Range<i32>>,
    pub oximeter: Option<Range<f32>>,
    pub gsr_conductance: Option<Range<f32>>,
    pub gsr_resistance: Option<Range<f32>>,
    pub ecg: Option<Range<f32>>,
}

impl RangeUpdate {
    pub fn is_empty(&self) -> bool {
        *self == RangeUpdate::default()
    }

    pub fn with_temperature(mut self, range: Range<f32>) -> Self {
        self.temperature = Some(range);
        self
    }

    pub fn with_blood_pressure(mut self, systolic: Range<i32>, diastolic: Range<i32>) -> Self {
        self.systolic = Some(systolic);
        self.diastolic = Some(diastolic);
        self
    }

    pub fn with_pulse_rate(mut self, range: Range<i32>) -> Self {
        self.pulse_rate = Some(range);
        self
    }

    pub fn with_oximeter(mut self, range: Range<f32>) -> Self {
        self.oximeter = Some(range);
        self
    }

    pub fn with_gsr(mut self, conductance: Range<f32>, resistance: Range<f32>) -> Self {
        self.gsr_conductance = Some(conductance);
        self.gsr_resistance = Some(resistance);
        self
    }

    pub fn with_ecg(mut self, range: Range<f32>) -> Self {
        self.ecg = Some(range);
        self
    }
}

/// Ranges the connected hardware is expected to produce. Used to reject
/// out-of-range values and as the source range for normalization.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HardwareRanges {
    table: RangeTable,
}

impl HardwareRanges {
    pub fn new(table: RangeTable) -> Self {
        HardwareRanges { table }
    }

    #[inline]
    pub fn table(&self) -> &RangeTable {
        &self.table
    }

    /// Applies every present entry of `update`; absent entries are left as they were.
    pub fn set(&mut self, update: &RangeUpdate) {
        let t = &mut self.table;
        if let Some(r) = update.temperature {
            t.temperature = r;
        }
        if let Some(r) = update.systolic {
            t.systolic = r;
        }
        if let Some(r) = update.diastolic {
            t.diastolic = r;
        }
        if let Some(r) = update.pulse_rate {
            t.pulse_rate = r;
        }
        if let Some(r) = update.oximeter {
            t.oximeter = r;
        }
        if let Some(r) = update.gsr_conductance {
            t.gsr_conductance = r;
        }
        if let Some(r) = update.gsr_resistance {
            t.gsr_resistance = r;
        }
        if let Some(r) = update.ecg {
            t.ecg = r;
        }
    }

    /// Whether every entry still matches the standard table.
    pub fn is_standard(&self) -> bool {
        self.table == STANDARD_RANGES
    }
}

impl Default for HardwareRanges {
    fn default() -> Self {
        HardwareRanges::new(STANDARD_RANGES)
    }
}
