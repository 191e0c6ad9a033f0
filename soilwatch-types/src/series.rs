//! Reading sequences for the reporting window.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// A single numeric measurement. The sensor's no-data sentinel may appear here.
pub type Reading = f64;

/// Readings for one sensor over the window, ordered by timestamp ascending.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SensorSeries(Vec<Reading>);

impl SensorSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.0
    }

    pub fn push(&mut self, reading: Reading) {
        self.0.push(reading);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Reading>> for SensorSeries {
    fn from(readings: Vec<Reading>) -> Self {
        Self(readings)
    }
}

impl FromIterator<Reading> for SensorSeries {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Series for every sensor of one bay and kind, keyed by canonical name.
pub type SeriesSet = BTreeMap<String, SensorSeries>;
