//! Deployment topology: zones, the locations they contain, and removal status.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::SensorKind;

/// Zone identifier as used in the masterlist.
pub type ZoneId = String;

/// Masterlist entry for one location within a zone.
///
/// The removal lists are free-form annotations copied from the masterlist; a
/// non-empty list for a sensor kind means that sensor was already pulled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationRecord {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub notes: Option<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub removed_5tm: Vec<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub removed_mps2: Vec<String>,

    /// Installation depth/height taken from the third location coordinate.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub height: Option<i64>,
}

impl LocationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removal annotations for the given sensor kind.
    pub fn removed(&self, kind: SensorKind) -> &[String] {
        match kind {
            SensorKind::FiveTm => &self.removed_5tm,
            SensorKind::Mps2 => &self.removed_mps2,
        }
    }

    /// Whether the sensor of this kind is known to be removed.
    pub fn is_removed(&self, kind: SensorKind) -> bool {
        !self.removed(kind).is_empty()
    }

    /// Add a removal annotation for a sensor kind.
    pub fn mark_removed(&mut self, kind: SensorKind, note: impl Into<String>) {
        match kind {
            SensorKind::FiveTm => self.removed_5tm.push(note.into()),
            SensorKind::Mps2 => self.removed_mps2.push(note.into()),
        }
    }
}

/// Locations of a single zone, keyed by location code.
pub type ZoneRecords = BTreeMap<String, LocationRecord>;

/// Zone to location mapping for one bay.
///
/// # Example
///
/// ```rust
/// use soilwatch_types::{SensorKind, Topology};
///
/// let topology = Topology::builder()
///     .zone("A", |z| z.location("1_1_1").removed("1_1_2", SensorKind::Mps2, "pulled 2024"))
///     .zone("B", |z| z.location("2_1_1"))
///     .build();
///
/// assert_eq!(topology.zone_of("1_1_2"), Some("A"));
/// assert!(topology.is_pre_removed("1_1_2", SensorKind::Mps2));
/// assert!(!topology.is_pre_removed("1_1_2", SensorKind::FiveTm));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Topology {
    zones: BTreeMap<ZoneId, ZoneRecords>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> TopologyBuilder {
        TopologyBuilder::new()
    }

    /// Insert or replace a zone.
    pub fn insert_zone(&mut self, zone: impl Into<ZoneId>, records: ZoneRecords) {
        self.zones.insert(zone.into(), records);
    }

    pub fn zone(&self, zone: &str) -> Option<&ZoneRecords> {
        self.zones.get(zone)
    }

    pub fn zones(&self) -> impl Iterator<Item = (&ZoneId, &ZoneRecords)> {
        self.zones.iter()
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// First zone (in zone order) containing the location.
    pub fn zone_of(&self, location: &str) -> Option<&str> {
        self.zones
            .iter()
            .find(|(_, records)| records.contains_key(location))
            .map(|(zone, _)| zone.as_str())
    }

    pub fn contains_location(&self, location: &str) -> bool {
        self.zone_of(location).is_some()
    }

    /// Whether any zone lists the location as removed for the sensor kind.
    pub fn is_pre_removed(&self, location: &str, kind: SensorKind) -> bool {
        self.zones
            .values()
            .filter_map(|records| records.get(location))
            .any(|record| record.is_removed(kind))
    }

    /// Total number of locations across all zones.
    pub fn location_count(&self) -> usize {
        self.zones.values().map(|records| records.len()).sum()
    }
}

impl FromIterator<(ZoneId, ZoneRecords)> for Topology {
    fn from_iter<I: IntoIterator<Item = (ZoneId, ZoneRecords)>>(iter: I) -> Self {
        Self {
            zones: iter.into_iter().collect(),
        }
    }
}

/// Builder for `Topology`.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    zones: BTreeMap<ZoneId, ZoneRecords>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone with locations built using a closure.
    pub fn zone<F>(mut self, zone: impl Into<ZoneId>, f: F) -> Self
    where
        F: FnOnce(ZoneBuilder) -> ZoneBuilder,
    {
        let records = f(ZoneBuilder::default()).records;
        self.zones.insert(zone.into(), records);
        self
    }

    pub fn build(self) -> Topology {
        Topology { zones: self.zones }
    }
}

/// Builder for the locations of a single zone.
#[derive(Debug, Default)]
pub struct ZoneBuilder {
    records: ZoneRecords,
}

impl ZoneBuilder {
    /// Add an active location.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.records.entry(location.into()).or_default();
        self
    }

    /// Add a location whose sensor of `kind` has been removed.
    pub fn removed(mut self, location: impl Into<String>, kind: SensorKind, note: impl Into<String>) -> Self {
        self.records
            .entry(location.into())
            .or_default()
            .mark_removed(kind, note);
        self
    }

    /// Add a location with a pre-built record.
    pub fn record(mut self, location: impl Into<String>, record: LocationRecord) -> Self {
        self.records.insert(location.into(), record);
        self
    }
}
