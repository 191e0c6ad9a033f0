//! In-memory data source.

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use soilwatch_types::{Bay, SensorKind, SeriesSet, Topology};

use super::DataSource;

/// A data source over already materialized inputs.
///
/// # Example
///
/// ```
/// use soilwatch::{DataSource, MemorySource};
/// use soilwatch_types::{Bay, SensorKind, SeriesSet, Topology};
///
/// let source = MemorySource::new("fixture")
///     .with_topology(Bay::East, Topology::builder().zone("A", |z| z.location("1_1_1")).build())
///     .with_series(Bay::East, SensorKind::FiveTm, SeriesSet::new());
///
/// assert_eq!(source.topology(Bay::East).unwrap().len(), 1);
/// assert!(source.series(Bay::West, SensorKind::FiveTm).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    topologies: BTreeMap<Bay, Topology>,
    series: BTreeMap<(Bay, SensorKind), SeriesSet>,
    description: String,
}

impl MemorySource {
    pub fn new(source_description: &str) -> Self {
        Self {
            description: format!("memory: {}", source_description),
            ..Self::default()
        }
    }

    pub fn with_topology(mut self, bay: Bay, topology: Topology) -> Self {
        self.topologies.insert(bay, topology);
        self
    }

    pub fn with_series(mut self, bay: Bay, kind: SensorKind, series: SeriesSet) -> Self {
        self.series.insert((bay, kind), series);
        self
    }
}

impl DataSource for MemorySource {
    fn topology(&self, bay: Bay) -> Result<Topology> {
        self.topologies
            .get(&bay)
            .cloned()
            .ok_or_else(|| anyhow!("no topology for bay {}", bay))
    }

    fn series(&self, bay: Bay, kind: SensorKind) -> Result<SeriesSet> {
        self.series
            .get(&(bay, kind))
            .cloned()
            .ok_or_else(|| anyhow!("no {} series for bay {}", kind, bay))
    }

    fn description(&self) -> &str {
        &self.description
    }
}
