//! File-based data source.
//!
//! Reads the masterlist JSON and series CSV files left behind by the export
//! adapters.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use soilwatch_adapters::{masterlist, series};
use soilwatch_types::{Bay, SensorKind, SeriesSet, Topology};
use tracing::{debug, warn};

use super::DataSource;

/// A data source that reads one directory of daily export files.
///
/// Expected layout, per bay stem (`east`, `center`, `west`):
///
/// ```text
/// <root>/sensor_status_<stem>.json     topology (masterlist)
/// <root>/true_data_<stem>.csv          5TM series
/// <root>/true_data_<stem>_mps.csv      MPS-2 series
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source rooted at the given directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let description = format!("files: {}", root.display());
        Self { root, description }
    }

    /// Returns the directory being read.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the masterlist for a bay.
    pub fn topology_path(&self, bay: Bay) -> PathBuf {
        self.root.join(format!("sensor_status_{}.json", bay.stem()))
    }

    /// Path of the series export for a bay and sensor kind.
    pub fn series_path(&self, bay: Bay, kind: SensorKind) -> PathBuf {
        self.root
            .join(format!("true_data_{}{}.csv", bay.stem(), kind.file_suffix()))
    }
}

impl DataSource for FileSource {
    fn topology(&self, bay: Bay) -> Result<Topology> {
        let path = self.topology_path(bay);
        let topology = masterlist::read_topology_file(&path)
            .with_context(|| format!("loading topology for bay {}", bay))?;
        debug!(
            path = %path.display(),
            zones = topology.len(),
            locations = topology.location_count(),
            "loaded topology"
        );
        Ok(topology)
    }

    fn series(&self, bay: Bay, kind: SensorKind) -> Result<SeriesSet> {
        let path = self.series_path(bay, kind);
        let ingest = series::read_series_file(&path)
            .with_context(|| format!("loading {} series for bay {}", kind, bay))?;

        for (sensor, dropped) in &ingest.dropped {
            warn!(sensor = %sensor, dropped, "dropped malformed readings");
        }
        for sensor in &ingest.duplicates {
            warn!(sensor = %sensor, path = %path.display(), "duplicate series row, keeping the last");
        }
        if ingest.unnamed_rows > 0 {
            warn!(
                rows = ingest.unnamed_rows,
                path = %path.display(),
                "skipped rows without a sensor name"
            );
        }
        debug!(path = %path.display(), sensors = ingest.series.len(), "loaded series");

        Ok(ingest.series)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
