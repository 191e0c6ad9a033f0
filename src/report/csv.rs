//! CSV state files.
//!
//! Two files per bay and sensor kind, each a `name,code` table:
//!
//! ```text
//! sensor_health_<B><suffix>.csv   "sensor name,state"
//! zone_health_<B><suffix>.csv     "zone,state"
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use soilwatch_types::{Bay, SensorKind};
use tracing::debug;

use super::{Report, ReportSink};
use crate::data::Evaluation;

/// File name of the sensor state table for a bay and kind.
pub fn sensor_file_name(bay: Bay, kind: SensorKind) -> String {
    format!("sensor_health_{}{}.csv", bay.code(), kind.file_suffix())
}

/// File name of the zone state table for a bay and kind.
pub fn zone_file_name(bay: Bay, kind: SensorKind) -> String {
    format!("zone_health_{}{}.csv", bay.code(), kind.file_suffix())
}

/// Write the sensor state table.
pub fn write_sensor_health<W: Write>(writer: W, evaluation: &Evaluation) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["sensor name", "state"])?;
    for (name, state) in &evaluation.sensors {
        csv.write_record([name.as_str(), &state.code().to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the zone state table.
pub fn write_zone_health<W: Write>(writer: W, evaluation: &Evaluation) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["zone", "state"])?;
    for (zone, state) in &evaluation.zones {
        csv.write_record([zone.as_str(), &state.code().to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes the state tables of every evaluation into one directory.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
    description: String,
}

impl CsvSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let description = format!("csv: {}", dir.display());
        Self { dir, description }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn create(&self, name: &str) -> Result<File> {
        let path = self.dir.join(name);
        File::create(&path).with_context(|| format!("creating {}", path.display()))
    }
}

impl ReportSink for CsvSink {
    fn deliver(&self, report: &Report) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;

        for evaluation in &report.outcome.evaluations {
            let (bay, kind) = (evaluation.bay, evaluation.kind);

            let name = sensor_file_name(bay, kind);
            write_sensor_health(self.create(&name)?, evaluation)
                .with_context(|| format!("writing {}", name))?;

            let name = zone_file_name(bay, kind);
            write_zone_health(self.create(&name)?, evaluation)
                .with_context(|| format!("writing {}", name))?;

            debug!(bay = %bay, kind = %kind, dir = %self.dir.display(), "wrote state tables");
        }
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
