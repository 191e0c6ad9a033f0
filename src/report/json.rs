//! JSON export of a whole run.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use soilwatch_types::HealthState;

use super::{Report, ReportSink};
use crate::data::Evaluation;

fn export_evaluation(evaluation: &Evaluation) -> Value {
    let mut counts = Map::new();
    for state in HealthState::ALL {
        counts.insert(
            format!("{:?}", state).to_lowercase(),
            json!(evaluation.count(state)),
        );
    }

    json!({
        "bay": evaluation.bay,
        "kind": evaluation.kind,
        "counts": counts,
        "zones_down": evaluation.zones_down(),
        "removed_overrides": evaluation.removed_overrides,
        "sensors": evaluation.sensors,
        "zones": evaluation.zones,
        "faults": evaluation.faults,
        "unknown": evaluation.unknown,
        "missing": evaluation.missing,
        "invalid_locations": evaluation.invalid_locations,
    })
}

/// Build the export document for a report.
pub fn export(report: &Report) -> Value {
    let outcome = &report.outcome;
    let mut export = Map::new();

    let mut summary = Map::new();
    summary.insert("start".to_string(), json!(report.window.start_label()));
    summary.insert("end".to_string(), json!(report.window.end_label()));
    summary.insert("evaluations".to_string(), json!(outcome.evaluations.len()));
    summary.insert("failures".to_string(), json!(outcome.failures.len()));

    let sensors: usize = outcome.evaluations.iter().map(|e| e.sensors.len()).sum();
    let zones: usize = outcome.evaluations.iter().map(|e| e.zones.len()).sum();
    let zones_down: usize = outcome.evaluations.iter().map(|e| e.zones_down()).sum();
    summary.insert("sensors".to_string(), json!(sensors));
    summary.insert("zones".to_string(), json!(zones));
    summary.insert("zones_down".to_string(), json!(zones_down));

    export.insert("summary".to_string(), Value::Object(summary));

    let evaluations: Vec<Value> = outcome.evaluations.iter().map(export_evaluation).collect();
    export.insert("evaluations".to_string(), Value::Array(evaluations));

    let failures: Vec<Value> = outcome
        .failures
        .iter()
        .map(|f| {
            json!({
                "bay": f.bay,
                "kind": f.kind,
                "error": f.error,
            })
        })
        .collect();
    export.insert("failures".to_string(), Value::Array(failures));

    Value::Object(export)
}

/// Writes the JSON export to a file.
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
    description: String,
}

impl JsonSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("json: {}", path.display());
        Self { path, description }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for JsonSink {
    fn deliver(&self, report: &Report) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&export(report))?;
        let mut file = File::create(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
