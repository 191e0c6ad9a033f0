//! # soilwatch
//!
//! Daily health classification and zone reporting for the LEO hillslope
//! soil-sensor network.
//!
//! Every day the loggers' last 24 hours of 5TM and MPS-2 readings are
//! exported per bay. This crate classifies each sensor, folds in the
//! masterlist's record of physically removed sensors, decides which zones
//! still have a working sensor, and writes the results out as CSV state
//! tables and a human-readable report.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Daily run                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │ source  │───▶│   run    │───▶│  data   │───▶│ report  │  │
//! │  │ (input) │    │ (pairs)  │    │(classify)    │ (sinks) │  │
//! │  └─────────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       ▲                                             │       │
//! │  FileSource | MemorySource          CsvSink | HtmlSink | JsonSink
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Input abstraction ([`DataSource`] trait) over the
//!   masterlists and series exports
//! - **[`run`]**: Evaluates every (bay, kind) pair, concurrently if allowed,
//!   isolating failures per pair
//! - **[`data`]**: Classification, removed-sensor reconciliation and zone
//!   aggregation
//! - **[`report`]**: Output sinks ([`ReportSink`] trait)
//! - **[`settings`]**: Layered configuration
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Evaluate every bay from ./data, write to ./outputs
//! soilwatch
//!
//! # One bay, explicit directories, plus a JSON export
//! soilwatch --bay W --data-dir /srv/leo/today --output-dir /srv/leo/out --export run.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::sync::Arc;
//! use soilwatch::{run, DataSource, MemorySource, RunPlan};
//! use soilwatch_types::{Bay, HealthState, SensorKind, SensorSeries, SeriesSet, Topology, ZoneState};
//!
//! let topology = Topology::builder()
//!     .zone("A", |z| z.location("1_1_1"))
//!     .build();
//! let mut series = SeriesSet::new();
//! series.insert("LEO-E_1_1_1_5TM".to_string(), SensorSeries::from(vec![20.5, 21.0]));
//!
//! let source: Arc<dyn DataSource> = Arc::new(
//!     MemorySource::new("doc")
//!         .with_topology(Bay::East, topology)
//!         .with_series(Bay::East, SensorKind::FiveTm, series),
//! );
//! let plan = RunPlan {
//!     bays: vec![Bay::East],
//!     kinds: vec![SensorKind::FiveTm],
//!     ..RunPlan::default()
//! };
//!
//! # tokio_test::block_on(async {
//! let outcome = run(source, &plan).await;
//! let evaluation = outcome.evaluation(Bay::East, SensorKind::FiveTm).unwrap();
//! assert_eq!(evaluation.sensors["LEO-E_1_1_1_5TM"], HealthState::Healthy);
//! assert_eq!(evaluation.zones["A"], ZoneState::Alive);
//! # });
//! ```

pub mod data;
pub mod report;
pub mod run;
pub mod settings;
pub mod source;

// Re-export main types for convenience
pub use data::{evaluate, Classifier, Evaluation, SensorFault, SensorProfile, Thresholds};
pub use report::{CsvSink, HtmlSink, JsonSink, Report, ReportSink, ReportWindow};
pub use run::{run, run_sequential, RunFailure, RunOutcome, RunPlan};
pub use settings::Settings;
pub use source::{DataSource, FileSource, MemorySource};
