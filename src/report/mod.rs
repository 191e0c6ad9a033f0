//! Reporting bridge.
//!
//! A [`Report`] bundles the run outcome with the window it covers. Sinks turn
//! it into artifacts: CSV state files for downstream consumers, an HTML
//! summary for people, and a JSON export. Delivery mechanisms such as email
//! plug in as further [`ReportSink`] implementations.

pub mod csv;
pub mod html;
pub mod json;
mod window;

pub use self::csv::CsvSink;
pub use html::HtmlSink;
pub use json::JsonSink;
pub use window::ReportWindow;

use std::fmt::Debug;

use anyhow::{bail, Result};
use tracing::{error, info};

use crate::run::RunOutcome;

/// Title used by human-facing renderings.
pub const REPORT_TITLE: &str = "Zone & Sensor Health Report";

/// A finished daily run, ready to be written out.
#[derive(Debug, Clone)]
pub struct Report {
    pub window: ReportWindow,
    pub outcome: RunOutcome,
}

impl Report {
    pub fn new(window: ReportWindow, outcome: RunOutcome) -> Self {
        Self { window, outcome }
    }
}

/// Destination for a finished report.
pub trait ReportSink: Debug {
    /// Write or send the report.
    fn deliver(&self, report: &Report) -> Result<()>;

    /// Returns a human-readable description of the destination.
    fn description(&self) -> &str;
}

/// Deliver a report to every sink. A failing sink does not stop the others.
pub fn deliver_all(report: &Report, sinks: &[Box<dyn ReportSink>]) -> Result<()> {
    let mut failed = Vec::new();

    for sink in sinks {
        match sink.deliver(report) {
            Ok(()) => info!(sink = sink.description(), "report delivered"),
            Err(e) => {
                error!(sink = sink.description(), error = %format!("{:#}", e), "report delivery failed");
                failed.push(sink.description().to_string());
            }
        }
    }

    if !failed.is_empty() {
        bail!("report delivery failed for: {}", failed.join(", "));
    }
    Ok(())
}
