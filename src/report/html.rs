//! HTML summary for people.
//!
//! One section per bay, one subsection per sensor kind. Each subsection lists
//! the zone states, then the sensors that are down (with their zone), the
//! intermittent ones and the ones with outliers.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use soilwatch_types::{Bay, HealthState, SensorKind};

use super::{Report, ReportSink, REPORT_TITLE};
use crate::data::Evaluation;
use crate::run::RunFailure;

/// File name of the rendered report.
pub const REPORT_FILE_NAME: &str = "zone_sensor_health_report.html";

const RULE: &str =
    "<hr style=\"height:5px; background:#000; color: #000; border-width:0\">\n";

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn table<'a, I>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<&'a str>>,
{
    let mut html = String::from("<table border=\"2\">\n  <thead>\n    <tr>");
    for header in headers {
        html.push_str(&format!("<th>{}</th>", escape(header)));
    }
    html.push_str("</tr>\n  </thead>\n  <tbody>\n");
    for row in rows {
        html.push_str("    <tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("  </tbody>\n</table>\n");
    html
}

fn sensor_table(evaluation: &Evaluation, state: HealthState) -> String {
    table(
        &["sensor name", "state"],
        evaluation
            .sensors_in(state)
            .map(|name| vec![name, state.description()]),
    )
}

fn render_evaluation(evaluation: &Evaluation) -> String {
    let label = evaluation.kind.label();
    let mut html = String::new();

    html.push_str(&format!("<h3>Zones status - {}</h3>\n", label));
    html.push_str(&table(
        &["zone", "state"],
        evaluation
            .zones
            .iter()
            .map(|(zone, state)| vec![zone.as_str(), state.description()]),
    ));

    html.push_str("<h3>Sensors that are down.</h3>\n");
    html.push_str(&table(
        &["sensor name", "state", "zone"],
        evaluation.sensors_in(HealthState::Dead).map(|name| {
            vec![
                name,
                HealthState::Dead.description(),
                evaluation.zone_of(name).unwrap_or(""),
            ]
        }),
    ));

    html.push_str("<h3>Sensors that are coming in and out of reporting values.</h3>\n");
    html.push_str(&sensor_table(evaluation, HealthState::Intermittent));

    html.push_str("<h3>Sensors that are reporting outlier values.</h3>\n");
    html.push_str(&sensor_table(evaluation, HealthState::Outlier));

    let issues: Vec<String> = evaluation
        .faults
        .iter()
        .map(|f| f.to_string())
        .chain(
            evaluation
                .unknown
                .iter()
                .map(|name| format!("{}: location is in no zone", name)),
        )
        .chain(
            evaluation
                .missing
                .iter()
                .map(|name| format!("{}: no data received", name)),
        )
        .collect();
    if !issues.is_empty() {
        html.push_str("<h3>Data issues.</h3>\n<ul>\n");
        for issue in &issues {
            html.push_str(&format!("  <li>{}</li>\n", escape(issue)));
        }
        html.push_str("</ul>\n");
    }

    html
}

fn render_failure(failure: &RunFailure) -> String {
    format!(
        "<p><b>Report unavailable:</b> {}</p>\n",
        escape(&failure.error)
    )
}

/// Render the whole report as one HTML document.
pub fn render(report: &Report) -> String {
    let outcome = &report.outcome;
    let mut html = String::from("<html>\n<body>\n");

    html.push_str(&format!("<h2>{}</h2>\n", escape(REPORT_TITLE)));
    html.push_str(&format!(
        "<p>Start: {}<br>End: {}</p>\n",
        report.window.start_label(),
        report.window.end_label()
    ));
    html.push_str(RULE);

    for bay in Bay::ALL {
        let kinds: Vec<SensorKind> = SensorKind::ALL
            .into_iter()
            .filter(|kind| {
                outcome.evaluation(bay, *kind).is_some()
                    || outcome
                        .failures
                        .iter()
                        .any(|f| f.bay == bay && f.kind == *kind)
            })
            .collect();
        if kinds.is_empty() {
            continue;
        }

        html.push_str(&format!("<h1>{}</h1>\n", bay.label()));
        for kind in kinds {
            html.push_str(&format!("<h2>{} report - {}</h2>\n", kind.label(), bay.label()));
            if let Some(evaluation) = outcome.evaluation(bay, kind) {
                html.push_str(&render_evaluation(evaluation));
            }
            for failure in outcome
                .failures
                .iter()
                .filter(|f| f.bay == bay && f.kind == kind)
            {
                html.push_str(&render_failure(failure));
            }
            html.push_str(RULE);
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Writes the HTML summary into a directory.
#[derive(Debug, Clone)]
pub struct HtmlSink {
    path: PathBuf,
    description: String,
}

impl HtmlSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let path = dir.as_ref().join(REPORT_FILE_NAME);
        let description = format!("html: {}", path.display());
        Self { path, description }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for HtmlSink {
    fn deliver(&self, report: &Report) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&self.path, render(report))
            .with_context(|| format!("writing {}", self.path.display()))
    }

    fn description(&self) -> &str {
        &self.description
    }
}
