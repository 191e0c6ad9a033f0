use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Parser;
use soilwatch::report::deliver_all;
use soilwatch::{
    run, CsvSink, DataSource, FileSource, HtmlSink, JsonSink, Report, ReportSink, ReportWindow,
    RunOutcome, Settings,
};
use soilwatch_types::{Bay, HealthState};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "soilwatch")]
#[command(about = "Daily sensor and zone health report for the LEO hillslope bays")]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the masterlists and series exports
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Directory receiving the state tables and the HTML report
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Bay to evaluate (E, C or W); repeat for several. Defaults to every bay
    #[arg(short, long = "bay", value_name = "BAY")]
    bays: Vec<Bay>,

    /// Evaluate one (bay, kind) pair at a time
    #[arg(long)]
    sequential: bool,

    /// Also export the whole run to a JSON file
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Day the report window ends on (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let settings = load_settings(&args)?;
    let window = args
        .date
        .map(ReportWindow::ending_on)
        .unwrap_or_else(ReportWindow::ending_today);

    let source: Arc<dyn DataSource> = Arc::new(FileSource::new(&settings.data_dir));
    let plan = settings.plan();

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(run(source, &plan));
    print_summary(&outcome);

    let nothing_evaluated = outcome.evaluations.is_empty();
    let report = Report::new(window, outcome);

    let mut sinks: Vec<Box<dyn ReportSink>> = vec![
        Box::new(CsvSink::new(&settings.output_dir)),
        Box::new(HtmlSink::new(&settings.output_dir)),
    ];
    if let Some(path) = args.export {
        sinks.push(Box::new(JsonSink::new(path)));
    }
    deliver_all(&report, &sinks)?;

    if nothing_evaluated {
        bail!("no bay could be evaluated");
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Settings from file and environment, then command line overrides.
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;

    if let Some(dir) = &args.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }
    if !args.bays.is_empty() {
        settings.bays = args.bays.clone();
    }
    if args.sequential {
        settings.parallel = false;
    }

    info!(
        data_dir = %settings.data_dir.display(),
        output_dir = %settings.output_dir.display(),
        bays = ?settings.bays,
        parallel = settings.parallel,
        "settings loaded"
    );
    Ok(settings)
}

fn print_summary(outcome: &RunOutcome) {
    for evaluation in &outcome.evaluations {
        println!(
            "{} {:<5} sensors: {:>3} healthy, {:>3} outlier, {:>3} intermittent, {:>3} down, {:>3} removed | zones down: {}/{}",
            evaluation.bay.label(),
            evaluation.kind.label(),
            evaluation.count(HealthState::Healthy),
            evaluation.count(HealthState::Outlier),
            evaluation.count(HealthState::Intermittent),
            evaluation.count(HealthState::Dead),
            evaluation.count(HealthState::Removed),
            evaluation.zones_down(),
            evaluation.zones.len(),
        );
    }
    for failure in &outcome.failures {
        println!(
            "{} {:<5} failed: {}",
            failure.bay.label(),
            failure.kind.label(),
            failure.error
        );
    }
}
