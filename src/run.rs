//! Daily run over every bay and sensor kind.
//!
//! Each (bay, kind) pair is independent: it loads its own inputs and produces
//! its own [`Evaluation`]. Pairs can run concurrently on blocking worker tasks;
//! results are always returned in plan order.

use std::sync::Arc;

use anyhow::Result;
use soilwatch_types::{Bay, SensorKind};
use tracing::{error, info};

use crate::data::{evaluate, Classifier, Evaluation, Thresholds};
use crate::source::DataSource;

/// What to evaluate and how.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub bays: Vec<Bay>,
    pub kinds: Vec<SensorKind>,
    pub thresholds: Thresholds,
    /// Evaluate pairs concurrently.
    pub parallel: bool,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            bays: Bay::ALL.to_vec(),
            kinds: SensorKind::ALL.to_vec(),
            thresholds: Thresholds::default(),
            parallel: true,
        }
    }
}

impl RunPlan {
    /// All (bay, kind) pairs in reporting order.
    pub fn pairs(&self) -> Vec<(Bay, SensorKind)> {
        self.bays
            .iter()
            .flat_map(|bay| self.kinds.iter().map(move |kind| (*bay, *kind)))
            .collect()
    }
}

/// A (bay, kind) pair whose inputs could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    pub bay: Bay,
    pub kind: SensorKind,
    pub error: String,
}

/// Everything produced by one run.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub evaluations: Vec<Evaluation>,
    pub failures: Vec<RunFailure>,
}

impl RunOutcome {
    pub fn evaluation(&self, bay: Bay, kind: SensorKind) -> Option<&Evaluation> {
        self.evaluations
            .iter()
            .find(|e| e.bay == bay && e.kind == kind)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, bay: Bay, kind: SensorKind, result: Result<Evaluation>) {
        match result {
            Ok(evaluation) => self.evaluations.push(evaluation),
            Err(e) => {
                error!(bay = %bay, kind = %kind, error = %format!("{:#}", e), "evaluation failed");
                self.failures.push(RunFailure {
                    bay,
                    kind,
                    error: format!("{:#}", e),
                });
            }
        }
    }
}

/// Load the inputs of one pair and evaluate them.
pub fn evaluate_pair(
    source: &dyn DataSource,
    bay: Bay,
    kind: SensorKind,
    classifier: &Classifier,
) -> Result<Evaluation> {
    let topology = source.topology(bay)?;
    let series = source.series(bay, kind)?;
    Ok(evaluate(bay, kind, &series, &topology, classifier))
}

/// Evaluate every pair of the plan one after another.
pub fn run_sequential(source: &dyn DataSource, plan: &RunPlan) -> RunOutcome {
    let classifier = Classifier::new(plan.thresholds.clone());
    let mut outcome = RunOutcome::default();

    info!(source = source.description(), pairs = plan.pairs().len(), "starting run");
    for (bay, kind) in plan.pairs() {
        outcome.record(bay, kind, evaluate_pair(source, bay, kind, &classifier));
    }

    outcome
}

/// Evaluate every pair of the plan, concurrently when the plan allows it.
pub async fn run(source: Arc<dyn DataSource>, plan: &RunPlan) -> RunOutcome {
    if !plan.parallel {
        return run_sequential(source.as_ref(), plan);
    }

    let classifier = Arc::new(Classifier::new(plan.thresholds.clone()));
    info!(
        source = source.description(),
        pairs = plan.pairs().len(),
        "starting parallel run"
    );

    let handles: Vec<_> = plan
        .pairs()
        .into_iter()
        .map(|(bay, kind)| {
            let source = Arc::clone(&source);
            let classifier = Arc::clone(&classifier);
            let handle = tokio::task::spawn_blocking(move || {
                evaluate_pair(source.as_ref(), bay, kind, &classifier)
            });
            (bay, kind, handle)
        })
        .collect();

    let mut outcome = RunOutcome::default();
    for (bay, kind, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("evaluation task failed: {}", e)),
        };
        outcome.record(bay, kind, result);
    }

    outcome
}
