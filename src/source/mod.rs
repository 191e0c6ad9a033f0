//! Data source abstraction for the daily inputs.
//!
//! This module provides a trait-based abstraction over where the topology and
//! the 24 hour series come from. The external export adapters write files
//! ([`FileSource`]); tests and embedding applications hand over materialized
//! data ([`MemorySource`]).

mod file;
mod memory;

pub use file::FileSource;
pub use memory::MemorySource;

use std::fmt::Debug;

use anyhow::Result;
use soilwatch_types::{Bay, SensorKind, SeriesSet, Topology};

/// Trait for loading the inputs of one evaluation.
///
/// Implementations must be shareable across worker threads: the runner may
/// load several (bay, kind) pairs at once.
///
/// # Example
///
/// ```
/// use soilwatch::{DataSource, FileSource};
/// use soilwatch_types::Bay;
///
/// let source = FileSource::new("masterlists");
/// if let Ok(topology) = source.topology(Bay::East) {
///     println!("{} zones", topology.len());
/// }
/// ```
pub trait DataSource: Send + Sync + Debug {
    /// Load the zone topology of a bay.
    fn topology(&self, bay: Bay) -> Result<Topology>;

    /// Load the series of every sensor of one kind in a bay.
    fn series(&self, bay: Bay, kind: SensorKind) -> Result<SeriesSet>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
