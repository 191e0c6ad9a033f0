//! # soilwatch-adapters
//!
//! Readers for the artifacts produced by the external collaborators of the
//! health engine: the database export adapter and the masterlist builder.
//!
//! ## Supported Inputs
//!
//! - **Series exports** ([`series`]) - header-less CSV with one row of readings
//!   per sensor. Malformed tokens are dropped and counted.
//! - **Masterlists** ([`masterlist`]) - JSON zone → location → record
//!   documents, in either the positional spreadsheet-row form or named form.
//!
//! ## Quick Start
//!
//! ```rust
//! use soilwatch_adapters::{masterlist, series};
//! use soilwatch_types::SensorKind;
//!
//! let ingest = series::read_series("LEO-E_1_1_1_5TM,5.0,x,7.2\n".as_bytes())?;
//! assert_eq!(ingest.series["LEO-E_1_1_1_5TM"].len(), 2);
//! assert_eq!(ingest.dropped_total(), 1);
//!
//! let topology = masterlist::read_topology(
//!     r#"{"A": {"1_1_1": ["1_1_1", "", "", "removed", "A", 1]}}"#.as_bytes(),
//! )?;
//! assert!(topology.is_pre_removed("1_1_1", SensorKind::FiveTm));
//! # Ok::<(), soilwatch_adapters::AdapterError>(())
//! ```

pub mod error;
pub mod masterlist;
pub mod series;

pub use error::AdapterError;
pub use series::SeriesIngest;

// Re-export types for convenience
pub use soilwatch_types::{SensorSeries, SeriesSet, Topology};
