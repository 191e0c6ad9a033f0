//! # soilwatch-types
//!
//! Core types for hillslope soil-sensor health monitoring. This crate defines
//! the data model shared by the ingestion adapters, the health engine and the
//! report writers.
//!
//! ## Design Goals
//!
//! - **No logic beyond shaping data**: classification and aggregation live in
//!   the `soilwatch` crate
//! - **Structured identities**: canonical sensor names are parsed once into
//!   [`SensorId`] instead of being sliced apart at every use site
//! - **Distinct state enums**: [`HealthState`] and [`ZoneState`] share integer
//!   codes on the wire but never in memory
//! - **Optional serialization**: enable the `serde` feature as needed
//!
//! ## Example
//!
//! ```rust
//! use soilwatch_types::{Bay, HealthState, SensorId, SensorKind, Topology};
//!
//! let topology = Topology::builder()
//!     .zone("A", |z| z.location("1_1_1").location("1_1_2"))
//!     .build();
//!
//! let id = SensorId::new(Bay::East, "1_1_2", SensorKind::FiveTm).unwrap();
//! assert_eq!(id.to_string(), "LEO-E_1_1_2_5TM");
//! assert_eq!(topology.zone_of(id.location()), Some("A"));
//! assert!(HealthState::Healthy.is_reporting());
//! ```

extern crate alloc;

mod health;
mod identity;
mod series;
mod topology;

pub use health::*;
pub use identity::*;
pub use series::*;
pub use topology::*;
