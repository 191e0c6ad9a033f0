//! Health classification and zone aggregation.
//!
//! This module turns raw sensor series and the deployment topology into the
//! sensor and zone health maps that the reports consume.
//!
//! ## Submodules
//!
//! - [`classify`]: Per-sensor health rules ([`Classifier`], [`Thresholds`])
//! - [`reconcile`]: Dead sensors already listed as removed in the masterlist
//! - [`zones`]: Zone membership join and zone alive/down aggregation
//! - [`evaluation`]: The whole pipeline for one bay and sensor kind
//!
//! ## Data Flow
//!
//! ```text
//! SeriesSet + Topology
//!        │
//!        ▼
//! Classifier::classify()      (per sensor: Dead / Intermittent / Outlier / Healthy)
//!        │
//!        ▼
//! reconcile_removed()         (Dead → Removed when the masterlist says so)
//!        │
//!        ▼
//! join_zones() → aggregate_zones()
//!        │
//!        ▼
//! Evaluation { sensors, zones, faults, ... }
//! ```

pub mod classify;
pub mod evaluation;
pub mod reconcile;
pub mod zones;

pub use classify::{classify_readings, Classifier, SensorProfile, Thresholds, NO_DATA_SENTINEL};
pub use evaluation::{evaluate, Evaluation, SensorFault};
pub use reconcile::reconcile_removed;
pub use zones::{aggregate_zones, join_zones, zone_state, ZoneJoin, ZoneMembership};
