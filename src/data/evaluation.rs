//! Evaluation of one bay and sensor kind.
//!
//! Turns the raw series and the topology into the sensor and zone health
//! maps. Problems with individual sensors are collected as faults and never
//! stop the remaining sensors from being evaluated.

use std::fmt;

use serde::Serialize;
use soilwatch_types::{
    Bay, HealthState, SensorHealthMap, SensorId, SensorKind, SeriesSet, Topology, ZoneHealthMap,
    ZoneState,
};
use tracing::{info, warn};

use super::classify::Classifier;
use super::reconcile::reconcile_removed;
use super::zones::{aggregate_zones, join_zones, ZoneMembership};

/// A per-sensor problem that excludes the sensor from the health map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "fault", rename_all = "snake_case")]
pub enum SensorFault {
    /// The name does not follow the canonical naming convention.
    MalformedName { name: String, reason: String },
    /// The name is valid but belongs to another bay or sensor kind.
    Misfiled {
        name: String,
        bay: Bay,
        kind: SensorKind,
    },
}

impl SensorFault {
    pub fn name(&self) -> &str {
        match self {
            SensorFault::MalformedName { name, .. } | SensorFault::Misfiled { name, .. } => name,
        }
    }
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorFault::MalformedName { name, reason } => {
                write!(f, "{}: malformed sensor name ({})", name, reason)
            }
            SensorFault::Misfiled { name, bay, kind } => {
                write!(f, "{}: belongs to bay {} / {}", name, bay, kind)
            }
        }
    }
}

/// Complete health picture for one bay and sensor kind.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub bay: Bay,
    pub kind: SensorKind,
    /// Final state of every sensor with a valid name.
    pub sensors: SensorHealthMap,
    /// Sensor states grouped by zone.
    pub membership: ZoneMembership,
    pub zones: ZoneHealthMap,
    pub faults: Vec<SensorFault>,
    /// Sensors whose location is in no zone.
    pub unknown: Vec<String>,
    /// Topology sensors with no series.
    pub missing: Vec<String>,
    /// Topology locations that cannot form a sensor name.
    pub invalid_locations: Vec<String>,
    /// Number of dead sensors moved to removed.
    pub removed_overrides: usize,
}

impl Evaluation {
    /// Number of sensors in the given state.
    pub fn count(&self, state: HealthState) -> usize {
        self.sensors.values().filter(|s| **s == state).count()
    }

    /// Names of sensors in the given state.
    pub fn sensors_in(&self, state: HealthState) -> impl Iterator<Item = &str> {
        self.sensors
            .iter()
            .filter(move |(_, s)| **s == state)
            .map(|(name, _)| name.as_str())
    }

    /// Zone containing the sensor, if any.
    ///
    /// A location listed under several zones belongs to each of them; this
    /// returns the first in zone order, and that is the zone the HTML report
    /// shows for the sensor.
    pub fn zone_of(&self, sensor: &str) -> Option<&str> {
        self.membership
            .iter()
            .find(|(_, members)| members.contains_key(sensor))
            .map(|(zone, _)| zone.as_str())
    }

    pub fn zones_down(&self) -> usize {
        self.zones.values().filter(|s| **s == ZoneState::Down).count()
    }
}

/// Classify, reconcile and aggregate one bay's series of one kind.
pub fn evaluate(
    bay: Bay,
    kind: SensorKind,
    series: &SeriesSet,
    topology: &Topology,
    classifier: &Classifier,
) -> Evaluation {
    let mut sensors = SensorHealthMap::new();
    let mut faults = Vec::new();
    let mut unknown = Vec::new();

    for (name, readings) in series {
        let id = match name.parse::<SensorId>() {
            Ok(id) => id,
            Err(e) => {
                faults.push(SensorFault::MalformedName {
                    name: name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if id.bay != bay || id.kind != kind {
            faults.push(SensorFault::Misfiled {
                name: name.clone(),
                bay: id.bay,
                kind: id.kind,
            });
            continue;
        }
        if !topology.contains_location(id.location()) {
            unknown.push(name.clone());
        }
        sensors.insert(name.clone(), classifier.classify(kind, readings));
    }

    let removed_overrides = reconcile_removed(&mut sensors, topology);
    let join = join_zones(&sensors, topology, bay, kind);
    let zones = aggregate_zones(&join.membership);

    for fault in &faults {
        warn!(bay = %bay, kind = %kind, "{}", fault);
    }
    if !unknown.is_empty() {
        warn!(bay = %bay, kind = %kind, sensors = ?unknown, "sensors not found in topology");
    }
    if !join.invalid_locations.is_empty() {
        warn!(
            bay = %bay,
            kind = %kind,
            locations = ?join.invalid_locations,
            "topology locations cannot form sensor names"
        );
    }

    let evaluation = Evaluation {
        bay,
        kind,
        sensors,
        membership: join.membership,
        zones,
        faults,
        unknown,
        missing: join.missing,
        invalid_locations: join.invalid_locations,
        removed_overrides,
    };

    info!(
        bay = %bay,
        kind = %kind,
        sensors = evaluation.sensors.len(),
        dead = evaluation.count(HealthState::Dead),
        removed = evaluation.count(HealthState::Removed),
        zones = evaluation.zones.len(),
        zones_down = evaluation.zones_down(),
        "evaluated sensor health"
    );

    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classify::NO_DATA_SENTINEL as S;
    use soilwatch_types::SensorSeries;

    fn series(entries: Vec<(&str, Vec<f64>)>) -> SeriesSet {
        entries
            .into_iter()
            .map(|(name, readings)| (name.to_string(), SensorSeries::from(readings)))
            .collect()
    }

    fn topology() -> Topology {
        Topology::builder()
            .zone("A", |z| {
                z.location("1_1_1")
                    .removed("1_1_2", SensorKind::FiveTm, "removed 2024")
            })
            .zone("B", |z| z.location("2_1_1").location("2_1_2"))
            .zone("C", |z| z.location("3_1_1"))
            .build()
    }

    #[test]
    fn test_end_to_end_bay() {
        let input = series(vec![
            ("LEO-E_1_1_1_5TM", vec![5.0, 150.0, 7.2]),
            ("LEO-E_1_1_2_5TM", vec![S, S, S]),
            ("LEO-E_2_1_1_5TM", vec![S, S]),
            ("LEO-E_2_1_2_5TM", vec![]),
            ("LEO-E_3_1_1_5TM", vec![5.0, S, 7.2]),
        ]);

        let eval = evaluate(
            Bay::East,
            SensorKind::FiveTm,
            &input,
            &topology(),
            &Classifier::default(),
        );

        assert_eq!(eval.sensors["LEO-E_1_1_1_5TM"], HealthState::Outlier);
        assert_eq!(eval.sensors["LEO-E_1_1_2_5TM"], HealthState::Removed);
        assert_eq!(eval.sensors["LEO-E_2_1_1_5TM"], HealthState::Dead);
        assert_eq!(eval.sensors["LEO-E_2_1_2_5TM"], HealthState::Dead);
        assert_eq!(eval.sensors["LEO-E_3_1_1_5TM"], HealthState::Intermittent);
        assert_eq!(eval.removed_overrides, 1);

        assert_eq!(eval.zones["A"], ZoneState::Alive);
        assert_eq!(eval.zones["B"], ZoneState::Down);
        assert_eq!(eval.zones["C"], ZoneState::Alive);
        assert_eq!(eval.zones_down(), 1);

        assert_eq!(eval.count(HealthState::Dead), 2);
        assert_eq!(eval.zone_of("LEO-E_2_1_1_5TM"), Some("B"));
        assert!(eval.faults.is_empty());
        assert!(eval.unknown.is_empty());
        assert!(eval.missing.is_empty());
    }

    #[test]
    fn test_faults_do_not_abort_other_sensors() {
        let input = series(vec![
            ("LEO-E_1_1_1", vec![5.0]),
            ("LEO-W_1_1_1_5TM", vec![5.0]),
            ("LEO-E_1_1_1_MPS-2", vec![-100.0]),
            ("LEO-E_1_1_1_5TM", vec![5.0]),
        ]);

        let eval = evaluate(
            Bay::East,
            SensorKind::FiveTm,
            &input,
            &topology(),
            &Classifier::default(),
        );

        assert_eq!(eval.sensors.len(), 1);
        assert_eq!(eval.sensors["LEO-E_1_1_1_5TM"], HealthState::Healthy);
        assert_eq!(eval.faults.len(), 3);
        assert!(matches!(
            &eval.faults[0],
            SensorFault::MalformedName { name, .. } if name == "LEO-E_1_1_1"
        ));
        assert!(eval
            .faults
            .iter()
            .any(|f| f.name() == "LEO-W_1_1_1_5TM" && matches!(f, SensorFault::Misfiled { .. })));
    }

    #[test]
    fn test_unknown_sensors_reported_but_not_zoned() {
        let input = series(vec![("LEO-E_9_9_9_5TM", vec![5.0]), ("LEO-E_1_1_1_5TM", vec![S])]);

        let eval = evaluate(
            Bay::East,
            SensorKind::FiveTm,
            &input,
            &topology(),
            &Classifier::default(),
        );

        assert_eq!(eval.sensors["LEO-E_9_9_9_5TM"], HealthState::Healthy);
        assert_eq!(eval.unknown, vec!["LEO-E_9_9_9_5TM".to_string()]);
        assert_eq!(eval.zone_of("LEO-E_9_9_9_5TM"), None);
        // The only zoned sensor of A is dead and not removed.
        assert_eq!(eval.zones["A"], ZoneState::Down);
        assert!(eval.missing.contains(&"LEO-E_2_1_1_5TM".to_string()));
        assert!(eval.missing.contains(&"LEO-E_1_1_2_5TM".to_string()));
    }

    #[test]
    fn test_fault_display() {
        let fault = SensorFault::Misfiled {
            name: "LEO-W_1_1_1_5TM".to_string(),
            bay: Bay::West,
            kind: SensorKind::FiveTm,
        };
        assert_eq!(fault.to_string(), "LEO-W_1_1_1_5TM: belongs to bay W / 5TM");
    }

    #[test]
    fn test_shared_location_reports_first_zone() {
        let topology = Topology::builder()
            .zone("A", |z| z.location("1_1_1"))
            .zone("B", |z| z.location("1_1_1").location("2_1_1"))
            .build();
        let readings = series(vec![("LEO-E_1_1_1_5TM", vec![S, S])]);

        let eval = evaluate(
            Bay::East,
            SensorKind::FiveTm,
            &readings,
            &topology,
            &Classifier::default(),
        );

        assert_eq!(eval.zone_of("LEO-E_1_1_1_5TM"), Some("A"));
        assert_eq!(eval.zones["A"], ZoneState::Down);
        assert_eq!(eval.zones["B"], ZoneState::Down);
    }
}
