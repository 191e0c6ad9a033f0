//! Reconciliation of dead sensors against the masterlist.
//!
//! A sensor that reports nothing because it was pulled out of the ground is
//! not an alert. Dead sensors whose location carries a removal annotation for
//! their kind are moved to [`HealthState::Removed`].

use soilwatch_types::{HealthState, SensorHealthMap, SensorId, Topology};
use tracing::debug;

/// Overwrite `Dead` with `Removed` for sensors known to be removed.
///
/// Names that do not parse, and locations that appear in no zone, are left
/// untouched. Applying this twice gives the same map as applying it once.
/// Returns the number of states changed.
pub fn reconcile_removed(health: &mut SensorHealthMap, topology: &Topology) -> usize {
    let mut changed = 0;

    for (name, state) in health.iter_mut() {
        if *state != HealthState::Dead {
            continue;
        }
        let Ok(id) = name.parse::<SensorId>() else {
            continue;
        };
        if topology.is_pre_removed(id.location(), id.kind) {
            debug!(sensor = %name, "dead sensor listed as removed");
            *state = HealthState::Removed;
            changed += 1;
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use soilwatch_types::{Bay, SensorKind, ZoneRecords};
    use std::collections::BTreeMap;

    fn topology() -> Topology {
        Topology::builder()
            .zone("A", |z| {
                z.location("1_1_1")
                    .removed("1_1_2", SensorKind::FiveTm, "removed 2024")
                    .removed("1_1_3", SensorKind::Mps2, "removed 2024")
            })
            .build()
    }

    fn health(entries: &[(&str, HealthState)]) -> SensorHealthMap {
        entries
            .iter()
            .map(|(name, state)| (name.to_string(), *state))
            .collect()
    }

    #[test]
    fn test_dead_and_removed_becomes_removed() {
        let mut map = health(&[
            ("LEO-E_1_1_1_5TM", HealthState::Dead),
            ("LEO-E_1_1_2_5TM", HealthState::Dead),
        ]);

        let changed = reconcile_removed(&mut map, &topology());

        assert_eq!(changed, 1);
        assert_eq!(map["LEO-E_1_1_1_5TM"], HealthState::Dead);
        assert_eq!(map["LEO-E_1_1_2_5TM"], HealthState::Removed);
    }

    #[test]
    fn test_removal_is_per_kind() {
        let mut map = health(&[
            ("LEO-E_1_1_2_MPS-2", HealthState::Dead),
            ("LEO-E_1_1_3_MPS-2", HealthState::Dead),
        ]);

        reconcile_removed(&mut map, &topology());

        assert_eq!(map["LEO-E_1_1_2_MPS-2"], HealthState::Dead);
        assert_eq!(map["LEO-E_1_1_3_MPS-2"], HealthState::Removed);
    }

    #[test]
    fn test_only_dead_sensors_are_overridden() {
        let mut map = health(&[
            ("LEO-E_1_1_2_5TM", HealthState::Healthy),
            ("LEO-W_1_1_2_5TM", HealthState::Intermittent),
        ]);
        let before = map.clone();

        assert_eq!(reconcile_removed(&mut map, &topology()), 0);
        assert_eq!(map, before);
    }

    #[test]
    fn test_unknown_and_malformed_sensors_unchanged() {
        let mut map = health(&[
            ("LEO-E_9_9_9_5TM", HealthState::Dead),
            ("not-a-sensor", HealthState::Dead),
        ]);

        assert_eq!(reconcile_removed(&mut map, &topology()), 0);
        assert_eq!(map["LEO-E_9_9_9_5TM"], HealthState::Dead);
        assert_eq!(map["not-a-sensor"], HealthState::Dead);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut once = health(&[
            ("LEO-E_1_1_1_5TM", HealthState::Dead),
            ("LEO-E_1_1_2_5TM", HealthState::Dead),
            ("LEO-E_1_1_3_MPS-2", HealthState::Dead),
            ("LEO-E_1_1_2_MPS-2", HealthState::Outlier),
        ]);
        reconcile_removed(&mut once, &topology());

        let mut twice = once.clone();
        assert_eq!(reconcile_removed(&mut twice, &topology()), 0);
        assert_eq!(once, twice);
    }

    type Coord = (u8, u8, u8);

    fn location((x, y, z): Coord) -> String {
        format!("{}_{}_{}", x, y, z)
    }

    fn coord() -> impl Strategy<Value = Coord> {
        (1u8..4, 1u8..4, 1u8..4)
    }

    fn arb_topology() -> impl Strategy<Value = Topology> {
        prop::collection::vec((0usize..3, coord(), any::<bool>(), any::<bool>()), 0..24).prop_map(
            |entries| {
                let mut zones: BTreeMap<String, ZoneRecords> = BTreeMap::new();
                for (zone, at, five_tm_removed, mps2_removed) in entries {
                    let record = zones
                        .entry(format!("Z{}", zone))
                        .or_default()
                        .entry(location(at))
                        .or_default();
                    if five_tm_removed {
                        record.mark_removed(SensorKind::FiveTm, "removed");
                    }
                    if mps2_removed {
                        record.mark_removed(SensorKind::Mps2, "removed");
                    }
                }
                zones.into_iter().collect()
            },
        )
    }

    fn arb_health() -> impl Strategy<Value = SensorHealthMap> {
        prop::collection::vec((0usize..3, coord(), any::<bool>(), 0u8..5), 0..32).prop_map(
            |entries| {
                entries
                    .into_iter()
                    .map(|(bay, at, mps2, code)| {
                        let kind = if mps2 { SensorKind::Mps2 } else { SensorKind::FiveTm };
                        let name = SensorId::new(Bay::ALL[bay], location(at), kind)
                            .unwrap()
                            .to_string();
                        (name, HealthState::from_code(code).unwrap())
                    })
                    .chain([("junk".to_string(), HealthState::Dead)])
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn property_reconcile_twice_equals_once(
            topology in arb_topology(),
            health in arb_health(),
        ) {
            let mut once = health.clone();
            reconcile_removed(&mut once, &topology);

            let mut twice = once.clone();
            prop_assert_eq!(reconcile_removed(&mut twice, &topology), 0);
            prop_assert_eq!(&once, &twice);

            for (name, state) in &once {
                let before = health[name];
                if *state != before {
                    let id: SensorId = name.parse().unwrap();
                    prop_assert_eq!(before, HealthState::Dead);
                    prop_assert_eq!(*state, HealthState::Removed);
                    prop_assert!(topology.is_pre_removed(id.location(), id.kind));
                }
            }
        }
    }
}
