//! Zone membership and zone health.
//!
//! Sensors are joined to zones through the topology: each location of a zone
//! is turned back into the canonical name for the bay and kind being
//! evaluated, and looked up in the health map.

use std::collections::BTreeMap;

use soilwatch_types::{
    Bay, SensorHealthMap, SensorId, SensorKind, Topology, ZoneHealthMap, ZoneId, ZoneState,
};

/// Sensor states grouped by zone.
pub type ZoneMembership = BTreeMap<ZoneId, SensorHealthMap>;

/// Result of joining a health map against a topology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneJoin {
    pub membership: ZoneMembership,
    /// Canonical names listed in the topology with no classified series.
    pub missing: Vec<String>,
    /// Topology location codes that cannot form a canonical name.
    pub invalid_locations: Vec<String>,
}

/// Group classified sensors by zone.
///
/// Every zone of the topology appears in the membership, possibly empty.
/// Sensors absent from the topology are not placed in any zone.
pub fn join_zones(
    health: &SensorHealthMap,
    topology: &Topology,
    bay: Bay,
    kind: SensorKind,
) -> ZoneJoin {
    let mut join = ZoneJoin::default();

    for (zone, records) in topology.zones() {
        let members = join.membership.entry(zone.clone()).or_default();

        for location in records.keys() {
            let name = match SensorId::new(bay, location.as_str(), kind) {
                Ok(id) => id.to_string(),
                Err(_) => {
                    join.invalid_locations.push(location.clone());
                    continue;
                }
            };
            match health.get(&name) {
                Some(state) => {
                    members.insert(name, *state);
                }
                None => join.missing.push(name),
            }
        }
    }

    join
}

/// A zone is alive when at least one member is neither removed nor dead.
/// An empty zone is down.
pub fn zone_state(members: &SensorHealthMap) -> ZoneState {
    if members.values().any(|state| state.is_reporting()) {
        ZoneState::Alive
    } else {
        ZoneState::Down
    }
}

/// Compute the state of every zone.
pub fn aggregate_zones(membership: &ZoneMembership) -> ZoneHealthMap {
    membership
        .iter()
        .map(|(zone, members)| (zone.clone(), zone_state(members)))
        .collect()
}
