//! Health states for sensors and zones.
//!
//! Both states carry the integer codes used by the CSV outputs and existing
//! report consumers. The codes overlap (`Removed` and `Down` are both `0`), so
//! each entity keeps its own enum and the integer form only appears at the
//! serialization boundary.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

use thiserror::Error;

/// Raised when an integer does not map to a known state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid state code {0}")]
pub struct InvalidStateCode(pub u8);

/// Health of a single sensor over the reporting window.
///
/// The ordering follows the wire codes only; it is not a severity ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum HealthState {
    /// Known to be physically removed; suppresses alerting.
    Removed = 0,
    /// No data at all in the window.
    Dead = 1,
    /// Some readings missing.
    Intermittent = 2,
    /// At least one reading outside the valid physical range.
    Outlier = 3,
    Healthy = 4,
}

impl HealthState {
    pub const ALL: [HealthState; 5] = [
        HealthState::Removed,
        HealthState::Dead,
        HealthState::Intermittent,
        HealthState::Outlier,
        HealthState::Healthy,
    ];

    /// Integer code used on the wire.
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    /// Decode a wire code.
    pub fn from_code(code: u8) -> Result<Self, InvalidStateCode> {
        HealthState::ALL
            .into_iter()
            .find(|state| state.code() == code)
            .ok_or(InvalidStateCode(code))
    }

    /// Whether the sensor produced any evidence of life.
    ///
    /// Removed and dead sensors do not keep a zone alive.
    pub const fn is_reporting(&self) -> bool {
        !matches!(self, HealthState::Removed | HealthState::Dead)
    }

    /// Report wording for this state.
    pub const fn description(&self) -> &'static str {
        match self {
            HealthState::Removed => "sensor removed",
            HealthState::Dead => "sensor down",
            HealthState::Intermittent => "in and out of data",
            HealthState::Outlier => "outliers present",
            HealthState::Healthy => "healthy",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl From<HealthState> for u8 {
    fn from(state: HealthState) -> Self {
        state.code()
    }
}

impl TryFrom<u8> for HealthState {
    type Error = InvalidStateCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        HealthState::from_code(code)
    }
}

/// Health of a zone, derived from the sensors it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum ZoneState {
    Down = 0,
    Alive = 1,
}

impl ZoneState {
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> Result<Self, InvalidStateCode> {
        match code {
            0 => Ok(ZoneState::Down),
            1 => Ok(ZoneState::Alive),
            other => Err(InvalidStateCode(other)),
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            ZoneState::Down => "down",
            ZoneState::Alive => "alive",
        }
    }
}

impl fmt::Display for ZoneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl From<ZoneState> for u8 {
    fn from(state: ZoneState) -> Self {
        state.code()
    }
}

impl TryFrom<u8> for ZoneState {
    type Error = InvalidStateCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        ZoneState::from_code(code)
    }
}

/// Canonical sensor name to health state.
pub type SensorHealthMap = BTreeMap<String, HealthState>;

/// Zone identifier to zone state.
pub type ZoneHealthMap = BTreeMap<String, ZoneState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_codes() {
        assert_eq!(HealthState::Removed.code(), 0);
        assert_eq!(HealthState::Healthy.code(), 4);
        assert_eq!(HealthState::from_code(2), Ok(HealthState::Intermittent));
        assert_eq!(HealthState::from_code(5), Err(InvalidStateCode(5)));
    }

    #[test]
    fn test_reporting_states() {
        assert!(!HealthState::Removed.is_reporting());
        assert!(!HealthState::Dead.is_reporting());
        assert!(HealthState::Intermittent.is_reporting());
        assert!(HealthState::Outlier.is_reporting());
        assert!(HealthState::Healthy.is_reporting());
    }

    #[test]
    fn test_zone_codes_overlap_sensor_codes() {
        assert_eq!(ZoneState::Down.code(), HealthState::Removed.code());
        assert_eq!(ZoneState::from_code(1), Ok(ZoneState::Alive));
        assert!(ZoneState::from_code(2).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_states_serialize_as_integers() {
        let mut map = SensorHealthMap::new();
        map.insert("LEO-E_1_1_1_5TM".to_string(), HealthState::Outlier);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"LEO-E_1_1_1_5TM":3}"#);

        let zone: ZoneState = serde_json::from_str("0").unwrap();
        assert_eq!(zone, ZoneState::Down);
        assert!(serde_json::from_str::<HealthState>("9").is_err());
    }
}
