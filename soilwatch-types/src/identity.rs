//! Sensor identity: bays, sensor kinds and canonical sensor names.
//!
//! Every sensor in the deployment is addressed by a canonical name of the form
//! `LEO-<bay>_<x>_<y>_<z>_<kind>`, for example `LEO-W_26_-3_2_5TM`. The three
//! middle parts form the location code used as the topology lookup key.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// Site prefix carried by every canonical sensor name.
pub const SITE_PREFIX: &str = "LEO-";

/// Separator between the parts of a canonical name and of a location code.
pub const NAME_SEPARATOR: char = '_';

/// Number of `_`-separated parts in a location code.
const LOCATION_PARTS: usize = 3;

/// Number of `_`-separated parts in a canonical name (site+bay, location, kind).
const NAME_PARTS: usize = LOCATION_PARTS + 2;

/// Errors raised when a sensor name or one of its parts does not follow the
/// naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The name does not split into the expected number of parts.
    #[error("sensor name `{name}` has {found} parts, expected 5")]
    WrongPartCount { name: String, found: usize },

    /// The first part does not start with the site prefix.
    #[error("sensor name `{name}` does not start with `LEO-`")]
    MissingSitePrefix { name: String },

    /// Unknown bay code.
    #[error("unknown bay `{0}`")]
    UnknownBay(String),

    /// Unknown sensor kind tag.
    #[error("unknown sensor kind `{0}`")]
    UnknownKind(String),

    /// The location code is not three non-empty parts.
    #[error("malformed location code `{0}`")]
    MalformedLocation(String),
}

/// One of the three monitored hillslopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "&'static str"))]
pub enum Bay {
    East,
    Center,
    West,
}

impl Bay {
    /// All bays in reporting order.
    pub const ALL: [Bay; 3] = [Bay::East, Bay::Center, Bay::West];

    /// Single-letter code used in canonical names and output files.
    pub const fn code(&self) -> &'static str {
        match self {
            Bay::East => "E",
            Bay::Center => "C",
            Bay::West => "W",
        }
    }

    /// Lowercase name used in masterlist and export file names.
    pub const fn stem(&self) -> &'static str {
        match self {
            Bay::East => "east",
            Bay::Center => "center",
            Bay::West => "west",
        }
    }

    /// Look up a bay by its exact single-letter code.
    pub fn from_code(code: &str) -> Option<Bay> {
        Bay::ALL.into_iter().find(|bay| bay.code() == code)
    }

    /// Human-readable label for reports.
    pub const fn label(&self) -> &'static str {
        match self {
            Bay::East => "East Bay",
            Bay::Center => "Center Bay",
            Bay::West => "West Bay",
        }
    }
}

impl fmt::Display for Bay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Bay {
    type Err = IdentityError;

    /// Accepts the code (`E`) or the stem (`east`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Bay::ALL
            .into_iter()
            .find(|bay| {
                trimmed.eq_ignore_ascii_case(bay.code()) || trimmed.eq_ignore_ascii_case(bay.stem())
            })
            .ok_or_else(|| IdentityError::UnknownBay(s.to_string()))
    }
}

impl TryFrom<String> for Bay {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Bay> for &'static str {
    fn from(bay: Bay) -> Self {
        bay.code()
    }
}

/// The two sensor hardware families deployed in the bays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "&'static str"))]
pub enum SensorKind {
    /// 5TM soil moisture / temperature sensor.
    FiveTm,
    /// MPS-2 water potential sensor.
    Mps2,
}

impl SensorKind {
    /// All sensor kinds in reporting order.
    pub const ALL: [SensorKind; 2] = [SensorKind::FiveTm, SensorKind::Mps2];

    /// Tag used as the last part of canonical names.
    pub const fn tag(&self) -> &'static str {
        match self {
            SensorKind::FiveTm => "5TM",
            SensorKind::Mps2 => "MPS-2",
        }
    }

    /// Look up a sensor kind by its exact name tag.
    pub fn from_tag(tag: &str) -> Option<SensorKind> {
        SensorKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Suffix appended to per-kind data and output file names.
    pub const fn file_suffix(&self) -> &'static str {
        match self {
            SensorKind::FiveTm => "",
            SensorKind::Mps2 => "_mps",
        }
    }

    /// Short label for report headings.
    pub const fn label(&self) -> &'static str {
        match self {
            SensorKind::FiveTm => "5TM",
            SensorKind::Mps2 => "MPS2",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SensorKind {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SensorKind::ALL
            .into_iter()
            .find(|kind| {
                trimmed.eq_ignore_ascii_case(kind.tag()) || trimmed.eq_ignore_ascii_case(kind.label())
            })
            .ok_or_else(|| IdentityError::UnknownKind(s.to_string()))
    }
}

impl TryFrom<String> for SensorKind {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SensorKind> for &'static str {
    fn from(kind: SensorKind) -> Self {
        kind.tag()
    }
}

/// Structured identity of a single sensor.
///
/// `Display` produces the canonical name and `FromStr` parses it back, so the
/// two are inverse for every valid identity.
///
/// ```rust
/// use soilwatch_types::{Bay, SensorId, SensorKind};
///
/// let id: SensorId = "LEO-W_26_-3_2_5TM".parse().unwrap();
/// assert_eq!(id.bay, Bay::West);
/// assert_eq!(id.location(), "26_-3_2");
/// assert_eq!(id.kind, SensorKind::FiveTm);
/// assert_eq!(id.to_string(), "LEO-W_26_-3_2_5TM");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SensorId {
    pub bay: Bay,
    location: String,
    pub kind: SensorKind,
}

impl SensorId {
    /// Build an identity, validating the location code.
    pub fn new(bay: Bay, location: impl Into<String>, kind: SensorKind) -> Result<Self, IdentityError> {
        let location = location.into();
        validate_location(&location)?;
        Ok(Self {
            bay,
            location,
            kind,
        })
    }

    /// The location code (topology lookup key).
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SITE_PREFIX}{}{NAME_SEPARATOR}{}{NAME_SEPARATOR}{}",
            self.bay.code(),
            self.location,
            self.kind.tag()
        )
    }
}

impl FromStr for SensorId {
    type Err = IdentityError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = name.split(NAME_SEPARATOR).collect();
        if parts.len() != NAME_PARTS {
            return Err(IdentityError::WrongPartCount {
                name: name.to_string(),
                found: parts.len(),
            });
        }

        let bay_code = parts[0]
            .strip_prefix(SITE_PREFIX)
            .ok_or_else(|| IdentityError::MissingSitePrefix {
                name: name.to_string(),
            })?;
        let bay =
            Bay::from_code(bay_code).ok_or_else(|| IdentityError::UnknownBay(bay_code.to_string()))?;
        let kind_tag = parts[NAME_PARTS - 1];
        let kind = SensorKind::from_tag(kind_tag)
            .ok_or_else(|| IdentityError::UnknownKind(kind_tag.to_string()))?;
        let location = parts[1..NAME_PARTS - 1].join("_");

        SensorId::new(bay, location, kind)
    }
}

/// Extract the location code from a canonical sensor name.
pub fn location_of(name: &str) -> Result<String, IdentityError> {
    name.parse::<SensorId>().map(|id| id.location)
}

/// Build the canonical sensor name for a location in a bay.
pub fn canonical_name(location: &str, bay: Bay, kind: SensorKind) -> Result<String, IdentityError> {
    SensorId::new(bay, location, kind).map(|id| id.to_string())
}

fn validate_location(location: &str) -> Result<(), IdentityError> {
    let parts: Vec<&str> = location.split(NAME_SEPARATOR).collect();
    if parts.len() != LOCATION_PARTS || parts.iter().any(|p| p.trim().is_empty()) {
        return Err(IdentityError::MalformedLocation(location.to_string()));
    }
    Ok(())
}
