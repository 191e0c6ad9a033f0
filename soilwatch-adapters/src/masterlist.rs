//! Masterlist topology reader.
//!
//! The masterlist builder emits one JSON document per bay, mapping each zone
//! to the locations it contains:
//!
//! ```json
//! {
//!   "A": {
//!     "1_1_1": ["1_1_1", "", "", "", "A", 1],
//!     "1_1_2": ["1_1_2", "lid cracked", "", "removed 2024-05", "A", 2]
//!   }
//! }
//! ```
//!
//! Positional rows carry `[location, notes, mps2_removed, 5tm_removed, zone, height]`.
//! Records may also be written as objects with named fields, matching the
//! serde form of [`LocationRecord`].

use std::fs::File;
use std::io;
use std::path::Path;

use serde_json::Value;
use soilwatch_types::{LocationRecord, Topology, ZoneRecords};

use crate::AdapterError;

const NOTES_COLUMN: usize = 1;
const MPS2_REMOVED_COLUMN: usize = 2;
const FIVE_TM_REMOVED_COLUMN: usize = 3;
const HEIGHT_COLUMN: usize = 5;

/// Build a topology from an already-decoded masterlist document.
pub fn parse_topology(document: Value) -> Result<Topology, AdapterError> {
    let Value::Object(zones) = document else {
        return Err(AdapterError::Parse(
            "masterlist root must be an object of zones".to_string(),
        ));
    };

    let mut topology = Topology::new();
    for (zone, locations) in zones {
        let Value::Object(locations) = locations else {
            return Err(AdapterError::Parse(format!(
                "zone `{}` must map locations to records",
                zone
            )));
        };

        let mut records = ZoneRecords::new();
        for (location, record) in locations {
            let record = parse_record(&location, record)?;
            records.insert(location, record);
        }
        topology.insert_zone(zone, records);
    }

    Ok(topology)
}

/// Read a masterlist document from any reader.
pub fn read_topology<R: io::Read>(reader: R) -> Result<Topology, AdapterError> {
    let document: Value = serde_json::from_reader(io::BufReader::new(reader))?;
    parse_topology(document)
}

/// Read a masterlist document from a file.
pub fn read_topology_file(path: impl AsRef<Path>) -> Result<Topology, AdapterError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AdapterError::io(path, e))?;
    read_topology(file)
}

fn parse_record(location: &str, record: Value) -> Result<LocationRecord, AdapterError> {
    match record {
        Value::Array(cells) => Ok(LocationRecord {
            notes: cells.get(NOTES_COLUMN).and_then(cell_text),
            removed_5tm: cells.get(FIVE_TM_REMOVED_COLUMN).map(cell_list).unwrap_or_default(),
            removed_mps2: cells.get(MPS2_REMOVED_COLUMN).map(cell_list).unwrap_or_default(),
            height: cells
                .get(HEIGHT_COLUMN)
                .and_then(cell_integer)
                .or_else(|| height_from_location(location)),
        }),
        record @ Value::Object(_) => {
            let mut parsed: LocationRecord = serde_json::from_value(record).map_err(|e| {
                AdapterError::Parse(format!("record for location `{}`: {}", location, e))
            })?;
            if parsed.height.is_none() {
                parsed.height = height_from_location(location);
            }
            Ok(parsed)
        }
        other => Err(AdapterError::Parse(format!(
            "record for location `{}` must be a list or an object, got {}",
            location, other
        ))),
    }
}

/// Spreadsheet cells arrive as strings, numbers or null. Blank means "none".
fn cell_list(cell: &Value) -> Vec<String> {
    match cell {
        Value::Array(items) => items.iter().flat_map(cell_list).collect(),
        other => cell_text(other).into_iter().collect(),
    }
}

/// Text of a cell, trimmed. A whitespace-only cell is blank, so it never
/// marks a sensor as removed.
fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(cell_text)
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        other => Some(other.to_string()),
    }
}

fn cell_integer(cell: &Value) -> Option<i64> {
    match cell {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn height_from_location(location: &str) -> Option<i64> {
    location.split('_').nth(2)?.trim().parse().ok()
}
