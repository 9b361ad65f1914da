//! CSV map loader.
//!
//! # CSV format
//!
//! One row per authoring step.  Columns a row does not use are left empty.
//!
//! ```csv
//! kind,x,y,radius
//! center,7.18,-5.16,
//! ring,7.88,-5.16,
//! ring,,,2.1
//! passage,7.18,-3.76,
//! ```
//!
//! | `kind`    | Meaning                                                   |
//! |-----------|-----------------------------------------------------------|
//! | `center`  | map center at `(x, y)`; exactly one, before any other row |
//! | `ring`    | ring of `radius`, or through `(x, y)` when radius is empty|
//! | `passage` | passageway through `(x, y)`, attached to the closest rings|
//!
//! All rings are added before any passageway, so row order among `ring` and
//! `passage` rows does not matter.  The loaded map is validated.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rn_core::Vec2;

use crate::map::CircularMap;
use crate::MapError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MapRecord {
    kind:   String,
    x:      Option<f64>,
    y:      Option<f64>,
    radius: Option<f64>,
}

impl MapRecord {
    fn point(&self, line: usize) -> Result<Vec2, MapError> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Ok(Vec2::new(x, y)),
            _ => Err(MapError::Parse(format!(
                "row {line}: {:?} needs both x and y",
                self.kind
            ))),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and validate a map from a CSV file.
pub fn load_map_csv(path: &Path) -> Result<CircularMap, MapError> {
    let file = std::fs::File::open(path).map_err(MapError::Io)?;
    load_map_reader(file)
}

/// Like [`load_map_csv`] but accepts any `Read` source.
pub fn load_map_reader<R: Read>(reader: R) -> Result<CircularMap, MapError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records: Vec<MapRecord> = Vec::new();
    for result in csv_reader.deserialize::<MapRecord>() {
        records.push(result.map_err(|e| MapError::Parse(e.to_string()))?);
    }

    // ── Center ────────────────────────────────────────────────────────────
    let first = records
        .first()
        .ok_or_else(|| MapError::Parse("empty map file".into()))?;
    if first.kind.trim() != "center" {
        return Err(MapError::Parse(format!(
            "first row must be \"center\", found {:?}",
            first.kind
        )));
    }
    let mut map = CircularMap::new(first.point(1)?);

    // ── Rings, then passageways ───────────────────────────────────────────
    let mut passages: Vec<Vec2> = Vec::new();
    for (i, row) in records.iter().enumerate().skip(1) {
        let line = i + 1;
        match row.kind.trim() {
            "ring" => match row.radius {
                Some(radius) => {
                    map.add_ring(radius)?;
                }
                None => {
                    map.add_ring_through(row.point(line)?)?;
                }
            },
            "passage" => passages.push(row.point(line)?),
            "center" => {
                return Err(MapError::Parse(format!("row {line}: duplicate center")));
            }
            other => {
                return Err(MapError::Parse(format!(
                    "row {line}: unknown kind {other:?}: expected \"center\", \"ring\" or \"passage\""
                )));
            }
        }
    }
    for point in passages {
        map.add_passage(point)?;
    }

    map.validate()?;
    Ok(map)
}
