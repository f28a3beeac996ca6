//! Station code → coordinate lookup.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::domain::{Coordinates, Station, StationCode};

use super::error::IndexError;

/// Column holding the station code.
const CODE_COLUMN: &str = "STN CODE";
const LAT_COLUMN: &str = "LAT";
const LON_COLUMN: &str = "LON";

/// Accepted spellings of the optional display name column.
const NAME_COLUMNS: [&str; 2] = ["STN NAME", "STATION NAME"];

/// A single entry in the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedStation {
    pub name: Option<String>,
    pub coordinates: Coordinates,
}

/// Read-only lookup from station code to coordinates and display name.
///
/// Built once at start-up and shared behind an `Arc`; it is never mutated
/// afterwards, so lookups need no locking.
#[derive(Debug, Clone, Default)]
pub struct StationCoordinateIndex {
    entries: HashMap<StationCode, IndexedStation>,
}

impl StationCoordinateIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the index from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let index = Self::from_reader(file)?;
        info!(path = %path.display(), stations = index.len(), "Loaded station coordinates");
        Ok(index)
    }

    /// Load the index from CSV data.
    ///
    /// Header names are matched case-insensitively after trimming. Rows
    /// with non-numeric coordinates or an invalid code are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, IndexError> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv
            .headers()?
            .iter()
            .map(|h| h.trim().to_uppercase())
            .collect();
        let column = |name: &str| headers.iter().position(|h| h == name);

        let (code_col, lat_col, lon_col) =
            match (column(CODE_COLUMN), column(LAT_COLUMN), column(LON_COLUMN)) {
                (Some(c), Some(la), Some(lo)) => (c, la, lo),
                (c, la, lo) => {
                    let missing = [(CODE_COLUMN, c), (LAT_COLUMN, la), (LON_COLUMN, lo)]
                        .into_iter()
                        .filter(|(_, idx)| idx.is_none())
                        .map(|(name, _)| name.to_string())
                        .collect();
                    return Err(IndexError::MissingColumns(missing));
                }
            };
        let name_col = NAME_COLUMNS.iter().find_map(|n| column(n));

        let mut entries = HashMap::new();
        let mut skipped = 0usize;

        for record in csv.records() {
            let record = record?;

            let parsed = (|| {
                let code = StationCode::parse_normalized(record.get(code_col)?).ok()?;
                let lat: f64 = record.get(lat_col)?.parse().ok()?;
                let lon: f64 = record.get(lon_col)?.parse().ok()?;
                if !lat.is_finite() || !lon.is_finite() {
                    return None;
                }
                let name = name_col
                    .and_then(|i| record.get(i))
                    .filter(|n| !n.is_empty())
                    .map(str::to_string);
                Some((code, IndexedStation {
                    name,
                    coordinates: Coordinates::new(lat, lon),
                }))
            })();

            match parsed {
                Some((code, station)) => {
                    entries.insert(code, station);
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "Skipped station rows without usable coordinates");
        }

        Ok(Self { entries })
    }

    /// Add an entry. Used while building an index by hand.
    pub fn insert(&mut self, code: StationCode, name: Option<String>, coordinates: Coordinates) {
        self.entries.insert(code, IndexedStation { name, coordinates });
    }

    /// Look up a station code.
    pub fn lookup(&self, code: &StationCode) -> Option<&IndexedStation> {
        self.entries.get(code)
    }

    /// Coordinates of a station code, if indexed.
    pub fn coordinates(&self, code: &StationCode) -> Option<Coordinates> {
        self.lookup(code).map(|s| s.coordinates)
    }

    /// Build a display station for `code`.
    ///
    /// The indexed name wins over `fallback_name`; a code missing from the
    /// index yields a station with no coordinates rather than an error.
    pub fn resolve(&self, code: StationCode, fallback_name: Option<&str>) -> Station {
        match self.lookup(&code) {
            Some(entry) => Station {
                code,
                name: entry
                    .name
                    .clone()
                    .or_else(|| fallback_name.map(str::to_string)),
                coordinates: Some(entry.coordinates),
            },
            None => Station::unresolved(code, fallback_name.map(str::to_string)),
        }
    }

    /// Average of all indexed coordinates, or `None` for an empty index.
    pub fn mean_center(&self) -> Option<Coordinates> {
        if self.entries.is_empty() {
            return None;
        }
        let n = self.entries.len() as f64;
        let (lat, lon) = self.entries.values().fold((0.0, 0.0), |(lat, lon), s| {
            (lat + s.coordinates.lat, lon + s.coordinates.lon)
        });
        Some(Coordinates::new(lat / n, lon / n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
