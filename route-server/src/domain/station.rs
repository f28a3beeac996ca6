//! Station code and resolved station types.

use std::fmt;

use serde::{Serialize, Serializer};

/// Longest station code accepted.
pub const MAX_CODE_LEN: usize = 6;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A valid station code (e.g. "NDLS", "CNB").
///
/// Station codes are 1 to 6 uppercase ASCII letters or digits. This type
/// guarantees that any `StationCode` value is valid by construction, and
/// stores the code inline so it is `Copy`.
///
/// # Examples
///
/// ```
/// use route_server::domain::StationCode;
///
/// let ndls = StationCode::parse("NDLS").unwrap();
/// assert_eq!(ndls.as_str(), "NDLS");
///
/// // Lowercase is rejected by the strict parser
/// assert!(StationCode::parse("ndls").is_err());
///
/// // ...but accepted from user input
/// assert_eq!(StationCode::parse_normalized(" ndls ").unwrap(), ndls);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode {
    bytes: [u8; MAX_CODE_LEN],
    len: u8,
}

impl StationCode {
    /// Parse a station code from a string.
    ///
    /// The input must be 1 to 6 uppercase ASCII letters (A-Z) or digits.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let bytes = s.as_bytes();

        if bytes.is_empty() || bytes.len() > MAX_CODE_LEN {
            return Err(InvalidStationCode {
                reason: "must be 1 to 6 characters",
            });
        }

        if !bytes
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(InvalidStationCode {
                reason: "must be uppercase ASCII letters or digits",
            });
        }

        let mut code = [0u8; MAX_CODE_LEN];
        code[..bytes.len()].copy_from_slice(bytes);

        Ok(StationCode {
            bytes: code,
            len: bytes.len() as u8,
        })
    }

    /// Parse user input: surrounding whitespace is trimmed and letters are
    /// uppercased before strict parsing.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the station code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII is ever stored, so this cannot fail.
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A station as shown to the user: its code, plus a display name and
/// coordinates when known.
///
/// A station with no coordinates is still a valid stop; it is shown in the
/// route table but cannot be placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub code: StationCode,
    pub name: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl Station {
    /// A station known only by its code.
    pub fn unresolved(code: StationCode, name: Option<String>) -> Self {
        Self {
            code,
            name,
            coordinates: None,
        }
    }

    /// Whether this station can be placed on a map.
    pub fn is_mapped(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Name to display: the station name if known, otherwise the code.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.code.as_str())
    }
}
