//! Train identity, listing and stop sequence types.

use std::fmt;

use serde::{Serialize, Serializer};

use super::{Station, StationCode};

/// Width the upstream schedule pages pad numeric train numbers to.
const SCHEDULE_ID_WIDTH: usize = 5;

/// Error returned when parsing an invalid train number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train number: {reason}")]
pub struct InvalidTrainNumber {
    reason: &'static str,
}

/// A train number as listed upstream (e.g. "12301").
///
/// Usually all digits, but the listing occasionally carries alphanumeric
/// identifiers for specials, so any non-empty ASCII alphanumeric string is
/// accepted.
///
/// # Examples
///
/// ```
/// use route_server::domain::TrainNumber;
///
/// let n = TrainNumber::parse("2301").unwrap();
/// assert_eq!(n.as_str(), "2301");
/// assert_eq!(n.schedule_id(), "02301");
///
/// assert!(TrainNumber::parse("").is_err());
/// assert!(TrainNumber::parse("12 301").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainNumber(String);

impl TrainNumber {
    /// Parse a train number; surrounding whitespace is trimmed.
    pub fn parse(s: &str) -> Result<Self, InvalidTrainNumber> {
        let s = s.trim();

        if s.is_empty() {
            return Err(InvalidTrainNumber {
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidTrainNumber {
                reason: "must be ASCII letters or digits",
            });
        }

        Ok(TrainNumber(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, if the train number is all digits.
    pub fn numeric(&self) -> Option<u64> {
        if self.0.bytes().all(|b| b.is_ascii_digit()) {
            self.0.parse().ok()
        } else {
            None
        }
    }

    /// Identifier used in schedule URLs: numeric train numbers are
    /// zero-padded to five digits, anything else is used unchanged.
    pub fn schedule_id(&self) -> String {
        match self.numeric() {
            Some(n) => format!("{:0width$}", n, width = SCHEDULE_ID_WIDTH),
            None => self.0.clone(),
        }
    }
}

impl fmt::Debug for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainNumber({})", self.0)
    }
}

impl fmt::Display for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TrainNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// One train passing through a queried station, as listed upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainSummary {
    pub number: TrainNumber,
    pub name: String,
    pub start_station: Station,
    pub end_station: Station,
}

/// A stop as scraped from a schedule page. The display name is optional;
/// pages that omit it still yield a usable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledStop {
    pub code: StationCode,
    pub name: Option<String>,
}

impl ScheduledStop {
    pub fn new(code: StationCode, name: Option<String>) -> Self {
        Self { code, name }
    }
}

/// Stops of one train in route order, exactly as scraped.
///
/// Repeated codes are kept: they only appear when the source is malformed,
/// and are passed through as-is.
pub type StopSequence = Vec<ScheduledStop>;
