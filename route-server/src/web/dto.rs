//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Route, Station};
use crate::map::MapLayer;
use crate::resolver::{StationRoutes, TrainFailure};

/// Station search form.
#[derive(Debug, Deserialize)]
pub struct StationQueryForm {
    /// Station code as typed by the user
    #[serde(default)]
    pub station_code: String,
}

/// Feedback form.
#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub message: String,
}

/// A stop in a route.
#[derive(Debug, Serialize)]
pub struct StopResult {
    /// Station code
    pub code: String,

    /// Display name, if known
    pub name: Option<String>,

    /// Latitude, if the station is in the coordinate index
    pub lat: Option<f64>,

    /// Longitude, if the station is in the coordinate index
    pub lon: Option<f64>,
}

impl From<&Station> for StopResult {
    fn from(station: &Station) -> Self {
        Self {
            code: station.code.to_string(),
            name: station.name.clone(),
            lat: station.coordinates.map(|c| c.lat),
            lon: station.coordinates.map(|c| c.lon),
        }
    }
}

/// A resolved train route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub train_number: String,
    pub train_name: String,
    pub from: StopResult,
    pub to: StopResult,

    /// Stops in route order, including unmapped ones
    pub stops: Vec<StopResult>,

    /// Number of stops missing from the coordinate index
    pub unmapped_stops: usize,
}

impl From<&Route> for RouteResult {
    fn from(route: &Route) -> Self {
        Self {
            train_number: route.train.number.to_string(),
            train_name: route.train.name.clone(),
            from: StopResult::from(&route.train.start_station),
            to: StopResult::from(&route.train.end_station),
            stops: route.stops.iter().map(StopResult::from).collect(),
            unmapped_stops: route.unmapped_count(),
        }
    }
}

/// A train that could not be resolved.
#[derive(Debug, Serialize)]
pub struct FailureResult {
    pub train_number: String,

    /// "network", "parse" or "not_found"
    pub kind: &'static str,
    pub message: String,
}

impl From<&TrainFailure> for FailureResult {
    fn from(failure: &TrainFailure) -> Self {
        Self {
            train_number: failure.train_number.to_string(),
            kind: failure.error.kind(),
            message: failure.error.to_string(),
        }
    }
}

/// Response for a station query.
#[derive(Debug, Serialize)]
pub struct StationRoutesResponse {
    pub station: String,
    pub total_trains: usize,
    pub limit_applied: bool,
    pub routes: Vec<RouteResult>,
    pub failures: Vec<FailureResult>,
    pub layer: MapLayer,
}

impl StationRoutesResponse {
    pub fn new(result: &StationRoutes, layer: MapLayer) -> Self {
        Self {
            station: result.station.to_string(),
            total_trains: result.total_trains,
            limit_applied: result.limit_applied,
            routes: result.trains.iter().map(RouteResult::from).collect(),
            failures: result.failures.iter().map(FailureResult::from).collect(),
            layer,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, StationCode, TrainNumber, TrainSummary};
    use crate::etrain::FetchError;

    fn station(code: &str, coords: Option<(f64, f64)>) -> Station {
        Station {
            code: StationCode::parse(code).unwrap(),
            name: None,
            coordinates: coords.map(|(lat, lon)| Coordinates::new(lat, lon)),
        }
    }

    #[test]
    fn stop_result_from_unmapped_station() {
        let stop = StopResult::from(&station("XYZ", None));
        assert_eq!(stop.code, "XYZ");
        assert_eq!(stop.lat, None);
        assert_eq!(stop.lon, None);
    }

    #[test]
    fn route_result_counts_unmapped() {
        let stops = vec![
            station("NDLS", Some((28.6, 77.2))),
            station("XYZ", None),
            station("GAYA", Some((24.8, 85.0))),
        ];
        let route = Route::new(
            TrainSummary {
                number: TrainNumber::parse("12301").unwrap(),
                name: "Rajdhani".into(),
                start_station: stops[0].clone(),
                end_station: stops[2].clone(),
            },
            stops,
        );

        let result = RouteResult::from(&route);
        assert_eq!(result.train_number, "12301");
        assert_eq!(result.stops.len(), 3);
        assert_eq!(result.unmapped_stops, 1);
        assert_eq!(result.from.lat, Some(28.6));
    }

    #[test]
    fn failure_result_carries_kind() {
        let failure = TrainFailure {
            train_number: TrainNumber::parse("99999").unwrap(),
            error: FetchError::Network("timed out".into()),
        };
        let result = FailureResult::from(&failure);
        assert_eq!(result.kind, "network");
        assert_eq!(result.message, "network error: timed out");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["train_number"], "99999");
    }
}
