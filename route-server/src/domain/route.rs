//! Resolved train routes.

use serde::Serialize;

use super::{Coordinates, Station, TrainSummary};

/// A train together with its stops, each resolved against the coordinate
/// index.
///
/// Stops without coordinates are kept in place (so the table still lists
/// them); only the map skips them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub train: TrainSummary,
    pub stops: Vec<Station>,
}

impl Route {
    pub fn new(train: TrainSummary, stops: Vec<Station>) -> Self {
        Self { train, stops }
    }

    /// First stop, if any.
    pub fn origin(&self) -> Option<&Station> {
        self.stops.first()
    }

    /// Last stop, if any.
    pub fn terminus(&self) -> Option<&Station> {
        self.stops.last()
    }

    /// Number of stops that can be placed on a map.
    pub fn mapped_count(&self) -> usize {
        self.stops.iter().filter(|s| s.is_mapped()).count()
    }

    /// Number of stops with no coordinate entry.
    pub fn unmapped_count(&self) -> usize {
        self.stops.len() - self.mapped_count()
    }

    /// Maximal runs of consecutive mapped stops.
    ///
    /// An unmapped stop ends the current run; runs shorter than two points
    /// are omitted since they cannot form a line.
    pub fn mapped_segments(&self) -> Vec<Vec<Coordinates>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();

        for stop in &self.stops {
            match stop.coordinates {
                Some(c) => current.push(c),
                None => {
                    if current.len() > 1 {
                        segments.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
            }
        }

        if current.len() > 1 {
            segments.push(current);
        }

        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StationCode, TrainNumber};

    fn station(code: &str, coords: Option<(f64, f64)>) -> Station {
        Station {
            code: StationCode::parse(code).unwrap(),
            name: None,
            coordinates: coords.map(|(lat, lon)| Coordinates::new(lat, lon)),
        }
    }

    fn route(stops: Vec<Station>) -> Route {
        let train = TrainSummary {
            number: TrainNumber::parse("12301").unwrap(),
            name: "Rajdhani".to_string(),
            start_station: stops[0].clone(),
            end_station: stops[stops.len() - 1].clone(),
        };
        Route::new(train, stops)
    }

    #[test]
    fn counts_mapped_and_unmapped() {
        let r = route(vec![
            station("NDLS", Some((28.64, 77.22))),
            station("XYZ", None),
            station("GAYA", Some((24.80, 85.01))),
        ]);
        assert_eq!(r.mapped_count(), 2);
        assert_eq!(r.unmapped_count(), 1);
        assert_eq!(r.origin().unwrap().code.as_str(), "NDLS");
        assert_eq!(r.terminus().unwrap().code.as_str(), "GAYA");
    }

    #[test]
    fn unmapped_stop_splits_segments() {
        let r = route(vec![
            station("A", Some((1.0, 1.0))),
            station("B", Some((2.0, 2.0))),
            station("C", None),
            station("D", Some((4.0, 4.0))),
            station("E", Some((5.0, 5.0))),
            station("F", Some((6.0, 6.0))),
        ]);
        let segments = r.mapped_segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1].len(), 3);
    }

    #[test]
    fn isolated_points_form_no_segment() {
        let r = route(vec![
            station("A", Some((1.0, 1.0))),
            station("B", None),
            station("C", Some((3.0, 3.0))),
        ]);
        assert!(r.mapped_segments().is_empty());
    }
}
