//! Map layer for resolved routes.
//!
//! Turns routes into markers and polylines that the browser draws. The
//! layer is plain data; the page script does the actual drawing.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{Coordinates, Route, StationCode, TrainNumber};
use crate::stations::StationCoordinateIndex;

/// Centre used when nothing better is known.
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 20.5937,
    lon: 78.9629,
};

const STATION_ZOOM: u8 = 8;
const INDEX_ZOOM: u8 = 6;
const DEFAULT_ZOOM: u8 = 5;

/// A station marker. Each station appears at most once per layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub code: StationCode,
    pub name: String,
    pub position: Coordinates,
}

/// One drawn stretch of a train's route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub train_number: TrainNumber,
    pub label: String,
    pub color: String,
    pub points: Vec<Coordinates>,
}

/// Everything needed to draw a station's routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub polylines: Vec<Polyline>,
}

impl MapLayer {
    /// Build the layer for a query on `station`.
    ///
    /// Reverse-direction twins are drawn once (see [`unique_directions`]).
    /// An unmapped stop breaks a train's line into separate polylines.
    pub fn build(station: &StationCode, routes: &[Route], index: &StationCoordinateIndex) -> Self {
        let (center, zoom) = match (index.coordinates(station), index.mean_center()) {
            (Some(c), _) => (c, STATION_ZOOM),
            (None, Some(c)) => (c, INDEX_ZOOM),
            (None, None) => (DEFAULT_CENTER, DEFAULT_ZOOM),
        };

        let mut markers = Vec::new();
        let mut seen = HashSet::new();
        let mut polylines = Vec::new();

        for route in unique_directions(routes) {
            let color = route_color(&route.train.number);
            let label = format!("Train: {}", route.train.number);

            for stop in &route.stops {
                if let Some(position) = stop.coordinates
                    && seen.insert(stop.code)
                {
                    markers.push(Marker {
                        code: stop.code,
                        name: stop.display_name().to_string(),
                        position,
                    });
                }
            }

            for points in route.mapped_segments() {
                polylines.push(Polyline {
                    train_number: route.train.number.clone(),
                    label: label.clone(),
                    color: color.clone(),
                    points,
                });
            }
        }

        Self {
            center,
            zoom,
            markers,
            polylines,
        }
    }

    /// Number of distinct trains drawn.
    pub fn train_count(&self) -> usize {
        self.polylines
            .iter()
            .map(|p| &p.train_number)
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Order trains numerically; non-numeric numbers sort last.
fn numeric_order(a: &Route, b: &Route) -> Ordering {
    match (a.train.number.numeric(), b.train.number.numeric()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn endpoints(route: &Route) -> Option<(StationCode, StationCode)> {
    match (route.origin(), route.terminus()) {
        (Some(o), Some(t)) if route.stops.len() > 1 => Some((o.code, t.code)),
        _ => None,
    }
}

/// Routes worth drawing, with reverse-direction pairs collapsed.
///
/// Routes with fewer than two stops are dropped. Remaining routes are
/// taken in numeric train order; when a route's first and last stops are
/// the last and first stops of another not yet taken, that other route is
/// skipped.
pub fn unique_directions(routes: &[Route]) -> Vec<&Route> {
    let mut candidates: Vec<(&Route, (StationCode, StationCode))> = routes
        .iter()
        .filter_map(|r| endpoints(r).map(|e| (r, e)))
        .collect();
    candidates.sort_by(|(a, _), (b, _)| numeric_order(a, b));

    let mut skipped = vec![false; candidates.len()];
    let mut kept = Vec::new();

    for i in 0..candidates.len() {
        if skipped[i] {
            continue;
        }
        let (route, (start, end)) = candidates[i];

        if let Some(twin) = (0..candidates.len()).find(|&j| {
            j != i && !skipped[j] && {
                let (_, (twin_start, twin_end)) = candidates[j];
                twin_start == end && twin_end == start
            }
        }) {
            skipped[twin] = true;
        }

        skipped[i] = true;
        kept.push(route);
    }

    kept
}

/// Stable colour for a train, as `#rrggbb`.
pub fn route_color(train: &TrainNumber) -> String {
    // FNV-1a
    let hash = train
        .as_str()
        .bytes()
        .fold(0x811c_9dc5u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193));
    format!("#{:06x}", hash & 0x00ff_ffff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Station, TrainSummary};

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn index() -> StationCoordinateIndex {
        let mut index = StationCoordinateIndex::new();
        index.insert(code("NDLS"), Some("New Delhi".into()), Coordinates::new(28.0, 77.0));
        index.insert(code("CNB"), Some("Kanpur Central".into()), Coordinates::new(26.0, 80.0));
        index.insert(code("GAYA"), None, Coordinates::new(24.0, 85.0));
        index.insert(code("HWH"), None, Coordinates::new(22.0, 88.0));
        index
    }

    fn route(num: &str, codes: &[&str]) -> Route {
        let index = index();
        let stops: Vec<Station> = codes.iter().map(|c| index.resolve(code(c), None)).collect();
        let train = TrainSummary {
            number: TrainNumber::parse(num).unwrap(),
            name: String::new(),
            start_station: stops[0].clone(),
            end_station: stops[stops.len() - 1].clone(),
        };
        Route::new(train, stops)
    }

    fn numbers(routes: &[&Route]) -> Vec<String> {
        routes.iter().map(|r| r.train.number.to_string()).collect()
    }

    #[test]
    fn reverse_pair_keeps_lower_number() {
        let routes = vec![
            route("12302", &["NDLS", "CNB", "HWH"]),
            route("12301", &["HWH", "CNB", "NDLS"]),
        ];
        assert_eq!(numbers(&unique_directions(&routes)), vec!["12301"]);
    }

    #[test]
    fn unrelated_routes_are_all_kept_in_numeric_order() {
        let routes = vec![
            route("200", &["NDLS", "GAYA"]),
            route("100", &["NDLS", "CNB"]),
            route("X1", &["CNB", "HWH"]),
        ];
        assert_eq!(
            numbers(&unique_directions(&routes)),
            vec!["100", "200", "X1"]
        );
    }

    #[test]
    fn single_stop_routes_are_not_drawn() {
        let routes = vec![route("1", &["NDLS"]), route("2", &["NDLS", "CNB"])];
        assert_eq!(numbers(&unique_directions(&routes)), vec!["2"]);
    }

    #[test]
    fn centers_on_queried_station() {
        let layer = MapLayer::build(&code("CNB"), &[], &index());
        assert_eq!(layer.center, Coordinates::new(26.0, 80.0));
        assert_eq!(layer.zoom, STATION_ZOOM);
    }

    #[test]
    fn unknown_station_centers_on_index_mean() {
        let layer = MapLayer::build(&code("ZZZZ"), &[], &index());
        assert_eq!(layer.center, Coordinates::new(25.0, 82.5));
        assert_eq!(layer.zoom, INDEX_ZOOM);
    }

    #[test]
    fn empty_index_uses_default_center() {
        let layer = MapLayer::build(&code("NDLS"), &[], &StationCoordinateIndex::new());
        assert_eq!(layer.center, DEFAULT_CENTER);
        assert_eq!(layer.zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn markers_are_deduplicated() {
        let routes = vec![
            route("1", &["NDLS", "CNB", "GAYA"]),
            route("2", &["NDLS", "CNB"]),
        ];
        let layer = MapLayer::build(&code("NDLS"), &routes, &index());

        let codes: Vec<_> = layer.markers.iter().map(|m| m.code.as_str()).collect();
        assert_eq!(codes, vec!["NDLS", "CNB", "GAYA"]);
        assert_eq!(layer.markers[2].name, "GAYA");
        assert_eq!(layer.train_count(), 2);
    }

    #[test]
    fn unmapped_stop_splits_polyline() {
        let routes = vec![route("1", &["NDLS", "CNB", "XYZ", "GAYA", "HWH"])];
        let layer = MapLayer::build(&code("NDLS"), &routes, &index());

        assert_eq!(layer.polylines.len(), 2);
        assert!(layer.polylines.iter().all(|p| p.points.len() == 2));
        assert_eq!(layer.polylines[0].color, layer.polylines[1].color);
        assert_eq!(layer.polylines[0].label, "Train: 1");
        assert_eq!(layer.markers.len(), 4);
    }

    #[test]
    fn color_is_stable_hex() {
        let n = TrainNumber::parse("12301").unwrap();
        let c = route_color(&n);
        assert_eq!(c.len(), 7);
        assert!(c.starts_with('#'));
        assert!(c[1..].chars().all(|ch| ch.is_ascii_hexdigit()));
        assert_eq!(c, route_color(&n));
    }
}
