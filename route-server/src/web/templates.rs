//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::Route;
use crate::map::MapLayer;
use crate::resolver::{StationRoutes, TrainFailure};

/// The single page: search form, status, map and route table.
#[derive(Template, Default)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub searched_station: Option<String>,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
    pub results: Option<ResultsView>,
}

impl IndexTemplate {
    pub fn with_error(searched: Option<String>, message: impl Into<String>) -> Self {
        Self {
            searched_station: searched,
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_status(searched: Option<String>, message: impl Into<String>) -> Self {
        Self {
            searched_station: searched,
            status_message: Some(message.into()),
            ..Self::default()
        }
    }
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Map and tables for a resolved station.
#[derive(Debug, Clone)]
pub struct ResultsView {
    /// Map layer as JSON, safe to embed in a `<script>` element
    pub layer_json: String,
    pub routes: Vec<RouteView>,
    pub failures: Vec<FailureView>,
}

impl ResultsView {
    pub fn new(result: &StationRoutes, layer: &MapLayer) -> Self {
        Self {
            layer_json: script_safe_json(layer),
            routes: result.trains.iter().map(RouteView::from_route).collect(),
            failures: result.failures.iter().map(FailureView::from_failure).collect(),
        }
    }
}

/// A row in the route table.
#[derive(Debug, Clone)]
pub struct RouteView {
    pub number: String,
    pub name: String,
    pub from: String,
    pub to: String,
    pub stops: Vec<StopView>,
    pub unmapped: usize,
}

impl RouteView {
    pub fn from_route(route: &Route) -> Self {
        Self {
            number: route.train.number.to_string(),
            name: route.train.name.clone(),
            from: route.train.start_station.display_name().to_string(),
            to: route.train.end_station.display_name().to_string(),
            stops: route
                .stops
                .iter()
                .map(|s| StopView {
                    code: s.code.to_string(),
                    name: s.display_name().to_string(),
                    mapped: s.is_mapped(),
                })
                .collect(),
            unmapped: route.unmapped_count(),
        }
    }
}

/// A stop in the route table.
#[derive(Debug, Clone)]
pub struct StopView {
    pub code: String,
    pub name: String,
    pub mapped: bool,
}

/// A row in the failures table.
#[derive(Debug, Clone)]
pub struct FailureView {
    pub number: String,
    pub reason: String,
}

impl FailureView {
    pub fn from_failure(failure: &TrainFailure) -> Self {
        Self {
            number: failure.train_number.to_string(),
            reason: failure.error.to_string(),
        }
    }
}

/// Serialize to JSON that cannot close the surrounding script element.
fn script_safe_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, Station, StationCode, TrainNumber, TrainSummary};

    #[test]
    fn json_cannot_break_out_of_script() {
        let json = script_safe_json(&"</script><b>");
        assert!(!json.contains('<'));
        assert_eq!(json, "\"\\u003c/script>\\u003cb>\"");
    }

    #[test]
    fn route_view_uses_display_names() {
        let ndls = Station {
            code: StationCode::parse("NDLS").unwrap(),
            name: Some("New Delhi".into()),
            coordinates: Some(Coordinates::new(28.6, 77.2)),
        };
        let xyz = Station::unresolved(StationCode::parse("XYZ").unwrap(), None);
        let route = Route::new(
            TrainSummary {
                number: TrainNumber::parse("12301").unwrap(),
                name: "Rajdhani".into(),
                start_station: ndls.clone(),
                end_station: xyz.clone(),
            },
            vec![ndls, xyz],
        );

        let view = RouteView::from_route(&route);
        assert_eq!(view.from, "New Delhi");
        assert_eq!(view.to, "XYZ");
        assert!(!view.stops[1].mapped);
        assert_eq!(view.unmapped, 1);
    }

    #[test]
    fn map_script_inserts_names_as_text() {
        let script = include_str!("../../static/map.js");
        assert!(script.contains("span.textContent = text"));
        assert!(script.contains("bindPopup(textElement("));
        assert!(script.contains("bindTooltip(textElement("));
        assert!(!script.contains("innerHTML"));
    }

    #[test]
    fn error_page_renders_message() {
        let html = IndexTemplate::with_error(Some("ZZZZ".into()), "Station ZZZZ was not found.")
            .render()
            .unwrap();
        assert!(html.contains("Station ZZZZ was not found."));
        assert!(html.contains("value=\"ZZZZ\""));
    }
}
