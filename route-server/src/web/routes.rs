//! HTTP route handlers.

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

use crate::domain::StationCode;
use crate::etrain::FetchError;
use crate::map::MapLayer;
use crate::resolver::StationRoutes;

use super::dto::*;
use super::feedback::FeedbackError;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page).post(search_station))
        .route("/health", get(health))
        .route("/api/stations/:code/routes", get(station_routes))
        .route("/feedback", post(submit_feedback))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> &'static str {
    let (stations, trains) = state.resolver.cache().entry_counts().await;
    debug!(cached_stations = stations, cached_trains = trains, "Health check");
    "ok"
}

fn render(template: IndexTemplate) -> Html<String> {
    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Index page with search form.
async fn index_page() -> impl IntoResponse {
    render(IndexTemplate::default())
}

/// Resolve a station from the search form and render map and table.
async fn search_station(
    State(state): State<AppState>,
    Form(form): Form<StationQueryForm>,
) -> impl IntoResponse {
    let input = form.station_code.trim().to_uppercase();
    if input.is_empty() {
        return render(IndexTemplate::with_error(None, "Please enter a station code."));
    }

    let Ok(code) = StationCode::parse_normalized(&input) else {
        return render(IndexTemplate::with_error(
            Some(input.clone()),
            format!("{input} is not a valid station code."),
        ));
    };

    info!(station = %code, "Station query");
    let searched = Some(code.to_string());

    let result = match state.resolver.resolve_station(code).await {
        Ok(result) => result,
        Err(e) => {
            return render(IndexTemplate::with_error(
                searched,
                station_error_message(&code, &e),
            ));
        }
    };

    if result.total_trains == 0 {
        return render(IndexTemplate::with_status(
            searched,
            format!("No trains found passing through {code}."),
        ));
    }

    let layer = MapLayer::build(&code, &result.trains, state.resolver.index());
    render(IndexTemplate {
        searched_station: searched,
        status_message: Some(status_message(&result, &layer)),
        error_message: None,
        results: Some(ResultsView::new(&result, &layer)),
    })
}

/// JSON routes for a station.
async fn station_routes(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StationRoutesResponse>, AppError> {
    let code = StationCode::parse_normalized(&code).map_err(|_| AppError::BadRequest {
        message: format!("Invalid station code: {}", code),
    })?;

    let result = state
        .resolver
        .resolve_station(code)
        .await
        .map_err(|e| AppError::from_station_error(&code, &e))?;

    let layer = MapLayer::build(&code, &result.trains, state.resolver.index());
    Ok(Json(StationRoutesResponse::new(&result, layer)))
}

/// Record feedback and re-render the page.
async fn submit_feedback(
    State(state): State<AppState>,
    Form(form): Form<FeedbackForm>,
) -> impl IntoResponse {
    match state.feedback.append(&form.message).await {
        Ok(()) => (
            StatusCode::OK,
            render(IndexTemplate::with_status(None, "Thanks for your feedback.")),
        ),
        Err(FeedbackError::Empty) => (
            StatusCode::BAD_REQUEST,
            render(IndexTemplate::with_error(None, "Feedback cannot be empty.")),
        ),
        Err(e) => {
            warn!(error = %e, "Failed to record feedback");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                render(IndexTemplate::with_error(
                    None,
                    "Sorry, your feedback could not be saved.",
                )),
            )
        }
    }
}

/// User-facing message for a failed station query.
fn station_error_message(code: &StationCode, error: &FetchError) -> String {
    match error {
        FetchError::NotFound(_) => format!("Station {code} was not found on etrain.info."),
        FetchError::Network(_) | FetchError::Parse(_) => format!(
            "Error fetching train list for {code}. The source might be down or unreachable."
        ),
    }
}

/// Summary line shown above the map.
fn status_message(result: &StationRoutes, layer: &MapLayer) -> String {
    let mut message = format!(
        "Map generated for {} unique direction train routes passing through {}.",
        layer.train_count(),
        result.station
    );

    if result.limit_applied {
        message.push_str(&format!(
            " (Processed {} out of {} found due to limit.)",
            result.processed(),
            result.total_trains
        ));
    }

    if !result.failures.is_empty() {
        message.push_str(&format!(
            " {} train(s) could not be fetched.",
            result.failures.len()
        ));
    }

    message
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
}

impl AppError {
    fn from_station_error(code: &StationCode, error: &FetchError) -> Self {
        let message = station_error_message(code, error);
        if error.is_not_found() {
            AppError::NotFound { message }
        } else {
            AppError::Unavailable { message }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(%status, %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
