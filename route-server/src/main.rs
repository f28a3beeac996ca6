use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use route_server::cache::RouteResolutionCache;
use route_server::etrain::{EtrainClient, EtrainConfig, EtrainSource, MockEtrainClient};
use route_server::resolver::{ResolverConfig, RouteResolver};
use route_server::stations::StationCoordinateIndex;
use route_server::web::{AppState, FeedbackLog, create_router};

const DEFAULT_STATIONS_FILE: &str = "data/stations.csv";
const DEFAULT_FEEDBACK_FILE: &str = "feedback.txt";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Read a numeric variable, falling back to `None` when unset or invalid.
fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring invalid numeric setting");
            None
        }
    }
}

fn resolver_config() -> ResolverConfig {
    let mut config = ResolverConfig::default();
    if let Some(n) = env_number::<usize>("MAX_WORKERS") {
        config = config.with_max_workers(n);
    }
    if let Some(n) = env_number::<usize>("MAX_REQUESTS") {
        config = config.with_max_requests(n);
    }
    if let Some(secs) = env_number::<u64>("FETCH_TIMEOUT_SECS") {
        config = config.with_fetch_timeout(Duration::from_secs(secs));
    }
    // Zero means "resolve every listed train".
    if let Some(limit) = env_number::<usize>("TRAIN_LIMIT") {
        config = config.with_train_limit((limit > 0).then_some(limit));
    }
    config
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load the coordinate index (fail fast if unreadable)
    let stations_file = env_or("STATIONS_FILE", DEFAULT_STATIONS_FILE);
    let index = StationCoordinateIndex::load(&stations_file)
        .expect("Failed to load station coordinate index");
    if index.is_empty() {
        warn!(path = %stations_file, "Station index is empty; nothing will be mapped");
    }

    let config = resolver_config();

    // Pick the upstream
    let source = match std::env::var("MOCK_DATA_DIR") {
        Ok(dir) => {
            let mock = MockEtrainClient::new(&dir).expect("Failed to load mock pages");
            let stations = mock.available_stations().await;
            info!(dir = %dir, stations = stations.len(), "Using mock etrain pages");
            EtrainSource::Mock(mock)
        }
        Err(_) => {
            let mut etrain_config = EtrainConfig::new().with_timeout(config.fetch_timeout);
            if let Ok(url) = std::env::var("ETRAIN_BASE_URL") {
                etrain_config = etrain_config.with_base_url(url);
            }
            info!(base_url = %etrain_config.base_url, "Using live etrain.info");
            EtrainSource::Live(
                EtrainClient::new(etrain_config).expect("Failed to create etrain client"),
            )
        }
    };

    info!(
        max_workers = config.max_workers,
        max_requests = config.max_requests,
        fetch_timeout_secs = config.fetch_timeout.as_secs(),
        train_limit = ?config.train_limit,
        "Resolver configured"
    );

    let resolver = RouteResolver::new(
        Arc::new(source),
        Arc::new(RouteResolutionCache::new()),
        Arc::new(index),
        config,
    );
    let feedback = FeedbackLog::new(env_or("FEEDBACK_FILE", DEFAULT_FEEDBACK_FILE));

    // Build app state and router
    let state = AppState::new(resolver, feedback);
    let app = create_router(state, &env_or("STATIC_DIR", DEFAULT_STATIC_DIR));

    // Bind and serve
    let addr: SocketAddr = env_or("BIND_ADDR", DEFAULT_BIND_ADDR)
        .parse()
        .expect("BIND_ADDR must be a socket address");
    info!(%addr, "Train route server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
