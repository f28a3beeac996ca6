//! etrain.info HTTP client.
//!
//! Fetches station listings and train schedules and parses them into domain
//! types. No caching, retries or request limiting happen here; see
//! [`crate::cache`] and [`crate::resolver`].

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::domain::{StationCode, StopSequence, TrainNumber, TrainSummary};

use super::error::FetchError;
use super::parse::{parse_station_listing, parse_stop_sequence};

/// Default base URL for etrain.info.
const DEFAULT_BASE_URL: &str = "https://etrain.info";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(25);

/// The site serves a reduced page to non-browser agents.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Configuration for the etrain client.
#[derive(Debug, Clone)]
pub struct EtrainConfig {
    /// Base URL for the site (defaults to production)
    pub base_url: String,
    /// Time allowed for one request, from send to the end of the body
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl EtrainConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for EtrainConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// etrain.info client.
#[derive(Debug, Clone)]
pub struct EtrainClient {
    http: reqwest::Client,
    base_url: String,
}

impl EtrainClient {
    /// Create a new client with the given configuration.
    pub fn new(config: EtrainConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| FetchError::Network("invalid User-Agent header".to_string()))?;
        headers.insert(USER_AGENT, agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// URL of the "all trains" page for a station.
    pub fn station_url(&self, code: &StationCode) -> String {
        format!("{}/station/{}/all", self.base_url, code.as_str())
    }

    /// URL of the schedule page for a train.
    pub fn schedule_url(&self, train: &TrainNumber) -> String {
        format!("{}/train/{}/schedule", self.base_url, train.schedule_id())
    }

    /// Fetch the trains passing through a station, in listing order.
    ///
    /// A station with no trains yields an empty list, not `NotFound`.
    pub async fn fetch_trains_at_station(
        &self,
        code: &StationCode,
    ) -> Result<Vec<TrainSummary>, FetchError> {
        let body = self
            .get_page(&self.station_url(code), || format!("station {code}"))
            .await?;
        let trains = parse_station_listing(&body)?;
        debug!(station = %code, trains = trains.len(), "Fetched station listing");
        Ok(trains)
    }

    /// Fetch the ordered stop list of a train.
    pub async fn fetch_stop_sequence(
        &self,
        train: &TrainNumber,
    ) -> Result<StopSequence, FetchError> {
        let body = self
            .get_page(&self.schedule_url(train), || format!("train {train}"))
            .await?;
        let stops = parse_stop_sequence(&body)?;
        debug!(train = %train, stops = stops.len(), "Fetched train schedule");
        Ok(stops)
    }

    /// GET a page body, mapping 404 to `NotFound` and any other failure
    /// status to `Network`.
    async fn get_page(
        &self,
        url: &str,
        what: impl FnOnce() -> String,
    ) -> Result<String, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(what()));
        }

        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "{} returned HTTP {}",
                what(),
                status.as_u16()
            )));
        }

        Ok(response.text().await?)
    }
}
