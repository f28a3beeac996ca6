//! Route resolution for one station query.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::cache::{Memo, RouteResolutionCache};
use crate::domain::{Route, Station, StationCode, StopSequence, TrainNumber, TrainSummary};
use crate::etrain::FetchError;
use crate::stations::StationCoordinateIndex;

use super::config::ResolverConfig;
use super::source::TrainSource;

/// A train whose stop sequence could not be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainFailure {
    pub train_number: TrainNumber,
    pub error: FetchError,
}

/// Result of resolving a station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRoutes {
    /// The queried station.
    pub station: StationCode,

    /// Resolved routes, in the upstream listing order.
    pub trains: Vec<Route>,

    /// Trains whose schedule fetch failed, in listing order.
    pub failures: Vec<TrainFailure>,

    /// Number of trains the station listing contained.
    pub total_trains: usize,

    /// Whether the listing was cut to the configured train limit.
    pub limit_applied: bool,
}

impl StationRoutes {
    /// Number of trains that were attempted.
    pub fn processed(&self) -> usize {
        self.trains.len() + self.failures.len()
    }
}

/// Resolves station queries into coordinate-annotated routes.
///
/// Safe to call concurrently for the same or different stations: all
/// upstream work goes through the shared single-flight cache, and at most
/// `max_requests` fetches are in flight across all queries.
pub struct RouteResolver<S> {
    source: Arc<S>,
    cache: Arc<RouteResolutionCache>,
    index: Arc<StationCoordinateIndex>,
    requests: Semaphore,
    config: ResolverConfig,
}

impl<S: TrainSource> RouteResolver<S> {
    pub fn new(
        source: Arc<S>,
        cache: Arc<RouteResolutionCache>,
        index: Arc<StationCoordinateIndex>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            source,
            cache,
            index,
            requests: Semaphore::new(config.max_requests.max(1)),
            config,
        }
    }

    /// The coordinate index routes are resolved against.
    pub fn index(&self) -> &StationCoordinateIndex {
        &self.index
    }

    /// The shared fetch cache.
    pub fn cache(&self) -> &RouteResolutionCache {
        &self.cache
    }

    /// Resolve every train passing through `code`.
    ///
    /// Fails only if the station listing itself cannot be fetched; in that
    /// case no train schedules are requested. Per-train failures are
    /// reported in [`StationRoutes::failures`] alongside the successful
    /// routes. Output order follows the listing, not fetch completion.
    #[tracing::instrument(skip_all, fields(station = %code))]
    pub async fn resolve_station(&self, code: StationCode) -> Result<StationRoutes, FetchError> {
        let listing = self.train_listing(code).await.inspect_err(|e| {
            warn!(error = %e, "Station listing unavailable");
        })?;

        let total_trains = listing.len();
        let selected = match self.config.train_limit {
            Some(limit) if limit < total_trains => &listing[..limit],
            _ => &listing[..],
        };
        let limit_applied = selected.len() < total_trains;
        if limit_applied {
            info!(
                total_trains,
                processing = selected.len(),
                "Train limit applied"
            );
        }

        // Results are written by listing position so completion order
        // cannot affect output order.
        let mut slots: Vec<Option<Memo<StopSequence>>> = vec![None; selected.len()];
        let pending: Vec<_> = selected
            .iter()
            .enumerate()
            .map(|(i, train)| async move { (i, self.stop_sequence(&train.number).await) })
            .collect();
        let mut fetches =
            stream::iter(pending).buffer_unordered(self.config.max_workers.max(1));

        while let Some((i, result)) = fetches.next().await {
            slots[i] = Some(result);
        }

        let mut trains = Vec::with_capacity(selected.len());
        let mut failures = Vec::new();

        for (summary, slot) in selected.iter().zip(slots) {
            let result = slot.unwrap_or_else(|| {
                Err(FetchError::Network("schedule fetch did not complete".to_string()))
            });
            match result {
                Ok(stops) => trains.push(self.build_route(summary, &stops)),
                Err(error) => {
                    debug!(train = %summary.number, error = %error, "Train schedule unavailable");
                    failures.push(TrainFailure {
                        train_number: summary.number.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            routes = trains.len(),
            failures = failures.len(),
            "Station resolved"
        );

        Ok(StationRoutes {
            station: code,
            trains,
            failures,
            total_trains,
            limit_applied,
        })
    }

    async fn train_listing(&self, code: StationCode) -> Memo<Vec<TrainSummary>> {
        self.cache
            .station_listing(code, || {
                self.fetch(format!("station {code}"), async move {
                    self.source.fetch_trains_at_station(&code).await
                })
            })
            .await
    }

    async fn stop_sequence(&self, train: &TrainNumber) -> Memo<StopSequence> {
        self.cache
            .stop_sequence(train, || {
                self.fetch(format!("train {train}"), self.source.fetch_stop_sequence(train))
            })
            .await
    }

    /// Run one upstream fetch once a request slot is free.
    ///
    /// The deadline starts when the slot is taken, so time spent queued
    /// behind other queries never turns into a cached timeout.
    async fn fetch<T>(
        &self,
        what: String,
        fetch: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        let _permit = self
            .requests
            .acquire()
            .await
            .map_err(|_| FetchError::Network("request limiter closed".to_string()))?;
        with_timeout(self.config.fetch_timeout, what, fetch).await
    }

    fn resolve(&self, station: &Station) -> Station {
        self.index.resolve(station.code, station.name.as_deref())
    }

    fn build_route(&self, summary: &TrainSummary, stops: &StopSequence) -> Route {
        let train = TrainSummary {
            number: summary.number.clone(),
            name: summary.name.clone(),
            start_station: self.resolve(&summary.start_station),
            end_station: self.resolve(&summary.end_station),
        };

        let stops = stops
            .iter()
            .map(|stop| self.index.resolve(stop.code, stop.name.as_deref()))
            .collect();

        Route::new(train, stops)
    }
}

/// Run an upstream fetch with a deadline; exceeding it is a network error.
async fn with_timeout<T>(
    limit: Duration,
    what: String,
    fetch: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    match tokio::time::timeout(limit, fetch).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Network(format!(
            "{what} timed out after {:?}",
            limit
        ))),
    }
}
