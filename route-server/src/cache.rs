//! Single-flight memoization of upstream fetches.
//!
//! Every station listing and train schedule is fetched at most once per
//! process. Concurrent requests for the same key wait on the one in-flight
//! fetch and receive its result; fetches for different keys never wait on
//! each other.
//!
//! Failures are memoized too: a key whose fetch failed keeps returning that
//! failure for the life of the process instead of hitting a source known to
//! be broken for it. The universe of stations and trains is finite, so
//! entries are never evicted.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use moka::future::Cache as MokaCache;

use crate::domain::{StationCode, StopSequence, TrainNumber, TrainSummary};
use crate::etrain::FetchError;

/// A memoized fetch outcome, shared by every caller for the key.
pub type Memo<V> = Result<Arc<V>, FetchError>;

/// Generic keyed single-flight cache.
///
/// Built on moka's `get_with`, which coalesces concurrent initialisation of
/// a key into a single evaluation and holds no lock shared with other keys
/// while the init future runs. The cached value is the whole `Result`, so
/// an entry moves from pending to ready exactly once, whatever the outcome.
pub struct SingleFlightCache<K, V> {
    entries: MokaCache<K, Memo<V>>,
}

impl<K, V> SingleFlightCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Create an unbounded cache with no expiry.
    pub fn new() -> Self {
        Self {
            entries: MokaCache::builder().build(),
        }
    }

    /// Return the memoized result for `key`, running `fetch` if this is the
    /// first request for it.
    ///
    /// If another caller is already fetching `key`, this waits for that
    /// fetch instead of starting a second one.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Memo<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FetchError>>,
    {
        self.entries
            .get_with(key, async move { fetch().await.map(Arc::new) })
            .await
    }

    /// Peek at a ready entry without fetching.
    pub async fn get(&self, key: &K) -> Option<Memo<V>> {
        self.entries.get(key).await
    }

    /// Number of ready entries.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl<K, V> Default for SingleFlightCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide cache of upstream results, keyed separately for station
/// listings and train schedules.
///
/// Constructed once at start-up and passed explicitly to the resolver.
#[derive(Default)]
pub struct RouteResolutionCache {
    stations: SingleFlightCache<StationCode, Vec<TrainSummary>>,
    /// Keyed by schedule id, so "2302" and "02302" share one entry
    trains: SingleFlightCache<String, StopSequence>,
}

impl RouteResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized station listing.
    pub async fn station_listing<F, Fut>(&self, code: StationCode, fetch: F) -> Memo<Vec<TrainSummary>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<TrainSummary>, FetchError>>,
    {
        self.stations.get_or_fetch(code, fetch).await
    }

    /// Memoized train stop sequence. Numbers naming the same schedule
    /// page share an entry.
    pub async fn stop_sequence<F, Fut>(&self, train: &TrainNumber, fetch: F) -> Memo<StopSequence>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<StopSequence, FetchError>>,
    {
        self.trains.get_or_fetch(train.schedule_id(), fetch).await
    }

    /// Number of cached (station listings, train schedules).
    pub async fn entry_counts(&self) -> (u64, u64) {
        (
            self.stations.entry_count().await,
            self.trains.entry_count().await,
        )
    }
}
