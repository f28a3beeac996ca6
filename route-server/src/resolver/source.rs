//! The upstream seam the resolver fetches through.

use std::future::Future;

use crate::domain::{StationCode, StopSequence, TrainNumber, TrainSummary};
use crate::etrain::FetchError;

/// Provides raw train data for route resolution.
///
/// Implemented by the etrain clients, and by scripted sources in tests.
/// Implementations do no caching; every call is a fresh fetch.
pub trait TrainSource: Send + Sync {
    /// Trains passing through a station, in listing order.
    fn fetch_trains_at_station(
        &self,
        code: &StationCode,
    ) -> impl Future<Output = Result<Vec<TrainSummary>, FetchError>> + Send;

    /// Ordered stops of one train.
    fn fetch_stop_sequence(
        &self,
        train: &TrainNumber,
    ) -> impl Future<Output = Result<StopSequence, FetchError>> + Send;
}
