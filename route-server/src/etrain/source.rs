//! Live or mock upstream, selected at start-up.

use crate::domain::{StationCode, StopSequence, TrainNumber, TrainSummary};
use crate::resolver::TrainSource;

use super::client::EtrainClient;
use super::error::FetchError;
use super::mock::MockEtrainClient;

/// The upstream the server talks to.
#[derive(Clone)]
pub enum EtrainSource {
    Live(EtrainClient),
    Mock(MockEtrainClient),
}

impl TrainSource for EtrainSource {
    async fn fetch_trains_at_station(
        &self,
        code: &StationCode,
    ) -> Result<Vec<TrainSummary>, FetchError> {
        match self {
            EtrainSource::Live(client) => client.fetch_trains_at_station(code).await,
            EtrainSource::Mock(client) => client.fetch_trains_at_station(code).await,
        }
    }

    async fn fetch_stop_sequence(&self, train: &TrainNumber) -> Result<StopSequence, FetchError> {
        match self {
            EtrainSource::Live(client) => client.fetch_stop_sequence(train).await,
            EtrainSource::Mock(client) => client.fetch_stop_sequence(train).await,
        }
    }
}
