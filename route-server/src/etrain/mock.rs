//! Mock etrain client for development without network access.
//!
//! Loads saved pages from disk and serves them through the same parsers as
//! the live client.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{StationCode, StopSequence, TrainNumber, TrainSummary};

use super::error::FetchError;
use super::parse::{parse_station_listing, parse_stop_sequence};

/// Mock client that serves saved HTML pages.
///
/// Expects `{dir}/station/{CODE}.html` and `{dir}/train/{NUMBER}.html`.
/// Train pages may be named by the listed number or its padded schedule id.
#[derive(Clone)]
pub struct MockEtrainClient {
    stations: Arc<RwLock<HashMap<StationCode, String>>>,
    trains: Arc<RwLock<HashMap<String, String>>>,
}

impl MockEtrainClient {
    /// Create a mock client by loading pages from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let data_dir = data_dir.as_ref();

        let stations = load_pages(&data_dir.join("station"))?
            .into_iter()
            .map(|(stem, html)| {
                StationCode::parse(&stem)
                    .map(|code| (code, html))
                    .map_err(|_| FetchError::Parse(format!("invalid station code in filename: {stem}")))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        let trains = load_pages(&data_dir.join("train"))?;

        if stations.is_empty() {
            return Err(FetchError::NotFound(format!(
                "no mock station pages found in {:?}",
                data_dir
            )));
        }

        Ok(Self {
            stations: Arc::new(RwLock::new(stations)),
            trains: Arc::new(RwLock::new(trains)),
        })
    }

    /// Mimics [`super::EtrainClient::fetch_trains_at_station`].
    pub async fn fetch_trains_at_station(
        &self,
        code: &StationCode,
    ) -> Result<Vec<TrainSummary>, FetchError> {
        let stations = self.stations.read().await;
        let html = stations
            .get(code)
            .ok_or_else(|| FetchError::NotFound(format!("station {code}")))?;
        parse_station_listing(html)
    }

    /// Mimics [`super::EtrainClient::fetch_stop_sequence`].
    pub async fn fetch_stop_sequence(
        &self,
        train: &TrainNumber,
    ) -> Result<StopSequence, FetchError> {
        let trains = self.trains.read().await;
        let html = trains
            .get(train.as_str())
            .or_else(|| trains.get(&train.schedule_id()))
            .ok_or_else(|| FetchError::NotFound(format!("train {train}")))?;
        parse_stop_sequence(html)
    }

    /// List stations with a saved page.
    pub async fn available_stations(&self) -> Vec<StationCode> {
        let stations = self.stations.read().await;
        let mut codes: Vec<_> = stations.keys().copied().collect();
        codes.sort();
        codes
    }
}

/// Read every `.html` file in `dir`, keyed by file stem. A missing
/// directory yields no pages.
fn load_pages(dir: &Path) -> Result<HashMap<String, String>, FetchError> {
    let mut pages = HashMap::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(pages),
        Err(e) => {
            return Err(FetchError::Network(format!(
                "failed to read mock data directory {:?}: {}",
                dir, e
            )));
        }
    };

    for entry in entries {
        let path = entry
            .map_err(|e| FetchError::Network(format!("failed to read directory entry: {}", e)))?
            .path();

        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("html") {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let html = std::fs::read_to_string(&path)
            .map_err(|e| FetchError::Network(format!("failed to read {:?}: {}", path, e)))?;
        pages.insert(stem.to_string(), html);
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA_DIR: &str = "data/mock_pages";

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    #[tokio::test]
    async fn load_mock_data() {
        let client = MockEtrainClient::new(DATA_DIR).unwrap();
        let stations = client.available_stations().await;
        assert!(stations.contains(&code("NDLS")));
    }

    #[tokio::test]
    async fn serves_station_listing() {
        let client = MockEtrainClient::new(DATA_DIR).unwrap();
        let trains = client.fetch_trains_at_station(&code("NDLS")).await.unwrap();

        assert!(!trains.is_empty());
        assert_eq!(trains[0].number.as_str(), "12301");
    }

    #[tokio::test]
    async fn serves_schedule_by_padded_id() {
        let client = MockEtrainClient::new(DATA_DIR).unwrap();
        let train = TrainNumber::parse("2302").unwrap();
        let stops = client.fetch_stop_sequence(&train).await.unwrap();
        assert!(stops.len() > 1);
    }

    #[tokio::test]
    async fn unknown_station_is_not_found() {
        let client = MockEtrainClient::new(DATA_DIR).unwrap();
        let err = client
            .fetch_trains_at_station(&code("ZZZZ"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unknown_train_is_not_found() {
        let client = MockEtrainClient::new(DATA_DIR).unwrap();
        let train = TrainNumber::parse("99999").unwrap();
        let err = client.fetch_stop_sequence(&train).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn empty_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MockEtrainClient::new(dir.path()).is_err());
    }
}
