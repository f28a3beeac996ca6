//! etrain.info client.
//!
//! This module fetches and parses the two upstream pages the resolver
//! needs:
//! - the "all trains" page of a station, whose rows carry a JSON
//!   `data-train` payload per train
//! - the schedule page of a train, whose schedule table lists every stop
//!   as a `CODE - Name` link
//!
//! It is pure I/O and parsing. Caching lives in [`crate::cache`].

mod client;
mod error;
mod mock;
mod parse;
mod source;

pub use client::{EtrainClient, EtrainConfig};
pub use error::FetchError;
pub use mock::MockEtrainClient;
pub use parse::{parse_station_listing, parse_stop_sequence};
pub use source::EtrainSource;
