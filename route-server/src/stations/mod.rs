//! Station coordinate reference data.
//!
//! Provides station code → (coordinates, display name) lookup, loaded from
//! a static CSV file at start-up and read-only afterwards.

mod error;
mod index;

pub use error::IndexError;
pub use index::{IndexedStation, StationCoordinateIndex};
