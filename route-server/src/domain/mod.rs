//! Domain types for train route resolution.
//!
//! Codes and numbers enforce their invariants at construction time, so code
//! that receives these types can trust their validity.

mod route;
mod station;
mod train;

pub use route::Route;
pub use station::{Coordinates, InvalidStationCode, MAX_CODE_LEN, Station, StationCode};
pub use train::{InvalidTrainNumber, ScheduledStop, StopSequence, TrainNumber, TrainSummary};
