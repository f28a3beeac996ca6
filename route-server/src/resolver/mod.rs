//! Station → routes resolution.
//!
//! Given a station code, fetches the trains passing through it, then
//! fetches every train's stop sequence with a small bounded worker pool
//! and resolves each stop against the coordinate index. One train failing
//! never prevents the others from resolving.

mod config;
mod resolve;
mod source;


pub use config::ResolverConfig;
pub use resolve::{RouteResolver, StationRoutes, TrainFailure};
pub use source::TrainSource;
