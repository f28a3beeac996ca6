//! Train route server.
//!
//! A web application that answers: "Which trains pass through this
//! station, and where do they go?" Train lists and schedules are scraped
//! from etrain.info, joined against a local coordinate index and drawn
//! on a map.

pub mod cache;
pub mod domain;
pub mod etrain;
pub mod map;
pub mod resolver;
pub mod stations;
pub mod web;
