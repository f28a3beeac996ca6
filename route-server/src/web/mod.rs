//! Web layer for the station route map.
//!
//! Provides the search page, a JSON endpoint and feedback submission.

mod dto;
mod feedback;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use feedback::{FeedbackError, FeedbackLog};
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
