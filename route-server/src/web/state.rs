//! Application state for the web layer.

use std::sync::Arc;

use crate::etrain::EtrainSource;
use crate::resolver::RouteResolver;

use super::feedback::FeedbackLog;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Station resolver, holding the process-wide fetch cache
    pub resolver: Arc<RouteResolver<EtrainSource>>,

    /// Feedback sink
    pub feedback: Arc<FeedbackLog>,
}

impl AppState {
    pub fn new(resolver: RouteResolver<EtrainSource>, feedback: FeedbackLog) -> Self {
        Self {
            resolver: Arc::new(resolver),
            feedback: Arc::new(feedback),
        }
    }
}
