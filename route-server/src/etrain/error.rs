//! Upstream fetch error types.

/// Errors from fetching or parsing upstream pages.
///
/// Errors are `Clone` because they are memoized alongside successful
/// results and handed to every caller waiting on the same key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Transport failure, timeout, or an unexpected HTTP status
    #[error("network error: {0}")]
    Network(String),

    /// The page did not have the expected shape
    #[error("parse error: {0}")]
    Parse(String),

    /// The station or train does not exist upstream
    #[error("not found: {0}")]
    NotFound(String),
}

impl FetchError {
    /// Short machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Parse(_) => "parse",
            FetchError::NotFound(_) => "not_found",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Network(format!("request timed out: {err}"))
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
