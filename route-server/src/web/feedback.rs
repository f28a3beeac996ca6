//! Append-only feedback log.

use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Errors from recording feedback.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("feedback message is empty")]
    Empty,

    #[error("failed to write feedback: {0}")]
    Io(#[from] std::io::Error),
}

/// Text file that feedback lines are appended to.
///
/// Each entry is one line: an RFC 3339 timestamp, a tab, then the message
/// with line breaks and tabs flattened to spaces.
#[derive(Debug)]
pub struct FeedbackLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file if needed.
    pub async fn append(&self, message: &str) -> Result<(), FeedbackError> {
        let message = flatten(message);
        if message.is_empty() {
            return Err(FeedbackError::Empty);
        }

        let line = format!("{}\t{}\n", Local::now().to_rfc3339(), message);

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

fn flatten(message: &str) -> String {
    message
        .replace(['\r', '\n', '\t'], " ")
        .trim()
        .to_string()
}
