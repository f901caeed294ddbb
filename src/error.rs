//! Unified error handling for the check-in sync service.
//!
//! One variant per failure kind a run can hit, so the top-level catch can log
//! every outcome with context while module code uses `?` naturally.

use reqwest::StatusCode;
use thiserror::Error;
use tokio_cron_scheduler::JobSchedulerError;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or malformed configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Login rejected, or the session cookie was absent from the response
    #[error("authentication failed with status {status}: {reason}")]
    Auth { status: StatusCode, reason: String },

    /// History endpoint returned a non-success status
    #[error("history fetch failed with status {status}: {body}")]
    HistoryFetch { status: StatusCode, body: String },

    /// Spreadsheet column read failed
    #[error("failed to read existing dates from the sheet")]
    SheetRead(#[source] google_sheets4::Error),

    /// Spreadsheet append failed
    #[error("failed to append new dates to the sheet")]
    SheetWrite(#[source] google_sheets4::Error),

    /// A portal request exceeded the client timeout
    #[error("{operation} request timed out")]
    Timeout { operation: &'static str },

    /// Transport-level HTTP failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Underlying cron scheduler failure
    #[error("scheduler error: {0}")]
    Scheduler(#[from] JobSchedulerError),

    #[error("scheduler already running")]
    SchedulerAlreadyRunning,

    #[error("scheduler not running")]
    SchedulerNotRunning,
}

impl SyncError {
    /// Create a config error for missing env vars
    pub fn missing_env(var_name: &str) -> Self {
        SyncError::Config(format!("{} environment variable must be set", var_name))
    }

    /// Classify a reqwest failure, surfacing timeouts as their own kind
    pub fn http(operation: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::Timeout { operation }
        } else {
            SyncError::Http(err)
        }
    }
}

/// Result type alias for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
