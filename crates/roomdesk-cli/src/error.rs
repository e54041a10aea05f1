//! CLI error types.

use thiserror::Error;

use roomdesk_calendar::PageError;
use roomdesk_client::ReservationError;
use roomdesk_core::{TimeParseError, TracingError};

use crate::secret::SecretError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("secret error: {0}")]
    Secret(#[from] SecretError),

    #[error("reservation failed: {0}")]
    Reservation(#[from] ReservationError),

    #[error("page error: {0}")]
    Page(#[from] PageError),

    #[error("invalid time: {0}")]
    Time(#[from] TimeParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logging setup failed: {0}")]
    Tracing(#[from] TracingError),
}

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
