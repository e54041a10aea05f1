//! Error types for reservation requests.
//!
//! The backend reports failures two ways: a non-200 status (transport
//! failure, no detail shown to the user) or a 200 body with `ok: false`
//! (application failure, the server's message is shown). Connection and
//! decoding failures are transport failures from the user's point of view
//! but keep their own code for logging.

use std::fmt;
use thiserror::Error;

/// Message shown for every failure that is not an application rejection.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// The category of a reservation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationErrorCode {
    /// The backend answered with a non-200 status.
    Transport,
    /// No HTTP response was received at all.
    Network,
    /// A 200 response whose body could not be understood.
    InvalidResponse,
    /// A 200 response with `ok: false`.
    Rejected,
    /// The client could not be set up.
    Configuration,
}

impl ReservationErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport_error",
            Self::Network => "network_error",
            Self::InvalidResponse => "invalid_response",
            Self::Rejected => "rejected",
            Self::Configuration => "configuration_error",
        }
    }

    /// Returns true if the server understood the request and refused it.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Rejected)
    }
}

impl fmt::Display for ReservationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error from a create, update or delete request.
#[derive(Debug, Error)]
pub struct ReservationError {
    code: ReservationErrorCode,
    message: String,
    /// HTTP status for transport errors.
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ReservationError {
    pub fn new(code: ReservationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates a transport error for a non-200 status.
    pub fn transport(status: u16) -> Self {
        let mut err = Self::new(
            ReservationErrorCode::Transport,
            format!("unexpected status {}", status),
        );
        err.status = Some(status);
        err
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ReservationErrorCode::Network, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ReservationErrorCode::InvalidResponse, message)
    }

    /// Creates an application rejection carrying the server's message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ReservationErrorCode::Rejected, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ReservationErrorCode::Configuration, message)
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ReservationErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_rejected(&self) -> bool {
        self.code.is_application()
    }

    /// The text to put in front of the user.
    pub fn user_message(&self) -> &str {
        if self.is_rejected() && !self.message.is_empty() {
            &self.message
        } else {
            UNKNOWN_ERROR_MESSAGE
        }
    }
}

impl fmt::Display for ReservationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for reservation requests.
pub type ReservationResult<T> = Result<T, ReservationError>;
