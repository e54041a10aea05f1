//! HTTP client configuration.

use std::time::Duration;
use url::Url;

use roomdesk_core::ReservationId;

/// Header carrying the CSRF token on every request.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Configuration for [`HttpReservationClient`](crate::HttpReservationClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site root the `reservations/...` endpoints are resolved against.
    /// Always ends with `/`.
    pub base_url: Url,

    /// CSRF token issued by the server with the calendar page.
    pub csrf_token: String,

    /// Raw `Cookie` header value carrying the authenticated session.
    pub session_cookie: Option<String>,

    /// Whether to verify TLS certificates.
    pub verify_tls: bool,

    /// Request timeout. Requests run to completion when unset.
    pub timeout: Option<Duration>,

    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration for the site at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(
        base_url: impl AsRef<str>,
        csrf_token: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            csrf_token: csrf_token.into(),
            session_cookie: None,
            verify_tls: true,
            timeout: None,
            user_agent: format!("roomdesk/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Disables TLS verification (for local development servers only).
    pub fn with_insecure_tls(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// `POST` target for creating a reservation.
    pub fn create_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join("reservations/create")
    }

    /// `POST` target for updating reservation `id`.
    pub fn update_url(&self, id: ReservationId) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!("reservations/{}/update", id))
    }

    /// `POST` target for deleting reservation `id`.
    pub fn delete_url(&self, id: ReservationId) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!("reservations/{}/delete", id))
    }
}
