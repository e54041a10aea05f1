//! HTTP implementation of [`ReservationBackend`].
//!
//! Every operation is a `POST` carrying the CSRF header and, when configured,
//! the session cookie. Only a 200 response is decoded; any other status is a
//! transport error regardless of its body.

use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::{Client, StatusCode};
use tracing::{debug, trace, warn};
use url::Url;

use roomdesk_core::ReservationId;

use crate::backend::{BoxFuture, ReservationBackend, ReservationReply, ReservationRequest};
use crate::config::{CSRF_HEADER, ClientConfig};
use crate::error::{ReservationError, ReservationResult};

/// Reservation client talking to the backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReservationClient {
    client: Client,
    config: ClientConfig,
}

impl HttpReservationClient {
    /// Creates a client with the given configuration.
    pub fn new(config: ClientConfig) -> ReservationResult<Self> {
        let mut builder = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ReservationError::configuration("failed to create HTTP client").with_source(e)
        })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends one `POST` and decodes the reply.
    async fn post(&self, url: Url, body: Option<String>) -> ReservationResult<ReservationReply> {
        let mut request = self
            .client
            .post(url.clone())
            .header(CSRF_HEADER, &self.config.csrf_token);

        if let Some(ref cookie) = self.config.session_cookie {
            request = request.header(COOKIE, cookie);
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        trace!(url = %url, "Sending reservation request");

        let response = request.send().await.map_err(|e| {
            ReservationError::network(format!("request to {} failed", url)).with_source(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            ReservationError::network(format!("failed to read response from {}", url))
                .with_source(e)
        })?;

        decode_reply(status, &text)
    }

    fn endpoint(&self, url: Result<Url, url::ParseError>) -> ReservationResult<Url> {
        url.map_err(|e| ReservationError::configuration("invalid endpoint URL").with_source(e))
    }
}

/// Applies the status contract and decodes a 200 body.
pub(crate) fn decode_reply(status: StatusCode, body: &str) -> ReservationResult<ReservationReply> {
    if status != StatusCode::OK {
        warn!(status = %status, body = %body, "Unexpected response status");
        return Err(ReservationError::transport(status.as_u16()));
    }

    let reply: ReservationReply = serde_json::from_str(body).map_err(|e| {
        ReservationError::invalid_response("response body is not a reservation reply")
            .with_source(e)
    })?;
    debug!(ok = reply.ok, pk = ?reply.pk, "Received reservation reply");
    Ok(reply)
}

fn encode(request: &ReservationRequest) -> ReservationResult<String> {
    serde_json::to_string(request).map_err(|e| {
        ReservationError::configuration("failed to encode reservation request").with_source(e)
    })
}

impl ReservationBackend for HttpReservationClient {
    fn name(&self) -> &str {
        "http"
    }

    fn create(&self, request: ReservationRequest) -> BoxFuture<'_, ReservationResult<ReservationId>> {
        Box::pin(async move {
            let url = self.endpoint(self.config.create_url())?;
            let body = encode(&request)?;
            self.post(url, Some(body)).await?.into_created()
        })
    }

    fn update(
        &self,
        id: ReservationId,
        request: ReservationRequest,
    ) -> BoxFuture<'_, ReservationResult<()>> {
        Box::pin(async move {
            let url = self.endpoint(self.config.update_url(id))?;
            let body = encode(&request)?;
            self.post(url, Some(body)).await?.into_result()?;
            Ok(())
        })
    }

    fn delete(&self, id: ReservationId) -> BoxFuture<'_, ReservationResult<()>> {
        Box::pin(async move {
            let url = self.endpoint(self.config.delete_url(id))?;
            self.post(url, None).await?.into_result()?;
            Ok(())
        })
    }
}
