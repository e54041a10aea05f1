//! The reservation backend abstraction.
//!
//! [`ReservationBackend`] is the only way the calendar reaches the server:
//! three operations, each resolving to success or a [`ReservationError`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use roomdesk_core::{ReservationEvent, ReservationId, RoomId};

use crate::error::{ReservationError, ReservationResult, UNKNOWN_ERROR_MESSAGE};

/// A boxed future so the trait stays object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Body of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub room: RoomId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ReservationRequest {
    pub fn new(room: RoomId, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            room,
            start_time,
            end_time,
        }
    }

    /// Request for the event's current room and times.
    pub fn from_event(event: &ReservationEvent) -> Self {
        Self::new(event.room, event.start, event.end)
    }
}

/// Decoded body of a 200 response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<ReservationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReservationReply {
    pub fn accepted() -> Self {
        Self {
            ok: true,
            ..Default::default()
        }
    }

    pub fn created(pk: ReservationId) -> Self {
        Self {
            ok: true,
            pk: Some(pk),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            pk: None,
            message: Some(message.into()),
        }
    }

    /// Turns `ok: false` into a rejection error.
    pub fn into_result(self) -> ReservationResult<Self> {
        if self.ok {
            Ok(self)
        } else {
            let message = self
                .message
                .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
            Err(ReservationError::rejected(message))
        }
    }

    /// Extracts the identifier of a newly created reservation.
    pub fn into_created(self) -> ReservationResult<ReservationId> {
        self.into_result()?
            .pk
            .ok_or_else(|| ReservationError::invalid_response("create reply is missing `pk`"))
    }
}

/// The server side of the reservation protocol.
///
/// Implementations perform a single request per call: no retry, no
/// deduplication, no cancellation.
pub trait ReservationBackend: Send + Sync {
    /// Returns a short name used in logs.
    fn name(&self) -> &str;

    /// Creates a reservation and returns its server identifier.
    fn create(&self, request: ReservationRequest) -> BoxFuture<'_, ReservationResult<ReservationId>>;

    /// Moves or resizes an existing reservation.
    fn update(
        &self,
        id: ReservationId,
        request: ReservationRequest,
    ) -> BoxFuture<'_, ReservationResult<()>>;

    /// Deletes a reservation.
    fn delete(&self, id: ReservationId) -> BoxFuture<'_, ReservationResult<()>>;
}

impl<T: ReservationBackend + ?Sized> ReservationBackend for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn create(&self, request: ReservationRequest) -> BoxFuture<'_, ReservationResult<ReservationId>> {
        (**self).create(request)
    }

    fn update(
        &self,
        id: ReservationId,
        request: ReservationRequest,
    ) -> BoxFuture<'_, ReservationResult<()>> {
        (**self).update(id, request)
    }

    fn delete(&self, id: ReservationId) -> BoxFuture<'_, ReservationResult<()>> {
        (**self).delete(id)
    }
}
