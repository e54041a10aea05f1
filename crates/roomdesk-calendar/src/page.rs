//! Inputs a page hands to the calendar at load.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use roomdesk_core::{EventDescriptor, ExternalSource, RoomId};

/// Errors reading page inputs.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("missing CSRF token")]
    MissingCsrf,

    #[error("invalid events blob: {0}")]
    Events(#[from] serde_json::Error),
}

/// One entry of the room filter select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOption {
    pub id: RoomId,
    pub name: String,
}

impl RoomOption {
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Everything the calendar reads from the page.
///
/// The external events list and the room filter select are optional; when
/// absent the matching feature is off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInputs {
    pub csrf_token: String,
    #[serde(default)]
    pub events: Vec<EventDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_sources: Option<Vec<ExternalSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<Vec<RoomOption>>,
}

impl PageInputs {
    /// Builds inputs from the calendar element's `data-csrf` and
    /// `data-events` attributes.
    pub fn from_attributes(csrf_token: &str, events_json: &str) -> Result<Self, PageError> {
        let csrf_token = csrf_token.trim();
        if csrf_token.is_empty() {
            return Err(PageError::MissingCsrf);
        }
        let events = serde_json::from_str(events_json)?;
        Ok(Self {
            csrf_token: csrf_token.to_string(),
            events,
            ..Self::default()
        })
    }

    /// Parses a whole page description.
    pub fn from_json(json: &str) -> Result<Self, PageError> {
        let inputs: Self = serde_json::from_str(json)?;
        if inputs.csrf_token.trim().is_empty() {
            return Err(PageError::MissingCsrf);
        }
        Ok(inputs)
    }

    pub fn with_external_sources(mut self, sources: Vec<ExternalSource>) -> Self {
        self.external_sources = Some(sources);
        self
    }

    pub fn with_rooms(mut self, rooms: Vec<RoomOption>) -> Self {
        self.rooms = Some(rooms);
        self
    }

    pub fn has_room_filter(&self) -> bool {
        self.rooms.is_some()
    }

    pub fn has_external_sources(&self) -> bool {
        self.external_sources.is_some()
    }
}
