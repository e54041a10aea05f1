//! Reservation event types.
//!
//! - [`ReservationEvent`]: an event as held by the calendar widget
//! - [`EventDescriptor`]: an event as embedded in the calendar page
//! - [`ExternalSource`]: an entry of the draggable external-events list

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::TimeSpan;

/// Suffix appended to the title of a reservation the current user just made.
pub const OWNER_MARKER: &str = " (you)";

/// Server-assigned reservation identifier (`pk`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub i64);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub i64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visibility tag set by the room filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    /// Maps a match result onto a tag.
    pub fn from_visible(visible: bool) -> Self {
        if visible { Self::Visible } else { Self::Hidden }
    }

    /// CSS class the widget renders for this tag.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Lifecycle state of an event shown on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    /// Shown optimistically, the server has not assigned an identifier yet.
    Provisional,
    /// The server holds a reservation with this event's identifier.
    Confirmed,
}

/// A reservation as held by the calendar widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationEvent {
    /// Absent until the server confirms creation.
    pub pk: Option<ReservationId>,
    pub room: RoomId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub title: String,
    pub reservee: Option<String>,
    /// Whether the event may be moved, resized or deleted. The server only
    /// marks the current user's own reservations as editable.
    pub editable: bool,
    #[serde(default)]
    pub visibility: Visibility,
}

impl ReservationEvent {
    /// Creates a provisional event, as produced by a drop from an external source.
    pub fn provisional(
        room: RoomId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            pk: None,
            room,
            start,
            end,
            title: title.into(),
            reservee: None,
            editable: false,
            visibility: Visibility::Visible,
        }
    }

    /// Creates an event the server already knows about.
    pub fn confirmed(
        pk: ReservationId,
        room: RoomId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            pk: Some(pk),
            ..Self::provisional(room, start, end, title)
        }
    }

    /// Builder: set the reservee name.
    pub fn with_reservee(mut self, reservee: impl Into<String>) -> Self {
        self.reservee = Some(reservee.into());
        self
    }

    /// Builder: set the editability flag.
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn state(&self) -> EventState {
        if self.pk.is_some() {
            EventState::Confirmed
        } else {
            EventState::Provisional
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.state() == EventState::Confirmed
    }

    /// Attaches the server identifier and marks the event as the user's own.
    pub fn confirm(&mut self, pk: ReservationId) {
        self.pk = Some(pk);
        if !self.title.ends_with(OWNER_MARKER) {
            self.title.push_str(OWNER_MARKER);
        }
        self.editable = true;
    }

    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start, self.end)
    }

    pub fn set_span(&mut self, span: TimeSpan) {
        self.start = span.start;
        self.end = span.end;
    }

    /// Possessive used in user-facing messages: "your" or "Alice's".
    pub fn owner_possessive(&self) -> String {
        match self.reservee.as_deref() {
            // Always apostrophe-s, never a bare "s" suffix ("Alices").
            Some(name) if !name.is_empty() => format!("{}'s", name),
            _ => "your".to_string(),
        }
    }
}

/// An event as embedded in the calendar page's events blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub pk: ReservationId,
    pub title: String,
    #[serde(default)]
    pub reservee: Option<String>,
    pub room: RoomId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub editable: bool,
}

impl From<EventDescriptor> for ReservationEvent {
    fn from(d: EventDescriptor) -> Self {
        Self {
            pk: Some(d.pk),
            room: d.room,
            start: d.start,
            end: d.end,
            title: d.title,
            reservee: d.reservee,
            editable: d.editable,
            visibility: Visibility::Visible,
        }
    }
}

/// An entry of the external-events list that can be dropped onto the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalSource {
    pub title: String,
    pub room: RoomId,
    #[serde(default = "default_draggable")]
    pub draggable: bool,
}

fn default_draggable() -> bool {
    true
}

impl ExternalSource {
    pub fn new(title: impl Into<String>, room: RoomId) -> Self {
        Self {
            title: title.into(),
            room,
            draggable: true,
        }
    }

    /// The provisional event produced by dropping this source on the calendar.
    pub fn provisional_event(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> ReservationEvent {
        ReservationEvent::provisional(self.room, start, end, &self.title)
    }
}
