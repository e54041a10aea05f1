//! Interfaces between the controller and the calendar widget.
//!
//! The widget renders events and handles drag and drop on its own. The
//! controller sees it through two traits:
//!
//! - [`CalendarWidget`]: the widget's mutable event collection
//! - [`CalendarHooks`]: the lifecycle callbacks the widget invokes, implemented
//!   by [`CalendarController`](crate::CalendarController)
//!
//! [`EventCollection`] is an in-memory widget used by the terminal session
//! and by tests.

use std::collections::BTreeMap;
use std::fmt;

use roomdesk_client::BoxFuture;
use roomdesk_core::{ReservationEvent, ReservationId, TimeSpan};

use crate::notify::NotificationId;

/// Widget-local handle to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey(u64);

impl EventKey {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The widget's event collection.
pub trait CalendarWidget: Send {
    /// Adds an event and returns its handle.
    fn add_event(&mut self, event: ReservationEvent) -> EventKey;

    /// Removes an event, returning it if it was present.
    fn remove_event(&mut self, key: EventKey) -> Option<ReservationEvent>;

    fn event(&self, key: EventKey) -> Option<&ReservationEvent>;

    fn event_mut(&mut self, key: EventKey) -> Option<&mut ReservationEvent>;

    /// All events, in display order.
    fn events_mut(&mut self) -> Box<dyn Iterator<Item = &mut ReservationEvent> + '_>;
}

/// Shows a blocking message to the user.
pub trait Alerter: Send + Sync {
    fn alert(&self, message: &str);
}

/// Start and end of an event before the user dragged or resized it.
/// The widget has already applied the new times when the hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventChange {
    pub key: EventKey,
    pub previous: TimeSpan,
}

impl EventChange {
    pub fn new(key: EventKey, previous: TimeSpan) -> Self {
        Self { key, previous }
    }
}

/// What a hook did to the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// A dropped event was accepted and now carries this identifier.
    Confirmed(ReservationId),
    /// A drag or resize was accepted.
    Updated,
    /// A drag or resize was refused and the previous times were restored.
    Reverted,
    /// A dropped event was refused and taken off the calendar.
    Removed,
    /// A reservation was deleted; the notification offers undo.
    Deleted(NotificationId),
    /// An undo re-created the reservation as a new event.
    Restored { key: EventKey, pk: ReservationId },
    /// The server refused; the widget was left as it was.
    Rejected,
    /// Nothing to do (unknown key, event not editable, no undo pending).
    Ignored,
}

/// Lifecycle callbacks invoked by the widget.
pub trait CalendarHooks {
    /// An event was dropped from an external source and is shown provisionally.
    fn event_receive(&mut self, key: EventKey) -> BoxFuture<'_, HookOutcome>;

    /// An event was dragged to new times.
    fn event_drop(&mut self, change: EventChange) -> BoxFuture<'_, HookOutcome>;

    /// An event's end was dragged.
    fn event_resize(&mut self, change: EventChange) -> BoxFuture<'_, HookOutcome>;

    /// An event was clicked.
    fn event_click(&mut self, key: EventKey) -> BoxFuture<'_, HookOutcome>;
}

/// In-memory event collection.
#[derive(Debug, Default)]
pub struct EventCollection {
    events: BTreeMap<EventKey, ReservationEvent>,
    next_key: u64,
}

impl EventCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventKey, &ReservationEvent)> {
        self.events.iter().map(|(k, e)| (*k, e))
    }

    /// Finds the event carrying server identifier `pk`.
    pub fn find_by_pk(&self, pk: ReservationId) -> Option<EventKey> {
        self.iter()
            .find(|(_, e)| e.pk == Some(pk))
            .map(|(key, _)| key)
    }
}

impl CalendarWidget for EventCollection {
    fn add_event(&mut self, event: ReservationEvent) -> EventKey {
        self.next_key += 1;
        let key = EventKey(self.next_key);
        self.events.insert(key, event);
        key
    }

    fn remove_event(&mut self, key: EventKey) -> Option<ReservationEvent> {
        self.events.remove(&key)
    }

    fn event(&self, key: EventKey) -> Option<&ReservationEvent> {
        self.events.get(&key)
    }

    fn event_mut(&mut self, key: EventKey) -> Option<&mut ReservationEvent> {
        self.events.get_mut(&key)
    }

    fn events_mut(&mut self) -> Box<dyn Iterator<Item = &mut ReservationEvent> + '_> {
        Box::new(self.events.values_mut())
    }
}
