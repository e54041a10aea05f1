//! Calendar controller: keeps the widget in step with the reservation server.
//!
//! The widget applies user actions optimistically. Each hook then asks the
//! backend to make the change and, if it refuses, puts the widget back:
//!
//! | Hook    | Before the request        | On failure               | On success                     |
//! |---------|---------------------------|--------------------------|--------------------------------|
//! | receive | provisional event shown   | alert, remove the event  | attach pk, mark as own         |
//! | drop    | event moved               | alert, restore old times | nothing                        |
//! | resize  | event resized             | alert, restore old times | nothing                        |
//! | click   | nothing                   | alert                    | remove, notify with undo       |
//!
//! Failures reach the user through the [`Alerter`]: the server's message for
//! a rejection, a generic message for everything else.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info, warn};

use roomdesk_client::{BoxFuture, ReservationBackend, ReservationError, ReservationRequest};
use roomdesk_core::{
    ExternalSource, ReservationEvent, ReservationId, RoomFilter, RoomId, Visibility,
    filter_events, filter_external_sources, format_short_date,
};

use crate::notify::{Notification, NotificationId, NotificationTray, NotifyConfig};
use crate::page::{PageInputs, RoomOption};
use crate::session::PageSession;
use crate::view::{ViewNode, external_sources_view, room_filter_view};
use crate::widget::{Alerter, CalendarHooks, CalendarWidget, EventChange, EventKey, HookOutcome};

/// What an undo needs to re-create a deleted reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedReservation {
    pub room: RoomId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub title: String,
    pub reservee: Option<String>,
}

impl DeletedReservation {
    pub fn from_event(event: &ReservationEvent) -> Self {
        Self {
            room: event.room,
            start: event.start,
            end: event.end,
            title: event.title.clone(),
            reservee: event.reservee.clone(),
        }
    }

    pub fn request(&self) -> ReservationRequest {
        ReservationRequest::new(self.room, self.start, self.end)
    }

    /// The event shown once the server re-created the reservation as `pk`.
    pub fn into_event(self, pk: ReservationId) -> ReservationEvent {
        ReservationEvent {
            reservee: self.reservee,
            ..ReservationEvent::confirmed(pk, self.room, self.start, self.end, self.title)
        }
        .with_editable(true)
    }
}

/// Drives one calendar page.
pub struct CalendarController<W> {
    backend: Arc<dyn ReservationBackend>,
    widget: W,
    alerter: Arc<dyn Alerter>,
    session: PageSession,
    tray: NotificationTray<DeletedReservation>,
    external_sources: Option<Vec<ExternalSource>>,
    rooms: Option<Vec<RoomOption>>,
}

impl<W: CalendarWidget> CalendarController<W> {
    /// Creates a controller for `widget`. The notification tray shares the
    /// session's hover flag.
    pub fn new(
        backend: Arc<dyn ReservationBackend>,
        widget: W,
        alerter: Arc<dyn Alerter>,
        session: PageSession,
        notify_config: NotifyConfig,
    ) -> Self {
        let tray = NotificationTray::new(notify_config, session.hover().clone());
        Self {
            backend,
            widget,
            alerter,
            session,
            tray,
            external_sources: None,
            rooms: None,
        }
    }

    /// Loads the page's initial events and optional controls. The room
    /// filter starts at "all rooms". Returns the number of events added.
    pub fn load(&mut self, inputs: PageInputs) -> usize {
        self.session.set_room_filter(RoomFilter::All);

        let count = inputs.events.len();
        for descriptor in inputs.events {
            self.widget.add_event(descriptor.into());
        }
        self.external_sources = inputs.external_sources;
        self.rooms = inputs.rooms;

        // Events kept from an earlier load may still carry a narrower selection.
        filter_events(self.widget.events_mut(), RoomFilter::All);
        if let Some(sources) = self.external_sources.as_mut() {
            filter_external_sources(sources.iter_mut(), RoomFilter::All);
        }

        info!(
            events = count,
            room_filter = self.rooms.is_some(),
            external_sources = self.external_sources.is_some(),
            backend = self.backend.name(),
            "Calendar loaded"
        );
        count
    }

    /// Confirms an event dropped from an external source.
    #[tracing::instrument(skip_all, fields(key = %key))]
    pub async fn receive(&mut self, key: EventKey) -> HookOutcome {
        let Some(event) = self.widget.event(key) else {
            debug!("Received event no longer on the calendar");
            return HookOutcome::Ignored;
        };
        if event.is_confirmed() {
            debug!(pk = ?event.pk, "Received event is already confirmed");
            return HookOutcome::Ignored;
        }
        let request = ReservationRequest::from_event(event);

        match self.backend.create(request).await {
            Ok(pk) => {
                if let Some(event) = self.widget.event_mut(key) {
                    event.confirm(pk);
                }
                self.apply_filter_to(key);
                info!(pk = %pk, "Reservation created");
                HookOutcome::Confirmed(pk)
            }
            Err(err) => {
                self.report("create", &err);
                self.widget.remove_event(key);
                HookOutcome::Removed
            }
        }
    }

    /// Saves a drag or resize, restoring `change.previous` if the server
    /// refuses.
    #[tracing::instrument(skip_all, fields(key = %change.key))]
    pub async fn change(&mut self, change: EventChange) -> HookOutcome {
        let Some(event) = self.widget.event(change.key) else {
            debug!("Changed event no longer on the calendar");
            return HookOutcome::Ignored;
        };
        let request = ReservationRequest::from_event(event);
        let pk = event.pk;

        let result = match pk {
            Some(pk) => self.backend.update(pk, request).await.map(|()| pk),
            None => Err(ReservationError::invalid_response(
                "event has no server identifier yet",
            )),
        };

        match result {
            Ok(pk) => {
                info!(pk = %pk, "Reservation updated");
                HookOutcome::Updated
            }
            Err(err) => {
                if let Some(event) = self.widget.event_mut(change.key) {
                    event.set_span(change.previous);
                }
                self.report("update", &err);
                HookOutcome::Reverted
            }
        }
    }

    /// Deletes a clicked event and offers to undo it.
    #[tracing::instrument(skip_all, fields(key = %key))]
    pub async fn delete(&mut self, key: EventKey) -> HookOutcome {
        let Some(event) = self.widget.event(key) else {
            return HookOutcome::Ignored;
        };
        if !event.editable {
            debug!("Clicked event is not editable");
            return HookOutcome::Ignored;
        }
        let Some(pk) = event.pk else {
            debug!("Clicked event is not confirmed yet");
            return HookOutcome::Ignored;
        };

        if let Err(err) = self.backend.delete(pk).await {
            self.report("delete", &err);
            return HookOutcome::Rejected;
        }

        let Some(event) = self.widget.remove_event(key) else {
            return HookOutcome::Ignored;
        };
        info!(pk = %pk, "Reservation deleted");

        let text = format!(
            "Deleted {} reservation from {}",
            event.owner_possessive(),
            format_short_date(&event.start.with_timezone(&Local))
        );
        let id = self
            .tray
            .notify(text, Some(DeletedReservation::from_event(&event)))
            .await;
        HookOutcome::Deleted(id)
    }

    /// Runs the undo offered by notification `id`, if it is still shown.
    #[tracing::instrument(skip_all, fields(notification = %id))]
    pub async fn undo(&mut self, id: NotificationId) -> HookOutcome {
        let Some(deleted) = self.tray.invoke_undo(id).await else {
            debug!("No undo pending for notification");
            return HookOutcome::Ignored;
        };

        match self.backend.create(deleted.request()).await {
            Ok(pk) => {
                let key = self.widget.add_event(deleted.into_event(pk));
                self.apply_filter_to(key);
                info!(pk = %pk, "Reservation restored");
                HookOutcome::Restored { key, pk }
            }
            Err(err) => {
                self.report("undo", &err);
                HookOutcome::Rejected
            }
        }
    }

    /// Closes a notification without running its undo.
    pub async fn close_notification(&self, id: NotificationId) -> bool {
        self.tray.close(id).await
    }

    /// Applies a room filter selection from the select control.
    ///
    /// Does nothing when the page has no room filter or the selection is
    /// unchanged. Returns whether the filter was applied.
    pub fn set_room_filter(&mut self, raw: i64) -> bool {
        if self.rooms.is_none() {
            debug!(raw, "Room filter is not enabled on this page");
            return false;
        }
        let selection = RoomFilter::from_raw(raw);
        if !self.session.set_room_filter(selection) {
            return false;
        }

        filter_events(self.widget.events_mut(), selection);
        if let Some(sources) = self.external_sources.as_mut() {
            filter_external_sources(sources.iter_mut(), selection);
        }
        true
    }

    pub fn pointer_entered_tray(&self) {
        self.session.pointer_entered_tray();
    }

    pub fn pointer_left_tray(&self) {
        self.session.pointer_left_tray();
    }

    /// Tags one event according to the current selection.
    fn apply_filter_to(&mut self, key: EventKey) {
        let selection = self.session.room_filter();
        if let Some(event) = self.widget.event_mut(key) {
            event.visibility = Visibility::from_visible(selection.matches(event.room));
        }
    }

    fn report(&self, operation: &'static str, err: &ReservationError) {
        warn!(
            operation,
            code = %err.code(),
            status = ?err.status(),
            error = %err,
            "Reservation request failed"
        );
        self.alerter.alert(err.user_message());
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    pub fn room_filter(&self) -> RoomFilter {
        self.session.room_filter()
    }

    pub fn rooms(&self) -> Option<&[RoomOption]> {
        self.rooms.as_deref()
    }

    pub fn external_sources(&self) -> Option<&[ExternalSource]> {
        self.external_sources.as_deref()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.tray.notifications().await
    }

    /// The newest notification that still offers undo.
    pub async fn latest_undo(&self) -> Option<NotificationId> {
        self.tray.latest_with_undo().await
    }

    pub async fn tray_view(&self) -> ViewNode {
        self.tray.view().await
    }

    pub fn external_sources_view(&self) -> Option<ViewNode> {
        self.external_sources.as_deref().map(external_sources_view)
    }

    pub fn room_filter_view(&self) -> Option<ViewNode> {
        self.rooms
            .as_deref()
            .map(|rooms| room_filter_view(rooms, self.session.room_filter()))
    }
}

impl<W: CalendarWidget> CalendarHooks for CalendarController<W> {
    fn event_receive(&mut self, key: EventKey) -> BoxFuture<'_, HookOutcome> {
        Box::pin(self.receive(key))
    }

    fn event_drop(&mut self, change: EventChange) -> BoxFuture<'_, HookOutcome> {
        Box::pin(self.change(change))
    }

    fn event_resize(&mut self, change: EventChange) -> BoxFuture<'_, HookOutcome> {
        Box::pin(self.change(change))
    }

    fn event_click(&mut self, key: EventKey) -> BoxFuture<'_, HookOutcome> {
        Box::pin(self.delete(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::TimeZone;
    use roomdesk_client::{ReservationResult, UNKNOWN_ERROR_MESSAGE};
    use roomdesk_core::{EventDescriptor, TimeSpan};

    use crate::widget::EventCollection;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(ReservationRequest),
        Update(ReservationId, ReservationRequest),
        Delete(ReservationId),
    }

    /// Backend that succeeds unless a failure was queued. Created
    /// reservations get identifiers from 100 upwards.
    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<Call>>,
        failures: Mutex<VecDeque<ReservationError>>,
        next_pk: Mutex<i64>,
    }

    impl FakeBackend {
        fn fail_next(&self, err: ReservationError) {
            self.failures.lock().unwrap().push_back(err);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> ReservationResult<()> {
            self.calls.lock().unwrap().push(call);
            match self.failures.lock().unwrap().pop_front() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    impl ReservationBackend for FakeBackend {
        fn name(&self) -> &str {
            "fake"
        }

        fn create(&self, request: ReservationRequest) -> BoxFuture<'_, ReservationResult<ReservationId>> {
            Box::pin(async move {
                self.record(Call::Create(request))?;
                let mut next = self.next_pk.lock().unwrap();
                *next += 1;
                Ok(ReservationId(99 + *next))
            })
        }

        fn update(
            &self,
            id: ReservationId,
            request: ReservationRequest,
        ) -> BoxFuture<'_, ReservationResult<()>> {
            Box::pin(async move { self.record(Call::Update(id, request)) })
        }

        fn delete(&self, id: ReservationId) -> BoxFuture<'_, ReservationResult<()>> {
            Box::pin(async move { self.record(Call::Delete(id)) })
        }
    }

    #[derive(Default)]
    struct RecordingAlerter {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingAlerter {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Alerter for RecordingAlerter {
        fn alert(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    struct Fixture {
        backend: Arc<FakeBackend>,
        alerter: Arc<RecordingAlerter>,
        controller: CalendarController<EventCollection>,
    }

    fn fixture() -> Fixture {
        let backend = Arc::new(FakeBackend::default());
        let alerter = Arc::new(RecordingAlerter::default());
        let controller = CalendarController::new(
            backend.clone(),
            EventCollection::new(),
            alerter.clone(),
            PageSession::new(),
            NotifyConfig::default(),
        );
        Fixture {
            backend,
            alerter,
            controller,
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, hour, 0, 0).unwrap()
    }

    fn descriptor(pk: i64, room: i64, editable: bool) -> EventDescriptor {
        EventDescriptor {
            pk: ReservationId(pk),
            title: format!("Room {}", room),
            reservee: None,
            room: RoomId(room),
            start: at(12),
            end: at(13),
            editable,
        }
    }

    fn page(events: Vec<EventDescriptor>) -> PageInputs {
        PageInputs {
            csrf_token: "tok".to_string(),
            events,
            ..PageInputs::default()
        }
    }

    fn drop_provisional(f: &mut Fixture, room: i64) -> EventKey {
        let source = ExternalSource::new(format!("Room {}", room), RoomId(room));
        f.controller
            .widget_mut()
            .add_event(source.provisional_event(at(9), at(10)))
    }

    fn only_key(f: &Fixture) -> EventKey {
        let keys: Vec<_> = f.controller.widget().iter().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), 1);
        keys[0]
    }

    #[tokio::test]
    async fn receive_confirms_event() {
        let mut f = fixture();
        let key = drop_provisional(&mut f, 3);

        let outcome = f.controller.event_receive(key).await;
        assert_eq!(outcome, HookOutcome::Confirmed(ReservationId(100)));

        let event = f.controller.widget().event(key).unwrap();
        assert_eq!(event.pk, Some(ReservationId(100)));
        assert_eq!(event.title, "Room 3 (you)");
        assert!(event.editable);
        assert_eq!(
            f.backend.calls(),
            vec![Call::Create(ReservationRequest::new(RoomId(3), at(9), at(10)))]
        );
        assert!(f.alerter.messages().is_empty());
    }

    #[tokio::test]
    async fn rejected_receive_leaves_no_trace() {
        let mut f = fixture();
        f.backend
            .fail_next(ReservationError::rejected("This room is already booked"));
        let key = drop_provisional(&mut f, 3);

        assert_eq!(f.controller.receive(key).await, HookOutcome::Removed);
        assert!(f.controller.widget().is_empty());
        assert_eq!(f.alerter.messages(), vec!["This room is already booked"]);
    }

    #[tokio::test]
    async fn transport_failure_on_receive_alerts_generic_message() {
        let mut f = fixture();
        f.backend.fail_next(ReservationError::transport(500));
        let key = drop_provisional(&mut f, 3);

        assert_eq!(f.controller.receive(key).await, HookOutcome::Removed);
        assert!(f.controller.widget().is_empty());
        assert_eq!(f.alerter.messages(), vec![UNKNOWN_ERROR_MESSAGE]);
    }

    #[tokio::test]
    async fn received_event_follows_active_filter() {
        let mut f = fixture();
        f.controller
            .load(page(vec![]).with_rooms(vec![RoomOption::new(RoomId(5), "Red")]));
        assert!(f.controller.set_room_filter(5));

        let key = drop_provisional(&mut f, 3);
        f.controller.receive(key).await;
        let event = f.controller.widget().event(key).unwrap();
        assert_eq!(event.visibility, Visibility::Hidden);
    }

    #[tokio::test]
    async fn successful_drag_keeps_identity() {
        let mut f = fixture();
        f.controller.load(page(vec![descriptor(42, 3, true)]));
        let key = only_key(&f);

        let previous = f.controller.widget().event(key).unwrap().span();
        let moved = previous.moved_to(at(15));
        f.controller.widget_mut().event_mut(key).unwrap().set_span(moved);

        let outcome = f.controller.event_drop(EventChange::new(key, previous)).await;
        assert_eq!(outcome, HookOutcome::Updated);

        let event = f.controller.widget().event(key).unwrap();
        assert_eq!(event.pk, Some(ReservationId(42)));
        assert_eq!(event.room, RoomId(3));
        assert_eq!(event.span(), moved);
        assert_eq!(
            f.backend.calls(),
            vec![Call::Update(
                ReservationId(42),
                ReservationRequest::new(RoomId(3), at(15), at(16))
            )]
        );
    }

    #[tokio::test]
    async fn failed_resize_restores_previous_span() {
        let mut f = fixture();
        f.controller.load(page(vec![descriptor(42, 3, true)]));
        let key = only_key(&f);
        f.backend.fail_next(ReservationError::rejected(
            "You cannot change the end time to this value",
        ));

        let previous = f.controller.widget().event(key).unwrap().span();
        f.controller
            .widget_mut()
            .event_mut(key)
            .unwrap()
            .set_span(TimeSpan::new(at(12), at(17)));

        let outcome = f.controller.event_resize(EventChange::new(key, previous)).await;
        assert_eq!(outcome, HookOutcome::Reverted);

        let event = f.controller.widget().event(key).unwrap();
        assert_eq!(event.span(), previous);
        assert_eq!(event.pk, Some(ReservationId(42)));
        assert_eq!(
            f.alerter.messages(),
            vec!["You cannot change the end time to this value"]
        );
    }

    #[tokio::test]
    async fn transport_failure_on_drag_restores_previous_span() {
        let mut f = fixture();
        f.controller.load(page(vec![descriptor(42, 3, true)]));
        let key = only_key(&f);
        f.backend.fail_next(ReservationError::transport(500));

        let previous = f.controller.widget().event(key).unwrap().span();
        f.controller
            .widget_mut()
            .event_mut(key)
            .unwrap()
            .set_span(previous.moved_to(at(15)));

        let outcome = f.controller.event_drop(EventChange::new(key, previous)).await;
        assert_eq!(outcome, HookOutcome::Reverted);

        let event = f.controller.widget().event(key).unwrap();
        assert_eq!(event.span(), previous);
        assert_eq!(event.pk, Some(ReservationId(42)));
        assert_eq!(event.room, RoomId(3));
        assert_eq!(f.alerter.messages(), vec![UNKNOWN_ERROR_MESSAGE]);
    }

    #[tokio::test]
    async fn drag_of_unconfirmed_event_reverts_without_request() {
        let mut f = fixture();
        let key = drop_provisional(&mut f, 3);
        let previous = TimeSpan::new(at(9), at(10));
        f.controller
            .widget_mut()
            .event_mut(key)
            .unwrap()
            .set_span(previous.moved_to(at(11)));

        let outcome = f.controller.change(EventChange::new(key, previous)).await;
        assert_eq!(outcome, HookOutcome::Reverted);
        assert_eq!(f.controller.widget().event(key).unwrap().span(), previous);
        assert!(f.backend.calls().is_empty());
        assert_eq!(f.alerter.messages(), vec![UNKNOWN_ERROR_MESSAGE]);
    }

    #[tokio::test]
    async fn click_on_read_only_event_does_nothing() {
        let mut f = fixture();
        f.controller.load(page(vec![descriptor(7, 3, false)]));
        let key = only_key(&f);

        assert_eq!(f.controller.event_click(key).await, HookOutcome::Ignored);
        assert!(f.backend.calls().is_empty());
        assert_eq!(f.controller.widget().len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_leaves_event() {
        let mut f = fixture();
        f.controller.load(page(vec![descriptor(42, 3, true)]));
        let key = only_key(&f);
        f.backend.fail_next(ReservationError::transport(403));

        assert_eq!(f.controller.delete(key).await, HookOutcome::Rejected);
        assert!(f.controller.widget().event(key).is_some());
        assert!(f.controller.notifications().await.is_empty());
        assert_eq!(f.alerter.messages(), vec![UNKNOWN_ERROR_MESSAGE]);
    }

    #[tokio::test(start_paused = true)]
    async fn delete_then_undo_recreates_reservation() {
        let mut f = fixture();
        let mut original = descriptor(42, 3, true);
        original.title = "Standup (you)".to_string();
        f.controller.load(page(vec![original.clone()]));
        let key = only_key(&f);

        let HookOutcome::Deleted(id) = f.controller.delete(key).await else {
            panic!("expected a deletion");
        };
        assert!(f.controller.widget().is_empty());

        let notifications = f.controller.notifications().await;
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].has_undo);
        assert_eq!(
            notifications[0].text,
            format!(
                "Deleted your reservation from {}",
                format_short_date(&at(12).with_timezone(&Local))
            )
        );

        tokio::time::sleep(Duration::from_secs(2)).await;

        let HookOutcome::Restored { key, pk } = f.controller.undo(id).await else {
            panic!("expected a restore");
        };
        assert_eq!(pk, ReservationId(100));
        assert_eq!(
            f.backend.calls(),
            vec![
                Call::Delete(ReservationId(42)),
                Call::Create(ReservationRequest::new(RoomId(3), at(12), at(13))),
            ]
        );

        let event = f.controller.widget().event(key).unwrap();
        assert_eq!(event.pk, Some(ReservationId(100)));
        assert_eq!(event.title, "Standup (you)");
        assert_eq!(event.room, RoomId(3));
        assert_eq!(event.span(), TimeSpan::new(at(12), at(13)));
        assert!(event.editable);
        assert!(f.controller.notifications().await.is_empty());

        // Only one undo per deletion.
        assert_eq!(f.controller.undo(id).await, HookOutcome::Ignored);
        assert_eq!(f.backend.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn undo_expires_with_notification() {
        let mut f = fixture();
        f.controller.load(page(vec![descriptor(42, 3, true)]));
        let key = only_key(&f);
        let HookOutcome::Deleted(id) = f.controller.delete(key).await else {
            panic!("expected a deletion");
        };

        tokio::time::sleep(Duration::from_millis(10_001)).await;
        assert!(f.controller.notifications().await.is_empty());
        assert_eq!(f.controller.undo(id).await, HookOutcome::Ignored);
        assert!(f.controller.widget().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn hovering_tray_keeps_undo_available() {
        let mut f = fixture();
        f.controller.load(page(vec![descriptor(42, 3, true)]));
        let key = only_key(&f);
        let HookOutcome::Deleted(id) = f.controller.delete(key).await else {
            panic!("expected a deletion");
        };

        f.controller.pointer_entered_tray();
        tokio::time::sleep(Duration::from_millis(10_001)).await;
        f.controller.pointer_left_tray();

        assert!(matches!(
            f.controller.undo(id).await,
            HookOutcome::Restored { .. }
        ));
    }

    #[tokio::test]
    async fn failed_undo_adds_nothing() {
        let mut f = fixture();
        f.controller.load(page(vec![descriptor(42, 3, true)]));
        let key = only_key(&f);
        let HookOutcome::Deleted(id) = f.controller.delete(key).await else {
            panic!("expected a deletion");
        };

        f.backend
            .fail_next(ReservationError::rejected("Room is taken now"));
        assert_eq!(f.controller.undo(id).await, HookOutcome::Rejected);
        assert!(f.controller.widget().is_empty());
        assert_eq!(f.alerter.messages(), vec!["Room is taken now"]);
    }

    #[tokio::test]
    async fn transport_failure_on_undo_adds_nothing() {
        let mut f = fixture();
        f.controller.load(page(vec![descriptor(42, 3, true)]));
        let key = only_key(&f);
        let HookOutcome::Deleted(id) = f.controller.delete(key).await else {
            panic!("expected a deletion");
        };

        f.backend.fail_next(ReservationError::transport(502));
        assert_eq!(f.controller.undo(id).await, HookOutcome::Rejected);
        assert!(f.controller.widget().is_empty());
        assert_eq!(f.alerter.messages(), vec![UNKNOWN_ERROR_MESSAGE]);
        assert!(f.controller.notifications().await.is_empty());
    }

    #[tokio::test]
    async fn deleting_someone_elses_reservation_names_them() {
        let mut f = fixture();
        let mut other = descriptor(8, 3, true);
        other.reservee = Some("Alice".to_string());
        f.controller.load(page(vec![other]));
        let key = only_key(&f);

        f.controller.delete(key).await;
        let text = &f.controller.notifications().await[0].text;
        assert!(text.starts_with("Deleted Alice's reservation from "));
    }

    #[tokio::test]
    async fn close_notification_drops_undo() {
        let mut f = fixture();
        f.controller.load(page(vec![descriptor(42, 3, true)]));
        let key = only_key(&f);
        let HookOutcome::Deleted(id) = f.controller.delete(key).await else {
            panic!("expected a deletion");
        };

        assert_eq!(f.controller.latest_undo().await, Some(id));
        assert!(f.controller.close_notification(id).await);
        assert_eq!(f.controller.undo(id).await, HookOutcome::Ignored);
    }

    #[test]
    fn room_filter_hides_other_rooms() {
        let mut f = fixture();
        let inputs = page(vec![descriptor(1, 3, true), descriptor(2, 5, false)])
            .with_rooms(vec![
                RoomOption::new(RoomId(3), "Blue"),
                RoomOption::new(RoomId(5), "Red"),
            ])
            .with_external_sources(vec![
                ExternalSource::new("Blue", RoomId(3)),
                ExternalSource::new("Red", RoomId(5)),
            ]);
        f.controller.load(inputs);

        let visibility = |f: &Fixture| -> Vec<(i64, Visibility)> {
            f.controller
                .widget()
                .iter()
                .map(|(_, e)| (e.room.0, e.visibility))
                .collect()
        };
        let draggable = |f: &Fixture| -> Vec<bool> {
            f.controller
                .external_sources()
                .unwrap()
                .iter()
                .map(|s| s.draggable)
                .collect()
        };

        assert!(f.controller.set_room_filter(3));
        assert_eq!(
            visibility(&f),
            vec![(3, Visibility::Visible), (5, Visibility::Hidden)]
        );
        assert_eq!(draggable(&f), vec![true, false]);

        assert!(!f.controller.set_room_filter(3));

        assert!(f.controller.set_room_filter(-1));
        assert_eq!(
            visibility(&f),
            vec![(3, Visibility::Visible), (5, Visibility::Visible)]
        );
        assert_eq!(draggable(&f), vec![true, true]);
    }

    #[test]
    fn room_filter_needs_select_control() {
        let mut f = fixture();
        f.controller
            .load(page(vec![descriptor(1, 3, true), descriptor(2, 5, true)]));

        assert!(!f.controller.set_room_filter(3));
        assert_eq!(f.controller.room_filter(), RoomFilter::All);
        assert!(f
            .controller
            .widget()
            .iter()
            .all(|(_, e)| e.visibility.is_visible()));
        assert!(f.controller.room_filter_view().is_none());
    }

    #[test]
    fn load_resets_filter_and_adds_events() {
        let mut f = fixture();
        let rooms = vec![
            RoomOption::new(RoomId(3), "Blue"),
            RoomOption::new(RoomId(5), "Red"),
        ];
        f.controller
            .load(page(vec![descriptor(2, 5, false)]).with_rooms(rooms.clone()));
        assert!(f.controller.set_room_filter(3));
        assert!(!is_visible(&f, ReservationId(2)));

        let count = f
            .controller
            .load(page(vec![descriptor(1, 3, true)]).with_rooms(rooms));
        assert_eq!(count, 1);
        assert_eq!(f.controller.room_filter(), RoomFilter::All);
        assert!(f
            .controller
            .widget()
            .iter()
            .all(|(_, e)| e.visibility.is_visible()));
        assert!(!f.controller.set_room_filter(-1));
        let html = f.controller.room_filter_view().unwrap().render();
        assert!(html.contains(r#"<option value="-1" selected="selected">"#));
    }

    #[test]
    fn reload_restores_external_sources_to_draggable() {
        let mut f = fixture();
        let sources = vec![
            ExternalSource::new("Blue", RoomId(3)),
            ExternalSource::new("Red", RoomId(5)),
        ];
        let rooms = vec![
            RoomOption::new(RoomId(3), "Blue"),
            RoomOption::new(RoomId(5), "Red"),
        ];
        f.controller.load(
            page(vec![])
                .with_external_sources(sources)
                .with_rooms(rooms.clone()),
        );
        f.controller.set_room_filter(3);
        let filtered = f.controller.external_sources().unwrap().to_vec();
        assert!(!filtered[1].draggable);

        f.controller
            .load(page(vec![]).with_external_sources(filtered).with_rooms(rooms));
        let draggable: Vec<bool> = f
            .controller
            .external_sources()
            .unwrap()
            .iter()
            .map(|s| s.draggable)
            .collect();
        assert_eq!(draggable, vec![true, true]);
    }

    fn is_visible(f: &Fixture, pk: ReservationId) -> bool {
        f.controller
            .widget()
            .iter()
            .find(|(_, e)| e.pk == Some(pk))
            .map(|(_, e)| e.visibility.is_visible())
            .unwrap_or(false)
    }

    #[test]
    fn deleted_reservation_round_trip() {
        let event = ReservationEvent::confirmed(ReservationId(42), RoomId(3), at(12), at(13), "Standup")
            .with_reservee("Alice");
        let deleted = DeletedReservation::from_event(&event);
        assert_eq!(
            deleted.request(),
            ReservationRequest::new(RoomId(3), at(12), at(13))
        );

        let restored = deleted.into_event(ReservationId(100));
        assert_eq!(restored.pk, Some(ReservationId(100)));
        assert_eq!(restored.reservee.as_deref(), Some("Alice"));
        assert_eq!(restored.title, "Standup");
        assert!(restored.editable);
    }
}
