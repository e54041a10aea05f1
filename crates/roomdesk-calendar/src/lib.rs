//! Calendar controller for room reservations.
//!
//! This crate provides:
//! - [`CalendarController`]: keeps the widget and the reservation server in step
//! - [`NotificationTray`]: transient notifications with undo
//! - [`PageSession`]: the room filter selection and tray hover flag of one page
//! - [`ViewNode`]: declarative views for the tray and page controls
//! - [`EventCollection`]: an in-memory [`CalendarWidget`]

pub mod controller;
pub mod notify;
pub mod page;
pub mod session;
pub mod view;
pub mod widget;

pub use controller::{CalendarController, DeletedReservation};
pub use notify::{Notification, NotificationId, NotificationPhase, NotificationTray, NotifyConfig};
pub use page::{PageError, PageInputs, RoomOption};
pub use session::{HoverFlag, PageSession};
pub use view::{Element, ViewNode};
pub use widget::{
    Alerter, CalendarHooks, CalendarWidget, EventChange, EventCollection, EventKey, HookOutcome,
};
