//! Notification tray with auto-dismiss, hover pause and undo.
//!
//! Each notification goes through:
//!
//! ```text
//! notify() ──▶ Collapsed ──(expand delay)──▶ Expanded ──(expiry)──▶ removed
//!                  │                            │
//!                  └──── close() / invoke_undo() ┴──────────────▶ removed
//! ```
//!
//! At the expiry instant the notification is only removed if the pointer is
//! outside the tray. If it is inside, the notification stays and no new
//! timer is armed unless [`NotifyConfig::rearm_on_leave`] is set, in which
//! case a fresh expiry period starts once the pointer leaves.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::session::HoverFlag;
use crate::view::{ViewNode, tray_view};

/// Configuration for the notification tray.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Delay before a new notification switches to its expanded look.
    pub expand_delay: Duration,
    /// Time after which an unhovered notification is removed.
    pub expiry: Duration,
    /// Start a new expiry period when the pointer leaves the tray.
    pub rearm_on_leave: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            expand_delay: Self::DEFAULT_EXPAND_DELAY,
            expiry: Self::DEFAULT_EXPIRY,
            rearm_on_leave: false,
        }
    }
}

impl NotifyConfig {
    pub const DEFAULT_EXPAND_DELAY: Duration = Duration::from_millis(40);
    pub const DEFAULT_EXPIRY: Duration = Duration::from_millis(10_000);

    /// Builder: set expiry.
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    /// Builder: set expand delay.
    pub fn with_expand_delay(mut self, delay: Duration) -> Self {
        self.expand_delay = delay;
        self
    }

    /// Builder: re-arm expiry when the pointer leaves the tray.
    pub fn with_rearm_on_leave(mut self, rearm: bool) -> Self {
        self.rearm_on_leave = rearm;
        self
    }
}

/// Identifier of a notification within its tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual state of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Collapsed,
    Expanded,
}

impl NotificationPhase {
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Collapsed => "notification-collapsed",
            Self::Expanded => "notification",
        }
    }
}

/// Snapshot of a notification in the tray.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub text: String,
    pub phase: NotificationPhase,
    pub has_undo: bool,
}

struct Entry<A> {
    notification: Notification,
    undo: Option<A>,
}

struct TrayState<A> {
    /// Newest first.
    entries: VecDeque<Entry<A>>,
    next_id: u64,
}

impl<A> TrayState<A> {
    fn position(&self, id: NotificationId) -> Option<usize> {
        self.entries.iter().position(|e| e.notification.id == id)
    }

    fn remove(&mut self, id: NotificationId) -> Option<Entry<A>> {
        self.position(id).and_then(|i| self.entries.remove(i))
    }
}

/// The notification tray.
///
/// `A` is the undo action payload. The tray never runs it: [`invoke_undo`]
/// hands it back to the caller, who performs the undo.
///
/// [`invoke_undo`]: NotificationTray::invoke_undo
pub struct NotificationTray<A> {
    config: NotifyConfig,
    state: Arc<Mutex<TrayState<A>>>,
    hover: HoverFlag,
}

impl<A: Send + 'static> NotificationTray<A> {
    /// Creates an empty tray whose timers consult `hover` at expiry.
    pub fn new(config: NotifyConfig, hover: HoverFlag) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(TrayState {
                entries: VecDeque::new(),
                next_id: 0,
            })),
            hover,
        }
    }

    pub fn config(&self) -> &NotifyConfig {
        &self.config
    }

    /// Adds a notification at the front of the tray and starts its timers.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn notify(&self, text: impl Into<String>, undo: Option<A>) -> NotificationId {
        let text = text.into();
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = NotificationId(state.next_id);
        state.entries.push_front(Entry {
            notification: Notification {
                id,
                text: text.clone(),
                phase: NotificationPhase::Collapsed,
                has_undo: undo.is_some(),
            },
            undo,
        });
        drop(state);

        info!(id = %id, text = %text, "Notification shown");
        self.spawn_lifecycle(id);
        id
    }

    fn spawn_lifecycle(&self, id: NotificationId) {
        let state = Arc::clone(&self.state);
        let mut hover = self.hover.subscribe();
        let config = self.config.clone();
        let created = Instant::now();

        tokio::spawn(async move {
            time::sleep_until(created + config.expand_delay).await;
            {
                let mut state = state.lock().await;
                match state.position(id) {
                    Some(i) => state.entries[i].notification.phase = NotificationPhase::Expanded,
                    None => return,
                }
            }

            let mut deadline = created + config.expiry;
            loop {
                time::sleep_until(deadline).await;

                if !*hover.borrow_and_update() {
                    if state.lock().await.remove(id).is_some() {
                        debug!(id = %id, "Notification expired");
                    }
                    return;
                }

                if !config.rearm_on_leave {
                    debug!(id = %id, "Pointer over tray at expiry, keeping notification");
                    return;
                }

                while *hover.borrow_and_update() {
                    if hover.changed().await.is_err() {
                        return;
                    }
                }
                if state.lock().await.position(id).is_none() {
                    return;
                }
                debug!(id = %id, "Pointer left tray, expiry re-armed");
                deadline = Instant::now() + config.expiry;
            }
        });
    }

    /// Removes a notification. Returns false if it was already gone.
    pub async fn close(&self, id: NotificationId) -> bool {
        let removed = self.state.lock().await.remove(id).is_some();
        if removed {
            debug!(id = %id, "Notification closed");
        }
        removed
    }

    /// Removes a notification and returns its undo action, if any.
    pub async fn invoke_undo(&self, id: NotificationId) -> Option<A> {
        let entry = self.state.lock().await.remove(id)?;
        debug!(id = %id, has_undo = entry.undo.is_some(), "Notification undo invoked");
        entry.undo
    }

    /// Snapshot of the tray, newest first.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.state
            .lock()
            .await
            .entries
            .iter()
            .map(|e| e.notification.clone())
            .collect()
    }

    /// The newest notification that still offers undo.
    pub async fn latest_with_undo(&self) -> Option<NotificationId> {
        self.state
            .lock()
            .await
            .entries
            .iter()
            .find(|e| e.undo.is_some())
            .map(|e| e.notification.id)
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Builds the tray's view tree.
    pub async fn view(&self) -> ViewNode {
        tray_view(&self.notifications().await)
    }
}
