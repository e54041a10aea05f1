//! Page-wide state.
//!
//! A page has one room filter selection and one notification tray hover
//! flag. Both live in [`PageSession`], which is handed to the components that
//! need them.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use roomdesk_core::RoomFilter;

/// Whether the pointer is inside the notification tray.
///
/// Clones share the same flag. Notification timers subscribe to it so they
/// can check it at their expiry instant.
#[derive(Debug, Clone)]
pub struct HoverFlag {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for HoverFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl HoverFlag {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn set(&self, hovering: bool) {
        self.tx.send_replace(hovering);
    }

    pub fn is_hovering(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// State owned by one page load.
#[derive(Debug, Clone, Default)]
pub struct PageSession {
    room_filter: RoomFilter,
    hover: HoverFlag,
}

impl PageSession {
    /// Starts a session with no room filter and the pointer outside the tray.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room_filter(&self) -> RoomFilter {
        self.room_filter
    }

    /// Stores a new selection. Returns false if it equals the current one.
    pub fn set_room_filter(&mut self, selection: RoomFilter) -> bool {
        if selection == self.room_filter {
            return false;
        }
        debug!(from = %self.room_filter, to = %selection, "Room filter changed");
        self.room_filter = selection;
        true
    }

    pub fn hover(&self) -> &HoverFlag {
        &self.hover
    }

    pub fn pointer_entered_tray(&self) {
        self.hover.set(true);
    }

    pub fn pointer_left_tray(&self) {
        self.hover.set(false);
    }
}
