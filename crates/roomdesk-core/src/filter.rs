//! Room filter.
//!
//! The page has a single room selection. The select control reports a raw
//! integer where `-1` means "all rooms"; [`RoomFilter`] is the typed form.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::event::{ExternalSource, ReservationEvent, RoomId, Visibility};

/// The active room selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RoomFilter {
    /// No filter, every room is shown.
    #[default]
    All,
    /// Only this room is shown.
    Room(RoomId),
}

impl RoomFilter {
    /// Raw select value meaning "all rooms".
    pub const ALL_RAW: i64 = -1;

    pub fn from_raw(raw: i64) -> Self {
        if raw == Self::ALL_RAW {
            Self::All
        } else {
            Self::Room(RoomId(raw))
        }
    }

    pub fn to_raw(self) -> i64 {
        match self {
            Self::All => Self::ALL_RAW,
            Self::Room(room) => room.0,
        }
    }

    /// Returns true if events of `room` pass this filter.
    pub fn matches(self, room: RoomId) -> bool {
        match self {
            Self::All => true,
            Self::Room(selected) => selected == room,
        }
    }
}

impl FromStr for RoomFilter {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self::from_raw)
    }
}

impl fmt::Display for RoomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all rooms"),
            Self::Room(room) => write!(f, "room {}", room),
        }
    }
}

/// Tags every event visible or hidden according to `selection`.
pub fn filter_events<'a, I>(events: I, selection: RoomFilter)
where
    I: IntoIterator<Item = &'a mut ReservationEvent>,
{
    for event in events {
        event.visibility = Visibility::from_visible(selection.matches(event.room));
    }
}

/// Allows dragging only the external sources whose room passes `selection`.
pub fn filter_external_sources<'a, I>(sources: I, selection: RoomFilter)
where
    I: IntoIterator<Item = &'a mut ExternalSource>,
{
    for source in sources {
        source.draggable = selection.matches(source.room);
    }
}
