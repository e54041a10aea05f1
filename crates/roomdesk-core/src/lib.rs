//! Core types: reservation events, room filter, dates, tracing

pub mod event;
pub mod filter;
pub mod time;
pub mod tracing;

pub use event::{
    EventDescriptor, EventState, ExternalSource, OWNER_MARKER, ReservationEvent, ReservationId,
    RoomId, Visibility,
};
pub use filter::{RoomFilter, filter_events, filter_external_sources};
pub use time::{TimeParseError, TimeSpan, format_short_date, parse_timestamp};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
