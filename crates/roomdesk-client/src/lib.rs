//! Reservation backend trait and HTTP client.
//!
//! ```text
//! ┌────────────────────┐      ┌───────────────────────────┐
//! │ CalendarController │ ───▶ │ dyn ReservationBackend    │
//! └────────────────────┘      └─────────────┬─────────────┘
//!                                           │
//!                                           ▼
//!                             ┌───────────────────────────┐
//!                             │ HttpReservationClient     │
//!                             │  POST reservations/create │
//!                             │  POST reservations/N/...  │
//!                             └───────────────────────────┘
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod http;

pub use backend::{BoxFuture, ReservationBackend, ReservationReply, ReservationRequest};
pub use config::{CSRF_HEADER, ClientConfig};
pub use error::{ReservationError, ReservationErrorCode, ReservationResult, UNKNOWN_ERROR_MESSAGE};
pub use http::HttpReservationClient;
