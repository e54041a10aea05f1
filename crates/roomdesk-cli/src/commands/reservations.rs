//! One-shot reservation commands.

use chrono::{DateTime, Utc};
use tracing::info;

use roomdesk_client::{
    ClientConfig, HttpReservationClient, ReservationBackend, ReservationRequest,
};
use roomdesk_core::{ReservationId, RoomId, TimeSpan};

use crate::error::{CliError, CliResult};

fn client(config: ClientConfig) -> CliResult<HttpReservationClient> {
    Ok(HttpReservationClient::new(config)?)
}

fn check_span(start: DateTime<Utc>, end: DateTime<Utc>) -> CliResult<()> {
    if end <= start {
        return Err(CliError::config(format!(
            "end ({}) must be after start ({})",
            end, start
        )));
    }
    Ok(())
}

/// Creates a reservation and prints its identifier.
pub async fn create(
    config: ClientConfig,
    room: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> CliResult<()> {
    check_span(start, end)?;
    let request = ReservationRequest::new(RoomId(room), start, end);
    let pk = client(config)?.create(request).await?;
    info!(pk = %pk, room, "Reservation created");
    println!("Reserved room {} for {} (pk {})", room, TimeSpan::new(start, end), pk);
    Ok(())
}

/// Moves or resizes a reservation.
pub async fn update(
    config: ClientConfig,
    pk: i64,
    room: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> CliResult<()> {
    check_span(start, end)?;
    let request = ReservationRequest::new(RoomId(room), start, end);
    client(config)?.update(ReservationId(pk), request).await?;
    println!("Updated reservation {} to {}", pk, TimeSpan::new(start, end));
    Ok(())
}

/// Deletes a reservation.
pub async fn delete(config: ClientConfig, pk: i64) -> CliResult<()> {
    client(config)?.delete(ReservationId(pk)).await?;
    println!("Deleted reservation {}", pk);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn span_must_be_positive() {
        let start = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap();
        assert!(check_span(start, start + chrono::Duration::minutes(15)).is_ok());
        assert!(check_span(start, start).is_err());
        assert!(check_span(start, start - chrono::Duration::hours(1)).is_err());
    }
}
