use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::info;

use crate::error::ApiError;
use crate::models::BookingStatus;

#[derive(Debug, Serialize)]
pub struct BookingConfirmation {
    pub booking_id: i64,
    pub show_time_id: i64,
    pub total_price: i64,
    pub status: String,
    pub seat_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

/// Duplicate seat ids in one request would collide with themselves inside the
/// ticket insert; they are a caller error and rejected before any write.
pub(crate) fn validate_seat_ids(seat_ids: &[i64]) -> Result<(), ApiError> {
    if seat_ids.is_empty() {
        return Err(ApiError::InvalidInput(
            "seat_ids must not be empty".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(seat_ids.len());
    for id in seat_ids {
        if !seen.insert(id) {
            return Err(ApiError::InvalidInput(format!(
                "duplicate seat id {id} in request"
            )));
        }
    }
    Ok(())
}

/// Reserves `seat_ids` for the showtime on behalf of `user_id`: one booking
/// row plus one ticket per seat, committed atomically.
///
/// The `tickets_seat_per_showtime` unique constraint is the double-booking
/// guard; when the bulk insert trips it the whole transaction rolls back and
/// the caller gets `SeatAlreadyBooked`. The caller is expected to re-fetch
/// the seat map and resubmit a new selection - nothing is retried here, and
/// the operation is deliberately not idempotent.
pub async fn create_booking(
    pool: &PgPool,
    user_id: i64,
    show_time_id: i64,
    seat_ids: &[i64],
) -> Result<BookingConfirmation, ApiError> {
    validate_seat_ids(seat_ids)?;

    let mut tx = pool.begin().await?;

    let price: i64 = sqlx::query_scalar("SELECT price FROM showtimes WHERE id = $1")
        .bind(show_time_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound("showtime"))?;

    let total_price = price * seat_ids.len() as i64;

    let (booking_id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
        "INSERT INTO bookings (user_id, show_time_id, total_price, status)
         VALUES ($1, $2, $3, 'pending')
         RETURNING id, created_at",
    )
    .bind(user_id)
    .bind(show_time_id)
    .bind(total_price)
    .fetch_one(&mut *tx)
    .await?;

    // One ticket per requested seat, in a single multi-row insert. A unique
    // or FK violation here aborts the booking row along with the tickets.
    sqlx::query(
        "INSERT INTO tickets (booking_id, show_time_id, seat_id, price)
         SELECT $1, $2, u.seat_id, $3
         FROM UNNEST($4::BIGINT[]) AS u(seat_id)",
    )
    .bind(booking_id)
    .bind(show_time_id)
    .bind(price)
    .bind(seat_ids)
    .execute(&mut *tx)
    .await
    .map_err(ApiError::from_db_write)?;

    tx.commit().await?;

    info!(
        "booking {} created: showtime {}, {} seats, total {}",
        booking_id,
        show_time_id,
        seat_ids.len(),
        total_price
    );

    Ok(BookingConfirmation {
        booking_id,
        show_time_id,
        total_price,
        status: "pending".to_string(),
        seat_ids: seat_ids.to_vec(),
        created_at,
    })
}

/// Thin administrative status write. The transition check lives inside the
/// UPDATE predicate itself, so two concurrent writes cannot both pass it:
/// the row only changes when its current status is a valid source for
/// `next`.
pub async fn update_status(
    pool: &PgPool,
    user_id: i64,
    booking_id: i64,
    next: BookingStatus,
) -> Result<BookingStatus, ApiError> {
    let sources: Vec<String> = [
        BookingStatus::Pending,
        BookingStatus::Paid,
        BookingStatus::Cancelled,
    ]
    .iter()
    .filter(|s| s.can_transition_to(next))
    .map(|s| s.as_str().to_string())
    .collect();

    let updated = sqlx::query(
        "UPDATE bookings SET status = $3
         WHERE id = $1 AND user_id = $2 AND status = ANY($4)",
    )
    .bind(booking_id)
    .bind(user_id)
    .bind(next.as_str())
    .bind(&sources)
    .execute(pool)
    .await?
    .rows_affected();

    if updated == 1 {
        info!("booking {} status set to {}", booking_id, next.as_str());
        return Ok(next);
    }

    // Distinguish a missing or foreign booking from an invalid transition.
    let current: Option<String> =
        sqlx::query_scalar("SELECT status FROM bookings WHERE id = $1 AND user_id = $2")
            .bind(booking_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    match current {
        None => Err(ApiError::NotFound("booking")),
        Some(current) => Err(ApiError::InvalidInput(format!(
            "cannot change booking status from {} to {}",
            current,
            next.as_str()
        ))),
    }
}
