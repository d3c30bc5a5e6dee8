use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::ApiError;

#[derive(Debug, Serialize, FromRow)]
pub struct ShowtimeSummary {
    pub show_time_id: i64,
    pub movie_title: String,
    pub room_id: i64,
    pub room_name: String,
    pub price: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct SeatStatus {
    pub seat_id: i64,
    pub row_label: String,
    pub number: i32,
    pub class: String,
    pub is_booked: bool,
}

#[derive(Debug, Serialize)]
pub struct SeatMap {
    pub showtime: ShowtimeSummary,
    pub seats: Vec<SeatStatus>,
}

/// Live seat map for one showtime: every seat of the showtime's room with a
/// booked flag derived from committed tickets. Always read fresh from the
/// store - callers re-check this before booking, though the actual guard is
/// the ticket uniqueness constraint.
pub async fn get_seat_map(pool: &PgPool, show_time_id: i64) -> Result<SeatMap, ApiError> {
    let showtime: ShowtimeSummary = sqlx::query_as(
        "SELECT st.id AS show_time_id, m.title AS movie_title,
                r.id AS room_id, r.name AS room_name, st.price
         FROM showtimes st
         JOIN movies m ON m.id = st.movie_id
         JOIN rooms r ON r.id = st.room_id
         WHERE st.id = $1",
    )
    .bind(show_time_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ApiError::NotFound("showtime"))?;

    // Booked = a ticket exists for this exact (showtime, seat) pair. The same
    // seat booked for another showtime in the same room stays free here.
    let seats: Vec<SeatStatus> = sqlx::query_as(
        "SELECT s.id AS seat_id, s.row_label, s.number, s.class,
                (t.id IS NOT NULL) AS is_booked
         FROM seats s
         LEFT JOIN tickets t ON t.seat_id = s.id AND t.show_time_id = $1
         WHERE s.room_id = $2
         ORDER BY s.row_label, s.number",
    )
    .bind(show_time_id)
    .bind(showtime.room_id)
    .fetch_all(pool)
    .await?;

    Ok(SeatMap { showtime, seats })
}
