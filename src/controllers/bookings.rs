use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::models::BookingStatus;
use crate::services::booking;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/history", get(get_booking_history))
        .route("/bookings/status", patch(update_booking_status))
}

/* ---------- CREATE ---------- */

#[derive(Debug, Deserialize, Validate)]
struct CreateBookingRequest {
    show_time_id: i64,
    #[validate(length(min = 1, message = "seat_ids must not be empty"))]
    seat_ids: Vec<i64>,
}

// POST /api/bookings
async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: crate::middleware::AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    let confirmation = booking::create_booking(
        &state.db.pool,
        user.user_id,
        req.show_time_id,
        &req.seat_ids,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(confirmation)))
}

/* ---------- HISTORY ---------- */

#[derive(Debug, Serialize)]
struct BookingHistoryEntry {
    booking_id: i64,
    movie_title: String,
    room_name: String,
    start_time: DateTime<Utc>,
    total_price: i64,
    status: String,
    created_at: DateTime<Utc>,
    /// Seat labels like "A1", ordered by row and number.
    seats: Vec<String>,
}

// GET /api/bookings/history - the caller's orders, newest first.
async fn get_booking_history(
    State(state): State<Arc<AppState>>,
    user: crate::middleware::AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let rows = sqlx::query(
        r#"
        SELECT b.id AS booking_id, b.total_price, b.status, b.created_at,
               m.title AS movie_title, r.name AS room_name, st.start_time,
               s.row_label, s.number
        FROM bookings b
        JOIN showtimes st ON st.id = b.show_time_id
        JOIN movies m ON m.id = st.movie_id
        JOIN rooms r ON r.id = st.room_id
        JOIN tickets t ON t.booking_id = b.id
        JOIN seats s ON s.id = t.seat_id
        WHERE b.user_id = $1
        ORDER BY b.created_at DESC, s.row_label, s.number
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.db.pool)
    .await?;

    // Group ticket rows per booking, preserving the newest-first order.
    let mut order: Vec<i64> = Vec::new();
    let mut map: BTreeMap<i64, BookingHistoryEntry> = BTreeMap::new();
    for row in rows {
        let booking_id: i64 = row.get("booking_id");
        let seat = format!(
            "{}{}",
            row.get::<String, _>("row_label"),
            row.get::<i32, _>("number")
        );
        let entry = map.entry(booking_id).or_insert_with(|| {
            order.push(booking_id);
            BookingHistoryEntry {
                booking_id,
                movie_title: row.get("movie_title"),
                room_name: row.get("room_name"),
                start_time: row.get("start_time"),
                total_price: row.get("total_price"),
                status: row.get("status"),
                created_at: row.get("created_at"),
                seats: Vec::new(),
            }
        });
        entry.seats.push(seat);
    }

    let history: Vec<BookingHistoryEntry> = order
        .into_iter()
        .filter_map(|id| map.remove(&id))
        .collect();

    Ok(Json(history))
}

/* ---------- STATUS ---------- */

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    booking_id: i64,
    status: String,
}

// PATCH /api/bookings/status - thin administrative write; payment itself
// happens elsewhere. Enforces the pending -> paid / -> cancelled machine.
async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    user: crate::middleware::AuthUser,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let next = BookingStatus::parse(&req.status).ok_or_else(|| {
        ApiError::InvalidInput("status must be one of: pending, paid, cancelled".to_string())
    })?;

    let next = booking::update_status(&state.db.pool, user.user_id, req.booking_id, next).await?;

    Ok(Json(serde_json::json!({
        "message": "booking status updated",
        "booking_id": req.booking_id,
        "status": next.as_str(),
    })))
}
