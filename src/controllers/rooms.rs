use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{Room, Seat};
use crate::services::layout;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/rooms", post(create_room))
        .route("/rooms/{id}", put(update_room))
        .route("/rooms/{id}", delete(delete_room))
        .route("/rooms/{id}/seats", get(get_room_seats))
}

/* ---------- CREATE ---------- */

#[derive(Debug, Deserialize, Validate)]
struct CreateRoomRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: String,
    #[validate(range(min = 1, message = "capacity must be a positive integer"))]
    capacity: i32,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateRoomResponse {
    room: Room,
    seats_created: i32,
}

// POST /api/rooms
async fn create_room(
    State(state): State<Arc<AppState>>,
    _user: crate::middleware::AuthUser,
    Json(req): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    let room = layout::create_room(
        &state.db.pool,
        &req.name,
        req.capacity,
        req.description.as_deref(),
    )
    .await?;

    let seats_created = room.capacity;
    Ok((
        StatusCode::CREATED,
        Json(CreateRoomResponse { room, seats_created }),
    ))
}

/* ---------- READ ---------- */

// GET /api/rooms
async fn list_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rooms: Vec<Room> = sqlx::query_as(
        "SELECT id, name, capacity, description, created_at FROM rooms ORDER BY id",
    )
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(rooms))
}

// GET /api/rooms/{id}/seats - the raw layout, for admins; booking flows use
// the per-showtime seat map instead.
async fn get_room_seats(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if !Room::exists(&state.db.pool, room_id).await? {
        return Err(ApiError::NotFound("room"));
    }

    let seats: Vec<Seat> = sqlx::query_as(
        "SELECT id, room_id, row_label, number, class
         FROM seats
         WHERE room_id = $1
         ORDER BY row_label, number",
    )
    .bind(room_id)
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(seats))
}

/* ---------- UPDATE / DELETE ---------- */

#[derive(Debug, Deserialize)]
struct UpdateRoomRequest {
    name: Option<String>,
    description: Option<String>,
    // Accepted in the payload only so the rejection can be explicit.
    capacity: Option<i32>,
}

// PUT /api/rooms/{id} - capacity is fixed at creation; reconciling existing
// bookings against a changed seat layout is not supported.
async fn update_room(
    State(state): State<Arc<AppState>>,
    _user: crate::middleware::AuthUser,
    Path(room_id): Path<i64>,
    Json(req): Json<UpdateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let room = layout::update_room(
        &state.db.pool,
        room_id,
        req.name.as_deref(),
        req.description.as_deref(),
        req.capacity,
    )
    .await?;

    Ok(Json(room))
}

// DELETE /api/rooms/{id}
async fn delete_room(
    State(state): State<Arc<AppState>>,
    _user: crate::middleware::AuthUser,
    Path(room_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    layout::delete_room(&state.db.pool, room_id).await?;
    Ok(Json(serde_json::json!({ "message": "room deleted" })))
}
