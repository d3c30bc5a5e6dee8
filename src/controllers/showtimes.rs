use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::services::scheduler::{self, NewShowtime};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/showtimes", get(list_showtimes))
        .route("/showtimes", post(create_showtime))
        .route("/showtimes/{id}", delete(delete_showtime))
}

// GET /api/showtimes - upcoming showtimes with movie/room context, served
// through the listing cache.
async fn list_showtimes(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.cache.get_showtimes().await?;
    Ok(Json(listing))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateShowtimeRequest {
    movie_id: i64,
    room_id: i64,
    start_time: DateTime<Utc>,
    #[validate(range(min = 0, message = "price must not be negative"))]
    price: i64,
}

// POST /api/showtimes
async fn create_showtime(
    State(state): State<Arc<AppState>>,
    _user: crate::middleware::AuthUser,
    Json(req): Json<CreateShowtimeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    let showtime = scheduler::create_showtime(
        &state.db.pool,
        NewShowtime {
            movie_id: req.movie_id,
            room_id: req.room_id,
            start_time: req.start_time,
            price: req.price,
        },
    )
    .await?;

    state.cache.invalidate_showtimes().await;

    Ok((StatusCode::CREATED, Json(showtime)))
}

// DELETE /api/showtimes/{id} - refused while sold tickets reference it.
async fn delete_showtime(
    State(state): State<Arc<AppState>>,
    _user: crate::middleware::AuthUser,
    Path(show_time_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    scheduler::delete_showtime(&state.db.pool, show_time_id).await?;

    state.cache.invalidate_showtimes().await;

    Ok(Json(serde_json::json!({ "message": "showtime deleted" })))
}
