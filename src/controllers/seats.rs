use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::services::seat_map;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/showtimes/{id}/seats", get(get_showtime_seat_map))
}

// GET /api/showtimes/{id}/seats - the per-showtime seat map users pick from.
// Deliberately uncached: booking correctness depends on reading committed
// ticket state.
async fn get_showtime_seat_map(
    State(state): State<Arc<AppState>>,
    Path(show_time_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let map = seat_map::get_seat_map(&state.db.pool, show_time_id).await?;
    Ok(Json(map))
}
