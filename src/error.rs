use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Application error taxonomy. Everything a handler can fail with maps onto
/// one of these; the `IntoResponse` impl turns them into JSON error bodies.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("showtime overlaps an existing one in this room")]
    ScheduleConflict { conflicting_id: Option<i64> },

    #[error("one or more of the requested seats is already booked for this showtime")]
    SeatAlreadyBooked,

    #[error("{0}")]
    ReferentialConflict(String),

    #[error("internal error")]
    Internal(#[from] sqlx::Error),
}

// Named constraints from src/migrations; a violation of one of these is a
// business conflict, not an internal failure.
const TICKET_SEAT_UNIQUE: &str = "tickets_seat_per_showtime";
const SHOWTIME_NO_OVERLAP: &str = "showtimes_no_overlap";
const TICKET_SEAT_FK: &str = "tickets_seat_id_fkey";

impl ApiError {
    /// Translates a sqlx error raised inside a write transaction into the
    /// matching conflict, falling back to `Internal`.
    pub fn from_db_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            match db_err.constraint() {
                Some(TICKET_SEAT_UNIQUE) => return ApiError::SeatAlreadyBooked,
                Some(SHOWTIME_NO_OVERLAP) => {
                    return ApiError::ScheduleConflict {
                        conflicting_id: None,
                    }
                }
                Some(TICKET_SEAT_FK) => return ApiError::NotFound("seat"),
                _ => {}
            }
            // Any other FK violation blocks a write that would orphan or
            // dangle dependent records.
            if db_err.is_foreign_key_violation() {
                return ApiError::ReferentialConflict(
                    "operation blocked by dependent records".to_string(),
                );
            }
        }
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "invalid_input", "message": msg }),
            ),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "not_found", "message": format!("{what} not found") }),
            ),
            ApiError::ScheduleConflict { conflicting_id } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "schedule_conflict",
                    "message": self.to_string(),
                    "conflicting_showtime_id": conflicting_id,
                }),
            ),
            ApiError::SeatAlreadyBooked => (
                StatusCode::CONFLICT,
                json!({ "error": "seat_already_booked", "message": self.to_string() }),
            ),
            ApiError::ReferentialConflict(msg) => (
                StatusCode::CONFLICT,
                json!({ "error": "referential_conflict", "message": msg }),
            ),
            ApiError::Internal(e) => {
                error!("internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal", "message": "internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
