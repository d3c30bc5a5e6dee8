use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Showtime {
    pub id: i64,
    pub movie_id: i64,
    pub room_id: i64,
    pub start_time: DateTime<Utc>,
    /// Derived at creation: start_time + movie duration. Never edited.
    pub end_time: DateTime<Utc>,
    /// Per-seat price in minor currency units.
    pub price: i64,
}
