use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub duration_minutes: i32,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Movie {
    /// Runtime lookup for scheduling. Soft-deleted movies stay resolvable for
    /// historical showtimes, but new showtimes cannot be scheduled for them.
    pub async fn find_duration(pool: &PgPool, movie_id: i64) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT duration_minutes FROM movies WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(movie_id)
        .fetch_optional(pool)
        .await
    }
}
