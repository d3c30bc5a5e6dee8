use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;

use crate::cache::CacheService;

const LISTING_KEY: &str = "showtimes:upcoming";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShowtimeListing {
    pub id: i64,
    pub movie_id: i64,
    pub movie_title: String,
    pub room_id: i64,
    pub room_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: i64,
}

impl CacheService {
    /// Upcoming showtimes, cache-first with DB fallback. A cold or broken
    /// cache degrades to a plain query, never to an error.
    pub async fn get_showtimes(&self) -> Result<Vec<ShowtimeListing>, sqlx::Error> {
        if let Ok(listing) = self.get_listing_from_cache().await {
            return Ok(listing);
        }

        let listing = self.load_listing_from_db().await?;
        if let Err(e) = self.save_listing_to_cache(&listing).await {
            warn!("failed to cache showtime listing: {:?}", e);
        }
        Ok(listing)
    }

    /// Drops the cached listing; called after a showtime is created or
    /// deleted. A failed DEL keeps serving the stale listing until the TTL
    /// runs out, so it is worth a warning.
    pub async fn invalidate_showtimes(&self) {
        let mut conn = self.redis.conn.clone();
        if let Err(e) = conn.del::<_, ()>(LISTING_KEY).await {
            warn!("failed to invalidate showtime listing cache: {:?}", e);
        }
    }

    async fn load_listing_from_db(&self) -> Result<Vec<ShowtimeListing>, sqlx::Error> {
        sqlx::query_as::<_, ShowtimeListing>(
            "SELECT st.id, st.movie_id, m.title AS movie_title,
                    st.room_id, r.name AS room_name,
                    st.start_time, st.end_time, st.price
             FROM showtimes st
             JOIN movies m ON m.id = st.movie_id
             JOIN rooms r ON r.id = st.room_id
             WHERE st.start_time > NOW()
             ORDER BY st.start_time",
        )
        .fetch_all(&self.db.pool)
        .await
    }

    async fn get_listing_from_cache(&self) -> Result<Vec<ShowtimeListing>, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        let data: String = conn.get(LISTING_KEY).await?;
        serde_json::from_str(&data)
            .map_err(|_| redis::RedisError::from((redis::ErrorKind::TypeError, "Parse error")))
    }

    async fn save_listing_to_cache(
        &self,
        listing: &[ShowtimeListing],
    ) -> Result<(), redis::RedisError> {
        let data = serde_json::to_string(listing)
            .map_err(|_| redis::RedisError::from((redis::ErrorKind::TypeError, "Serialize error")))?;
        let mut conn = self.redis.conn.clone();
        conn.set_ex(LISTING_KEY, data, self.listing_ttl_secs).await
    }
}
