use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::error::ApiError;
use crate::models::{Movie, Room, Showtime};

#[derive(Debug, Clone)]
pub struct NewShowtime {
    pub movie_id: i64,
    pub room_id: i64,
    pub start_time: DateTime<Utc>,
    pub price: i64,
}

/// Half-open interval intersection: [a_start, a_end) and [b_start, b_end)
/// share a moment iff each starts before the other ends. Back-to-back
/// intervals (a_end == b_start) do not overlap.
pub(crate) fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Places a showtime into a room, deriving the end time from the movie's
/// runtime and rejecting any overlap with an existing showtime in the same
/// room.
///
/// The SELECT inside the transaction only exists to produce a friendly error
/// naming the conflicting showtime; the authoritative overlap guard is the
/// `showtimes_no_overlap` exclusion constraint, so two racing requests for
/// intersecting intervals resolve to exactly one success.
pub async fn create_showtime(pool: &PgPool, new: NewShowtime) -> Result<Showtime, ApiError> {
    let duration_minutes = Movie::find_duration(pool, new.movie_id)
        .await?
        .ok_or(ApiError::NotFound("movie"))?;
    // Movie data integrity is enforced upstream, but a non-positive runtime
    // must not turn into a negative interval here.
    if duration_minutes <= 0 {
        return Err(ApiError::InvalidInput(
            "movie duration must be positive".to_string(),
        ));
    }
    if new.price < 0 {
        return Err(ApiError::InvalidInput(
            "price must not be negative".to_string(),
        ));
    }
    if !Room::exists(pool, new.room_id).await? {
        return Err(ApiError::NotFound("room"));
    }

    let end_time = new.start_time + Duration::minutes(i64::from(duration_minutes));

    let mut tx = pool.begin().await?;

    if let Some(conflicting_id) =
        find_conflict(&mut *tx, new.room_id, new.start_time, end_time).await?
    {
        return Err(ApiError::ScheduleConflict {
            conflicting_id: Some(conflicting_id),
        });
    }

    let inserted = sqlx::query_as::<_, Showtime>(
        "INSERT INTO showtimes (movie_id, room_id, start_time, end_time, price)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, movie_id, room_id, start_time, end_time, price",
    )
    .bind(new.movie_id)
    .bind(new.room_id)
    .bind(new.start_time)
    .bind(end_time)
    .bind(new.price)
    .fetch_one(&mut *tx)
    .await;

    let showtime = match inserted {
        Ok(s) => s,
        Err(e) => {
            drop(tx);
            let api_err = ApiError::from_db_write(e);
            // Lost the race at the exclusion constraint: re-query outside the
            // aborted transaction so the conflict can still be named.
            if let ApiError::ScheduleConflict { .. } = api_err {
                let conflicting_id = find_conflict(pool, new.room_id, new.start_time, end_time)
                    .await
                    .unwrap_or(None);
                return Err(ApiError::ScheduleConflict { conflicting_id });
            }
            return Err(api_err);
        }
    };

    tx.commit().await?;

    info!(
        "showtime {} scheduled in room {} [{} .. {})",
        showtime.id, showtime.room_id, showtime.start_time, showtime.end_time
    );
    Ok(showtime)
}

/// Removes a showtime. Refused while sold tickets reference it; delete the
/// dependent bookings first (not a core flow).
pub async fn delete_showtime(pool: &PgPool, show_time_id: i64) -> Result<(), ApiError> {
    let has_tickets: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tickets WHERE show_time_id = $1)")
            .bind(show_time_id)
            .fetch_one(pool)
            .await?;
    if has_tickets {
        return Err(ApiError::ReferentialConflict(
            "tickets exist for this showtime; it cannot be deleted".to_string(),
        ));
    }

    let deleted = sqlx::query("DELETE FROM showtimes WHERE id = $1")
        .bind(show_time_id)
        .execute(pool)
        .await
        .map_err(ApiError::from_db_write)?
        .rows_affected();

    if deleted == 0 {
        return Err(ApiError::NotFound("showtime"));
    }

    info!("showtime {} deleted", show_time_id);
    Ok(())
}

async fn find_conflict<'e, E>(
    executor: E,
    room_id: i64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<Option<i64>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query_scalar::<_, i64>(
        "SELECT id FROM showtimes
         WHERE room_id = $1 AND start_time < $2 AND end_time > $3
         LIMIT 1",
    )
    .bind(room_id)
    .bind(end_time)
    .bind(start_time)
    .fetch_optional(executor)
    .await
}
