use sqlx::PgPool;
use tracing::info;

use crate::error::ApiError;
use crate::models::Room;

/// Fixed row width of the generated layout.
pub const SEATS_PER_ROW: i32 = 10;

/// Row labels are single letters A..Z, which caps the layout size.
pub const MAX_ROWS: i32 = 26;

/// The front row alternates premium seats: every odd-numbered seat in row A.
pub const PREMIUM_ROW_INDEX: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatClass {
    Standard,
    Premium,
}

impl SeatClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatClass::Standard => "standard",
            SeatClass::Premium => "premium",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSpec {
    pub row_label: String,
    pub number: i32,
    pub class: SeatClass,
}

/// Deterministically lays out `capacity` seats into rows of `SEATS_PER_ROW`.
/// The last row may be partial. Not user-configurable per seat.
pub fn generate_layout(capacity: i32) -> Result<Vec<SeatSpec>, ApiError> {
    if capacity <= 0 {
        return Err(ApiError::InvalidInput(
            "capacity must be a positive integer".to_string(),
        ));
    }
    if capacity > MAX_ROWS * SEATS_PER_ROW {
        return Err(ApiError::InvalidInput(format!(
            "capacity must not exceed {} (rows are labelled A..Z)",
            MAX_ROWS * SEATS_PER_ROW
        )));
    }

    let mut seats = Vec::with_capacity(capacity as usize);
    let rows = (capacity as u32).div_ceil(SEATS_PER_ROW as u32) as i32;
    for row in 0..rows {
        let row_label = char::from(b'A' + row as u8).to_string();
        let seats_in_row = SEATS_PER_ROW.min(capacity - row * SEATS_PER_ROW);
        for number in 1..=seats_in_row {
            let class = if row == PREMIUM_ROW_INDEX && number % 2 == 1 {
                SeatClass::Premium
            } else {
                SeatClass::Standard
            };
            seats.push(SeatSpec {
                row_label: row_label.clone(),
                number,
                class,
            });
        }
    }
    Ok(seats)
}

/// Creates the room together with its full seat set in one transaction.
/// The layout is immutable afterwards; capacity changes are rejected, not
/// migrated.
pub async fn create_room(
    pool: &PgPool,
    name: &str,
    capacity: i32,
    description: Option<&str>,
) -> Result<Room, ApiError> {
    let layout = generate_layout(capacity)?;

    let mut tx = pool.begin().await?;

    let room: Room = sqlx::query_as(
        "INSERT INTO rooms (name, capacity, description)
         VALUES ($1, $2, $3)
         RETURNING id, name, capacity, description, created_at",
    )
    .bind(name)
    .bind(capacity)
    .bind(description)
    .fetch_one(&mut *tx)
    .await?;

    let row_labels: Vec<String> = layout.iter().map(|s| s.row_label.clone()).collect();
    let numbers: Vec<i32> = layout.iter().map(|s| s.number).collect();
    let classes: Vec<String> = layout.iter().map(|s| s.class.as_str().to_string()).collect();

    sqlx::query(
        "INSERT INTO seats (room_id, row_label, number, class)
         SELECT $1, u.row_label, u.number, u.class
         FROM UNNEST($2::TEXT[], $3::INT[], $4::TEXT[]) AS u(row_label, number, class)",
    )
    .bind(room.id)
    .bind(&row_labels)
    .bind(&numbers)
    .bind(&classes)
    .execute(&mut *tx)
    .await
    .map_err(ApiError::from_db_write)?;

    tx.commit().await?;

    info!("room {} created with {} seats", room.id, layout.len());
    Ok(room)
}

/// Renames or re-describes a room. Capacity is part of the immutable layout:
/// a request carrying a different capacity is rejected outright, never
/// reconciled against existing seats or bookings.
pub async fn update_room(
    pool: &PgPool,
    room_id: i64,
    name: Option<&str>,
    description: Option<&str>,
    capacity: Option<i32>,
) -> Result<Room, ApiError> {
    let current: i32 = sqlx::query_scalar("SELECT capacity FROM rooms WHERE id = $1")
        .bind(room_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("room"))?;

    if let Some(requested) = capacity {
        if requested != current {
            return Err(ApiError::InvalidInput(
                "room capacity is immutable; create a new room instead".to_string(),
            ));
        }
    }

    sqlx::query_as(
        "UPDATE rooms
         SET name = COALESCE($2, name), description = COALESCE($3, description)
         WHERE id = $1
         RETURNING id, name, capacity, description, created_at",
    )
    .bind(room_id)
    .bind(name)
    .bind(description)
    .fetch_optional(pool)
    .await?
    .ok_or(ApiError::NotFound("room"))
}

/// Deletes a room and, by cascade, its seats. Refused while any showtime
/// still references the room.
pub async fn delete_room(pool: &PgPool, room_id: i64) -> Result<(), ApiError> {
    let has_showtimes: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM showtimes WHERE room_id = $1)")
            .bind(room_id)
            .fetch_one(pool)
            .await?;
    if has_showtimes {
        return Err(ApiError::ReferentialConflict(
            "room has scheduled showtimes and cannot be deleted".to_string(),
        ));
    }

    let deleted = sqlx::query("DELETE FROM rooms WHERE id = $1")
        .bind(room_id)
        .execute(pool)
        .await
        .map_err(ApiError::from_db_write)?
        .rows_affected();

    if deleted == 0 {
        return Err(ApiError::NotFound("room"));
    }

    info!("room {} deleted", room_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn capacity_12_gives_partial_second_row() {
        let seats = generate_layout(12).unwrap();
        assert_eq!(seats.len(), 12);

        let labels: Vec<String> = seats
            .iter()
            .map(|s| format!("{}{}", s.row_label, s.number))
            .collect();
        let expected: Vec<String> = (1..=10)
            .map(|n| format!("A{n}"))
            .chain((1..=2).map(|n| format!("B{n}")))
            .collect();
        assert_eq!(labels, expected);

        let premium: Vec<&str> = seats
            .iter()
            .filter(|s| s.class == SeatClass::Premium)
            .map(|s| s.row_label.as_str())
            .collect();
        assert_eq!(premium, vec!["A"; 5]);
        let premium_numbers: Vec<i32> = seats
            .iter()
            .filter(|s| s.class == SeatClass::Premium)
            .map(|s| s.number)
            .collect();
        assert_eq!(premium_numbers, vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn exact_multiple_has_no_partial_row() {
        let seats = generate_layout(20).unwrap();
        assert_eq!(seats.len(), 20);
        assert!(seats.iter().all(|s| s.row_label == "A" || s.row_label == "B"));
        assert_eq!(seats.iter().filter(|s| s.row_label == "B").count(), 10);
    }

    #[test]
    fn rejects_non_positive_capacity() {
        assert!(matches!(
            generate_layout(0),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_layout(-3),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_capacity_beyond_row_labels() {
        assert!(generate_layout(MAX_ROWS * SEATS_PER_ROW).is_ok());
        assert!(matches!(
            generate_layout(MAX_ROWS * SEATS_PER_ROW + 1),
            Err(ApiError::InvalidInput(_))
        ));
    }

    proptest! {
        #[test]
        fn layout_invariants(capacity in 1..=(MAX_ROWS * SEATS_PER_ROW)) {
            let seats = generate_layout(capacity).unwrap();

            // One seat per requested unit of capacity.
            prop_assert_eq!(seats.len(), capacity as usize);

            // Seat numbers are 1-based within rows of fixed width.
            prop_assert!(seats.iter().all(|s| s.number >= 1 && s.number <= SEATS_PER_ROW));

            // Premium seats only exist in the front row, on odd numbers.
            for s in &seats {
                if s.class == SeatClass::Premium {
                    prop_assert_eq!(s.row_label.as_str(), "A");
                    prop_assert_eq!(s.number % 2, 1);
                }
            }

            // (row, number) pairs are unique.
            let mut keys: Vec<(String, i32)> =
                seats.iter().map(|s| (s.row_label.clone(), s.number)).collect();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), seats.len());
        }
    }
}
