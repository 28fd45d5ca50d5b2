//! Slot and booking queries outside the capacity-guarded path.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingSlot, BookingStatus, SlotAvailability};
use crate::ids::uuidv7;

use super::BookingError;

/// Create a slot owned by an advisor.
pub async fn create_slot(
    pool: &PgPool,
    advisor_id: Uuid,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    max_bookings: i32,
) -> Result<BookingSlot, BookingError> {
    let id = uuidv7();
    let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
        "INSERT INTO booking_slots (id, advisor_id, starts_at, ends_at, max_bookings) \
         VALUES ($1, $2, $3, $4, $5) RETURNING created_at",
    )
    .bind(id)
    .bind(advisor_id)
    .bind(starts_at)
    .bind(ends_at)
    .bind(max_bookings)
    .fetch_one(pool)
    .await?;

    Ok(BookingSlot {
        id,
        advisor_id,
        starts_at,
        ends_at,
        max_bookings,
        created_at,
    })
}

/// List future slots with their non-terminal booking counts.
pub async fn list_open_slots(pool: &PgPool) -> Result<Vec<SlotAvailability>, BookingError> {
    type Row = (Uuid, Uuid, DateTime<Utc>, DateTime<Utc>, i32, DateTime<Utc>, i64);

    let rows = sqlx::query_as::<_, Row>(
        "SELECT s.id, s.advisor_id, s.starts_at, s.ends_at, s.max_bookings, s.created_at, \
                COUNT(b.id) FILTER (WHERE b.status NOT IN ('cancelled', 'completed')) \
         FROM booking_slots s \
         LEFT JOIN bookings b ON b.slot_id = s.id \
         WHERE s.starts_at > now() \
         GROUP BY s.id \
         ORDER BY s.starts_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(id, advisor_id, starts_at, ends_at, max_bookings, created_at, active)| {
                SlotAvailability {
                    slot: BookingSlot {
                        id,
                        advisor_id,
                        starts_at,
                        ends_at,
                        max_bookings,
                        created_at,
                    },
                    active_bookings: active,
                }
            },
        )
        .collect())
}

fn booking_from_row(
    (id, slot_id, user_id, status, created_at): (Uuid, Uuid, Uuid, String, DateTime<Utc>),
) -> Result<Booking, BookingError> {
    let status: BookingStatus = status.parse().map_err(|_| BookingError::NotFound(id))?;
    Ok(Booking {
        id,
        slot_id,
        user_id,
        status,
        created_at,
    })
}

/// Fetch a booking by ID.
pub async fn find_booking(pool: &PgPool, booking_id: Uuid) -> Result<Option<Booking>, BookingError> {
    let row = sqlx::query_as::<_, (Uuid, Uuid, Uuid, String, DateTime<Utc>)>(
        "SELECT id, slot_id, user_id, status::text, created_at FROM bookings WHERE id = $1",
    )
    .bind(booking_id)
    .fetch_optional(pool)
    .await?;
    row.map(booking_from_row).transpose()
}

/// List a user's bookings, newest first.
pub async fn list_bookings_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Booking>, BookingError> {
    let rows = sqlx::query_as::<_, (Uuid, Uuid, Uuid, String, DateTime<Utc>)>(
        "SELECT id, slot_id, user_id, status::text, created_at \
         FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(booking_from_row).collect()
}
