//! The booking capacity guard.
//!
//! Enforces the invariant that a slot's non-terminal booking count
//! never exceeds `max_bookings`, under concurrent reservation
//! attempts. The check and the insert run inside one transaction with
//! a `FOR UPDATE` row lock on the slot, so two concurrent attempts on
//! the same slot serialize and cannot both observe pre-insert state.
//! A bare count-then-insert without the lock would race.

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus};
use crate::ids::uuidv7;

use super::BookingError;

/// Attempt to reserve one seat in a slot for a user.
///
/// Returns the created `pending` booking, or
/// [`BookingError::CapacityExhausted`] with no side effects when the
/// slot is full. Surfaced to clients as a conflict so they can pick
/// another slot; no retry loop here.
pub async fn try_reserve(
    pool: &PgPool,
    slot_id: Uuid,
    user_id: Uuid,
) -> Result<Booking, BookingError> {
    let mut tx = pool.begin().await?;

    // Lock the slot row for the duration of the transaction. All
    // reservation attempts against this slot queue here.
    let max_bookings = sqlx::query_scalar::<_, i32>(
        "SELECT max_bookings FROM booking_slots WHERE id = $1 FOR UPDATE",
    )
    .bind(slot_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(BookingError::SlotNotFound(slot_id))?;

    let active = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM bookings \
         WHERE slot_id = $1 AND status NOT IN ('cancelled', 'completed')",
    )
    .bind(slot_id)
    .fetch_one(&mut *tx)
    .await?;

    if active >= i64::from(max_bookings) {
        tx.rollback().await?;
        debug!(%slot_id, active, max_bookings, "reservation denied, slot full");
        return Err(BookingError::CapacityExhausted(slot_id));
    }

    let booking_id = uuidv7();
    let created_at = sqlx::query_scalar::<_, chrono::DateTime<chrono::Utc>>(
        "INSERT INTO bookings (id, slot_id, user_id, status) \
         VALUES ($1, $2, $3, 'pending') RETURNING created_at",
    )
    .bind(booking_id)
    .bind(slot_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Booking {
        id: booking_id,
        slot_id,
        user_id,
        status: BookingStatus::Pending,
        created_at,
    })
}

/// Cancel a booking, freeing one seat of capacity.
///
/// Runs in its own transaction; capacity is derived by counting
/// non-terminal bookings, so the next [`try_reserve`] recomputes under
/// the slot lock and observes the freed seat.
pub async fn cancel(pool: &PgPool, booking_id: Uuid) -> Result<Booking, BookingError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, (Uuid, Uuid, String, chrono::DateTime<chrono::Utc>)>(
        "SELECT slot_id, user_id, status::text, created_at \
         FROM bookings WHERE id = $1 FOR UPDATE",
    )
    .bind(booking_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(BookingError::NotFound(booking_id))?;

    let (slot_id, user_id, status, created_at) = row;
    let status: BookingStatus = status
        .parse()
        .map_err(|_| BookingError::NotFound(booking_id))?;
    if status.is_terminal() {
        tx.rollback().await?;
        return Err(BookingError::AlreadyTerminal(booking_id));
    }

    sqlx::query("UPDATE bookings SET status = 'cancelled', updated_at = now() WHERE id = $1")
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Booking {
        id: booking_id,
        slot_id,
        user_id,
        status: BookingStatus::Cancelled,
        created_at,
    })
}
