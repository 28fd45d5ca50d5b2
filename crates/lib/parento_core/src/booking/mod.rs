//! Booking slots and the capacity guard.

pub mod capacity;
pub mod queries;

use thiserror::Error;
use uuid::Uuid;

/// Booking errors.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The slot's non-terminal booking count has reached
    /// `max_bookings`. A contention outcome, not a fault — the caller
    /// offers another slot instead of retrying.
    #[error("Slot {0} is fully booked")]
    CapacityExhausted(Uuid),

    #[error("Slot {0} not found")]
    SlotNotFound(Uuid),

    #[error("Booking {0} not found")]
    NotFound(Uuid),

    #[error("Booking {0} is already in a terminal state")]
    AlreadyTerminal(Uuid),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}
