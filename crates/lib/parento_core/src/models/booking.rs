//! Booking domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking lifecycle states. `Cancelled` and `Completed` are terminal
/// and do not count against slot capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Terminal states free slot capacity.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// A schedulable advisory slot with finite concurrent capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSlot {
    pub id: Uuid,
    pub advisor_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub max_bookings: i32,
    pub created_at: DateTime<Utc>,
}

/// A reservation of one seat in a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub user_id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// A slot together with its current non-terminal booking count, for
/// availability listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub slot: BookingSlot,
    pub active_bookings: i64,
}

impl SlotAvailability {
    pub fn remaining(&self) -> i64 {
        i64::from(self.slot.max_bookings) - self.active_bookings
    }
}
