//! Slot and booking flows.

use tracing::info;
use uuid::Uuid;

use parento_core::authz::Action;
use parento_core::booking::{capacity, queries};
use parento_core::models::auth::TokenClaims;

use crate::AppState;
use crate::dto::{BookingResponse, CreateBookingRequest, CreateSlotRequest, SlotResponse};
use crate::error::{AppError, AppResult};
use crate::services::permissions::ensure_permission;

/// List future slots with remaining capacity.
pub async fn list_slots(state: &AppState, claims: &TokenClaims) -> AppResult<Vec<SlotResponse>> {
    ensure_permission(state, claims, "slots", Action::List).await?;
    let slots = queries::list_open_slots(&state.pool).await?;
    Ok(slots.into_iter().map(SlotResponse::from).collect())
}

/// Create a slot owned by the calling advisor. Every slot created
/// here belongs to the caller, so the check is on `slots.own`; junior
/// advisors manage their own slots without holding the broad `slots`
/// grant.
pub async fn create_slot(
    state: &AppState,
    claims: &TokenClaims,
    req: CreateSlotRequest,
) -> AppResult<SlotResponse> {
    ensure_permission(state, claims, "slots.own", Action::Create).await?;

    if req.ends_at <= req.starts_at {
        return Err(AppError::Validation("Slot must end after it starts".into()));
    }
    if req.max_bookings < 1 {
        return Err(AppError::Validation("maxBookings must be at least 1".into()));
    }

    let slot = queries::create_slot(
        &state.pool,
        claims.sub,
        req.starts_at,
        req.ends_at,
        req.max_bookings,
    )
    .await?;
    info!(slot_id = %slot.id, max_bookings = slot.max_bookings, "slot created");

    Ok(SlotResponse {
        id: slot.id,
        advisor_id: slot.advisor_id,
        starts_at: slot.starts_at,
        ends_at: slot.ends_at,
        max_bookings: slot.max_bookings,
        remaining: i64::from(slot.max_bookings),
    })
}

/// Reserve a seat in a slot for the calling user. A full slot surfaces
/// as a conflict so the client can offer another slot.
pub async fn create_booking(
    state: &AppState,
    claims: &TokenClaims,
    req: CreateBookingRequest,
) -> AppResult<BookingResponse> {
    ensure_permission(state, claims, "bookings.own", Action::Create).await?;

    let booking = capacity::try_reserve(&state.pool, req.slot_id, claims.sub).await?;
    info!(booking_id = %booking.id, slot_id = %booking.slot_id, "booking created");
    Ok(booking.into())
}

/// Cancel a booking. Users cancel their own; cancelling someone
/// else's booking needs an update grant on `bookings.all`.
pub async fn cancel_booking(
    state: &AppState,
    claims: &TokenClaims,
    booking_id: Uuid,
) -> AppResult<BookingResponse> {
    let booking = queries::find_booking(&state.pool, booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {booking_id} not found")))?;

    let resource = if booking.user_id == claims.sub {
        "bookings.own"
    } else {
        "bookings.all"
    };
    ensure_permission(state, claims, resource, Action::Update).await?;

    let cancelled = capacity::cancel(&state.pool, booking_id).await?;
    info!(%booking_id, "booking cancelled");
    Ok(cancelled.into())
}

/// The calling user's bookings, newest first.
pub async fn list_bookings(
    state: &AppState,
    claims: &TokenClaims,
) -> AppResult<Vec<BookingResponse>> {
    ensure_permission(state, claims, "bookings.own", Action::List).await?;
    let bookings = queries::list_bookings_for_user(&state.pool, claims.sub).await?;
    Ok(bookings.into_iter().map(BookingResponse::from).collect())
}
