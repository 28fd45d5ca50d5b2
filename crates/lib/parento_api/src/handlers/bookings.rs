//! Booking request handlers.

use axum::extract::Path;
use axum::{Extension, Json, extract::State};
use uuid::Uuid;

use crate::AppState;
use crate::dto::{BookingResponse, CreateBookingRequest};
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::bookings;

/// `GET /bookings` — the caller's bookings.
pub async fn list_bookings_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let list = bookings::list_bookings(&state, &claims).await?;
    Ok(Json(list))
}

/// `POST /bookings` — reserve a seat; 409 when the slot is full.
pub async fn create_booking_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Json(body): Json<CreateBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    let booking = bookings::create_booking(&state, &claims, body).await?;
    Ok(Json(booking))
}

/// `DELETE /bookings/{id}` — cancel a booking.
pub async fn cancel_booking_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<BookingResponse>> {
    let booking = bookings::cancel_booking(&state, &claims, booking_id).await?;
    Ok(Json(booking))
}
