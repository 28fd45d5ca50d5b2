//! Slot request handlers.

use axum::{Extension, Json, extract::State};

use crate::AppState;
use crate::dto::{CreateSlotRequest, SlotResponse};
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::bookings;

/// `GET /slots` — future slots with remaining capacity.
pub async fn list_slots_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<SlotResponse>>> {
    let slots = bookings::list_slots(&state, &claims).await?;
    Ok(Json(slots))
}

/// `POST /slots` — create a slot (advisors).
pub async fn create_slot_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Json(body): Json<CreateSlotRequest>,
) -> AppResult<Json<SlotResponse>> {
    let slot = bookings::create_slot(&state, &claims, body).await?;
    Ok(Json(slot))
}
