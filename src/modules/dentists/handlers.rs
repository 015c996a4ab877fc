use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{BlockedSlot, DateRange, NewBlockedSlot};
use crate::error::{AppError, AppResult};
use crate::scheduling::Availability;

pub async fn get_availability(
    State(state): State<AppState>,
    Path(dentist_id): Path<Uuid>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<Availability>> {
    Ok(Json(state.booking.availability(dentist_id, range).await))
}

pub async fn list_blocked_slots(
    State(state): State<AppState>,
    Path(dentist_id): Path<Uuid>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<Vec<BlockedSlot>>> {
    Ok(Json(state.booking.blocked_slots(dentist_id, range).await))
}

pub async fn block_slot(
    State(state): State<AppState>,
    Path(dentist_id): Path<Uuid>,
    Json(payload): Json<NewBlockedSlot>,
) -> AppResult<(StatusCode, Json<BlockedSlot>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let slot = state.booking.block_slot(dentist_id, payload).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// The path dentist is the requester; ownership is enforced by the store.
pub async fn unblock_slot(
    State(state): State<AppState>,
    Path((dentist_id, slot_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    state.booking.unblock_slot(slot_id, dentist_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
