use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{Appointment, NewAppointment, UpdateAppointmentPayload, UserRole};
use crate::error::{AppError, AppResult};

/// Role header filled in by the authorization layer sitting in front of this
/// service. The scheduling core trusts the value it is given.
const ACTOR_ROLE_HEADER: &str = "x-actor-role";

fn actor_role(headers: &HeaderMap) -> Result<UserRole, AppError> {
    let value = headers
        .get(ACTOR_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest(format!("missing {} header", ACTOR_ROLE_HEADER)))?;
    value.parse().map_err(AppError::BadRequest)
}

pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<NewAppointment>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let appointment = state.booking.create_appointment(payload).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn list_appointments(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Appointment>>> {
    Ok(Json(state.booking.all_appointments().await))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    let appointment = state.booking.appointment(id).await?;
    Ok(Json(appointment))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<UpdateAppointmentPayload>,
) -> AppResult<Json<Appointment>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let actor = actor_role(&headers)?;
    let appointment = state.booking.update_appointment(id, payload, actor).await?;
    Ok(Json(appointment))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.booking.delete_appointment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn dentist_appointments(
    State(state): State<AppState>,
    Path(dentist_id): Path<Uuid>,
) -> AppResult<Json<Vec<Appointment>>> {
    Ok(Json(state.booking.dentist_appointments(dentist_id).await))
}

pub async fn customer_appointments(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Vec<Appointment>>> {
    Ok(Json(state.booking.customer_appointments(customer_id).await))
}
