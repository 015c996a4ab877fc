use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;
use crate::scheduling::{BookingError, LifecycleError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Booking(ref err) => match err {
                BookingError::UnknownDentist => (StatusCode::BAD_REQUEST, "Dentist not found"),
                BookingError::InvalidDentist(_) => (StatusCode::BAD_REQUEST, "Invalid dentist ID"),
                BookingError::NotADentist(_) => (
                    StatusCode::UNAUTHORIZED,
                    "Only dentists can block time slots",
                ),
                BookingError::RoleConflict => (
                    StatusCode::CONFLICT,
                    "Email already registered as a different role",
                ),
                BookingError::SlotUnavailable(StoreError::SlotBooked) => {
                    (StatusCode::CONFLICT, "Time slot is already booked")
                }
                BookingError::SlotUnavailable(_) => {
                    (StatusCode::CONFLICT, "Time slot is already blocked")
                }
                BookingError::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
                BookingError::Forbidden => (
                    StatusCode::FORBIDDEN,
                    "You can only unblock your own time slots",
                ),
                BookingError::InvalidInterval(_) => {
                    (StatusCode::BAD_REQUEST, "Invalid time interval")
                }
                BookingError::Lifecycle(LifecycleError::RoleNotAllowed) => (
                    StatusCode::FORBIDDEN,
                    "This role may not change appointment status",
                ),
                BookingError::Lifecycle(_) => (StatusCode::BAD_REQUEST, "Invalid status change"),
            },
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Resource not found"),
            AppError::InternalServerError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred",
            ),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "details": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn role_rejections_are_forbidden_not_bad_request() {
        assert_eq!(
            status_of(AppError::Booking(BookingError::Lifecycle(
                LifecycleError::RoleNotAllowed
            ))),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(AppError::Booking(BookingError::Lifecycle(
                LifecycleError::CompletedIsTerminal
            ))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn slot_conflicts_map_to_conflict() {
        assert_eq!(
            status_of(AppError::Booking(BookingError::SlotUnavailable(
                StoreError::SlotBooked
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Booking(BookingError::SlotUnavailable(
                StoreError::SlotBlocked
            ))),
            StatusCode::CONFLICT
        );
    }
}
