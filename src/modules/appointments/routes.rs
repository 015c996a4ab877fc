use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_appointment, customer_appointments, delete_appointment, dentist_appointments,
    get_appointment, list_appointments, update_appointment,
};
use crate::app_state::AppState;

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_appointment).get(list_appointments))
        .route(
            "/{id}",
            get(get_appointment)
                .patch(update_appointment)
                .delete(delete_appointment),
        )
        .route("/dentist/{dentist_id}", get(dentist_appointments))
        .route("/customer/{customer_id}", get(customer_appointments))
}
