use axum::{
    routing::{delete, get},
    Router,
};

use super::handlers::{block_slot, get_availability, list_blocked_slots, unblock_slot};
use crate::app_state::AppState;

pub fn dentist_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/availability", get(get_availability))
        .route(
            "/{id}/blocked-slots",
            get(list_blocked_slots).post(block_slot),
        )
        .route("/{id}/blocked-slots/{slot_id}", delete(unblock_slot))
}
