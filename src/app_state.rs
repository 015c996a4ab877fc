use std::sync::Arc;

use crate::config::Config;
use crate::scheduling::BookingService;

#[derive(Clone)]
pub struct AppState {
    pub booking: Arc<BookingService>,
    pub env: Config,
}

impl AppState {
    pub fn new(booking: Arc<BookingService>, env: Config) -> Self {
        Self { booking, env }
    }
}
