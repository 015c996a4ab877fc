use axum::{extract::State, middleware, routing::get, Json, Router};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    app_state::AppState,
    middleware::tracing::request_tracing_middleware,
    modules::{appointments::routes::appointment_routes, dentists::routes::dentist_routes},
};

pub fn create_router(state: AppState) -> Router {
    // The frontend is served separately; the API stays permissive and leaves
    // authentication to the layer in front of it.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .nest("/appointments", appointment_routes())
        .nest("/dentists", dentist_routes())
        .layer(middleware::from_fn(request_tracing_middleware))
        .layer(cors)
        .with_state(state)
}

async fn hello() -> &'static str {
    "Dental backend says hello!\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::{AppConfig, Config, Environment, ServerConfig};
    use crate::db::repositories::{InMemoryUserDirectory, SlotStore, UserDirectory};
    use crate::scheduling::BookingService;

    fn test_state() -> AppState {
        let directory: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::new());
        let booking = Arc::new(BookingService::new(Arc::new(SlotStore::new()), directory));
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".parse().unwrap(),
                port: 0,
            },
            app: AppConfig {
                name: "Test Clinic".to_string(),
                environment: Environment::Development,
            },
        };
        AppState::new(booking, config)
    }

    #[tokio::test]
    async fn health_reports_configured_app_name() {
        let body = health_check(State(test_state())).await.0;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["name"], "Test Clinic");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(json!({
        "status": "ok",
        "name": state.env.app.name,
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
