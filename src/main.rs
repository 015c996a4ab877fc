use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dental_backend::{
    app::create_router,
    app_state::AppState,
    config,
    db::models::UserRole,
    db::repositories::{InMemoryUserDirectory, SlotStore, UserDirectory},
    scheduling::BookingService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv().ok();

    let config = config::init()
        .context("Failed to load configuration")?
        .clone();

    let directory: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::new());
    let store = Arc::new(SlotStore::new());
    let booking = Arc::new(BookingService::new(store, directory.clone()));

    if config.is_development() {
        seed_demo_accounts(directory.as_ref()).await?;
    }

    let state = AppState::new(booking, config.clone());
    let app = create_router(state);

    let addr = config.server_addr();
    info!("{} listening on {}", config.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    Ok(())
}

/// The directory starts empty, so development boots with a usable roster of
/// staff accounts. Their ids are logged for trying the API by hand.
async fn seed_demo_accounts(directory: &dyn UserDirectory) -> anyhow::Result<()> {
    for (email, name, role) in [
        ("main.doctor@clinic.test", "Main Doctor", UserRole::MainDoctor),
        ("dentist@clinic.test", "Demo Dentist", UserRole::Dentist),
        ("reception@clinic.test", "Front Desk", UserRole::Receptionist),
    ] {
        let user = directory
            .create_user(email, name, role)
            .await
            .map_err(|e| anyhow::anyhow!("failed to seed {email}: {e}"))?;
        info!(user_id = %user.id, email, ?role, "seeded demo account");
    }
    Ok(())
}
