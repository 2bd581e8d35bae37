use domain::identity::{IdentityProvider, JwtIdentityProvider};
use events::EventPublisher;
use log::*;
use migration::{Migrator, MigratorTrait};
use realtime::{LiveEventHandler, Manager};
use service::{
    config::{Config, DEVELOPMENT_JWT_SECRET},
    logging::Logger,
    AppState,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let config = Config::new();

    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
        std::process::exit(1);
    }

    info!("Starting up mentorship platform...");

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if config.run_migrations {
        info!("Applying pending migrations...");
        if let Err(e) = Migrator::up(db.as_ref(), None).await {
            error!("Failed to apply migrations: {e}");
            std::process::exit(1);
        }
    }

    let secret = match config.identity_jwt_secret() {
        Some(secret) => secret.to_owned(),
        None if config.is_production() => {
            error!("An identity token secret is required in production");
            std::process::exit(1);
        }
        None => {
            warn!("No identity token secret configured, using the development secret");
            DEVELOPMENT_JWT_SECRET.to_owned()
        }
    };
    let identity_provider: Arc<dyn IdentityProvider> = Arc::new(JwtIdentityProvider::new(
        &secret,
        config.identity_jwt_issuer(),
    ));

    // Live delivery hangs off the publisher so every domain event reaches
    // connected sessions without the domain knowing about sockets.
    let live_manager = Arc::new(Manager::new());
    let event_publisher =
        EventPublisher::new().with_handler(Arc::new(LiveEventHandler::new(live_manager.clone())));

    tokio::spawn(domain::notification::run_retention_sweep(
        db.clone(),
        config.notification_retention_days,
        Duration::from_secs(config.notification_sweep_interval_secs),
    ));

    let service_state = AppState::new(config, &db);
    let app_state = web::AppState::new(
        service_state,
        event_publisher,
        live_manager,
        identity_provider,
    );

    if let Err(e) = web::init_server(app_state).await {
        error!("Server exited with an error: {e}");
        std::process::exit(1);
    }
}
