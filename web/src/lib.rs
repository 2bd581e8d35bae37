//! HTTP and WebSocket surface of the mentorship platform.

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use domain::identity::IdentityProvider;
use events::EventPublisher;
use log::*;
use realtime::Manager;
use sea_orm::DatabaseConnection;
use service::config::Config;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod controller;
mod error;
pub(crate) mod extractors;
mod live;
pub(crate) mod params;
mod router;

pub use error::{Error, Result};

/// Everything a request handler needs, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub database_connection: Arc<DatabaseConnection>,
    pub config: Config,
    pub event_publisher: Arc<EventPublisher>,
    pub live_manager: Arc<Manager>,
    pub identity_provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        service_state: service::AppState,
        event_publisher: EventPublisher,
        live_manager: Arc<Manager>,
        identity_provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            database_connection: service_state.database_connection,
            config: service_state.config,
            event_publisher: Arc::new(event_publisher),
            live_manager,
            identity_provider,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.database_connection.as_ref()
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let server_url = format!("{host}:{}", app_state.config.port);

    let allowed_origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring malformed CORS origin {origin}");
                None
            }
        })
        .collect();

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::DELETE, Method::GET, Method::POST, Method::PUT])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(allowed_origins);

    info!("Server starting... listening for connections on http://{server_url}");

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    axum::serve(listener, router::define_routes(app_state).layer(cors_layer)).await
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use clap::Parser;
    use domain::error::Error as DomainError;
    use domain::identity::Identity;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    /// Treats the bearer credential itself as the user id.
    pub(crate) struct TrustingIdentityProvider;

    #[async_trait]
    impl IdentityProvider for TrustingIdentityProvider {
        async fn verify(&self, credential: &str) -> std::result::Result<Identity, DomainError> {
            Ok(Identity {
                user_id: credential.to_string(),
                email: format!("{credential}@example.com"),
            })
        }
    }

    pub(crate) async fn app_state() -> AppState {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options)
            .await
            .expect("open in-memory sqlite");
        Migrator::up(&db, None).await.expect("apply migrations");
        entity_api::seed_database(&db).await.expect("seed users");

        let config = Config::parse_from(["web-test"]);
        let service_state = service::AppState::new(config, &Arc::new(db));

        AppState::new(
            service_state,
            EventPublisher::new(),
            Arc::new(Manager::new()),
            Arc::new(TrustingIdentityProvider),
        )
    }
}
