use std::sync::Arc;

use http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use exam_portal::adapters::auth::JwtTokenVerifier;
use exam_portal::adapters::http::{build_router, AppState, HealthState, NotificationAppState};
use exam_portal::adapters::memory::{InMemoryNotificationRepository, InMemoryUserDirectory};
use exam_portal::adapters::postgres::{PostgresNotificationRepository, PostgresUserDirectory};
use exam_portal::adapters::websocket::{
    FanoutEngine, PresenceRegistry, RealtimeHub, RoomManager, WebSocketState,
};
use exam_portal::config::{AppConfig, ServerConfig};
use exam_portal::ports::{NotificationRepository, RealtimePublisher, TokenVerifier, UserDirectory};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    // RUST_LOG wins over the configured directive
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))?;
    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().pretty().with_env_filter(filter).init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "Exam portal starting"
    );

    let (repository, directory): (Arc<dyn NotificationRepository>, Arc<dyn UserDirectory>) =
        match &config.database {
            Some(database) => {
                let pool = PgPoolOptions::new()
                    .min_connections(database.min_connections)
                    .max_connections(database.max_connections)
                    .acquire_timeout(database.acquire_timeout())
                    .connect(&database.url)
                    .await?;
                tracing::info!(max_connections = database.max_connections, "Connected to PostgreSQL");
                (
                    Arc::new(PostgresNotificationRepository::new(pool.clone())),
                    Arc::new(PostgresUserDirectory::new(pool)),
                )
            }
            None => {
                tracing::warn!("No database configured, notifications and user roles are kept in memory");
                (
                    Arc::new(InMemoryNotificationRepository::new()),
                    Arc::new(InMemoryUserDirectory::new()),
                )
            }
        };

    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtTokenVerifier::new(
        &config.auth.jwt_secret,
        config.auth.jwt_issuer.as_deref(),
        config.auth.leeway_secs,
    ));

    let rooms = Arc::new(RoomManager::new(config.realtime.outbound_buffer));
    let presence = Arc::new(PresenceRegistry::new());
    let fanout = Arc::new(FanoutEngine::new(
        rooms.clone(),
        presence.clone(),
        directory.clone(),
    ));

    let mut hub = RealtimeHub::new(rooms.clone(), presence.clone(), fanout.clone());
    if config.realtime.verify_handshake_token {
        hub = hub.with_handshake_verifier(verifier.clone());
    }

    let publisher: Arc<dyn RealtimePublisher> = fanout;
    let state = AppState {
        notifications: NotificationAppState::new(repository, publisher),
        health: HealthState { rooms, presence },
        websocket: WebSocketState::new(hub),
        verifier,
        directory,
    };

    let app = build_router(state, &config.realtime.socket_path).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.server))
            .layer(TimeoutLayer::new(config.server.request_timeout())),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        socket_path = %config.realtime.socket_path,
        verify_handshake_token = config.realtime.verify_handshake_token,
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() && !server.is_production() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
