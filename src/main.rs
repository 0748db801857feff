//! Film Catalog Backend
//!
//! A REST API server managing a film catalog and its social layer:
//! films, users, likes, and friendships.

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, put},
    Json, Router,
};
use cinetrack_backend::api;
use cinetrack_backend::config::Config;
use cinetrack_backend::state::AppState;
use cinetrack_backend::storage::sqlite::SqliteStore;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    message: String,
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    // Initialize the store and wire the services
    let store = Arc::new(SqliteStore::new(&config.database.path).await?);
    let app_state = AppState::from_store(store);

    // Build our application with routes
    let app = Router::new()
        .route("/api/health", get(health_check))
        // Film catalog API
        .route(
            "/films",
            get(api::films::list_films)
                .post(api::films::create_film)
                .put(api::films::update_film),
        )
        .route("/films/popular", get(api::films::popular_films))
        .route(
            "/films/:id",
            get(api::films::get_film).delete(api::films::delete_film),
        )
        .route(
            "/films/:id/like/:user_id",
            put(api::films::add_like).delete(api::films::remove_like),
        )
        // User and friendship API
        .route(
            "/users",
            get(api::users::list_users)
                .post(api::users::create_user)
                .put(api::users::update_user),
        )
        .route(
            "/users/:id",
            get(api::users::get_user).delete(api::users::delete_user),
        )
        .route("/users/:id/friends", get(api::users::friends))
        .route(
            "/users/:id/friends/common/:other_id",
            get(api::users::common_friends),
        )
        .route(
            "/users/:id/friends/:friend_id",
            put(api::users::add_friend).delete(api::users::remove_friend),
        )
        // Reference data API
        .route("/genres", get(api::genres::list_genres))
        .route("/genres/:id", get(api::genres::get_genre))
        .route("/mpa", get(api::mpa::list_mpa))
        .route("/mpa/:id", get(api::mpa::get_mpa))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Bind to address from config
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    info!("Server running on http://{}", addr);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Setup graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Backend is healthy".to_string(),
    })
}
