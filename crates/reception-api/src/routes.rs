//! Router setup and server startup.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::{Extension, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use reception_core::ReceptionError;

use crate::handlers;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::state::AppState;

/// Build the router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Kiosk frontend served from the same host, plus a dev server on port+1.
    let port = state.config.general.port;
    let origins: Vec<HeaderValue> = [port, port.saturating_add(1)]
        .iter()
        .flat_map(|p| [format!("http://127.0.0.1:{}", p), format!("http://localhost:{}", p)])
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route("/sessions/{id}", axum::routing::delete(handlers::delete_session))
        .route("/sessions/{id}/context", get(handlers::get_context))
        .route("/sessions/{id}/reset", post(handlers::reset_context))
        .route("/sessions/{id}/history", get(handlers::get_history))
        .route("/voices", get(handlers::list_voices))
        .route("/voices/current", put(handlers::set_voice))
        .route("/vehicles", get(handlers::list_vehicles))
        .route("/vehicles/{code}", get(handlers::get_vehicle));

    // Routes that may call the model or the speech service.
    let limiter = RateLimiter::new(state.config.general.rate_limit_per_sec);
    let ai_routes = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/services/{service}", post(handlers::quick_service))
        .route("/transcript", post(handlers::transcript))
        .route("/speech", post(handlers::speech))
        .route("/vehicles/{code}/interest", post(handlers::vehicle_interest))
        .layer(axum::middleware::from_fn(rate_limit_middleware))
        .layer(Extension(limiter));

    public_routes
        .merge(ai_routes)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind to localhost on the configured port and serve until shutdown.
pub async fn start_server(state: AppState) -> Result<(), ReceptionError> {
    let addr = format!("127.0.0.1:{}", state.config.general.port);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ReceptionError::Api(format!("Failed to bind {}: {}", addr, e)))?;
    tracing::info!("Reception API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ReceptionError::Api(format!("Server error: {}", e)))?;

    tracing::info!("Reception API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
