//! Taskmate Auth API
//!
//! Authentication service for the Taskmate API.
//!
//! ## REST Endpoints
//!
//! - `POST /auth/login` - Exchange email/password for a session token and cookie
//! - `POST /auth/logout` - Clear the session cookie
//! - `POST /auth/magic` - Request a magic sign-in link from the identity provider
//! - `GET /auth/me` - Identity of the current caller
//! - `GET /api/secure` - Sample protected endpoint
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use taskmate_axum::{AuthGateConfig, AuthGateLayer};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use crate::config::{Config, ConfigError};
pub use crate::state::AppState;

/// Build the HTTP router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout();

    // Auth routes
    let auth_routes = Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/magic", post(handlers::magic_link))
        .route("/auth/me", get(handlers::me))
        .route("/api/secure", get(handlers::secure));

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready));

    let gate = AuthGateLayer::with_config(
        state.tokens(),
        AuthGateConfig::new().cookie_name(state.config.cookie.name.clone()),
    );

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(state.config.cors_allowed_origin.clone()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        // Request timeout
        .layer(TimeoutLayer::new(request_timeout))
        // Session identity (innermost - closest to handler)
        .layer(gate);

    Router::new()
        .merge(auth_routes)
        .layer(middleware)
        .merge(health_routes)
        .with_state(state)
}
