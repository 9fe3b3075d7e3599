//! Taskmate Axum Integration
//!
//! Axum middleware and extractors for session-token authentication.
//!
//! # Overview
//!
//! - **Middleware**: [`AuthGateLayer`] reads a bearer header or session
//!   cookie, validates it, and records an [`IdentityContext`]. It never
//!   rejects a request.
//! - **Extractors**: [`RequireAuth`] (401 if anonymous), [`MaybeAuth`]
//!
//! # Quick Start
//!
//! ```ignore
//! use taskmate_axum::{AuthGateLayer, RequireAuth};
//! use axum::{Router, routing::get};
//!
//! async fn protected_handler(auth: RequireAuth) -> String {
//!     format!("Hello, {}!", auth.subject)
//! }
//!
//! let app = Router::new()
//!     .route("/api/protected", get(protected_handler))
//!     .layer(AuthGateLayer::new(token_service));
//! ```

pub mod context;
pub mod error;
pub mod extractors;
pub mod layer;

// Re-export primary types
pub use context::{AuthSource, IdentityContext, Role};
pub use error::AuthRejection;
pub use extractors::{MaybeAuth, RequireAuth};
pub use layer::{AuthGateConfig, AuthGateLayer, AuthGateService, DEFAULT_COOKIE_NAME};
