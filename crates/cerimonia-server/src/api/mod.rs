//! HTTP API for attendee signup and event opt-in.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{
    logging_middleware, rate_limit_middleware, redact_path, request_span, RateLimitState,
};
pub use types::*;

use crate::backend::Backend;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use cerimonia_core::{ExistenceResolver, OptinService, SignupService, Stores};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// The services share the backend's store handles, so a CPF created through signup is
/// immediately visible to the existence check and to opt-in.
#[derive(Clone)]
pub struct AppState {
    /// Selected data backend, kept for health checks
    pub backend: Backend,
    /// Store handles for direct reads (events, guest lists)
    pub stores: Stores,
    pub resolver: ExistenceResolver,
    pub signup: SignupService,
    pub optins: OptinService,
}

impl AppState {
    /// Create application state on top of a backend.
    pub fn new(backend: Backend) -> Self {
        let stores = backend.stores();
        Self {
            resolver: ExistenceResolver::new(stores.attendees.clone()),
            signup: SignupService::new(stores.attendees.clone()),
            optins: OptinService::new(stores.attendees.clone(), stores.optins.clone()),
            stores,
            backend,
        }
    }
}

/// Create the API router with the default rate limit.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::new(120))
}

/// Create the API router with custom rate limiting.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    // The PWA is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check (no rate limiting)
        .route("/health", get(handlers::health))
        // Public flow endpoints (rate limited)
        .merge(
            Router::new()
                // Event pages
                .route("/v1/events", get(handlers::list_events))
                .route("/v1/events/:id", get(handlers::get_event))
                .route(
                    "/v1/events/:id/optins",
                    post(handlers::register).get(handlers::list_optins),
                )
                // Attendee lookup and signup
                .route("/v1/attendees", post(handlers::sign_up))
                .route("/v1/attendees/:cpf/exists", get(handlers::check_cpf))
                .layer(axum_middleware::from_fn_with_state(
                    rate_limit,
                    rate_limit_middleware,
                )),
        )
        // Request logging with CPFs masked in paths
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(cors)
        .with_state(state)
}
