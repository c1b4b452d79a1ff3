//! HTTP API server with observability for shop-owner registration.
//!
//! Exposes the registration saga over REST, with structured logging
//! (tracing) and Prometheus metrics. The store backend and the
//! provisioning strategy are chosen at startup from configuration; the
//! routes are identical for every combination.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use registration::{
    BcryptHasher, InMemoryCompensationLog, JwtTokenIssuer, ManualSagaStrategy, SagaCoordinator,
    SigningKeys, TracingCompensationLog, TransactionalStrategy,
};
use store::MemoryStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::register::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/register/shop-owner", post(routes::register::shop_owner))
        .route("/register/reissue", post(routes::register::reissue))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Builds application state over any store, selecting the provisioning
/// strategy by flag.
pub fn create_state<S>(
    store: S,
    keys: &SigningKeys,
    use_native_transactions: bool,
) -> Arc<AppState>
where
    S: store::SessionStore + store::AccountStore + store::ShopStore + store::CategoryStore
        + Clone
        + 'static,
{
    let hasher = BcryptHasher::new();
    let issuer = JwtTokenIssuer::new(keys);

    let registration: Arc<dyn routes::register::RegistrationService> = if use_native_transactions {
        Arc::new(SagaCoordinator::new(
            store.clone(),
            TransactionalStrategy::new(store),
            hasher,
            issuer,
        ))
    } else {
        Arc::new(SagaCoordinator::new(
            store.clone(),
            ManualSagaStrategy::new(store, TracingCompensationLog::new()),
            hasher,
            issuer,
        ))
    };

    Arc::new(AppState { registration })
}

/// Builds in-memory application state with an in-memory compensation
/// log, for tests and local development.
pub fn create_memory_state(
    store: MemoryStore,
    keys: &SigningKeys,
    log: InMemoryCompensationLog,
) -> Arc<AppState> {
    let coordinator = SagaCoordinator::new(
        store.clone(),
        ManualSagaStrategy::new(store, log),
        BcryptHasher::new(),
        JwtTokenIssuer::new(keys),
    );
    Arc::new(AppState {
        registration: Arc::new(coordinator),
    })
}
