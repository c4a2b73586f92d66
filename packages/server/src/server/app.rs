//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::{BasePushNotificationService, ExpoClient, ServerDeps};
use crate::server::middleware::auth_middleware;
use crate::server::routes::{
    approve_request_handler, bulk_update_handler, create_pet_handler, create_request_handler,
    get_pet_handler, health_handler, list_all_requests_handler, list_own_requests_handler,
    list_pet_requests_handler, list_pets_handler, list_shelter_requests_handler,
    pet_availability_handler, reject_request_handler, remove_pet_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router from configuration.
pub fn build_app(pool: PgPool, config: &Config) -> Router {
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
    ));
    let push_service: Arc<dyn BasePushNotificationService> =
        Arc::new(ExpoClient::new(config.expo_access_token.clone()));

    let deps = Arc::new(ServerDeps::new(
        pool.clone(),
        push_service,
        jwt_service,
        Duration::from_millis(config.lock_timeout_ms),
    ));

    router_with_deps(pool, deps)
}

/// Router assembly, shared with the test harness (which injects mock deps).
pub fn router_with_deps(pool: PgPool, deps: Arc<ServerDeps>) -> Router {
    let state = AppState { db_pool: pool, deps };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Pets
        .route("/api/pets", get(list_pets_handler).post(create_pet_handler))
        .route(
            "/api/pets/:id",
            get(get_pet_handler).delete(remove_pet_handler),
        )
        .route("/api/pets/:id/availability", get(pet_availability_handler))
        .route("/api/pets/:id/requests", get(list_pet_requests_handler))
        // Adoption requests
        .route(
            "/api/adoptions",
            get(list_own_requests_handler).post(create_request_handler),
        )
        .route("/api/adoptions/shelter", get(list_shelter_requests_handler))
        .route("/api/adoptions/all", get(list_all_requests_handler))
        .route("/api/adoptions/:id/approve", post(approve_request_handler))
        .route("/api/adoptions/:id/reject", post(reject_request_handler))
        .route("/api/adoptions/bulk", post(bulk_update_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(auth_middleware))
        .layer(Extension(state)) // Add shared state (must be after middlewares that need it)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
