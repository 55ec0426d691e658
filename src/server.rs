use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenVerifier;
use crate::handlers::products;
use crate::middleware::require_bearer;
use crate::storage::CatalogStore;

/// Shared application state. Both collaborators are trait objects so tests
/// can swap in an in-memory store and a shared-secret verifier.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Build the HTTP surface. The four product routes sit behind the bearer
/// gate; `/` and `/health` stay public.
pub fn router(state: AppState) -> Router {
    let products = Router::new()
        .route("/products", get(products::list).post(products::create))
        .route("/products/:id", put(products::update).delete(products::remove))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(products)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "catalog-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health (public)",
            "products": "GET/POST /products, PUT/DELETE /products/:id (bearer token required)"
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = chrono::Utc::now();
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": timestamp })),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": timestamp,
                "error": err.to_string()
            })),
        ),
    }
}
