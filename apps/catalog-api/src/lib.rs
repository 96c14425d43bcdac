//! # Catalog API
//!
//! HTTP surface of the product catalog.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Request Path                                   │
//! │                                                                         │
//! │  CorsLayer                                                              │
//! │    └─ SetRequestId (UUID v7) ──► PropagateRequestId                     │
//! │         └─ TraceLayer                                                   │
//! │              └─ error_boundary  (log, ErrorMetrics, render envelope)    │
//! │                   └─ require_api_key  (viewer < editor < admin)         │
//! │                        └─ Router                                        │
//! │                             ├─ /health                                  │
//! │                             ├─ /api/products[/search|/stats|/{id}]      │
//! │                             └─ /api/errors[/stats|/recent|/health]      │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                        AppState                                   │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────────┐  ┌────────────────────┐  │  │
//! │  │  │ ProductStore │  │ Mutex<ErrorMetr.>│  │ CatalogConfig      │  │  │
//! │  │  │ RwLock<Vec>  │  │ rolling windows  │  │ ApiKeys            │  │  │
//! │  │  └──────────────┘  └──────────────────┘  └────────────────────┘  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`] for the file format and the `CATALOG_*` environment
//! variables.

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Instant;

use axum::http::header::{self, HeaderName};
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use crate::auth::{ApiKeys, API_KEY_HEADER};
use crate::config::CatalogConfig;
use crate::context::REQUEST_ID_HEADER;
use catalog_core::metrics::ErrorMetrics;
use catalog_store::ProductStore;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: ProductStore,
    pub metrics: Arc<Mutex<ErrorMetrics>>,
    pub config: Arc<CatalogConfig>,
    pub keys: Arc<ApiKeys>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: CatalogConfig, store: ProductStore) -> Self {
        AppState {
            store,
            metrics: Arc::new(Mutex::new(ErrorMetrics::new(config.error_rate_threshold))),
            keys: Arc::new(ApiKeys::from_config(&config.api_keys)),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}

/// Generates time-ordered UUID v7 request ids.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    use handlers::{errors, health, products, stats};

    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/api/products/search", get(products::search_products))
        .route("/api/products/stats", get(stats::get_stats))
        .route("/api/products/stats/{section}", get(stats::get_stats_section))
        .route(
            "/api/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/errors", axum::routing::delete(errors::reset_errors))
        .route("/api/errors/stats", get(errors::error_stats))
        .route("/api/errors/recent", get(errors::recent_errors))
        .route("/api/errors/health", get(errors::error_health))
        .fallback(handlers::route_not_found)
        .layer(from_fn_with_state(state.clone(), auth::require_api_key))
        .layer(from_fn_with_state(state.clone(), error::error_boundary))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
