//! Service health.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::context::Ctx;
use crate::error::HandlerResult;
use crate::AppState;
use catalog_core::metrics::{ErrorHealth, HealthStatus};
use catalog_core::response::{messages, Envelope};
use catalog_core::{ApiResponse, RuntimeMode};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    status: HealthStatus,
    version: &'static str,
    environment: RuntimeMode,
    uptime_seconds: u64,
    product_count: usize,
    auth_enabled: bool,
    errors: ErrorHealth,
}

/// GET /health
///
/// Always 200; a high error rate shows up as `status: degraded`.
pub async fn health(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
) -> HandlerResult<Json<Envelope<ServiceHealth>>> {
    let errors = state.metrics.lock().await.health(Utc::now());

    let body = ServiceHealth {
        status: errors.status,
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment,
        uptime_seconds: state.started_at.elapsed().as_secs(),
        product_count: state.store.count().await,
        auth_enabled: !state.keys.is_disabled(),
        errors,
    };

    Ok(Json(
        ApiResponse::ok(body)
            .with_message(messages::HEALTH_RETRIEVED)
            .finish(&ctx),
    ))
}
