//! Error metrics handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::context::{CatalogQuery, Ctx};
use crate::error::HandlerResult;
use crate::AppState;
use catalog_core::error::classify;
use catalog_core::metrics::{ErrorHealth, ErrorRecord, ErrorSummary};
use catalog_core::response::{messages, Envelope};
use catalog_core::{ApiResponse, ValidationError};

/// Records returned by `/api/errors/recent` when `limit` is absent.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Most records `/api/errors/recent` will return.
pub const MAX_RECENT_LIMIT: usize = 100;

/// GET /api/errors/stats
pub async fn error_stats(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
) -> HandlerResult<Json<Envelope<ErrorSummary>>> {
    let summary = state.metrics.lock().await.summary(Utc::now());

    Ok(Json(
        ApiResponse::ok(summary)
            .with_message(messages::ERROR_STATS_RETRIEVED)
            .finish(&ctx),
    ))
}

#[derive(Debug, Serialize)]
struct RecentMeta {
    limit: usize,
    count: usize,
}

/// GET /api/errors/recent
pub async fn recent_errors(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    CatalogQuery(raw): CatalogQuery,
) -> HandlerResult<Json<Envelope<Vec<ErrorRecord>>>> {
    let limit = match raw.get("limit") {
        None => DEFAULT_RECENT_LIMIT,
        Some(value) => value
            .trim()
            .parse::<usize>()
            .map_err(|e| classify(&e).with_field("limit"))?,
    };

    if !(1..=MAX_RECENT_LIMIT).contains(&limit) {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1.0,
            max: MAX_RECENT_LIMIT as f64,
        }
        .into());
    }

    let records = state.metrics.lock().await.recent(limit);
    let meta = RecentMeta {
        limit,
        count: records.len(),
    };

    Ok(Json(
        ApiResponse::ok(records)
            .with_meta(meta)
            .with_message(messages::RECENT_ERRORS_RETRIEVED)
            .finish(&ctx),
    ))
}

/// GET /api/errors/health
pub async fn error_health(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
) -> HandlerResult<Json<Envelope<ErrorHealth>>> {
    let health = state.metrics.lock().await.health(Utc::now());

    Ok(Json(
        ApiResponse::ok(health)
            .with_message(messages::ERROR_HEALTH_RETRIEVED)
            .finish(&ctx),
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutcome {
    cleared: usize,
}

/// DELETE /api/errors
///
/// Clears every window and counter. The threshold is kept.
pub async fn reset_errors(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
) -> HandlerResult<Json<Envelope<ResetOutcome>>> {
    let mut metrics = state.metrics.lock().await;
    let cleared = metrics.summary(Utc::now()).windows.last_week;
    metrics.reset();
    drop(metrics);

    info!(cleared, "Error metrics reset");

    Ok(Json(
        ApiResponse::ok(ResetOutcome { cleared })
            .with_message(messages::ERROR_METRICS_RESET)
            .finish(&ctx),
    ))
}
