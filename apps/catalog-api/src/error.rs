//! HTTP error boundary.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  handler / extractor / auth                                             │
//! │       │  Err(HandlerError)                                              │
//! │       ▼                                                                 │
//! │  HandlerError::into_response                                            │
//! │       │  provisional body + CatalogError in response extensions         │
//! │       ▼                                                                 │
//! │  error_boundary (middleware)                                            │
//! │       │  log ──► ErrorMetrics::record                                   │
//! │       ▼                                                                 │
//! │  final failure envelope (runtime mode, request id, path, method)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Responses that fail without a `CatalogError` attached (axum's own 404/405
//! and body-limit rejections) are classified by status before rendering.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use crate::context::request_context;
use crate::AppState;
use catalog_core::metrics::ErrorRecord;
use catalog_core::{CatalogError, RequestContext, RuntimeMode, ValidationError};
use catalog_store::StoreError;

/// Error returned by handlers, extractors and middleware.
#[derive(Debug)]
pub struct HandlerError(pub CatalogError);

pub type HandlerResult<T> = Result<T, HandlerError>;

impl From<CatalogError> for HandlerError {
    fn from(err: CatalogError) -> Self {
        HandlerError(err)
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        HandlerError(err.into())
    }
}

impl From<ValidationError> for HandlerError {
    fn from(err: ValidationError) -> Self {
        HandlerError(err.into())
    }
}

impl IntoResponse for HandlerError {
    /// Renders a conservative body and hands the error to the boundary,
    /// which re-renders it with the request's context.
    fn into_response(self) -> Response {
        let mut response = render(&self.0, RuntimeMode::Production, &RequestContext::default());
        response.extensions_mut().insert(self.0);
        response
    }
}

fn render(err: &CatalogError, mode: RuntimeMode, ctx: &RequestContext) -> Response {
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err.render(mode, ctx))).into_response()
}

/// Code used for a status that reached the boundary without a typed error.
fn code_for_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_ENTITY",
        StatusCode::TOO_MANY_REQUESTS => "TOO_MANY_REQUESTS",
        s if s.is_server_error() => "INTERNAL_ERROR",
        _ => "HTTP_ERROR",
    }
}

/// Builds a typed error for a failed response that carries none.
pub fn classify_status(status: StatusCode, ctx: &RequestContext) -> CatalogError {
    match status {
        StatusCode::NOT_FOUND => CatalogError::not_found("Route", Some(ctx.path.as_str())),
        StatusCode::METHOD_NOT_ALLOWED => CatalogError::generic(
            405,
            code_for_status(status),
            format!("Method {} not allowed for {}", ctx.method, ctx.path),
            true,
        ),
        s => CatalogError::generic(
            s.as_u16(),
            code_for_status(s),
            s.canonical_reason().unwrap_or("Request failed"),
            !s.is_server_error(),
        ),
    }
}

/// Records and renders every failure leaving the router.
pub async fn error_boundary(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let ctx = request_context(request.headers(), request.uri(), request.method());
    let mut response = next.run(request).await;

    let err = match response.extensions_mut().remove::<CatalogError>() {
        Some(err) => err,
        None if response.status().is_client_error() || response.status().is_server_error() => {
            classify_status(response.status(), &ctx)
        }
        None => return response,
    };

    if err.is_server_error() {
        error!(
            request_id = %ctx.request_id,
            status = err.status(),
            code = err.code(),
            diagnostic = ?err.diagnostic,
            "{} {} failed: {}",
            ctx.method,
            ctx.path,
            err.message
        );
    } else {
        warn!(
            request_id = %ctx.request_id,
            status = err.status(),
            code = err.code(),
            "{} {} rejected: {}",
            ctx.method,
            ctx.path,
            err.message
        );
    }

    state
        .metrics
        .lock()
        .await
        .record(ErrorRecord::from_error(&err, &ctx));

    render(&err, state.config.environment, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RequestContext {
        RequestContext::new("req-1", "/nowhere", "PATCH")
    }

    #[test]
    fn test_unknown_route_is_not_found() {
        let err = classify_status(StatusCode::NOT_FOUND, &ctx());
        assert_eq!(err.status(), 404);
        assert_eq!(err.code(), "RESOURCE_NOT_FOUND");
        assert_eq!(err.message, "Route with id '/nowhere' not found");
    }

    #[test]
    fn test_method_not_allowed() {
        let err = classify_status(StatusCode::METHOD_NOT_ALLOWED, &ctx());
        assert_eq!(err.status(), 405);
        assert_eq!(err.code(), "METHOD_NOT_ALLOWED");
        assert!(err.is_operational());
    }

    #[test]
    fn test_other_statuses_keep_status() {
        let err = classify_status(StatusCode::PAYLOAD_TOO_LARGE, &ctx());
        assert_eq!(err.status(), 413);
        assert_eq!(err.code(), "PAYLOAD_TOO_LARGE");

        let err = classify_status(StatusCode::BAD_GATEWAY, &ctx());
        assert!(err.is_server_error());
        assert!(!err.is_operational());
    }

    #[test]
    fn test_into_response_carries_error() {
        let response = HandlerError(CatalogError::internal("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<CatalogError>().is_some());
    }
}
