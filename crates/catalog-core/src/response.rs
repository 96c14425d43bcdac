//! # Response Builder
//!
//! Success envelopes shared by every route.
//!
//! ```text
//! {
//!   "success": true,
//!   "data": ...,
//!   "meta": { ... },            // optional: pagination, applied query
//!   "message": "Products retrieved successfully",
//!   "timestamp": "2024-06-30T12:00:00Z",
//!   "requestId": "0190...", "path": "/api/products", "method": "GET"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Default messages per operation.
pub mod messages {
    pub const DEFAULT: &str = "Request completed successfully";
    pub const PRODUCTS_RETRIEVED: &str = "Products retrieved successfully";
    pub const PRODUCT_RETRIEVED: &str = "Product retrieved successfully";
    pub const PRODUCT_CREATED: &str = "Product created successfully";
    pub const PRODUCT_UPDATED: &str = "Product updated successfully";
    pub const PRODUCT_DELETED: &str = "Product deleted successfully";
    pub const SEARCH_COMPLETED: &str = "Search completed successfully";
    pub const STATS_RETRIEVED: &str = "Statistics retrieved successfully";
    pub const ERROR_STATS_RETRIEVED: &str = "Error statistics retrieved successfully";
    pub const RECENT_ERRORS_RETRIEVED: &str = "Recent errors retrieved successfully";
    pub const ERROR_HEALTH_RETRIEVED: &str = "Error health retrieved successfully";
    pub const ERROR_METRICS_RESET: &str = "Error metrics reset successfully";
    pub const HEALTH_RETRIEVED: &str = "Service is running";
}

/// Identity of the request being answered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub path: String,
    pub method: String,
}

impl RequestContext {
    pub fn new(
        request_id: impl Into<String>,
        path: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        RequestContext {
            request_id: request_id.into(),
            path: path.into(),
            method: method.into(),
        }
    }
}

/// Builder for a success envelope.
///
/// ## Example
/// ```rust
/// use catalog_core::{ApiResponse, RequestContext};
///
/// let ctx = RequestContext::new("req-1", "/api/products", "GET");
/// let envelope = ApiResponse::ok(vec![1, 2, 3])
///     .with_meta(serde_json::json!({ "count": 3 }))
///     .with_message("Listed")
///     .finish(&ctx);
///
/// assert!(envelope.success);
/// assert_eq!(envelope.message, "Listed");
/// ```
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    data: T,
    meta: Option<Value>,
    message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            data,
            meta: None,
            message: messages::DEFAULT.to_string(),
        }
    }

    /// Attaches metadata. Values that do not serialize are dropped.
    pub fn with_meta<M: Serialize>(mut self, meta: M) -> Self {
        self.meta = serde_json::to_value(meta).ok();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn finish(self, request: &RequestContext) -> Envelope<T> {
        self.finish_at(request, Utc::now())
    }

    /// Like [`finish`](Self::finish) with an explicit timestamp.
    pub fn finish_at(self, request: &RequestContext, timestamp: DateTime<Utc>) -> Envelope<T> {
        Envelope {
            success: true,
            data: self.data,
            meta: self.meta,
            message: self.message,
            timestamp,
            request_id: request.request_id.clone(),
            path: request.path.clone(),
            method: request.method.clone(),
        }
    }
}

/// The success envelope sent to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    pub path: String,
    pub method: String,
}
