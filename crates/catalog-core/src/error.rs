//! # Error Types
//!
//! The error taxonomy for the catalog service.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ValidationError  - a single rule violation ("limit must be ...")       │
//! │       │                                                                 │
//! │       ▼  (collected into details)                                       │
//! │  CatalogError     - what every failure becomes before it leaves         │
//! │  ├── Validation       400  VALIDATION_ERROR                             │
//! │  ├── Authentication   401  AUTHENTICATION_ERROR                         │
//! │  ├── Authorization    403  AUTHORIZATION_ERROR                          │
//! │  ├── NotFound         404  RESOURCE_NOT_FOUND                           │
//! │  └── Generic          500  INTERNAL_ERROR (status/code overridable)     │
//! │       │                                                                 │
//! │       ▼  render(mode, request)                                          │
//! │  ErrorBody        - { success:false, message, error, statusCode, ... }  │
//! │                                                                         │
//! │  Foreign errors ──► classify() ──► CatalogError                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Codes are stable; messages may change
//! 3. 4xx failures keep their detail, 5xx detail is hidden outside development

use std::error::Error as StdError;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::response::RequestContext;
use crate::types::RuntimeMode;

// =============================================================================
// Validation Error
// =============================================================================

/// A single input rule violation.
///
/// These are collected into the `details` of a [`CatalogError`] so a client
/// can see every problem with its request at once.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Numeric value is below its minimum.
    #[error("{field} must be greater than or equal to {min}")]
    BelowMinimum { field: String, min: i64 },

    /// Numeric value must not be negative.
    #[error("{field} must be a non-negative number")]
    Negative { field: String },

    /// Value has the wrong JSON/query type.
    #[error("{field} must be a {expected}")]
    WrongType { field: String, expected: &'static str },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {}", allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Some of several supplied values are not in the allowed set.
    #[error("Invalid {field} value(s): {}. Allowed values: {}", values.join(", "), allowed.join(", "))]
    InvalidValues {
        field: String,
        values: Vec<String>,
        allowed: Vec<String>,
    },

    /// A lower bound exceeds its upper bound.
    #[error("{min_field} cannot be greater than {max_field}")]
    InvertedRange { min_field: String, max_field: String },
}

impl ValidationError {
    /// The request field this violation is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::WrongType { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::InvalidValues { field, .. } => field,
            ValidationError::InvertedRange { min_field, .. } => min_field,
        }
    }
}

// =============================================================================
// Catalog Error
// =============================================================================

/// Why authentication failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthFailure {
    Missing,
    Invalid,
    Expired,
}

impl AuthFailure {
    fn default_message(&self) -> &'static str {
        match self {
            AuthFailure::Missing => "Authentication required",
            AuthFailure::Invalid => "Invalid API key",
            AuthFailure::Expired => "API key has expired",
        }
    }

    fn default_hints(&self) -> Vec<String> {
        let hints: &[&str] = match self {
            AuthFailure::Missing => &[
                "Provide an API key in the x-api-key header",
                "Contact an administrator to obtain a key",
            ],
            AuthFailure::Invalid => &[
                "Check that the API key is copied correctly",
                "Keys are case-sensitive",
            ],
            AuthFailure::Expired => &["Request a new API key"],
        };
        hints.iter().map(|h| h.to_string()).collect()
    }
}

/// Kind-specific payload of a [`CatalogError`].
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Validation {
        details: Vec<String>,
        field: Option<String>,
    },
    Authentication {
        reason: AuthFailure,
        hints: Vec<String>,
    },
    Authorization {
        required_permission: Option<String>,
        required_role: Option<String>,
        suggestions: Vec<String>,
    },
    NotFound {
        resource: String,
        resource_id: Option<String>,
        suggestions: Vec<String>,
    },
    /// Catch-all. `operational` is false for unexpected system faults.
    Generic {
        status: u16,
        code: String,
        operational: bool,
    },
}

impl ErrorKind {
    /// Short kind name used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Validation { .. } => "Validation",
            ErrorKind::Authentication { .. } => "Authentication",
            ErrorKind::Authorization { .. } => "Authorization",
            ErrorKind::NotFound { .. } => "NotFound",
            ErrorKind::Generic { .. } => "Generic",
        }
    }
}

/// Every failure the service reports, whatever its origin.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CatalogError {
    pub kind: ErrorKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Internal detail (source chain, offending input). Development only.
    pub diagnostic: Option<String>,
}

/// Convenience type alias for Results with CatalogError.
pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        CatalogError {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
            diagnostic: None,
        }
    }

    // -------------------------------------------------------------------------
    // Constructors
    // -------------------------------------------------------------------------

    /// A 400 with a list of human-readable details.
    pub fn validation(message: impl Into<String>, details: Vec<String>) -> Self {
        CatalogError::new(
            ErrorKind::Validation {
                details,
                field: None,
            },
            message,
        )
    }

    /// A 400 built from rule violations. `field` names the first offender.
    pub fn from_violations(message: impl Into<String>, violations: &[ValidationError]) -> Self {
        CatalogError::new(
            ErrorKind::Validation {
                details: violations.iter().map(|v| v.to_string()).collect(),
                field: violations.first().map(|v| v.field().to_string()),
            },
            message,
        )
    }

    /// A 401 with the default message and hints for `reason`.
    pub fn authentication(reason: AuthFailure) -> Self {
        CatalogError::new(
            ErrorKind::Authentication {
                reason,
                hints: reason.default_hints(),
            },
            reason.default_message(),
        )
    }

    /// A 403 naming what the caller lacks.
    pub fn authorization(required_role: Option<&str>, required_permission: Option<&str>) -> Self {
        let mut suggestions = Vec::new();
        if let Some(role) = required_role {
            suggestions.push(format!("Use an API key with the '{}' role", role));
        }
        if let Some(permission) = required_permission {
            suggestions.push(format!("Request the '{}' permission", permission));
        }
        suggestions.push("Contact an administrator if you believe this is a mistake".to_string());

        CatalogError::new(
            ErrorKind::Authorization {
                required_permission: required_permission.map(str::to_string),
                required_role: required_role.map(str::to_string),
                suggestions,
            },
            "Insufficient permissions",
        )
    }

    /// A 404 for a resource type and optional identifier.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::CatalogError;
    ///
    /// let err = CatalogError::not_found("Product", Some("abc"));
    /// assert_eq!(err.status(), 404);
    /// assert_eq!(err.code(), "RESOURCE_NOT_FOUND");
    /// assert_eq!(err.to_string(), "Product with id 'abc' not found");
    /// ```
    pub fn not_found(resource: &str, resource_id: Option<&str>) -> Self {
        let message = match resource_id {
            Some(id) => format!("{} with id '{}' not found", resource, id),
            None => format!("{} not found", resource),
        };
        let suggestions = vec![
            format!("Check that the {} identifier is correct", resource.to_lowercase()),
            format!("The {} may have been deleted", resource.to_lowercase()),
        ];

        CatalogError::new(
            ErrorKind::NotFound {
                resource: resource.to_string(),
                resource_id: resource_id.map(str::to_string),
                suggestions,
            },
            message,
        )
    }

    /// A catch-all with an explicit status and code.
    pub fn generic(
        status: u16,
        code: impl Into<String>,
        message: impl Into<String>,
        operational: bool,
    ) -> Self {
        CatalogError::new(
            ErrorKind::Generic {
                status,
                code: code.into(),
                operational,
            },
            message,
        )
    }

    /// An unexpected system fault (500, INTERNAL_ERROR, non-operational).
    pub fn internal(message: impl Into<String>) -> Self {
        CatalogError::generic(500, "INTERNAL_ERROR", message, false)
    }

    /// Names the offending field of a Validation error. No-op for other kinds.
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        if let ErrorKind::Validation { field, .. } = &mut self.kind {
            *field = Some(name.into());
        }
        self
    }

    /// Attaches internal detail that only development mode renders.
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        match &self.kind {
            ErrorKind::Validation { .. } => 400,
            ErrorKind::Authentication { .. } => 401,
            ErrorKind::Authorization { .. } => 403,
            ErrorKind::NotFound { .. } => 404,
            ErrorKind::Generic { status, .. } => *status,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &str {
        match &self.kind {
            ErrorKind::Validation { .. } => "VALIDATION_ERROR",
            ErrorKind::Authentication { .. } => "AUTHENTICATION_ERROR",
            ErrorKind::Authorization { .. } => "AUTHORIZATION_ERROR",
            ErrorKind::NotFound { .. } => "RESOURCE_NOT_FOUND",
            ErrorKind::Generic { code, .. } => code,
        }
    }

    /// True for expected, client-caused failures.
    pub fn is_operational(&self) -> bool {
        match &self.kind {
            ErrorKind::Generic { operational, .. } => *operational,
            _ => true,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status() >= 500
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Renders the failure envelope for a request.
    ///
    /// Outside development, diagnostics are stripped and 5xx messages are
    /// replaced by a fixed text for the status.
    pub fn render(&self, mode: RuntimeMode, request: &RequestContext) -> ErrorBody {
        let status = self.status();
        let message = if status >= 500 && !mode.is_development() {
            generic_message(status).to_string()
        } else {
            self.message.clone()
        };

        let mut body = ErrorBody {
            success: false,
            message,
            error: self.code().to_string(),
            status_code: status,
            timestamp: self.timestamp,
            request_id: request.request_id.clone(),
            path: request.path.clone(),
            method: request.method.clone(),
            details: None,
            field: None,
            reason: None,
            hints: None,
            required_permission: None,
            required_role: None,
            suggestions: None,
            resource: None,
            resource_id: None,
            diagnostic: None,
        };

        match &self.kind {
            ErrorKind::Validation { details, field } => {
                body.details = Some(details.clone());
                body.field = field.clone();
            }
            ErrorKind::Authentication { reason, hints } => {
                body.reason = Some(*reason);
                body.hints = Some(hints.clone());
            }
            ErrorKind::Authorization {
                required_permission,
                required_role,
                suggestions,
            } => {
                body.required_permission = required_permission.clone();
                body.required_role = required_role.clone();
                body.suggestions = Some(suggestions.clone());
            }
            ErrorKind::NotFound {
                resource,
                resource_id,
                suggestions,
            } => {
                body.resource = Some(resource.clone());
                body.resource_id = resource_id.clone();
                body.suggestions = Some(suggestions.clone());
            }
            ErrorKind::Generic { .. } => {}
        }

        if mode.is_development() {
            body.diagnostic = self.diagnostic.clone();
        }

        body
    }
}

impl From<ValidationError> for CatalogError {
    fn from(violation: ValidationError) -> Self {
        CatalogError::from_violations("Validation failed", &[violation])
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        classify(&err)
    }
}

/// Fixed text that replaces 5xx messages outside development.
pub fn generic_message(status: u16) -> &'static str {
    match status {
        500 => "Internal server error",
        502 => "Bad gateway",
        503 => "Service temporarily unavailable",
        504 => "Gateway timeout",
        _ => "An unexpected error occurred",
    }
}

// =============================================================================
// Rendered Body
// =============================================================================

/// The failure envelope sent to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    /// The stable error code.
    pub error: String,
    pub status_code: u16,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    pub path: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<AuthFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

// =============================================================================
// Classification
// =============================================================================

/// Maps any error onto the taxonomy.
///
/// ## Classification Table
/// ```text
/// CatalogError / ValidationError  → passed through / wrapped as Validation
/// serde_json::Error (syntax, eof) → Validation "Malformed JSON in request body"
/// serde_json::Error (data)        → Validation "Request body has invalid structure"
/// ParseIntError / ParseFloatError → Validation "Invalid numeric value"
/// uuid::Error                     → Validation "Invalid identifier format"
/// chrono::ParseError              → Validation "Invalid date format"
/// anything else                   → Internal, source chain kept as diagnostic
/// ```
pub fn classify(err: &(dyn StdError + 'static)) -> CatalogError {
    if let Some(e) = err.downcast_ref::<CatalogError>() {
        return e.clone();
    }

    if let Some(e) = err.downcast_ref::<ValidationError>() {
        return CatalogError::from(e.clone());
    }

    if let Some(e) = err.downcast_ref::<serde_json::Error>() {
        use serde_json::error::Category as JsonCategory;
        return match e.classify() {
            JsonCategory::Syntax | JsonCategory::Eof => CatalogError::validation(
                "Malformed JSON in request body",
                vec![e.to_string()],
            )
            .with_field("body"),
            JsonCategory::Data => CatalogError::validation(
                "Request body has invalid structure",
                vec![e.to_string()],
            )
            .with_field("body"),
            JsonCategory::Io => CatalogError::internal("Failed to read request body")
                .with_diagnostic(source_chain(err)),
        };
    }

    if err.downcast_ref::<std::num::ParseIntError>().is_some()
        || err.downcast_ref::<std::num::ParseFloatError>().is_some()
    {
        return CatalogError::validation("Invalid numeric value", vec![err.to_string()]);
    }

    if err.downcast_ref::<uuid::Error>().is_some() {
        return CatalogError::validation("Invalid identifier format", vec![err.to_string()])
            .with_field("id");
    }

    if err.downcast_ref::<chrono::ParseError>().is_some() {
        return CatalogError::validation("Invalid date format", vec![err.to_string()]);
    }

    CatalogError::internal("An unexpected error occurred").with_diagnostic(source_chain(err))
}

/// Joins an error and its sources into one line.
fn source_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}

// =============================================================================
// Unit Tests
// =============================================================================
