//! # Store Error Types
//!
//! Error types for collection operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  StoreError (this module) ← lookup miss, id clash                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogError (catalog-core) ← status, code, kind-specific fields       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Error envelope rendered by catalog-api                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use catalog_core::CatalogError;
use thiserror::Error;

/// Collection operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Entity not found in the collection.
    ///
    /// ## When This Occurs
    /// - Unknown id on get/update/delete
    /// - Id deleted by an earlier request
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Uniqueness violation.
    ///
    /// ## When This Occurs
    /// - Loading a catalog that repeats an id
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Internal store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Convert store errors into the service taxonomy.
///
/// ## Error Mapping
/// ```text
/// StoreError::NotFound   → 404 RESOURCE_NOT_FOUND (resource = entity)
/// StoreError::Duplicate  → 409 CONFLICT
/// StoreError::Internal   → 500 INTERNAL_ERROR
/// ```
impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => {
                CatalogError::not_found(&entity, Some(id.as_str()))
            }
            StoreError::Duplicate { .. } => {
                CatalogError::generic(409, "CONFLICT", err.to_string(), true)
            }
            StoreError::Internal(detail) => {
                CatalogError::internal("Store operation failed").with_diagnostic(detail)
            }
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err: CatalogError = StoreError::not_found("Product", "abc").into();
        assert_eq!(err.status(), 404);
        assert_eq!(err.code(), "RESOURCE_NOT_FOUND");
        assert_eq!(err.message, "Product with id 'abc' not found");
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err: CatalogError = StoreError::duplicate("id", "abc").into();
        assert_eq!(err.status(), 409);
        assert_eq!(err.code(), "CONFLICT");
        assert!(err.is_operational());
        assert_eq!(err.message, "Duplicate id: 'abc' already exists");
    }

    #[test]
    fn test_internal_keeps_detail_as_diagnostic() {
        let err: CatalogError = StoreError::Internal("lock poisoned".to_string()).into();
        assert_eq!(err.status(), 500);
        assert_eq!(err.diagnostic.as_deref(), Some("lock poisoned"));
    }
}
