//! API key authentication.
//!
//! Reads never need a key. Mutations need a key whose role is high enough:
//!
//! ```text
//! GET / HEAD / OPTIONS   → open
//! POST / PUT / PATCH     → editor
//! DELETE                 → admin
//! ```
//!
//! With no keys configured the check is skipped entirely.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ApiKeyConfig;
use crate::error::HandlerError;
use crate::AppState;
use catalog_core::error::AuthFailure;
use catalog_core::{CatalogError, CatalogResult};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Access level granted by a key. Ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Editor,
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Admin => "admin",
        }
    }

    /// Role needed to call a route with `method`, if any.
    pub fn required_for(method: &Method) -> Option<Role> {
        match *method {
            Method::GET | Method::HEAD | Method::OPTIONS => None,
            Method::DELETE => Some(Role::Admin),
            _ => Some(Role::Editor),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// The configured keys.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: HashMap<String, Role>,
}

impl ApiKeys {
    pub fn from_config(entries: &[ApiKeyConfig]) -> Self {
        ApiKeys {
            keys: entries
                .iter()
                .map(|entry| (entry.key.clone(), entry.role))
                .collect(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn role_of(&self, key: &str) -> Option<Role> {
        self.keys.get(key).copied()
    }

    /// Decides whether a request with `method` and `key` may proceed.
    ///
    /// ## Returns
    /// * `Ok(())` - allowed
    /// * `Err(Authentication)` - key missing or unknown
    /// * `Err(Authorization)` - key known but its role is too low
    pub fn authorize(&self, method: &Method, key: Option<&str>) -> CatalogResult<()> {
        if self.is_disabled() {
            return Ok(());
        }

        let Some(required) = Role::required_for(method) else {
            return Ok(());
        };

        let key = key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CatalogError::authentication(AuthFailure::Missing))?;

        let role = self
            .role_of(key)
            .ok_or_else(|| CatalogError::authentication(AuthFailure::Invalid))?;

        if role < required {
            debug!(%role, %required, "API key role too low");
            return Err(CatalogError::authorization(Some(required.as_str()), None));
        }

        Ok(())
    }
}

/// Middleware rejecting requests whose key does not grant the needed role.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match state.keys.authorize(request.method(), key) {
        Ok(()) => next.run(request).await,
        Err(err) => HandlerError::from(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> ApiKeys {
        ApiKeys::from_config(&[
            ApiKeyConfig { key: "view".into(), role: Role::Viewer },
            ApiKeyConfig { key: "edit".into(), role: Role::Editor },
            ApiKeyConfig { key: "root".into(), role: Role::Admin },
        ])
    }

    #[test]
    fn test_role_order() {
        assert!(Role::Viewer < Role::Editor);
        assert!(Role::Editor < Role::Admin);
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_reads_are_open() {
        assert!(keys().authorize(&Method::GET, None).is_ok());
        assert!(keys().authorize(&Method::OPTIONS, None).is_ok());
    }

    #[test]
    fn test_missing_and_invalid_keys() {
        let err = keys().authorize(&Method::POST, None).unwrap_err();
        assert_eq!(err.status(), 401);
        assert_eq!(err.message, "Authentication required");

        let err = keys().authorize(&Method::POST, Some("nope")).unwrap_err();
        assert_eq!(err.status(), 401);
        assert_eq!(err.message, "Invalid API key");
    }

    #[test]
    fn test_role_too_low() {
        let err = keys().authorize(&Method::PUT, Some("view")).unwrap_err();
        assert_eq!(err.status(), 403);

        let err = keys().authorize(&Method::DELETE, Some("edit")).unwrap_err();
        assert_eq!(err.status(), 403);

        assert!(keys().authorize(&Method::POST, Some("edit")).is_ok());
        assert!(keys().authorize(&Method::DELETE, Some("root")).is_ok());
    }

    #[test]
    fn test_no_keys_disables_auth() {
        let keys = ApiKeys::default();
        assert!(keys.is_disabled());
        assert!(keys.authorize(&Method::DELETE, None).is_ok());
    }
}
