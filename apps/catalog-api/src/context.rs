//! Request extractors.
//!
//! Every extractor rejection is mapped into the error taxonomy so the
//! boundary can render and record it like any other failure.

use std::convert::Infallible;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, Uri};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::HandlerError;
use catalog_core::query::QueryParams;
use catalog_core::{CatalogError, RequestContext};

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds the context echoed in every envelope.
pub fn request_context(headers: &HeaderMap, uri: &Uri, method: &Method) -> RequestContext {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    RequestContext::new(request_id, uri.path(), method.as_str())
}

// =============================================================================
// Ctx
// =============================================================================

/// The current request's [`RequestContext`].
#[derive(Debug, Clone)]
pub struct Ctx(pub RequestContext);

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Ctx(request_context(&parts.headers, &parts.uri, &parts.method)))
    }
}

// =============================================================================
// CatalogQuery
// =============================================================================

/// Query string as ordered pairs. Repeated keys are kept.
#[derive(Debug, Clone)]
pub struct CatalogQuery(pub QueryParams);

impl<S> FromRequestParts<S> for CatalogQuery
where
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                CatalogError::validation("Invalid query string", vec![rejection.body_text()])
                    .with_field("query")
            })?;

        Ok(CatalogQuery(QueryParams::from(pairs)))
    }
}

// =============================================================================
// ValidJson
// =============================================================================

/// JSON body whose rejections become Validation errors.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(json_rejection(rejection).into()),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> CatalogError {
    match rejection {
        JsonRejection::JsonSyntaxError(e) => {
            CatalogError::validation("Malformed JSON in request body", vec![e.body_text()])
                .with_field("body")
        }
        JsonRejection::JsonDataError(e) => {
            CatalogError::validation("Request body has invalid structure", vec![e.body_text()])
                .with_field("body")
        }
        JsonRejection::MissingJsonContentType(e) => {
            CatalogError::generic(415, "UNSUPPORTED_MEDIA_TYPE", e.body_text(), true)
        }
        other => {
            let status = other.status();
            let code = if status.as_u16() == 413 {
                "PAYLOAD_TOO_LARGE"
            } else {
                "BAD_REQUEST"
            };
            CatalogError::generic(status.as_u16(), code, other.body_text(), true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        #[allow(dead_code)]
        name: String,
    }

    fn json_request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/api/products");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[test]
    fn test_request_context_reads_id_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, "abc".parse().unwrap());
        let uri: Uri = "/api/products?page=2".parse().unwrap();

        let ctx = request_context(&headers, &uri, &Method::GET);
        assert_eq!(ctx, RequestContext::new("abc", "/api/products", "GET"));

        let ctx = request_context(&HeaderMap::new(), &uri, &Method::GET);
        assert_eq!(ctx.request_id, "");
    }

    #[tokio::test]
    async fn test_query_keeps_repeated_keys() {
        let req = Request::builder()
            .uri("/api/products?category=books&category=toys&page=2")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = req.into_parts();

        let CatalogQuery(params) = CatalogQuery::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(params.get_all("category"), vec!["books", "toys"]);
        assert_eq!(params.get("page"), Some("2"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation() {
        let req = json_request(Some("application/json"), "{ not json");
        let HandlerError(err) = ValidJson::<Named>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), 400);
        assert_eq!(err.message, "Malformed JSON in request body");
    }

    #[tokio::test]
    async fn test_wrong_shape_is_validation() {
        let req = json_request(Some("application/json"), "[1, 2]");
        let HandlerError(err) = ValidJson::<Named>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), 400);
        assert_eq!(err.message, "Request body has invalid structure");
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let req = json_request(None, r#"{"name": "x"}"#);
        let HandlerError(err) = ValidJson::<Named>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), 415);
        assert_eq!(err.code(), "UNSUPPORTED_MEDIA_TYPE");
    }
}
