//! Product handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::context::{CatalogQuery, Ctx, ValidJson};
use crate::error::HandlerResult;
use crate::AppState;
use catalog_core::query::{AppliedQuery, PageMeta, ProductQuery, QueryParams};
use catalog_core::response::{messages, Envelope};
use catalog_core::validation::{validate_draft, validate_patch, validate_product_id};
use catalog_core::{ApiResponse, Product, ProductDraft, ProductPatch, RequestContext};

/// Meta attached to list and search responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListMeta<'a> {
    pagination: PageMeta,
    #[serde(flatten)]
    applied: AppliedQuery<'a>,
}

async fn run_query(
    state: &AppState,
    ctx: &RequestContext,
    raw: &QueryParams,
    require_search: bool,
    message: &str,
) -> HandlerResult<Json<Envelope<Vec<Product>>>> {
    let mut query = ProductQuery::parse(raw)?;
    if require_search {
        query = query.require_search()?;
    }

    let products = state.store.snapshot().await;
    let page = query.run(&products);

    let meta = ListMeta {
        pagination: page.meta,
        applied: query.applied(),
    };

    Ok(Json(
        ApiResponse::ok(page.items)
            .with_meta(meta)
            .with_message(message)
            .finish(ctx),
    ))
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    CatalogQuery(raw): CatalogQuery,
) -> HandlerResult<Json<Envelope<Vec<Product>>>> {
    run_query(&state, &ctx, &raw, false, messages::PRODUCTS_RETRIEVED).await
}

/// GET /api/products/search
pub async fn search_products(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    CatalogQuery(raw): CatalogQuery,
) -> HandlerResult<Json<Envelope<Vec<Product>>>> {
    run_query(&state, &ctx, &raw, true, messages::SEARCH_COMPLETED).await
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<String>,
) -> HandlerResult<Json<Envelope<Product>>> {
    validate_product_id(&id)?;
    let product = state.store.get(&id).await?;

    Ok(Json(
        ApiResponse::ok(product)
            .with_message(messages::PRODUCT_RETRIEVED)
            .finish(&ctx),
    ))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    ValidJson(draft): ValidJson<ProductDraft>,
) -> HandlerResult<(StatusCode, Json<Envelope<Product>>)> {
    let new_product = validate_draft(draft)?;
    let product = state.store.insert(new_product).await;
    info!(id = %product.id, name = %product.name, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(product)
                .with_message(messages::PRODUCT_CREATED)
                .finish(&ctx),
        ),
    ))
}

/// PUT /api/products/{id}
///
/// Partial: absent fields are left untouched.
pub async fn update_product(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<String>,
    ValidJson(patch): ValidJson<ProductPatch>,
) -> HandlerResult<Json<Envelope<Product>>> {
    validate_product_id(&id)?;
    let changes = validate_patch(patch)?;
    let product = state.store.update(&id, changes).await?;
    info!(id = %product.id, "Product updated");

    Ok(Json(
        ApiResponse::ok(product)
            .with_message(messages::PRODUCT_UPDATED)
            .finish(&ctx),
    ))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<String>,
) -> HandlerResult<Json<Envelope<Product>>> {
    validate_product_id(&id)?;
    let product = state.store.delete(&id).await?;
    info!(id = %product.id, "Product deleted");

    Ok(Json(
        ApiResponse::ok(product)
            .with_message(messages::PRODUCT_DELETED)
            .finish(&ctx),
    ))
}

