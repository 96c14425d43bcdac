//! Catalog statistics handlers.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::context::{CatalogQuery, Ctx};
use crate::error::HandlerResult;
use crate::AppState;
use catalog_core::response::{messages, Envelope};
use catalog_core::stats::{
    self, SectionData, StatsFormat, StatsQuery, StatsReport, StatsSection, StatsSummary,
};
use catalog_core::{ApiResponse, CatalogError, Category};

/// Body of a stats response.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatsPayload {
    Report(StatsReport),
    Section(SectionData),
    Summary(StatsSummary),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsMeta {
    format: &'static str,
    detailed: bool,
    categories: Vec<Category>,
    product_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    section: Option<&'static str>,
}

impl StatsMeta {
    fn new(query: &StatsQuery, product_count: usize, section: Option<StatsSection>) -> Self {
        StatsMeta {
            format: match query.format {
                StatsFormat::Json => "json",
                StatsFormat::Summary => "summary",
            },
            detailed: query.detailed,
            categories: query.categories.clone(),
            product_count,
            section: section.map(|s| s.as_str()),
        }
    }
}

/// GET /api/products/stats
///
/// `format=summary` returns the compact form instead of the full report.
pub async fn get_stats(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    CatalogQuery(raw): CatalogQuery,
) -> HandlerResult<Json<Envelope<StatsPayload>>> {
    let query = StatsQuery::parse(&raw)?;
    let products = query.select(&state.store.snapshot().await);

    let data = match query.format {
        StatsFormat::Json => {
            StatsPayload::Report(StatsReport::compute(&products, query.detailed, Utc::now()))
        }
        StatsFormat::Summary => StatsPayload::Summary(stats::summary(&products)),
    };

    Ok(Json(
        ApiResponse::ok(data)
            .with_meta(StatsMeta::new(&query, products.len(), None))
            .with_message(messages::STATS_RETRIEVED)
            .finish(&ctx),
    ))
}

/// GET /api/products/stats/{section}
///
/// Unknown sections are a 404. `format` is validated but always yields the
/// section itself.
pub async fn get_stats_section(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(name): Path<String>,
    CatalogQuery(raw): CatalogQuery,
) -> HandlerResult<Json<Envelope<StatsPayload>>> {
    let section = StatsSection::parse(&name)
        .ok_or_else(|| CatalogError::not_found("Stats section", Some(name.as_str())))?;

    let query = StatsQuery::parse(&raw)?;
    let products = query.select(&state.store.snapshot().await);
    let data = stats::section(&products, section, query.detailed, Utc::now());

    Ok(Json(
        ApiResponse::ok(StatsPayload::Section(data))
            .with_meta(StatsMeta::new(&query, products.len(), Some(section)))
            .with_message(messages::STATS_RETRIEVED)
            .finish(&ctx),
    ))
}
