//! # Query Processing
//!
//! Turns raw query-string input into a validated [`ProductQuery`] and runs
//! it over a product collection.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  QueryParams ──► parse ──► ProductQuery                                 │
//! │                    │                                                    │
//! │                    └── any invalid parameter → Validation error         │
//! │                                                                         │
//! │  ProductQuery::run(&[Product])                                          │
//! │                                                                         │
//! │    filter ──► search ──► sort ──► paginate ──► Page { items, meta }     │
//! │                                                                         │
//! │  Each stage works on its own copy; the input slice is never touched.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod filter;
mod pagination;
mod params;
mod search;
mod sort;

#[cfg(test)]
mod strategies;

pub use filter::FilterSet;
pub use pagination::{PageMeta, Pagination};
pub use params::{ParamValue, QueryParams};
pub use search::{SearchSpec, DEFAULT_SEARCH_FIELDS, SEARCHABLE_FIELDS};
pub use sort::{SortField, SortOrder, SortSpec};

use serde::Serialize;

use crate::error::{CatalogError, CatalogResult, ValidationError};
use crate::types::Product;

/// One page of results plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// A fully validated list query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub pagination: Pagination,
    pub filters: FilterSet,
    pub search: Option<SearchSpec>,
    pub sort: SortSpec,
}

/// Echo of what a list query applied, for response metadata.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedQuery<'a> {
    pub filters: &'a FilterSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<&'a SearchSpec>,
    pub sort: &'a SortSpec,
}

impl ProductQuery {
    /// Parses every query parameter. Returns the first failing group.
    pub fn parse(raw: &QueryParams) -> CatalogResult<Self> {
        Ok(ProductQuery {
            pagination: Pagination::parse(raw)?,
            filters: FilterSet::parse(raw)?,
            search: SearchSpec::parse(raw)?,
            sort: SortSpec::parse(raw)?,
        })
    }

    /// Rejects a query without a search term.
    pub fn require_search(self) -> CatalogResult<Self> {
        if self.search.is_none() {
            return Err(CatalogError::from_violations(
                "Search term is required",
                &[ValidationError::Required {
                    field: "q".to_string(),
                }],
            ));
        }
        Ok(self)
    }

    /// Applies filter → search → sort → paginate.
    pub fn run(&self, products: &[Product]) -> Page<Product> {
        let mut matched = self.filters.apply(products);
        if let Some(search) = &self.search {
            matched = search.apply(matched);
        }
        let sorted = self.sort.apply(matched);
        let (items, meta) = self.pagination.apply(&sorted);
        Page { items, meta }
    }

    pub fn applied(&self) -> AppliedQuery<'_> {
        AppliedQuery {
            filters: &self.filters,
            search: self.search.as_ref(),
            sort: &self.sort,
        }
    }
}
