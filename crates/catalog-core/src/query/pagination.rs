//! Page/limit parsing and slicing.

use serde::Serialize;
use ts_rs::TS;

use super::params::{ParamValue, QueryParams};
use crate::error::{CatalogError, CatalogResult, ValidationError};
use crate::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Pagination metadata returned alongside a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: usize,
    pub items_per_page: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
}

impl Pagination {
    /// Parses `page` and `limit`.
    ///
    /// ## Rules
    /// ```text
    /// absent or non-numeric  → default (page 1, limit 10)
    /// page < 1               → error
    /// limit outside 1..=100  → error
    /// ```
    pub fn parse(raw: &QueryParams) -> CatalogResult<Self> {
        let mut violations = Vec::new();

        let page = match raw.number::<i64>("page") {
            ParamValue::Missing | ParamValue::Malformed(_) => DEFAULT_PAGE,
            ParamValue::Number(n) if n < 1 => {
                violations.push(ValidationError::BelowMinimum {
                    field: "page".to_string(),
                    min: 1,
                });
                DEFAULT_PAGE
            }
            // Pages past u32::MAX are simply empty.
            ParamValue::Number(n) => u32::try_from(n).unwrap_or(u32::MAX),
        };

        let limit = match raw.number::<i64>("limit") {
            ParamValue::Missing | ParamValue::Malformed(_) => DEFAULT_LIMIT,
            ParamValue::Number(n) if (1..=i64::from(MAX_LIMIT)).contains(&n) => n as u32,
            ParamValue::Number(_) => {
                violations.push(ValidationError::OutOfRange {
                    field: "limit".to_string(),
                    min: 1.0,
                    max: f64::from(MAX_LIMIT),
                });
                DEFAULT_LIMIT
            }
        };

        if !violations.is_empty() {
            return Err(CatalogError::from_violations(
                "Invalid pagination parameters",
                &violations,
            ));
        }

        Ok(Pagination { page, limit })
    }

    /// Number of items skipped before this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }

    /// Builds the metadata for a result set of `total_items`.
    pub fn meta(&self, total_items: usize) -> PageMeta {
        let limit = self.limit as usize;
        let total_pages = u32::try_from(total_items.div_ceil(limit)).unwrap_or(u32::MAX);
        let has_next_page = self.page < total_pages;
        let has_prev_page = self.page > 1;

        PageMeta {
            current_page: self.page,
            total_pages,
            total_items,
            items_per_page: self.limit,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then(|| self.page + 1),
            prev_page: has_prev_page.then(|| self.page - 1),
        }
    }

    /// Slices one page out of `items`. A page past the end is empty.
    pub fn apply<T: Clone>(&self, items: &[T]) -> (Vec<T>, PageMeta) {
        let page = items
            .iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .cloned()
            .collect();
        (page, self.meta(items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pairs: &[(&str, &str)]) -> CatalogResult<Pagination> {
        Pagination::parse(&QueryParams::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_defaults_when_absent() {
        assert_eq!(parse(&[]).unwrap(), Pagination { page: 1, limit: 10 });
    }

    #[test]
    fn test_malformed_values_fall_back_to_defaults() {
        let p = parse(&[("page", "abc"), ("limit", "")]).unwrap();
        assert_eq!(p, Pagination::default());
    }

    #[test]
    fn test_out_of_range_numbers_fail() {
        assert!(parse(&[("page", "0")]).is_err());
        assert!(parse(&[("page", "-3")]).is_err());
        assert!(parse(&[("limit", "0")]).is_err());
        assert!(parse(&[("limit", "101")]).is_err());
        assert!(parse(&[("limit", "100")]).is_ok());
    }

    #[test]
    fn test_error_lists_both_violations() {
        let err = parse(&[("page", "0"), ("limit", "500")]).unwrap_err();
        match err.kind {
            crate::error::ErrorKind::Validation { details, field } => {
                assert_eq!(details.len(), 2);
                assert_eq!(field.as_deref(), Some("page"));
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_apply_slices_and_builds_meta() {
        let items: Vec<u32> = (1..=25).collect();
        let pagination = Pagination { page: 3, limit: 10 };
        let (page, meta) = pagination.apply(&items);

        assert_eq!(page, vec![21, 22, 23, 24, 25]);
        assert_eq!(meta.total_pages, 3);
        assert!(!meta.has_next_page);
        assert!(meta.has_prev_page);
        assert_eq!(meta.prev_page, Some(2));
        assert_eq!(meta.next_page, None);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let items = vec![1, 2, 3];
        let (page, meta) = Pagination { page: 9, limit: 2 }.apply(&items);
        assert!(page.is_empty());
        assert_eq!(meta.total_pages, 2);
        assert_eq!(meta.current_page, 9);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn test_empty_input() {
        let (page, meta) = Pagination::default().apply::<u8>(&[]);
        assert!(page.is_empty());
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_prev_page);
    }
}
