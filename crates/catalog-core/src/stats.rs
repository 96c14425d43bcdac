//! # Statistics
//!
//! Aggregate views over a product collection.
//!
//! ## Views
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  overview    totals, stock split, value, average, category count        │
//! │  categories  per-category counts, value and price range                 │
//! │  pricing     min/max/avg/median, quartile buckets, histogram            │
//! │  inventory   priciest/cheapest in stock, stock per category             │
//! │  trends      recent additions/updates (30 days before `now`)            │
//! │                                                                         │
//! │  Empty input never fails: every ratio and bound resolves to 0.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sums use integer cents; averages and percentages are rounded to two
//! decimals only at the end.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{CatalogError, CatalogResult, ValidationError};
use crate::money::Money;
use crate::query::{FilterSet, QueryParams};
use crate::types::{Category, Product, ProductSummary};

/// Window used by the trends view.
pub const TREND_PERIOD_DAYS: i64 = 30;

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100`, rounded; 0 when `whole` is 0.
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}

/// Mean price in dollars, rounded; 0 for no items.
fn average(total: Money, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round2(total.as_decimal() / count as f64)
}

// =============================================================================
// Overview
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_products: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    pub stock_percentage: f64,
    pub total_value: Money,
    pub average_price: f64,
    pub categories: usize,
}

pub fn overview(products: &[Product]) -> Overview {
    let total = products.len();
    let in_stock = products.iter().filter(|p| p.in_stock).count();
    let total_value: Money = products.iter().map(|p| p.price).sum();

    let mut distinct: Vec<Category> = products.iter().map(|p| p.category).collect();
    distinct.sort();
    distinct.dedup();

    Overview {
        total_products: total,
        in_stock,
        out_of_stock: total - in_stock,
        stock_percentage: percentage(in_stock, total),
        total_value,
        average_price: average(total_value, total),
        categories: distinct.len(),
    }
}

// =============================================================================
// By Category
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub count: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    pub total_value: Money,
    pub average_price: f64,
    /// Zero when the category has no products.
    pub min_price: Money,
    pub max_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductSummary>>,
}

/// Stats for every category, including empty ones.
///
/// Product summaries are embedded only when `detailed` is set.
pub fn by_category(products: &[Product], detailed: bool) -> BTreeMap<Category, CategoryStats> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let members: Vec<&Product> =
                products.iter().filter(|p| p.category == category).collect();
            let in_stock = members.iter().filter(|p| p.in_stock).count();
            let total_value: Money = members.iter().map(|p| p.price).sum();

            let stats = CategoryStats {
                count: members.len(),
                in_stock,
                out_of_stock: members.len() - in_stock,
                total_value,
                average_price: average(total_value, members.len()),
                min_price: members.iter().map(|p| p.price).min().unwrap_or_default(),
                max_price: members.iter().map(|p| p.price).max().unwrap_or_default(),
                products: detailed.then(|| members.iter().map(|p| p.summary()).collect()),
            };
            (category, stats)
        })
        .collect()
}

// =============================================================================
// Pricing
// =============================================================================

/// One quartile bucket. Bounds are `None` where the bucket is open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBucket {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDistribution {
    /// price < Q1
    pub low: PriceBucket,
    /// Q1 <= price < median
    pub lower_mid: PriceBucket,
    /// median <= price < Q3
    pub upper_mid: PriceBucket,
    /// price >= Q3
    pub high: PriceBucket,
}

/// Fixed-width price ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceHistogram {
    #[serde(rename = "under25")]
    pub under_25: usize,
    #[serde(rename = "25to50")]
    pub from_25_to_50: usize,
    #[serde(rename = "50to100")]
    pub from_50_to_100: usize,
    #[serde(rename = "100to500")]
    pub from_100_to_500: usize,
    #[serde(rename = "500to1000")]
    pub from_500_to_1000: usize,
    #[serde(rename = "over1000")]
    pub over_1000: usize,
}

impl PriceHistogram {
    fn add(&mut self, price: Money) {
        match price.cents() {
            c if c < 2_500 => self.under_25 += 1,
            c if c < 5_000 => self.from_25_to_50 += 1,
            c if c < 10_000 => self.from_50_to_100 += 1,
            c if c < 50_000 => self.from_100_to_500 += 1,
            c if c < 100_000 => self.from_500_to_1000 += 1,
            _ => self.over_1000 += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub min: Money,
    pub max: Money,
    pub average: f64,
    pub median: f64,
    pub q1: Money,
    pub q3: Money,
    pub distribution: PriceDistribution,
    pub histogram: PriceHistogram,
}

/// Price statistics.
///
/// Quartiles are taken by index: `Q1 = sorted[floor(n * 0.25)]`,
/// `Q3 = sorted[floor(n * 0.75)]`. The median of an even count is the mean
/// of the two middle prices.
pub fn pricing(products: &[Product]) -> Pricing {
    let mut prices: Vec<Money> = products.iter().map(|p| p.price).collect();
    prices.sort();

    let n = prices.len();
    let at = |index: usize| prices.get(index).copied().unwrap_or_default();

    let median = match n {
        0 => 0.0,
        n if n % 2 == 0 => round2((at(n / 2 - 1).as_decimal() + at(n / 2).as_decimal()) / 2.0),
        n => at(n / 2).as_decimal(),
    };
    let q1 = at(n / 4);
    let q3 = at(n * 3 / 4);

    let bucket = |lower: Option<f64>, upper: Option<f64>| PriceBucket {
        count: prices
            .iter()
            .map(Money::as_decimal)
            .filter(|p| lower.map_or(true, |lo| *p >= lo) && upper.map_or(true, |hi| *p < hi))
            .count(),
        min: lower,
        max: upper,
    };
    let distribution = PriceDistribution {
        low: bucket(None, Some(q1.as_decimal())),
        lower_mid: bucket(Some(q1.as_decimal()), Some(median)),
        upper_mid: bucket(Some(median), Some(q3.as_decimal())),
        high: bucket(Some(q3.as_decimal()), None),
    };

    let mut histogram = PriceHistogram::default();
    for price in &prices {
        histogram.add(*price);
    }

    let total: Money = prices.iter().sum();

    Pricing {
        min: prices.first().copied().unwrap_or_default(),
        max: prices.last().copied().unwrap_or_default(),
        average: average(total, n),
        median,
        q1,
        q3,
        distribution,
        histogram,
    }
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCount {
    pub in_stock: usize,
    pub out_of_stock: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub total_in_stock: usize,
    pub total_out_of_stock: usize,
    pub most_expensive_in_stock: Option<ProductSummary>,
    pub least_expensive_in_stock: Option<ProductSummary>,
    pub stock_by_category: BTreeMap<Category, StockCount>,
}

/// Stock view. On price ties the first product found wins.
pub fn inventory(products: &[Product]) -> Inventory {
    let mut most: Option<&Product> = None;
    let mut least: Option<&Product> = None;
    let mut stock_by_category: BTreeMap<Category, StockCount> = Category::ALL
        .into_iter()
        .map(|c| (c, StockCount::default()))
        .collect();

    for product in products {
        let entry = stock_by_category.entry(product.category).or_default();
        if !product.in_stock {
            entry.out_of_stock += 1;
            continue;
        }
        entry.in_stock += 1;

        if most.map_or(true, |m| product.price > m.price) {
            most = Some(product);
        }
        if least.map_or(true, |l| product.price < l.price) {
            least = Some(product);
        }
    }

    let total_in_stock = products.iter().filter(|p| p.in_stock).count();

    Inventory {
        total_in_stock,
        total_out_of_stock: products.len() - total_in_stock,
        most_expensive_in_stock: most.map(Product::summary),
        least_expensive_in_stock: least.map(Product::summary),
        stock_by_category,
    }
}

// =============================================================================
// Trends
// =============================================================================

/// Recent activity. Price trend and growth are not tracked historically.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub recently_added: usize,
    pub recently_updated: usize,
    pub period: String,
    pub price_trend: String,
    pub growth_rate: f64,
}

pub fn trends(products: &[Product], now: DateTime<Utc>) -> Trends {
    let since = now - Duration::days(TREND_PERIOD_DAYS);

    Trends {
        recently_added: products.iter().filter(|p| p.created_at >= since).count(),
        recently_updated: products.iter().filter(|p| p.updated_at >= since).count(),
        period: format!("{}d", TREND_PERIOD_DAYS),
        price_trend: "stable".to_string(),
        growth_rate: 0.0,
    }
}

// =============================================================================
// Report
// =============================================================================

/// Every view at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub overview: Overview,
    pub categories: BTreeMap<Category, CategoryStats>,
    pub pricing: Pricing,
    pub inventory: Inventory,
    pub trends: Trends,
}

impl StatsReport {
    pub fn compute(products: &[Product], detailed: bool, now: DateTime<Utc>) -> Self {
        StatsReport {
            overview: overview(products),
            categories: by_category(products, detailed),
            pricing: pricing(products),
            inventory: inventory(products),
            trends: trends(products, now),
        }
    }
}

/// A single stats view, addressed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsSection {
    Overview,
    Categories,
    Pricing,
    Inventory,
    Trends,
}

impl StatsSection {
    pub const ALL: [StatsSection; 5] = [
        StatsSection::Overview,
        StatsSection::Categories,
        StatsSection::Pricing,
        StatsSection::Inventory,
        StatsSection::Trends,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            StatsSection::Overview => "overview",
            StatsSection::Categories => "categories",
            StatsSection::Pricing => "pricing",
            StatsSection::Inventory => "inventory",
            StatsSection::Trends => "trends",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        StatsSection::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for StatsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The data of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionData {
    Overview(Overview),
    Categories(BTreeMap<Category, CategoryStats>),
    Pricing(Pricing),
    Inventory(Inventory),
    Trends(Trends),
}

/// Computes only the requested view.
pub fn section(
    products: &[Product],
    section: StatsSection,
    detailed: bool,
    now: DateTime<Utc>,
) -> SectionData {
    match section {
        StatsSection::Overview => SectionData::Overview(overview(products)),
        StatsSection::Categories => SectionData::Categories(by_category(products, detailed)),
        StatsSection::Pricing => SectionData::Pricing(pricing(products)),
        StatsSection::Inventory => SectionData::Inventory(inventory(products)),
        StatsSection::Trends => SectionData::Trends(trends(products, now)),
    }
}

// =============================================================================
// Summary Format
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

/// Compact one-object form returned for `format=summary`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_products: usize,
    pub in_stock: usize,
    pub stock_percentage: f64,
    pub average_price: f64,
    pub price_range: PriceRange,
    /// Category with most products; ties go to the earlier category.
    pub top_category: Option<Category>,
}

pub fn summary(products: &[Product]) -> StatsSummary {
    let overview = overview(products);

    let mut top: Option<(Category, usize)> = None;
    for category in Category::ALL {
        let count = products.iter().filter(|p| p.category == category).count();
        if count > 0 && top.map_or(true, |(_, best)| count > best) {
            top = Some((category, count));
        }
    }

    StatsSummary {
        total_products: overview.total_products,
        in_stock: overview.in_stock,
        stock_percentage: overview.stock_percentage,
        average_price: overview.average_price,
        price_range: PriceRange {
            min: products.iter().map(|p| p.price).min().unwrap_or_default(),
            max: products.iter().map(|p| p.price).max().unwrap_or_default(),
        },
        top_category: top.map(|(category, _)| category),
    }
}

// =============================================================================
// Stats Query
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatsFormat {
    #[default]
    Json,
    Summary,
}

impl FromStr for StatsFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(StatsFormat::Json),
            "summary" => Ok(StatsFormat::Summary),
            _ => Err(ValidationError::NotAllowed {
                field: "format".to_string(),
                allowed: vec!["json".to_string(), "summary".to_string()],
            }),
        }
    }
}

/// Parameters accepted by the stats routes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsQuery {
    pub categories: Vec<Category>,
    pub format: StatsFormat,
    pub detailed: bool,
}

impl StatsQuery {
    /// Parses `category`, `format` and `detailed`.
    pub fn parse(raw: &QueryParams) -> CatalogResult<Self> {
        let categories = FilterSet::parse_categories(raw)?;

        let mut violations = Vec::new();

        let format = match raw.get("format") {
            None => StatsFormat::Json,
            Some(value) => value.parse().unwrap_or_else(|violation| {
                violations.push(violation);
                StatsFormat::Json
            }),
        };

        let detailed = match raw.get("detailed") {
            None | Some("false") => false,
            Some("true") => true,
            Some(_) => {
                violations.push(ValidationError::NotAllowed {
                    field: "detailed".to_string(),
                    allowed: vec!["true".to_string(), "false".to_string()],
                });
                false
            }
        };

        if !violations.is_empty() {
            return Err(CatalogError::from_violations(
                "Invalid statistics parameters",
                &violations,
            ));
        }

        Ok(StatsQuery {
            categories,
            format,
            detailed,
        })
    }

    /// Restricts the input to the requested categories.
    pub fn select(&self, products: &[Product]) -> Vec<Product> {
        products
            .iter()
            .filter(|p| self.categories.is_empty() || self.categories.contains(&p.category))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn product(name: &str, cents: i64, category: Category, in_stock: bool) -> Product {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Product {
            id: name.to_lowercase(),
            name: name.to_string(),
            description: "d".to_string(),
            price: Money::from_cents(cents),
            category,
            in_stock,
            created_at: at,
            updated_at: at,
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product("Lamp", 3000, Category::Electronics, true),
            product("Cable", 1000, Category::Electronics, false),
            product("Novel", 2000, Category::Books, true),
        ]
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_overview() {
        let o = overview(&sample());
        assert_eq!(o.total_products, 3);
        assert_eq!(o.in_stock, 2);
        assert_eq!(o.out_of_stock, 1);
        assert_eq!(o.stock_percentage, 66.67);
        assert_eq!(o.total_value.cents(), 6000);
        assert_eq!(o.average_price, 20.0);
        assert_eq!(o.categories, 2);
    }

    #[test]
    fn test_empty_input_never_fails() {
        let o = overview(&[]);
        assert_eq!(o.stock_percentage, 0.0);
        assert_eq!(o.average_price, 0.0);

        let p = pricing(&[]);
        assert_eq!(p.min, Money::zero());
        assert_eq!(p.median, 0.0);

        let c = by_category(&[], false);
        assert_eq!(c.len(), 7);
        assert_eq!(c[&Category::Toys].min_price, Money::zero());
        assert_eq!(c[&Category::Toys].max_price, Money::zero());

        let i = inventory(&[]);
        assert!(i.most_expensive_in_stock.is_none());
    }

    #[test]
    fn test_by_category_detail_toggle() {
        let plain = by_category(&sample(), false);
        let electronics = &plain[&Category::Electronics];
        assert_eq!(electronics.count, 2);
        assert_eq!(electronics.min_price.cents(), 1000);
        assert_eq!(electronics.max_price.cents(), 3000);
        assert!(electronics.products.is_none());

        let detailed = by_category(&sample(), true);
        assert_eq!(detailed[&Category::Books].products.as_ref().unwrap().len(), 1);
        assert_eq!(detailed[&Category::Toys].products.as_ref().unwrap().len(), 0);
    }

    #[test]
    fn test_median_of_filtered_scenario() {
        let products = vec![
            product("A", 1000, Category::Other, true),
            product("B", 2000, Category::Other, true),
            product("C", 3000, Category::Other, true),
        ];
        let filtered: Vec<Product> = products
            .into_iter()
            .filter(|p| p.price >= Money::from_cents(1500))
            .collect();

        assert_eq!(pricing(&filtered).median, 25.0);
    }

    #[test]
    fn test_quartiles_by_index() {
        let products: Vec<Product> = [10_i64, 20, 30, 40, 50, 60, 70, 80]
            .iter()
            .map(|d| product(&d.to_string(), d * 100, Category::Other, true))
            .collect();
        let p = pricing(&products);

        // n = 8: Q1 = sorted[2], Q3 = sorted[6]
        assert_eq!(p.q1.cents(), 3000);
        assert_eq!(p.q3.cents(), 7000);
        assert_eq!(p.median, 45.0);
        assert_eq!(p.distribution.low.count, 2);
        assert_eq!(p.distribution.lower_mid.count, 2);
        assert_eq!(p.distribution.upper_mid.count, 2);
        assert_eq!(p.distribution.high.count, 2);
    }

    #[test]
    fn test_histogram_edges() {
        let products: Vec<Product> = [2499_i64, 2500, 5000, 9999, 10000, 50000, 100000]
            .iter()
            .map(|c| product(&c.to_string(), *c, Category::Other, true))
            .collect();
        let h = pricing(&products).histogram;

        assert_eq!(h.under_25, 1);
        assert_eq!(h.from_25_to_50, 1);
        assert_eq!(h.from_50_to_100, 2);
        assert_eq!(h.from_100_to_500, 1);
        assert_eq!(h.from_500_to_1000, 1);
        assert_eq!(h.over_1000, 1);

        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["25to50"], 1);
        assert_eq!(json["over1000"], 1);
    }

    #[test]
    fn test_inventory_first_found_wins_ties() {
        let products = vec![
            product("First", 500, Category::Toys, true),
            product("Second", 500, Category::Toys, true),
            product("Hidden", 9000, Category::Toys, false),
        ];
        let i = inventory(&products);

        assert_eq!(i.most_expensive_in_stock.unwrap().name, "First");
        assert_eq!(i.least_expensive_in_stock.unwrap().name, "First");
        assert_eq!(i.stock_by_category[&Category::Toys].out_of_stock, 1);
    }

    #[test]
    fn test_trends_window() {
        let mut fresh = product("Fresh", 100, Category::Other, true);
        fresh.created_at = now() - Duration::days(3);
        fresh.updated_at = now() - Duration::days(1);
        let mut stale = product("Stale", 100, Category::Other, true);
        stale.updated_at = now() - Duration::days(10);

        let t = trends(&[fresh, stale], now());
        assert_eq!(t.recently_added, 1);
        assert_eq!(t.recently_updated, 2);
        assert_eq!(t.period, "30d");
        assert_eq!(t.price_trend, "stable");
    }

    #[test]
    fn test_summary_top_category() {
        let s = summary(&sample());
        assert_eq!(s.top_category, Some(Category::Electronics));
        assert_eq!(s.price_range.min.cents(), 1000);
        assert_eq!(s.price_range.max.cents(), 3000);
        assert_eq!(summary(&[]).top_category, None);
    }

    #[test]
    fn test_stats_query_parse() {
        let raw = QueryParams::from_pairs([("category", "books"), ("format", "summary"), ("detailed", "true")]);
        let q = StatsQuery::parse(&raw).unwrap();
        assert_eq!(q.categories, vec![Category::Books]);
        assert_eq!(q.format, StatsFormat::Summary);
        assert!(q.detailed);
        assert_eq!(q.select(&sample()).len(), 1);

        assert!(StatsQuery::parse(&QueryParams::from_pairs([("format", "xml")])).is_err());
        assert!(StatsQuery::parse(&QueryParams::from_pairs([("detailed", "yes")])).is_err());
        assert!(StatsQuery::parse(&QueryParams::from_pairs([("category", "bogus")])).is_err());
    }

    #[test]
    fn test_section_lookup() {
        assert_eq!(StatsSection::parse("pricing"), Some(StatsSection::Pricing));
        assert_eq!(StatsSection::parse("forecast"), None);

        let data = section(&sample(), StatsSection::Overview, false, now());
        let json = serde_json::to_value(data).unwrap();
        assert_eq!(json["totalProducts"], 3);
    }

    #[test]
    fn test_report_serializes_category_keys() {
        let report = StatsReport::compute(&sample(), false, now());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["categories"]["electronics"]["count"], 2);
        assert_eq!(json["overview"]["totalValue"], 60.0);
    }
}
