//! # Error Metrics
//!
//! Rolling recorder of failures, for observability only.
//!
//! ## Windows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record(e) ──► hour window  (VecDeque, pruned to 1h before e)           │
//! │           ├──► day window   (pruned to 24h)                             │
//! │           ├──► week window  (pruned to 7d)                              │
//! │           └──► all-time counters                                        │
//! │                                                                         │
//! │  error_rate(window, now) = errors in window / window minutes            │
//! │  health(now)             = degraded when hourly rate > threshold        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The recorder is a plain value. The API holds one behind a mutex; nothing
//! here reads the clock, callers pass `now`.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::CatalogError;
use crate::response::RequestContext;
use crate::stats::round2;

/// Errors per minute over the last hour above which health is degraded.
pub const DEFAULT_ERROR_RATE_THRESHOLD: f64 = 2.0;

/// A rolling time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Hour,
    Day,
    Week,
}

impl Window {
    pub fn duration(&self) -> Duration {
        match self {
            Window::Hour => Duration::hours(1),
            Window::Day => Duration::days(1),
            Window::Week => Duration::weeks(1),
        }
    }

    pub fn minutes(&self) -> f64 {
        self.duration().num_minutes() as f64
    }
}

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub timestamp: DateTime<Utc>,
    pub kind: String,
    pub status: u16,
    pub code: String,
    pub message: String,
    /// "METHOD /path"
    pub endpoint: String,
    pub request_id: String,
}

impl ErrorRecord {
    /// Captures an error as it leaves the request boundary.
    pub fn from_error(err: &CatalogError, request: &RequestContext) -> Self {
        ErrorRecord {
            timestamp: err.timestamp,
            kind: err.kind.label().to_string(),
            status: err.status(),
            code: err.code().to_string(),
            message: err.message.clone(),
            endpoint: format!("{} {}", request.method, request.path),
            request_id: request.request_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorHealth {
    pub status: HealthStatus,
    /// Errors per minute over the last hour.
    pub error_rate: f64,
    pub threshold: f64,
    pub errors_last_hour: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowCounts {
    pub last_hour: usize,
    pub last_day: usize,
    pub last_week: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSummary {
    pub total_errors: u64,
    pub windows: WindowCounts,
    /// Breakdowns over the last day.
    pub by_kind: BTreeMap<String, usize>,
    pub by_status: BTreeMap<u16, usize>,
    pub by_endpoint: BTreeMap<String, usize>,
    pub all_time_by_kind: BTreeMap<String, u64>,
    pub error_rate: f64,
}

/// The rolling recorder.
#[derive(Debug, Clone)]
pub struct ErrorMetrics {
    threshold: f64,
    hour: VecDeque<ErrorRecord>,
    day: VecDeque<ErrorRecord>,
    week: VecDeque<ErrorRecord>,
    total: u64,
    all_time_by_kind: BTreeMap<String, u64>,
}

impl Default for ErrorMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_RATE_THRESHOLD)
    }
}

impl ErrorMetrics {
    pub fn new(threshold_per_minute: f64) -> Self {
        ErrorMetrics {
            threshold: threshold_per_minute,
            hour: VecDeque::new(),
            day: VecDeque::new(),
            week: VecDeque::new(),
            total: 0,
            all_time_by_kind: BTreeMap::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Appends a record and prunes every window relative to its timestamp.
    pub fn record(&mut self, record: ErrorRecord) {
        let at = record.timestamp;

        self.total += 1;
        *self
            .all_time_by_kind
            .entry(record.kind.clone())
            .or_insert(0) += 1;

        self.hour.push_back(record.clone());
        self.day.push_back(record.clone());
        self.week.push_back(record);

        prune(&mut self.hour, at - Window::Hour.duration());
        prune(&mut self.day, at - Window::Day.duration());
        prune(&mut self.week, at - Window::Week.duration());
    }

    fn window(&self, window: Window) -> &VecDeque<ErrorRecord> {
        match window {
            Window::Hour => &self.hour,
            Window::Day => &self.day,
            Window::Week => &self.week,
        }
    }

    /// Records inside `window` as seen from `now`.
    fn in_window(&self, window: Window, now: DateTime<Utc>) -> impl Iterator<Item = &ErrorRecord> {
        let since = now - window.duration();
        self.window(window)
            .iter()
            .filter(move |r| r.timestamp >= since && r.timestamp <= now)
    }

    pub fn count(&self, window: Window, now: DateTime<Utc>) -> usize {
        self.in_window(window, now).count()
    }

    /// Errors per minute over `window`, rounded to two decimals.
    pub fn error_rate(&self, window: Window, now: DateTime<Utc>) -> f64 {
        round2(self.count(window, now) as f64 / window.minutes())
    }

    /// The `n` most recent records, newest first.
    pub fn recent(&self, n: usize) -> Vec<ErrorRecord> {
        self.week.iter().rev().take(n).cloned().collect()
    }

    pub fn health(&self, now: DateTime<Utc>) -> ErrorHealth {
        let error_rate = self.error_rate(Window::Hour, now);
        let status = if error_rate > self.threshold {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        ErrorHealth {
            status,
            error_rate,
            threshold: self.threshold,
            errors_last_hour: self.count(Window::Hour, now),
        }
    }

    pub fn summary(&self, now: DateTime<Utc>) -> ErrorSummary {
        let mut by_kind = BTreeMap::new();
        let mut by_status = BTreeMap::new();
        let mut by_endpoint = BTreeMap::new();

        for record in self.in_window(Window::Day, now) {
            *by_kind.entry(record.kind.clone()).or_insert(0) += 1;
            *by_status.entry(record.status).or_insert(0) += 1;
            *by_endpoint.entry(record.endpoint.clone()).or_insert(0) += 1;
        }

        ErrorSummary {
            total_errors: self.total,
            windows: WindowCounts {
                last_hour: self.count(Window::Hour, now),
                last_day: self.count(Window::Day, now),
                last_week: self.count(Window::Week, now),
            },
            by_kind,
            by_status,
            by_endpoint,
            all_time_by_kind: self.all_time_by_kind.clone(),
            error_rate: self.error_rate(Window::Hour, now),
        }
    }

    /// Clears every window and counter. The threshold is kept.
    pub fn reset(&mut self) {
        *self = ErrorMetrics::new(self.threshold);
    }
}

fn prune(window: &mut VecDeque<ErrorRecord>, cutoff: DateTime<Utc>) {
    while window.front().is_some_and(|r| r.timestamp < cutoff) {
        window.pop_front();
    }
}
