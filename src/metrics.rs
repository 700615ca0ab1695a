//! Metric derivation
//!
//! Everything the renderers show is computed here from the loaded rows:
//! headline stats, period change, penalty gauges, weights and chart bounds.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::format::parse_number;
use crate::types::{LiveWealth, LogEntry, WealthRecord};

/// Penalty at which the gauge is full
pub const PENALTY_GAUGE_MAX: f64 = 20.0;

/// Below this wealth range the chart gets a fixed padding
const FLAT_RANGE: f64 = 1000.0;
const FLAT_PADDING: f64 = 500.0;

/// Headline figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WealthStats {
    pub initial_wealth: f64,
    pub current_wealth: f64,
    pub total_return_pct: f64,
    pub dollar_return: f64,
    pub period_change: Option<PeriodChange>,
    /// Timestamp of the live point when it overrode the history
    pub live_as_of: Option<String>,
}

/// Change against the second-to-last snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodChange {
    pub diff: f64,
    pub pct: f64,
}

impl PeriodChange {
    pub fn is_up(&self) -> bool {
        self.diff >= 0.0
    }
}

/// First row's wealth, or the fallback when it is missing, unparseable or zero
pub fn initial_wealth(rows: &[WealthRecord], fallback: f64) -> f64 {
    rows.first()
        .and_then(|r| parse_number(r.wealth.as_deref()))
        .filter(|w| *w != 0.0)
        .unwrap_or(fallback)
}

/// Live wealth when known, otherwise the last row's wealth (0 if unusable)
pub fn current_wealth(rows: &[WealthRecord], live: Option<&LiveWealth>) -> f64 {
    match live {
        Some(live) => live.wealth,
        None => rows
            .last()
            .and_then(|r| parse_number(r.wealth.as_deref()))
            .unwrap_or(0.0),
    }
}

/// `(current - initial) / initial * 100`
pub fn total_return_pct(initial: f64, current: f64) -> f64 {
    (current - initial) / initial * 100.0
}

/// Needs at least two rows; previous ≤ 0 gives a 0% change
pub fn period_change(rows: &[WealthRecord], current: f64) -> Option<PeriodChange> {
    if rows.len() < 2 {
        return None;
    }
    let prev = parse_number(rows[rows.len() - 2].wealth.as_deref()).unwrap_or(0.0);
    let diff = current - prev;
    let pct = if prev > 0.0 { diff / prev * 100.0 } else { 0.0 };
    Some(PeriodChange { diff, pct })
}

/// Headline stats; `None` when there is no history to speak of
pub fn derive_stats(
    rows: &[WealthRecord],
    live: Option<&LiveWealth>,
    fallback: f64,
) -> Option<WealthStats> {
    if rows.is_empty() {
        return None;
    }
    let initial = initial_wealth(rows, fallback);
    let current = current_wealth(rows, live);

    Some(WealthStats {
        initial_wealth: initial,
        current_wealth: current,
        total_return_pct: total_return_pct(initial, current),
        dollar_return: current - initial,
        period_change: period_change(rows, current),
        live_as_of: live.map(|l| l.timestamp.clone()),
    })
}

/// Severity bucket of a risk penalty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyTier {
    Low,
    Medium,
    High,
}

impl PenaltyTier {
    /// >15 high, >8 medium, else low
    pub fn from_penalty(penalty: f64) -> Self {
        if penalty > 15.0 {
            PenaltyTier::High
        } else if penalty > 8.0 {
            PenaltyTier::Medium
        } else {
            PenaltyTier::Low
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PenaltyTier::High => "#ff3b5c",
            PenaltyTier::Medium => "#ffaa00",
            PenaltyTier::Low => "#00ff88",
        }
    }
}

/// Gauge fill, capped at 100%
pub fn penalty_fill_pct(penalty: f64) -> f64 {
    (penalty / PENALTY_GAUGE_MAX * 100.0).min(100.0).max(0.0)
}

/// One penalty gauge slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenaltyGauge {
    pub penalty: f64,
    /// Penalty as the log wrote it
    pub raw: String,
    pub fill_pct: f64,
    pub tier: PenaltyTier,
    pub timestamp: Option<String>,
}

impl PenaltyGauge {
    pub fn new(penalty: f64, timestamp: Option<String>) -> Self {
        Self {
            penalty,
            raw: penalty.to_string(),
            fill_pct: penalty_fill_pct(penalty),
            tier: PenaltyTier::from_penalty(penalty),
            timestamp,
        }
    }

    /// Label the gauge with the text the log carried instead of the parsed value
    #[must_use]
    pub fn with_raw(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            self.raw = raw.to_string();
        }
        self
    }
}

/// The last `slots` penalties, most recent first
pub fn penalty_history(logs: &[LogEntry], slots: usize) -> Vec<PenaltyGauge> {
    logs.iter()
        .rev()
        .filter_map(|l| {
            l.penalty
                .map(|p| PenaltyGauge::new(p, l.timestamp.clone()).with_raw(l.penalty_raw.as_deref()))
        })
        .take(slots)
        .collect()
}

/// Ticker weight as a percentage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerWeight {
    pub ticker: String,
    pub pct: f64,
}

/// Tickers to show: the configured list, or every weight column
pub fn resolve_tickers(configured: &[String], rows: &[WealthRecord]) -> Vec<String> {
    if !configured.is_empty() {
        return configured.to_vec();
    }
    rows.last()
        .map(|r| r.weights.keys().cloned().collect())
        .unwrap_or_default()
}

fn weight_pct(row: &WealthRecord, ticker: &str) -> f64 {
    parse_number(row.weights.get(ticker).and_then(|w| w.as_deref())).unwrap_or(0.0) * 100.0
}

/// Weights from the latest snapshot only
pub fn latest_weights(rows: &[WealthRecord], tickers: &[String]) -> Vec<TickerWeight> {
    let Some(last) = rows.last() else {
        return Vec::new();
    };
    tickers
        .iter()
        .map(|t| TickerWeight {
            ticker: t.clone(),
            pct: weight_pct(last, t),
        })
        .collect()
}

/// One series of weight percentages per ticker, in row order
pub fn weight_history(rows: &[WealthRecord], tickers: &[String]) -> Vec<(String, Vec<f64>)> {
    tickers
        .iter()
        .map(|t| (t.clone(), rows.iter().map(|r| weight_pct(r, t)).collect()))
        .collect()
}

/// Padded y-axis bounds so a barely moving series is not drawn flat
pub fn y_axis_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let range = max - min;
    let padding = if range < FLAT_RANGE {
        FLAT_PADDING
    } else {
        range * 0.1
    };
    Some((min - padding, max + padding))
}

/// Parse the timestamps the trading process writes (RFC 3339 or naive, UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// How old the live wealth point is
pub fn live_age(live: &LiveWealth, now: DateTime<Utc>) -> Option<TimeDelta> {
    parse_timestamp(&live.timestamp).map(|ts| now - ts)
}
