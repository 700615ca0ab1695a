//! Common types for the dashboard
//!
//! Row structures produced by the loaders. Every value is a snapshot that is
//! discarded on the next refresh.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Granularity of the wealth chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Biweekly,
    Daily,
}

impl ViewMode {
    /// Parse a query/env value, case-insensitive
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "biweekly" => Some(ViewMode::Biweekly),
            "daily" => Some(ViewMode::Daily),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Biweekly => "biweekly",
            ViewMode::Daily => "daily",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One periodic snapshot from `account_history.csv`
///
/// Cells stay raw; a bad number turns into a default at derivation time,
/// never into a parse error here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WealthRecord {
    pub date: Option<String>,
    pub wealth: Option<String>,
    /// Ticker → weight fraction (0..1), raw cell text
    pub weights: BTreeMap<String, Option<String>>,
}

/// One row of `wealth.csv`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyWealthRecord {
    pub date: Option<String>,
    pub wealth: Option<String>,
}

/// Latest point from `wealth_live.csv`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveWealth {
    pub wealth: f64,
    pub timestamp: String,
}

/// Trade action recorded by the trading process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TradeAction {
    Buy,
    Sell,
    Rebalance,
    Other(String),
}

impl TradeAction {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "buy" => TradeAction::Buy,
            "sell" => TradeAction::Sell,
            "rebalance" => TradeAction::Rebalance,
            _ => TradeAction::Other(value.trim().to_string()),
        }
    }

    /// CSS badge class; unknown actions share the rebalance style
    pub fn badge_class(&self) -> &'static str {
        match self {
            TradeAction::Buy => "buy",
            TradeAction::Sell => "sell",
            TradeAction::Rebalance | TradeAction::Other(_) => "rebalance",
        }
    }

    /// Upper-cased label, empty when the log carried no action
    pub fn label(&self) -> String {
        match self {
            TradeAction::Buy => "BUY".to_string(),
            TradeAction::Sell => "SELL".to_string(),
            TradeAction::Rebalance => "REBALANCE".to_string(),
            TradeAction::Other(raw) => raw.to_uppercase(),
        }
    }
}

impl<'de> Deserialize<'de> for TradeAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(TradeAction::parse(raw.as_deref().unwrap_or_default()))
    }
}

impl Default for TradeAction {
    fn default() -> Self {
        TradeAction::Other(String::new())
    }
}

/// One entry of `logs.json`
///
/// Every field is optional and loosely typed: text fields take strings or
/// numbers, numeric fields take numbers or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLogEntry")]
pub struct LogEntry {
    pub timestamp: Option<String>,
    pub action: TradeAction,
    pub ticker: Option<String>,
    pub qty: Option<f64>,
    pub price: Option<f64>,
    pub penalty: Option<f64>,
    /// Penalty exactly as written, for labels
    pub penalty_raw: Option<String>,
}

impl LogEntry {
    /// Notional value, only when both qty and price are present and non-zero
    pub fn notional(&self) -> Option<f64> {
        match (self.qty, self.price) {
            (Some(q), Some(p)) if q != 0.0 && p != 0.0 => Some(q * p),
            _ => None,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawLogEntry {
    timestamp: Option<Value>,
    action: Option<Value>,
    ticker: Option<Value>,
    qty: Option<Value>,
    price: Option<Value>,
    penalty: Option<Value>,
}

impl From<RawLogEntry> for LogEntry {
    fn from(raw: RawLogEntry) -> Self {
        Self {
            timestamp: lenient_text(raw.timestamp.as_ref()),
            action: TradeAction::parse(&lenient_text(raw.action.as_ref()).unwrap_or_default()),
            ticker: lenient_text(raw.ticker.as_ref()),
            qty: lenient_number(raw.qty.as_ref()),
            price: lenient_number(raw.price.as_ref()),
            penalty: lenient_number(raw.penalty.as_ref()),
            penalty_raw: lenient_text(raw.penalty.as_ref()),
        }
    }
}

/// Strings as-is, numbers and booleans as written; null and containers are absent
fn lenient_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Numbers and numeric strings; null stays `None`, anything else present
/// counts as zero
fn lenient_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Null => None,
        Value::Number(n) => Some(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => Some(s.trim().parse::<f64>().unwrap_or(0.0)),
        _ => Some(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_mode_parse() {
        assert_eq!(ViewMode::parse("daily"), Some(ViewMode::Daily));
        assert_eq!(ViewMode::parse(" BIWEEKLY "), Some(ViewMode::Biweekly));
        assert_eq!(ViewMode::parse("weekly"), None);
        assert_eq!(ViewMode::Daily.to_string(), "daily");
    }

    #[test]
    fn test_log_entry_lenient_numbers() {
        let entries: Vec<LogEntry> = serde_json::from_str(
            r#"[
                {"timestamp": "2024-03-01T15:30:00", "action": "BUY", "ticker": "MSFT", "qty": "10", "price": 410.5, "penalty": 3.2},
                {"timestamp": "2024-03-02T15:30:00", "action": "rebalance", "penalty": "n/a"},
                {"action": null, "qty": null}
            ]"#,
        )
        .expect("log entries should parse");

        assert_eq!(entries[0].action, TradeAction::Buy);
        assert_eq!(entries[0].qty, Some(10.0));
        assert_eq!(entries[0].notional(), Some(4105.0));
        assert_eq!(entries[1].penalty, Some(0.0));
        assert_eq!(entries[1].penalty_raw.as_deref(), Some("n/a"));
        assert_eq!(entries[1].qty, None);
        assert_eq!(entries[1].notional(), None);
        assert_eq!(entries[2].action, TradeAction::Other(String::new()));
        assert_eq!(entries[2].timestamp, None);
    }

    #[test]
    fn test_log_entry_text_fields_accept_numbers() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"timestamp": 1709287200, "action": "buy", "ticker": 42, "penalty": "3.50", "qty": {}}"#,
        )
        .expect("entry should parse");

        assert_eq!(entry.timestamp.as_deref(), Some("1709287200"));
        assert_eq!(entry.ticker.as_deref(), Some("42"));
        assert_eq!(entry.action, TradeAction::Buy);
        assert_eq!(entry.penalty, Some(3.5));
        assert_eq!(entry.penalty_raw.as_deref(), Some("3.50"));
        assert_eq!(entry.qty, Some(0.0));
    }

    #[test]
    fn test_trade_action_badges() {
        assert_eq!(TradeAction::parse("Sell").badge_class(), "sell");
        assert_eq!(TradeAction::parse("hold").badge_class(), "rebalance");
        assert_eq!(TradeAction::parse("hold").label(), "HOLD");
        assert_eq!(TradeAction::default().label(), "");
    }
}
