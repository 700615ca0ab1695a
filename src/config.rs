//! Configuration management for the dashboard

use crate::error::{DashboardError, Result};
use crate::types::ViewMode;
use worker::Env;

/// Starting wealth assumed when the first history row is unusable
pub const INITIAL_WEALTH_FALLBACK: f64 = 100_000.0;

/// Tickers tracked by the trading process
const DEFAULT_TICKERS: [&str; 7] = ["MSFT", "CSCO", "JPM", "WMT", "PG", "XOM", "TLT"];

/// Layout switches for one dashboard pipeline
///
/// The basic page is `{ Biweekly, false, 1, false }`; the tabbed page turns
/// everything on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Granularity of the wealth chart
    pub view_mode: ViewMode,
    /// Count the headline figures up on the very first paint
    pub animate_first_paint: bool,
    /// Number of penalty gauges shown (most recent first)
    pub penalty_slots: usize,
    /// Render the weights-over-time chart
    pub weights_history: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Biweekly,
            animate_first_paint: true,
            penalty_slots: 3,
            weights_history: true,
        }
    }
}

/// Dashboard worker configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment (production, staging, development)
    pub environment: String,

    /// Log level
    pub log_level: String,

    /// Where the trading process publishes its files
    pub data_base_url: String,

    /// Weight columns to show; empty = every non date/wealth column
    pub tickers: Vec<String>,

    pub initial_wealth_fallback: f64,

    /// Client poll period
    pub refresh_interval_seconds: u64,

    /// Live wealth older than this is reported as stale by the cron check
    pub stale_after_minutes: i64,

    pub dashboard: DashboardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from Cloudflare environment variables
    pub fn from_env(env: &Env) -> Result<Self> {
        let config = Self::from_lookup(|key| env.var(key).ok().map(|v| v.to_string()));
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from any key lookup, falling back to defaults
    /// for missing or unparseable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_or = |key: &str, default: f64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(default)
        };
        let flag_or = |key: &str, default: bool| {
            lookup(key)
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(default)
        };
        let defaults = DashboardConfig::default();

        Self {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "production".to_string()),

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            data_base_url: lookup("DATA_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:8000".to_string()),

            tickers: lookup("TICKERS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_else(|| DEFAULT_TICKERS.iter().map(|t| (*t).to_string()).collect()),

            initial_wealth_fallback: parse_or("INITIAL_WEALTH_FALLBACK", INITIAL_WEALTH_FALLBACK),

            refresh_interval_seconds: lookup("REFRESH_INTERVAL_SECONDS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(60),

            stale_after_minutes: lookup("STALE_AFTER_MINUTES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(180),

            dashboard: DashboardConfig {
                view_mode: lookup("VIEW_MODE")
                    .and_then(|v| ViewMode::parse(&v))
                    .unwrap_or(defaults.view_mode),
                animate_first_paint: flag_or("ANIMATE_FIRST_PAINT", defaults.animate_first_paint),
                penalty_slots: lookup("PENALTY_SLOTS")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(defaults.penalty_slots),
                weights_history: flag_or("SHOW_WEIGHTS_HISTORY", defaults.weights_history),
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.data_base_url.is_empty() {
            return Err(DashboardError::Config("DATA_BASE_URL must not be empty".into()));
        }
        if self.refresh_interval_seconds == 0 {
            return Err(DashboardError::Config(
                "refresh_interval_seconds must be positive".into(),
            ));
        }
        if self.dashboard.penalty_slots == 0 {
            return Err(DashboardError::Config("penalty_slots must be at least 1".into()));
        }
        if self.initial_wealth_fallback <= 0.0 || !self.initial_wealth_fallback.is_finite() {
            return Err(DashboardError::Config(
                "initial_wealth_fallback must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Verbose fetch diagnostics
    pub fn is_debug(&self) -> bool {
        self.log_level.eq_ignore_ascii_case("debug")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.environment, "production");
        assert_eq!(config.refresh_interval_seconds, 60);
        assert_eq!(config.tickers.len(), 7);
        assert_eq!(config.tickers[0], "MSFT");
        assert_eq!(config.initial_wealth_fallback, 100_000.0);
        assert_eq!(config.dashboard.view_mode, ViewMode::Biweekly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATA_BASE_URL", "https://files.example.com/portfolio/"),
            ("TICKERS", "AAPL, TLT,,"),
            ("VIEW_MODE", "Daily"),
            ("ANIMATE_FIRST_PAINT", "false"),
            ("PENALTY_SLOTS", "1"),
            ("LOG_LEVEL", "DEBUG"),
        ]));

        assert_eq!(config.data_base_url, "https://files.example.com/portfolio");
        assert_eq!(config.tickers, vec!["AAPL".to_string(), "TLT".to_string()]);
        assert_eq!(config.dashboard.view_mode, ViewMode::Daily);
        assert!(!config.dashboard.animate_first_paint);
        assert_eq!(config.dashboard.penalty_slots, 1);
        assert!(config.is_debug());
    }

    #[test]
    fn test_config_unparseable_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("REFRESH_INTERVAL_SECONDS", "soon"),
            ("INITIAL_WEALTH_FALLBACK", "lots"),
            ("VIEW_MODE", "hourly"),
        ]));

        assert_eq!(config.refresh_interval_seconds, 60);
        assert_eq!(config.initial_wealth_fallback, INITIAL_WEALTH_FALLBACK);
        assert_eq!(config.dashboard.view_mode, ViewMode::Biweekly);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.refresh_interval_seconds = 0;
        assert!(matches!(config.validate(), Err(DashboardError::Config(_))));

        let mut config = Config::default();
        config.dashboard.penalty_slots = 0;
        assert!(config.validate().is_err());

        let config = Config::from_lookup(lookup_from(&[("INITIAL_WEALTH_FALLBACK", "-5")]));
        assert!(config.validate().is_err());
    }
}
