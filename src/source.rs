//! Data file source
//!
//! Fetches the static files the trading process publishes. Every request is
//! cache-busted with a `t=<epoch ms>` query so the static host never serves
//! a stale snapshot.

use crate::error::{DashboardError, Result};

/// Biweekly snapshots with per-ticker weights
pub const ACCOUNT_HISTORY_CSV: &str = "account_history.csv";
/// Trade log
pub const LOGS_JSON: &str = "logs.json";
/// Live wealth points, last row wins
pub const WEALTH_LIVE_CSV: &str = "wealth_live.csv";
/// Daily wealth series
pub const WEALTH_CSV: &str = "wealth.csv";

/// Anything that can hand back the raw text of a named resource
#[allow(async_fn_in_trait)] // single-threaded Worker isolate, no Send bound wanted
pub trait DataSource {
    /// Raw body of `resource`; non-success status is an error
    async fn fetch_text(&self, resource: &str) -> Result<String>;
}

/// Fetches resources over HTTP from a static host
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
    verbose: bool,
}

impl HttpSource {
    /// Create a source rooted at `base_url` (no trailing slash)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
            verbose: false,
        }
    }

    /// Log every degraded fetch at debug level
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// `<base>/<resource>?t=<epoch ms>`
pub fn busted_url(base_url: &str, resource: &str, epoch_ms: i64) -> String {
    format!("{base_url}/{resource}?t={epoch_ms}")
}

impl DataSource for HttpSource {
    async fn fetch_text(&self, resource: &str) -> Result<String> {
        let url = busted_url(&self.base_url, resource, chrono::Utc::now().timestamp_millis());

        let result: Result<String> = async {
            let response = self.client.get(&url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(DashboardError::Status {
                    resource: resource.to_string(),
                    status: status.as_u16(),
                });
            }
            Ok(response.text().await?)
        }
        .await;

        if self.verbose {
            if let Err(e) = &result {
                worker::console_debug!("fetch {} degraded: {}", url, e);
            }
        }
        result
    }
}
