//! Wealth Dashboard Worker - portfolio monitor for Cloudflare Workers
//!
//! Polls the CSV/JSON files an external trading process publishes and turns
//! them into a dashboard: headline stats, wealth chart, weights, risk penalty
//! gauges and the trade log.
//!
//! # Architecture
//! - Main entry point handles HTTP requests and the scheduled trigger
//! - `source`/`loaders`: fetch and parse the data files, degrading to empty
//! - `metrics`: derived figures
//! - `view`: view models plus the HTML sink the page script consumes
//! - `orchestrator`: one refresh cycle, loaders → metrics → renderers
//!
//! # Features
//! - Biweekly and daily wealth views, switchable per request
//! - Weights-over-time chart and multi-slot penalty history
//! - Counted-up figures on first paint
//! - Cron freshness check on the live wealth file

// Clippy configuration for dashboard code patterns
#![allow(clippy::cast_precision_loss)] // Float casts OK for display
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)] // Page templates
#![allow(clippy::doc_markdown)] // Doc style flexibility
#![allow(clippy::needless_pass_by_value)] // Worker framework patterns
#![allow(clippy::if_not_else)] // Readability preference
#![allow(clippy::map_unwrap_or)] // Explicit fallback preference
#![allow(clippy::manual_clamp)] // Explicit NaN handling in gauge math

mod config;
mod dashboard;
mod error;
mod format;
mod loaders;
mod metrics;
mod orchestrator;
mod source;
mod types;
mod view;

use chrono::Utc;
use worker::{
    Context, Env, Request, Response, Router, ScheduleContext, ScheduledEvent, console_debug,
    console_error, console_log, console_warn, event,
};

pub use config::{Config, DashboardConfig};
pub use error::DashboardError;
pub use format::{PLACEHOLDER, fmt_pct, fmt_usd};
pub use loaders::{
    CsvTable, Snapshot, load_account_history, load_daily_wealth, load_live_wealth, load_logs,
    load_snapshot, parse_csv,
};
pub use metrics::{PenaltyGauge, PenaltyTier, TickerWeight, WealthStats};
pub use orchestrator::{Dashboard, MetricsSnapshot, RefreshReport, RefreshState, Trigger};
pub use source::{
    ACCOUNT_HISTORY_CSV, DataSource, HttpSource, LOGS_JSON, WEALTH_CSV, WEALTH_LIVE_CSV,
};
pub use types::*;
pub use view::{ChartCanvas, ChartHandle, ChartSpec, HtmlSink, Region, ViewSink};

/// Result type alias for worker operations
type WResult<T> = std::result::Result<T, worker::Error>;

/// Query parameters the page script sends
#[derive(Debug, Default, PartialEq)]
struct DashboardQuery {
    view: Option<ViewMode>,
    trigger: Option<String>,
}

fn dashboard_query_from_pairs(query_pairs: &[(String, String)]) -> DashboardQuery {
    let mut query = DashboardQuery::default();
    for (key, value) in query_pairs {
        match key.as_str() {
            "view" => query.view = ViewMode::parse(value),
            "trigger" => query.trigger = Some(value.clone()),
            _ => {}
        }
    }
    query
}

fn dashboard_query(req: &Request) -> WResult<DashboardQuery> {
    let pairs: Vec<(String, String)> = req
        .url()?
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    Ok(dashboard_query_from_pairs(&pairs))
}

fn dashboard_for(config: &Config, view_mode: ViewMode) -> Dashboard<HttpSource> {
    let source = HttpSource::new(config.data_base_url.clone()).with_verbose(config.is_debug());
    Dashboard::new(source, config.clone()).with_view_mode(view_mode)
}

/// One refresh cycle rendered into a fresh sink
async fn render_regions(config: &Config, query: &DashboardQuery) -> (HtmlSink, RefreshReport) {
    let view_mode = query.view.unwrap_or(config.dashboard.view_mode);
    let trigger = Trigger::from_query(query.trigger.as_deref(), query.view);

    let mut sink = HtmlSink::new();
    let report = dashboard_for(config, view_mode)
        .refresh(trigger, &mut sink, Utc::now())
        .await;

    if config.is_debug() {
        console_debug!(
            "cycle {} ({}, {}): unavailable {:?}",
            report.cycle_id,
            report.trigger,
            report.view_mode,
            report.unavailable
        );
    }
    (sink, report)
}

/// Main Worker entry point
#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> WResult<Response> {
    console_error_panic_hook::set_once();

    let router = Router::new();

    router
        // Health check
        .get_async("/health", |_req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };

            Response::from_json(&serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "environment": config.environment,
                "timestamp": Utc::now().to_rfc3339(),
            }))
        })
        // Dashboard UI, first paint rendered here
        .get_async("/", |req, ctx| async move { page(&req, &ctx.env).await })
        .get_async("/dashboard", |req, ctx| async move { page(&req, &ctx.env).await })
        // Region fragments for the poll loop
        .get_async("/api/regions", |req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };
            let query = dashboard_query(&req)?;
            let (sink, _report) = render_regions(&config, &query).await;
            Response::from_json(&sink.to_fragments())
        })
        // Derived metrics (raw data)
        .get_async("/api/snapshot", |req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };
            let query = dashboard_query(&req)?;
            let view_mode = query.view.unwrap_or(config.dashboard.view_mode);
            let snapshot = dashboard_for(&config, view_mode).metrics(Utc::now()).await;
            Response::from_json(&snapshot)
        })
        .run(req, env)
        .await
}

async fn page(req: &Request, env: &Env) -> WResult<Response> {
    let config = match Config::from_env(env) {
        Ok(c) => c,
        Err(e) => return Response::error(format!("Config error: {e}"), 500),
    };
    // a page load is always a first paint, whatever the query says
    let query = DashboardQuery {
        trigger: None,
        ..dashboard_query(req)?
    };
    let (sink, report) = render_regions(&config, &query).await;
    Response::from_html(dashboard::dashboard_html(&sink, report.view_mode, &config))
}

/// Scheduled trigger (cron job)
#[event(scheduled)]
async fn scheduled(_event: ScheduledEvent, env: Env, _ctx: ScheduleContext) {
    let config = match Config::from_env(&env) {
        Ok(c) => c,
        Err(e) => {
            console_error!("Config error: {}", e);
            return;
        }
    };

    let query = DashboardQuery {
        view: None,
        trigger: Some(Trigger::Timer.as_str().to_string()),
    };
    let (_sink, report) = render_regions(&config, &query).await;

    console_log!(
        "Refresh {}: {} history rows, {} daily rows, {} log entries, unavailable {:?}",
        report.cycle_id,
        report.history_rows,
        report.daily_rows,
        report.log_entries,
        report.unavailable
    );

    if report.live_stale {
        console_warn!(
            "Live wealth is {} minutes old (limit {})",
            report.live_age_minutes.unwrap_or_default(),
            config.stale_after_minutes
        );
    } else if report.live_age_minutes.is_none() {
        console_warn!("Live wealth timestamp unavailable");
    }
}
