//! Refresh orchestrator
//!
//! One cycle: load every resource at once, derive the metrics, then call
//! every renderer. Renderers decide for themselves what to do with empty
//! input; the orchestrator never skips one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::loaders::{self, Snapshot};
use crate::metrics::{self, PenaltyGauge, TickerWeight, WealthStats};
use crate::source::DataSource;
use crate::types::ViewMode;
use crate::view::{self, ChartHandle, ViewSink};

/// What started a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Page load
    Initial,
    /// Periodic re-poll
    Timer,
    /// User picked a view tab
    TabSwitch(ViewMode),
}

impl Trigger {
    /// `trigger=timer|tab` from the page script; anything else is a first load
    pub fn from_query(trigger: Option<&str>, view_mode: Option<ViewMode>) -> Self {
        match (trigger.map(str::trim), view_mode) {
            (Some("tab"), Some(mode)) => Trigger::TabSwitch(mode),
            (Some("timer"), _) => Trigger::Timer,
            _ => Trigger::Initial,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::Initial => "initial",
            Trigger::Timer => "timer",
            Trigger::TabSwitch(_) => "tab",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// Outcome of one cycle, for the worker logs
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub cycle_id: String,
    pub cycle: u64,
    pub trigger: &'static str,
    pub view_mode: ViewMode,
    pub history_rows: usize,
    pub daily_rows: usize,
    pub log_entries: usize,
    pub unavailable: Vec<&'static str>,
    pub live_age_minutes: Option<i64>,
    pub live_stale: bool,
    pub first_paint: bool,
}

/// Derived metrics as served by `/api/snapshot`
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// RFC 3339
    pub generated_at: String,
    pub view_mode: ViewMode,
    pub stats: Option<WealthStats>,
    pub weights: Vec<TickerWeight>,
    pub penalties: Vec<PenaltyGauge>,
    pub history_rows: usize,
    pub daily_rows: usize,
    pub log_entries: usize,
    pub unavailable: Vec<&'static str>,
    pub live_age_minutes: Option<i64>,
}

/// One dashboard pipeline bound to a data source
pub struct Dashboard<S> {
    source: S,
    config: Config,
    view_mode: ViewMode,
    state: RefreshState,
    cycles: u64,
    wealth_chart: Option<ChartHandle>,
    weights_chart: Option<ChartHandle>,
}

impl<S: DataSource> Dashboard<S> {
    pub fn new(source: S, config: Config) -> Self {
        Self {
            source,
            view_mode: config.dashboard.view_mode,
            config,
            state: RefreshState::Idle,
            cycles: 0,
            wealth_chart: None,
            weights_chart: None,
        }
    }

    /// Start from a view other than the configured one
    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one cycle and push everything into `sink`
    pub async fn refresh<V: ViewSink>(
        &mut self,
        trigger: Trigger,
        sink: &mut V,
        now: DateTime<Utc>,
    ) -> RefreshReport {
        self.state = RefreshState::Refreshing;
        if let Trigger::TabSwitch(mode) = trigger {
            self.view_mode = mode;
        }
        let view_mode = self.view_mode;
        let first_paint = trigger == Trigger::Initial && self.cycles == 0;
        let animate = first_paint && self.config.dashboard.animate_first_paint;

        let snapshot = loaders::load_snapshot(&self.source, view_mode).await;
        let history = snapshot.history.as_deref().unwrap_or_default();
        let fallback = self.config.initial_wealth_fallback;
        let tickers = metrics::resolve_tickers(&self.config.tickers, history);

        // stats
        let stats = metrics::derive_stats(history, snapshot.live.as_ref(), fallback);
        sink.render_stats(stats.as_ref().map(|s| view::stats_view(s, animate)).as_ref());

        // wealth chart
        let wealth_spec = match view_mode {
            ViewMode::Biweekly => view::wealth_chart_spec(
                history
                    .iter()
                    .map(|r| (r.date.as_deref(), r.wealth.as_deref())),
                view_mode,
                fallback,
            ),
            ViewMode::Daily => view::wealth_chart_spec(
                snapshot
                    .daily
                    .iter()
                    .map(|r| (r.date.as_deref(), r.wealth.as_deref())),
                view_mode,
                fallback,
            ),
        };
        view::render_chart(sink, &mut self.wealth_chart, wealth_spec.as_ref());

        // weights
        sink.render_weights(&view::weight_bars(&metrics::latest_weights(history, &tickers)));
        if self.config.dashboard.weights_history {
            let spec = view::weights_chart_spec(history, &tickers);
            view::render_chart(sink, &mut self.weights_chart, spec.as_ref());
        }

        // penalties + logs
        let gauges = metrics::penalty_history(&snapshot.logs, self.config.dashboard.penalty_slots);
        sink.render_penalties(&view::penalty_views(&gauges));
        sink.render_logs(&view::log_rows(&snapshot.logs));

        sink.render_status(&view::status_view(
            now,
            self.config.refresh_interval_seconds,
            view_mode,
        ));

        self.cycles += 1;
        self.state = RefreshState::Idle;
        self.report(trigger, &snapshot, now, first_paint)
    }

    /// Load and derive without rendering
    pub async fn metrics(&self, now: DateTime<Utc>) -> MetricsSnapshot {
        let snapshot = loaders::load_snapshot(&self.source, self.view_mode).await;
        let history = snapshot.history.as_deref().unwrap_or_default();
        let tickers = metrics::resolve_tickers(&self.config.tickers, history);

        MetricsSnapshot {
            generated_at: now.to_rfc3339(),
            view_mode: self.view_mode,
            stats: metrics::derive_stats(
                history,
                snapshot.live.as_ref(),
                self.config.initial_wealth_fallback,
            ),
            weights: metrics::latest_weights(history, &tickers),
            penalties: metrics::penalty_history(
                &snapshot.logs,
                self.config.dashboard.penalty_slots,
            ),
            history_rows: history.len(),
            daily_rows: snapshot.daily.len(),
            log_entries: snapshot.logs.len(),
            live_age_minutes: live_age_minutes(&snapshot, now),
            unavailable: snapshot.unavailable,
        }
    }

    fn report(
        &self,
        trigger: Trigger,
        snapshot: &Snapshot,
        now: DateTime<Utc>,
        first_paint: bool,
    ) -> RefreshReport {
        let live_age_minutes = live_age_minutes(snapshot, now);
        RefreshReport {
            cycle_id: Uuid::new_v4().to_string(),
            cycle: self.cycles,
            trigger: trigger.as_str(),
            view_mode: self.view_mode,
            history_rows: snapshot.history.as_ref().map_or(0, Vec::len),
            daily_rows: snapshot.daily.len(),
            log_entries: snapshot.logs.len(),
            unavailable: snapshot.unavailable.clone(),
            live_stale: live_age_minutes.is_some_and(|m| m > self.config.stale_after_minutes),
            live_age_minutes,
            first_paint,
        }
    }
}

fn live_age_minutes(snapshot: &Snapshot, now: DateTime<Utc>) -> Option<i64> {
    snapshot
        .live
        .as_ref()
        .and_then(|live| metrics::live_age(live, now))
        .map(|age| age.num_minutes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::MemorySource;
    use crate::source::{ACCOUNT_HISTORY_CSV, LOGS_JSON, WEALTH_CSV, WEALTH_LIVE_CSV};
    use crate::view::{ChartCanvas, HtmlSink, Region};
    use chrono::TimeZone;

    const HISTORY: &str = "date,wealth,MSFT,JPM\n\
        2024-01-01,100000,0.5,0.5\n\
        2024-01-15,105000,0.6,0.4\n\
        2024-01-29,110000,0.55,0.45\n";

    const LOGS: &str = r#"[
        {"timestamp":"2024-01-29T10:00:00","action":"buy","ticker":"MSFT","qty":10,"price":400,"penalty":4},
        {"timestamp":"2024-01-29T11:00:00","action":"sell","ticker":"JPM","qty":"5","price":"170.5","penalty":17}
    ]"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 29, 12, 0, 0).unwrap()
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.tickers = Vec::new();
        config
    }

    fn full_source() -> MemorySource {
        MemorySource::new()
            .with(ACCOUNT_HISTORY_CSV, HISTORY)
            .with(LOGS_JSON, LOGS)
            .with(WEALTH_LIVE_CSV, "timestamp,wealth\n2024-01-29T11:30:00,111000\n")
            .with(WEALTH_CSV, "date,wealth\n2024-01-26,109000\n2024-01-29,110000\n")
    }

    #[test]
    fn test_trigger_from_query() {
        assert_eq!(Trigger::from_query(None, None), Trigger::Initial);
        assert_eq!(Trigger::from_query(Some("timer"), Some(ViewMode::Daily)), Trigger::Timer);
        assert_eq!(
            Trigger::from_query(Some("tab"), Some(ViewMode::Daily)),
            Trigger::TabSwitch(ViewMode::Daily)
        );
        // a tab switch needs a target view
        assert_eq!(Trigger::from_query(Some("tab"), None), Trigger::Initial);
    }

    #[tokio::test]
    async fn test_full_refresh_renders_every_region() {
        let mut dashboard = Dashboard::new(full_source(), config());
        let mut sink = HtmlSink::new();

        let report = dashboard.refresh(Trigger::Initial, &mut sink, now()).await;

        for region in Region::ALL {
            assert!(sink.region(region).is_some(), "missing {}", region.id());
        }
        let stats = sink.region(Region::Stats).unwrap();
        assert!(stats.contains("$111,000"));
        assert!(stats.contains("+11.00% / $11,000"));
        assert!(stats.contains("Live as of 2024-01-29 11:30:00"));
        assert!(stats.contains("data-count-to"));

        let logs = sink.region(Region::LogBody).unwrap();
        assert!(logs.find("JPM").unwrap() < logs.find("MSFT").unwrap());
        assert!(sink.region(Region::PenaltyGauges).unwrap().contains("Most Recent Risk Penalty: 17"));
        assert!(sink.region(Region::WealthChart).unwrap().contains("3 periods"));

        assert!(report.first_paint);
        assert_eq!(report.cycle, 1);
        assert_eq!(report.trigger, "initial");
        assert_eq!(report.history_rows, 3);
        assert_eq!(report.log_entries, 2);
        assert_eq!(report.live_age_minutes, Some(30));
        assert!(!report.live_stale);
        assert!(report.unavailable.is_empty());
        assert_eq!(dashboard.state(), RefreshState::Idle);
        // biweekly view never asks for the daily file
        assert!(!dashboard.source.requested(WEALTH_CSV));
    }

    #[tokio::test]
    async fn test_second_paint_does_not_animate() {
        let mut dashboard = Dashboard::new(full_source(), config());
        let mut sink = HtmlSink::new();

        dashboard.refresh(Trigger::Initial, &mut sink, now()).await;
        let report = dashboard.refresh(Trigger::Timer, &mut sink, now()).await;

        assert!(!report.first_paint);
        assert!(!sink.region(Region::Stats).unwrap().contains("data-count-to"));
        assert_eq!(sink.live_charts(ChartCanvas::Wealth), 1);
        assert_eq!(sink.live_charts(ChartCanvas::Weights), 1);
        assert_eq!(dashboard.cycles(), 2);
    }

    #[tokio::test]
    async fn test_animation_can_be_switched_off() {
        let mut config = config();
        config.dashboard.animate_first_paint = false;
        let mut dashboard = Dashboard::new(full_source(), config);
        let mut sink = HtmlSink::new();

        dashboard.refresh(Trigger::Initial, &mut sink, now()).await;
        assert!(!sink.region(Region::Stats).unwrap().contains("data-count-to"));
    }

    #[tokio::test]
    async fn test_tab_switch_to_daily() {
        let mut dashboard = Dashboard::new(full_source(), config());
        let mut sink = HtmlSink::new();

        dashboard.refresh(Trigger::Initial, &mut sink, now()).await;
        let report = dashboard
            .refresh(Trigger::TabSwitch(ViewMode::Daily), &mut sink, now())
            .await;

        assert_eq!(dashboard.view_mode(), ViewMode::Daily);
        assert_eq!(report.view_mode, ViewMode::Daily);
        assert_eq!(report.daily_rows, 2);
        assert!(dashboard.source.requested(WEALTH_CSV));
        assert!(sink.region(Region::WealthChart).unwrap().contains("2 days"));
        assert!(sink
            .region(Region::ViewTabs)
            .unwrap()
            .contains(r#"class="tab active" data-view="daily""#));
        assert_eq!(sink.live_charts(ChartCanvas::Wealth), 1);

        // the timer keeps the chosen view
        let report = dashboard.refresh(Trigger::Timer, &mut sink, now()).await;
        assert_eq!(report.view_mode, ViewMode::Daily);
    }

    #[tokio::test]
    async fn test_logs_404_renders_empty_state() {
        let source = MemorySource::new().with(ACCOUNT_HISTORY_CSV, HISTORY);
        let mut dashboard = Dashboard::new(source, config());
        let mut sink = HtmlSink::new();

        let report = dashboard.refresh(Trigger::Initial, &mut sink, now()).await;

        assert!(sink.region(Region::LogBody).unwrap().contains("No trade logs found"));
        assert_eq!(sink.region(Region::LogCount), Some("0 entries"));
        assert!(sink.region(Region::PenaltyGauges).is_none());
        assert_eq!(report.unavailable, vec![LOGS_JSON, WEALTH_LIVE_CSV]);
        // without a live point the last row is current
        assert!(sink.region(Region::Stats).unwrap().contains("$110,000"));
    }

    #[tokio::test]
    async fn test_everything_unavailable_keeps_placeholders() {
        let mut dashboard = Dashboard::new(MemorySource::new(), config());
        let mut sink = HtmlSink::new();

        let report = dashboard.refresh(Trigger::Initial, &mut sink, now()).await;

        assert!(sink.region(Region::Stats).is_none());
        assert!(sink.region(Region::WealthChart).is_none());
        assert!(sink.region(Region::WeightsContainer).is_none());
        assert!(sink.region(Region::Status).is_some());
        assert_eq!(report.unavailable.len(), 3);
        assert_eq!(report.live_age_minutes, None);
    }

    #[tokio::test]
    async fn test_stale_live_point_is_reported() {
        let source = full_source().with(
            WEALTH_LIVE_CSV,
            "timestamp,wealth\n2024-01-28T12:00:00,111000\n",
        );
        let mut dashboard = Dashboard::new(source, config());
        let mut sink = HtmlSink::new();

        let report = dashboard.refresh(Trigger::Timer, &mut sink, now()).await;
        assert_eq!(report.live_age_minutes, Some(24 * 60));
        assert!(report.live_stale);
    }

    #[tokio::test]
    async fn test_weights_history_switch() {
        let mut config = config();
        config.dashboard.weights_history = false;
        let mut dashboard = Dashboard::new(full_source(), config);
        let mut sink = HtmlSink::new();

        dashboard.refresh(Trigger::Initial, &mut sink, now()).await;
        assert!(sink.region(Region::WeightsChart).is_none());
        assert!(sink.region(Region::WeightsContainer).unwrap().contains("55.0%"));
    }

    #[tokio::test]
    async fn test_metrics_snapshot() {
        let dashboard = Dashboard::new(full_source(), config());
        let snapshot = dashboard.metrics(now()).await;

        let stats = snapshot.stats.as_ref().expect("stats");
        assert_eq!(stats.initial_wealth, 100_000.0);
        assert_eq!(stats.current_wealth, 111_000.0);
        assert_eq!(snapshot.weights.len(), 2);
        assert_eq!(snapshot.penalties.len(), 2);
        assert_eq!(snapshot.penalties[0].penalty, 17.0);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["view_mode"], "biweekly");
        assert_eq!(json["penalties"][0]["tier"], "high");
    }
}
