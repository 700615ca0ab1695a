//! View layer - what the dashboard shows, independent of how
//!
//! Renderers talk to a [`ViewSink`]; the orchestrator never touches markup.
//!
//! # Architecture
//! - `mod.rs`: sink trait and the view models it consumes
//! - `build.rs`: derived metrics → view models (formatting lives here)
//! - `html.rs`: [`HtmlSink`], region map of HTML fragments
//! - `svg.rs`: line charts drawn as inline SVG
//!
//! # Rules
//! - Every render call replaces its region; nothing is appended
//! - At most one live chart per canvas: the old handle is destroyed before
//!   the replacement is created

mod build;
mod html;
mod svg;

pub use build::{
    log_rows, penalty_views, stats_view, status_view, weight_bars, wealth_chart_spec,
    weights_chart_spec,
};
pub use html::HtmlSink;

use serde::Serialize;

use crate::types::ViewMode;

/// Page regions, addressed by element id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Stats,
    WealthChart,
    WeightsContainer,
    WeightsChart,
    PenaltyGauges,
    LogBody,
    LogCount,
    Status,
    ViewTabs,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::Stats,
        Region::WealthChart,
        Region::WeightsContainer,
        Region::WeightsChart,
        Region::PenaltyGauges,
        Region::LogBody,
        Region::LogCount,
        Region::Status,
        Region::ViewTabs,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Region::Stats => "stats",
            Region::WealthChart => "wealthChart",
            Region::WeightsContainer => "weightsContainer",
            Region::WeightsChart => "weightsChart",
            Region::PenaltyGauges => "penaltyGauges",
            Region::LogBody => "logBody",
            Region::LogCount => "logCount",
            Region::Status => "status",
            Region::ViewTabs => "viewTabs",
        }
    }
}

/// Canvases that host a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartCanvas {
    Wealth,
    Weights,
}

impl ChartCanvas {
    pub fn region(self) -> Region {
        match self {
            ChartCanvas::Wealth => Region::WealthChart,
            ChartCanvas::Weights => Region::WeightsChart,
        }
    }
}

/// A live chart instance. Not `Clone`: releasing it consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct ChartHandle {
    pub id: u64,
    pub canvas: ChartCanvas,
}

/// Y-axis tick labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    /// `$105k`
    ThousandsUsd,
    /// `12%`
    Percent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: &'static str,
    pub values: Vec<f64>,
    pub dashed: bool,
    pub fill: bool,
}

/// Everything needed to draw one line chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub canvas: ChartCanvas,
    /// e.g. `12 periods`
    pub caption: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub y_min: f64,
    pub y_max: f64,
    pub point_radius: u8,
    pub ticks: TickFormat,
}

/// Headline cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsView {
    pub as_of_label: String,
    pub current_wealth: String,
    pub current_wealth_raw: f64,
    pub change_text: String,
    /// `up`, `down`, or empty without a previous period
    pub change_class: &'static str,
    pub total_return: String,
    pub total_return_pct_raw: f64,
    pub total_return_positive: bool,
    pub started_at: String,
    /// Count the figures up on this paint
    pub animate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightBar {
    pub ticker: String,
    pub width_pct: f64,
    pub label: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenaltyGaugeView {
    pub label: String,
    pub fill_pct: f64,
    pub color: &'static str,
    pub timestamp: String,
}

/// One trade log table row, already formatted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRow {
    pub timestamp: String,
    pub action: String,
    pub badge_class: &'static str,
    pub ticker: String,
    pub qty: String,
    pub price: String,
    pub value: String,
    pub penalty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub last_sync: String,
    pub next_refresh_secs: u64,
    pub view_mode: ViewMode,
}

/// Rendering capability. Implementations replace a region's content on
/// every call.
pub trait ViewSink {
    /// `None` leaves the previous cards untouched
    fn render_stats(&mut self, stats: Option<&StatsView>);

    fn create_chart(&mut self, spec: &ChartSpec) -> ChartHandle;

    fn destroy_chart(&mut self, handle: ChartHandle);

    /// Empty input leaves the previous bars untouched
    fn render_weights(&mut self, bars: &[WeightBar]);

    /// Empty input leaves the previous gauges untouched
    fn render_penalties(&mut self, gauges: &[PenaltyGaugeView]);

    /// Empty input renders the empty-state row
    fn render_logs(&mut self, rows: &[LogRow]);

    fn render_status(&mut self, status: &StatusView);
}

/// Replace the chart in `slot`. Without a spec the current chart stays.
pub fn render_chart<V: ViewSink + ?Sized>(
    sink: &mut V,
    slot: &mut Option<ChartHandle>,
    spec: Option<&ChartSpec>,
) {
    let Some(spec) = spec else {
        return;
    };
    if let Some(old) = slot.take() {
        sink.destroy_chart(old);
    }
    *slot = Some(sink.create_chart(spec));
}
