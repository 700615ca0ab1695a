//! Derived metrics → view models

use chrono::{DateTime, Utc};

use super::{
    ChartCanvas, ChartSpec, LogRow, PenaltyGaugeView, Series, StatsView, StatusView, TickFormat,
    WeightBar,
};
use crate::format::{
    PLACEHOLDER, fmt_log_timestamp, fmt_pct, fmt_sync_time, fmt_usd, parse_number,
};
use crate::metrics::{self, PenaltyGauge, TickerWeight, WealthStats};
use crate::types::{LogEntry, ViewMode, WealthRecord};

/// Bar and line colors, cycled per ticker
const PALETTE: [&str; 7] = [
    "#00ff88", "#0088ff", "#ffaa00", "#ff3b5c", "#aa44ff", "#00ccff", "#ff6644",
];

const WEALTH_COLOR: &str = "#00ff88";
const BASELINE_COLOR: &str = "rgba(255,255,255,0.1)";

/// Above this many points the markers are dropped
const DENSE_POINTS: usize = 30;

const CLOSE_LABEL: &str = "Last Updated on Last Market Close";

fn point_radius(points: usize) -> u8 {
    if points > DENSE_POINTS { 0 } else { 3 }
}

pub fn stats_view(stats: &WealthStats, animate: bool) -> StatsView {
    let (change_text, change_class) = match stats.period_change {
        Some(change) => {
            let sign = if change.is_up() { "+" } else { "" };
            (
                format!(
                    "{sign}{} ({}) last period",
                    fmt_usd(change.diff),
                    fmt_pct(change.pct)
                ),
                if change.is_up() { "up" } else { "down" },
            )
        }
        None => (PLACEHOLDER.to_string(), ""),
    };

    StatsView {
        as_of_label: stats
            .live_as_of
            .as_deref()
            .map(|ts| format!("Live as of {}", fmt_log_timestamp(Some(ts))))
            .unwrap_or_else(|| CLOSE_LABEL.to_string()),
        current_wealth: fmt_usd(stats.current_wealth),
        current_wealth_raw: stats.current_wealth,
        change_text,
        change_class,
        total_return: format!(
            "{} / {}",
            fmt_pct(stats.total_return_pct),
            fmt_usd(stats.dollar_return)
        ),
        total_return_pct_raw: stats.total_return_pct,
        total_return_positive: stats.total_return_pct >= 0.0,
        started_at: format!("Started at {}", fmt_usd(stats.initial_wealth)),
        animate,
    }
}

/// Wealth line plus a dashed baseline at the starting value
pub fn wealth_chart_spec<'a, I>(points: I, view_mode: ViewMode, fallback: f64) -> Option<ChartSpec>
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    let (labels, values): (Vec<String>, Vec<f64>) = points
        .into_iter()
        .map(|(date, wealth)| {
            (
                date.filter(|d| !d.is_empty())
                    .unwrap_or(PLACEHOLDER)
                    .to_string(),
                parse_number(wealth).unwrap_or(0.0),
            )
        })
        .unzip();

    let first = *values.first()?;
    let initial = if first == 0.0 { fallback } else { first };
    let (y_min, y_max) = metrics::y_axis_bounds(&values)?;
    let unit = match view_mode {
        ViewMode::Biweekly => "periods",
        ViewMode::Daily => "days",
    };

    Some(ChartSpec {
        canvas: ChartCanvas::Wealth,
        caption: format!("{} {unit}", values.len()),
        point_radius: point_radius(values.len()),
        series: vec![
            Series {
                name: "Wealth".to_string(),
                color: WEALTH_COLOR,
                values: values.clone(),
                dashed: false,
                fill: true,
            },
            Series {
                name: "Start".to_string(),
                color: BASELINE_COLOR,
                values: vec![initial; values.len()],
                dashed: true,
                fill: false,
            },
        ],
        labels,
        y_min,
        y_max,
        ticks: TickFormat::ThousandsUsd,
    })
}

/// One line per ticker across the whole history
pub fn weights_chart_spec(rows: &[WealthRecord], tickers: &[String]) -> Option<ChartSpec> {
    if rows.is_empty() || tickers.is_empty() {
        return None;
    }
    let history = metrics::weight_history(rows, tickers);
    let peak = history
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .fold(0.0_f64, f64::max);

    Some(ChartSpec {
        canvas: ChartCanvas::Weights,
        caption: format!("{} tickers", tickers.len()),
        labels: rows
            .iter()
            .map(|r| r.date.clone().unwrap_or_else(|| PLACEHOLDER.to_string()))
            .collect(),
        series: history
            .into_iter()
            .enumerate()
            .map(|(i, (ticker, values))| Series {
                name: ticker,
                color: PALETTE[i % PALETTE.len()],
                values,
                dashed: false,
                fill: false,
            })
            .collect(),
        y_min: 0.0,
        y_max: (peak + 5.0).clamp(10.0, 100.0),
        point_radius: point_radius(rows.len()),
        ticks: TickFormat::Percent,
    })
}

pub fn weight_bars(weights: &[TickerWeight]) -> Vec<WeightBar> {
    weights
        .iter()
        .enumerate()
        .map(|(i, w)| WeightBar {
            ticker: w.ticker.clone(),
            width_pct: w.pct,
            label: format!("{:.1}%", w.pct),
            color: PALETTE[i % PALETTE.len()],
        })
        .collect()
}

pub fn penalty_views(gauges: &[PenaltyGauge]) -> Vec<PenaltyGaugeView> {
    gauges
        .iter()
        .enumerate()
        .map(|(i, g)| PenaltyGaugeView {
            label: format!(
                "{} Risk Penalty: {}",
                if i == 0 { "Most Recent" } else { "Previous" },
                g.raw
            ),
            fill_pct: g.fill_pct,
            color: g.tier.color(),
            timestamp: fmt_log_timestamp(g.timestamp.as_deref()),
        })
        .collect()
}

/// Most recent first; the stored order is left alone
pub fn log_rows(logs: &[LogEntry]) -> Vec<LogRow> {
    logs.iter()
        .rev()
        .map(|log| {
            let action = log.action.label();
            LogRow {
                timestamp: fmt_log_timestamp(log.timestamp.as_deref()),
                action: if action.is_empty() {
                    PLACEHOLDER.to_string()
                } else {
                    action
                },
                badge_class: log.action.badge_class(),
                ticker: log
                    .ticker
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                qty: log
                    .qty
                    .map_or_else(|| PLACEHOLDER.to_string(), |q| q.to_string()),
                price: log.price.map_or_else(|| PLACEHOLDER.to_string(), |p| fmt_usd(p)),
                value: log.notional().map_or_else(|| PLACEHOLDER.to_string(), |v| fmt_usd(v)),
                penalty: log
                    .penalty
                    .map_or_else(|| PLACEHOLDER.to_string(), |p| format!("{p:.2}")),
            }
        })
        .collect()
}

pub fn status_view(now: DateTime<Utc>, next_refresh_secs: u64, view_mode: ViewMode) -> StatusView {
    StatusView {
        last_sync: format!("LAST SYNC: {}", fmt_sync_time(now)),
        next_refresh_secs,
        view_mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PeriodChange;
    use crate::types::TradeAction;

    fn stats(change: Option<PeriodChange>, live: Option<&str>) -> WealthStats {
        WealthStats {
            initial_wealth: 100_000.0,
            current_wealth: 98_500.0,
            total_return_pct: -1.5,
            dollar_return: -1_500.0,
            period_change: change,
            live_as_of: live.map(String::from),
        }
    }

    #[test]
    fn test_stats_view_text() {
        let view = stats_view(
            &stats(Some(PeriodChange { diff: -500.0, pct: -0.5 }), None),
            false,
        );
        assert_eq!(view.current_wealth, "$98,500");
        assert_eq!(view.change_text, "-$500 (-0.50%) last period");
        assert_eq!(view.change_class, "down");
        assert_eq!(view.total_return, "-1.50% / -$1,500");
        assert!(!view.total_return_positive);
        assert_eq!(view.started_at, "Started at $100,000");
        assert_eq!(view.as_of_label, CLOSE_LABEL);
    }

    #[test]
    fn test_stats_view_live_and_first_period() {
        let view = stats_view(&stats(None, Some("2024-03-01T15:30:00")), true);
        assert_eq!(view.change_text, PLACEHOLDER);
        assert_eq!(view.change_class, "");
        assert_eq!(view.as_of_label, "Live as of 2024-03-01 15:30:00");
        assert!(view.animate);
    }

    #[test]
    fn test_wealth_chart_spec() {
        let points = vec![
            (Some("2024-01-01"), Some("100000")),
            (None, Some("bad")),
            (Some("2024-01-29"), Some("100400")),
        ];
        let spec = wealth_chart_spec(points, ViewMode::Biweekly, 100_000.0).expect("spec");

        assert_eq!(spec.caption, "3 periods");
        assert_eq!(spec.labels[1], PLACEHOLDER);
        assert_eq!(spec.series[0].values, vec![100_000.0, 0.0, 100_400.0]);
        assert_eq!(spec.series[1].values, vec![100_000.0; 3]);
        assert!(spec.series[1].dashed);
        assert_eq!(spec.point_radius, 3);
        // range > 1000 because of the zero row: 10% padding
        assert!((spec.y_min + 10_040.0).abs() < 1e-6);
    }

    #[test]
    fn test_wealth_chart_spec_daily_dense() {
        let points: Vec<(Option<&str>, Option<&str>)> =
            (0..31).map(|_| (Some("2024-01-01"), Some("0"))).collect();
        let spec = wealth_chart_spec(points, ViewMode::Daily, 100_000.0).expect("spec");
        assert_eq!(spec.caption, "31 days");
        assert_eq!(spec.point_radius, 0);
        assert_eq!(spec.series[1].values[0], 100_000.0);

        let empty: Vec<(Option<&str>, Option<&str>)> = Vec::new();
        assert!(wealth_chart_spec(empty, ViewMode::Daily, 100_000.0).is_none());
    }

    #[test]
    fn test_weight_bars_cycle_palette() {
        let weights: Vec<TickerWeight> = (0..8)
            .map(|i| TickerWeight {
                ticker: format!("T{i}"),
                pct: 12.345,
            })
            .collect();
        let bars = weight_bars(&weights);
        assert_eq!(bars[0].label, "12.3%");
        assert_eq!(bars[7].color, PALETTE[0]);
    }

    #[test]
    fn test_penalty_view_labels() {
        let views = penalty_views(&[
            PenaltyGauge::new(17.0, Some("2024-03-04T10:00:00".to_string())),
            PenaltyGauge::new(3.25, None),
        ]);
        assert_eq!(views[0].label, "Most Recent Risk Penalty: 17");
        assert_eq!(views[0].color, "#ff3b5c");
        assert_eq!(views[0].timestamp, "2024-03-04 10:00:00");
        assert_eq!(views[1].label, "Previous Risk Penalty: 3.25");
        assert_eq!(views[1].timestamp, PLACEHOLDER);
    }

    #[test]
    fn test_penalty_labels_show_value_as_written() {
        let logs = crate::loaders::parse_logs(r#"[{"penalty":"3.50"},{"penalty":"n/a"}]"#)
            .expect("logs");
        let views = penalty_views(&metrics::penalty_history(&logs, 3));

        assert_eq!(views[0].label, "Most Recent Risk Penalty: n/a");
        assert_eq!(views[0].fill_pct, 0.0);
        assert_eq!(views[1].label, "Previous Risk Penalty: 3.50");
        assert!((views[1].fill_pct - 17.5).abs() < 1e-9);
    }

    #[test]
    fn test_log_rows_reverse_and_placeholders() {
        let logs = vec![
            LogEntry {
                timestamp: Some("2024-03-01T10:00:00".to_string()),
                action: TradeAction::Buy,
                ticker: Some("MSFT".to_string()),
                qty: Some(10.0),
                price: Some(410.0),
                penalty: Some(4.0),
                penalty_raw: Some("4".to_string()),
            },
            LogEntry::default(),
        ];
        let rows = log_rows(&logs);

        assert_eq!(rows[0].timestamp, PLACEHOLDER);
        assert_eq!(rows[0].action, PLACEHOLDER);
        assert_eq!(rows[0].badge_class, "rebalance");
        assert_eq!(rows[0].value, PLACEHOLDER);

        assert_eq!(rows[1].action, "BUY");
        assert_eq!(rows[1].qty, "10");
        assert_eq!(rows[1].price, "$410");
        assert_eq!(rows[1].value, "$4,100");
        assert_eq!(rows[1].penalty, "4.00");
        // stored order untouched
        assert_eq!(logs[0].ticker.as_deref(), Some("MSFT"));
    }
}
