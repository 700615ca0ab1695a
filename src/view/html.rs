//! HTML sink
//!
//! Keeps one HTML fragment per region. The page script swaps each fragment
//! into the element with the same id, so a region is always replaced whole.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::{
    ChartCanvas, ChartHandle, ChartSpec, LogRow, PenaltyGaugeView, Region, StatsView, StatusView,
    ViewSink, WeightBar, svg,
};
use crate::format::escape_html;
use crate::types::ViewMode;

const EMPTY_LOGS: &str = r#"<tr><td colspan="7">
      <div class="empty-state">
        <span class="big">◌</span>
        No trade logs found. Run the trading script to populate.
      </div>
    </td></tr>"#;

/// Region map plus the registry of live charts
#[derive(Debug, Default)]
pub struct HtmlSink {
    regions: BTreeMap<Region, String>,
    live: Vec<(u64, ChartCanvas)>,
    next_chart_id: u64,
}

impl HtmlSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }

    /// Live chart instances bound to `canvas`
    pub fn live_charts(&self, canvas: ChartCanvas) -> usize {
        self.live.iter().filter(|(_, c)| *c == canvas).count()
    }

    /// Element id → fragment, for the page script
    pub fn to_fragments(&self) -> BTreeMap<&'static str, String> {
        self.regions
            .iter()
            .map(|(region, html)| (region.id(), html.clone()))
            .collect()
    }

    fn set(&mut self, region: Region, html: String) {
        self.regions.insert(region, html);
    }
}

fn counter_attrs(animate: bool, target: f64, format: &str, final_text: &str) -> String {
    if animate {
        format!(
            r#" data-count-to="{target}" data-format="{format}" data-final="{}""#,
            escape_html(final_text)
        )
    } else {
        String::new()
    }
}

impl ViewSink for HtmlSink {
    fn render_stats(&mut self, stats: Option<&StatsView>) {
        let Some(s) = stats else {
            return;
        };
        let as_of = escape_html(&s.as_of_label);
        let return_color = if s.total_return_positive {
            "var(--accent2)"
        } else {
            "var(--danger)"
        };

        let html = format!(
            r#"<div class="stat-card">
  <div class="stat-label">Current Wealth <span>{as_of}</span></div>
  <div class="stat-value" id="currentWealth"{wealth_attrs}>{current}</div>
  <div class="stat-sub {change_class}" id="wealthChange">{change}</div>
</div>
<div class="stat-card">
  <div class="stat-label">Total Return <span>{as_of}</span></div>
  <div class="stat-value" id="totalReturn" style="color:{return_color}"{return_attrs}>{total}</div>
  <div class="stat-sub" id="initialWealth">{started}</div>
</div>"#,
            wealth_attrs = counter_attrs(s.animate, s.current_wealth_raw, "usd", &s.current_wealth),
            current = escape_html(&s.current_wealth),
            change_class = s.change_class,
            change = escape_html(&s.change_text),
            return_attrs = counter_attrs(s.animate, s.total_return_pct_raw, "pct", &s.total_return),
            total = escape_html(&s.total_return),
            started = escape_html(&s.started_at),
        );
        self.set(Region::Stats, html);
    }

    fn create_chart(&mut self, spec: &ChartSpec) -> ChartHandle {
        self.next_chart_id += 1;
        let id = self.next_chart_id;
        self.live.push((id, spec.canvas));

        let html = format!(
            r#"<div class="chart-caption">{}</div>{}"#,
            escape_html(&spec.caption),
            svg::render(spec, id)
        );
        self.set(spec.canvas.region(), html);

        ChartHandle {
            id,
            canvas: spec.canvas,
        }
    }

    fn destroy_chart(&mut self, handle: ChartHandle) {
        self.live.retain(|(id, _)| *id != handle.id);
        self.regions.remove(&handle.canvas.region());
    }

    fn render_weights(&mut self, bars: &[WeightBar]) {
        if bars.is_empty() {
            return;
        }
        let mut html = String::new();
        for bar in bars {
            let _ = write!(
                html,
                r#"
    <div class="weight-row">
      <span class="weight-ticker">{ticker}</span>
      <div class="weight-bar-bg">
        <div class="weight-bar-fill" style="width:{width:.1}%;background:{color}"></div>
      </div>
      <span class="weight-pct">{label}</span>
    </div>"#,
                ticker = escape_html(&bar.ticker),
                width = bar.width_pct.clamp(0.0, 100.0),
                color = bar.color,
                label = escape_html(&bar.label),
            );
        }
        self.set(Region::WeightsContainer, html);
    }

    fn render_penalties(&mut self, gauges: &[PenaltyGaugeView]) {
        if gauges.is_empty() {
            return;
        }
        let mut html = String::new();
        for gauge in gauges {
            let _ = write!(
                html,
                r#"
    <div class="penalty-slot">
      <div class="penalty-label">{label}</div>
      <div class="penalty-track">
        <div class="penalty-fill" style="width:{fill}%;background:{color};box-shadow:0 0 8px {color}"></div>
      </div>
      <div class="penalty-time">{ts}</div>
    </div>"#,
                label = escape_html(&gauge.label),
                fill = gauge.fill_pct,
                color = gauge.color,
                ts = escape_html(&gauge.timestamp),
            );
        }
        self.set(Region::PenaltyGauges, html);
    }

    fn render_logs(&mut self, rows: &[LogRow]) {
        self.set(Region::LogCount, format!("{} entries", rows.len()));

        if rows.is_empty() {
            self.set(Region::LogBody, EMPTY_LOGS.to_string());
            return;
        }

        let mut html = String::new();
        for row in rows {
            let _ = write!(
                html,
                r#"<tr>
      <td class="timestamp">{ts}</td>
      <td><span class="action-badge {badge}">{action}</span></td>
      <td class="ticker-cell">{ticker}</td>
      <td class="qty-cell">{qty}</td>
      <td class="price-cell">{price}</td>
      <td style="color:var(--warn)" class="price-cell">{value}</td>
      <td class="penalty-cell">{penalty}</td>
    </tr>"#,
                ts = escape_html(&row.timestamp),
                badge = row.badge_class,
                action = escape_html(&row.action),
                ticker = escape_html(&row.ticker),
                qty = escape_html(&row.qty),
                price = escape_html(&row.price),
                value = escape_html(&row.value),
                penalty = escape_html(&row.penalty),
            );
        }
        self.set(Region::LogBody, html);
    }

    fn render_status(&mut self, status: &StatusView) {
        self.set(
            Region::Status,
            format!(
                r#"<span id="lastUpdate">{sync}</span>
<span class="countdown" id="countdown" data-seconds="{secs}">NEXT SYNC IN {secs}s</span>"#,
                sync = escape_html(&status.last_sync),
                secs = status.next_refresh_secs,
            ),
        );

        let tabs = [ViewMode::Biweekly, ViewMode::Daily]
            .iter()
            .map(|mode| {
                format!(
                    r#"<button class="tab{active}" data-view="{mode}">{label}</button>"#,
                    active = if *mode == status.view_mode { " active" } else { "" },
                    label = match mode {
                        ViewMode::Biweekly => "Biweekly",
                        ViewMode::Daily => "Daily",
                    },
                )
            })
            .collect::<String>();
        self.set(Region::ViewTabs, tabs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn row(ticker: &str) -> LogRow {
        LogRow {
            timestamp: "2024-03-01 10:00:00".to_string(),
            action: "BUY".to_string(),
            badge_class: "buy",
            ticker: ticker.to_string(),
            qty: "10".to_string(),
            price: "$410".to_string(),
            value: "$4,100".to_string(),
            penalty: "4.00".to_string(),
        }
    }

    #[test]
    fn test_logs_replace_not_append() {
        let mut sink = HtmlSink::new();
        sink.render_logs(&[row("MSFT"), row("JPM")]);
        sink.render_logs(&[row("XOM")]);

        let body = sink.region(Region::LogBody).expect("log body");
        assert_eq!(body.matches("<tr>").count(), 1);
        assert!(body.contains("XOM"));
        assert_eq!(sink.region(Region::LogCount), Some("1 entries"));
    }

    #[test]
    fn test_logs_empty_state() {
        let mut sink = HtmlSink::new();
        sink.render_logs(&[row("MSFT")]);
        sink.render_logs(&[]);

        let body = sink.region(Region::LogBody).expect("log body");
        assert!(body.contains("empty-state"));
        assert!(body.contains("No trade logs found"));
        assert_eq!(sink.region(Region::LogCount), Some("0 entries"));
    }

    #[test]
    fn test_log_cells_are_escaped() {
        let mut sink = HtmlSink::new();
        sink.render_logs(&[row("<script>")]);
        let body = sink.region(Region::LogBody).expect("log body");
        assert!(body.contains("&lt;script&gt;"));
        assert!(!body.contains("<script>"));
    }

    #[test]
    fn test_empty_inputs_keep_previous_content() {
        let mut sink = HtmlSink::new();
        sink.render_weights(&[WeightBar {
            ticker: "MSFT".to_string(),
            width_pct: 55.0,
            label: "55.0%".to_string(),
            color: "#00ff88",
        }]);
        sink.render_weights(&[]);
        sink.render_stats(None);
        sink.render_penalties(&[]);

        assert!(sink.region(Region::WeightsContainer).unwrap().contains("width:55.0%"));
        assert!(sink.region(Region::Stats).is_none());
        assert!(sink.region(Region::PenaltyGauges).is_none());
    }

    #[test]
    fn test_status_and_tabs() {
        let mut sink = HtmlSink::new();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap();
        sink.render_status(&crate::view::status_view(now, 60, ViewMode::Daily));

        let status = sink.region(Region::Status).expect("status");
        assert!(status.contains("LAST SYNC: 3/1/2024, 9:05:00 AM"));
        assert!(status.contains(r#"data-seconds="60""#));

        let tabs = sink.region(Region::ViewTabs).expect("tabs");
        assert!(tabs.contains(r#"<button class="tab active" data-view="daily">Daily</button>"#));
        assert!(tabs.contains(r#"<button class="tab" data-view="biweekly">"#));
    }

    #[test]
    fn test_fragments_keyed_by_element_id() {
        let mut sink = HtmlSink::new();
        sink.render_logs(&[]);
        let fragments = sink.to_fragments();
        assert!(fragments.contains_key("logBody"));
        assert!(fragments.contains_key("logCount"));
    }
}
