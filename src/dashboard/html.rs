//! Dashboard HTML template
//!
//! Page structure with one element per region:
//! - Header with view tabs and sync status
//! - Current wealth and total return cards
//! - Wealth chart
//! - Weights bars and weights-over-time chart
//! - Risk penalty gauges
//! - Trade log table

use crate::format::PLACEHOLDER;
use crate::view::{HtmlSink, Region};

/// Body markup with the first paint already filled in
pub fn body(sink: &HtmlSink, weights_history: bool) -> String {
    let region = |r: Region, fallback: &str| sink.region(r).unwrap_or(fallback).to_string();
    let empty_stats = format!(
        r#"<div class="stat-card"><div class="stat-label">Current Wealth</div><div class="stat-value">{PLACEHOLDER}</div></div>
<div class="stat-card"><div class="stat-label">Total Return</div><div class="stat-value">{PLACEHOLDER}</div></div>"#
    );

    format!(
        r#"
    <div class="container">
        <header>
            <div>
                <h1><span>▲</span> WEALTH MONITOR</h1>
            </div>
            <div class="tabs" id="viewTabs">{tabs}</div>
            <div class="status" id="status">{status}</div>
        </header>

        <div class="stats" id="stats">{stats}</div>

        <div class="grid">
            <!-- Wealth -->
            <div class="card wide">
                <div class="card-header">
                    <span class="card-title">Portfolio Wealth</span>
                </div>
                <div id="wealthChart">{wealth_chart}</div>
            </div>

            <!-- Weights -->
            <div class="card">
                <div class="card-header">
                    <span class="card-title">Current Weights</span>
                </div>
                <div id="weightsContainer">{weights}</div>
            </div>
{weights_history_card}
            <!-- Risk -->
            <div class="card">
                <div class="card-header">
                    <span class="card-title">Risk Penalty</span>
                </div>
                <div id="penaltyGauges">{penalties}</div>
            </div>

            <!-- Trade Log -->
            <div class="card wide">
                <div class="card-header">
                    <span class="card-title">Trade Log</span>
                    <span class="log-count" id="logCount">{log_count}</span>
                </div>
                <table class="log-table">
                    <thead>
                        <tr>
                            <th>Time</th>
                            <th>Action</th>
                            <th>Ticker</th>
                            <th>Qty</th>
                            <th>Price</th>
                            <th>Value</th>
                            <th>Penalty</th>
                        </tr>
                    </thead>
                    <tbody id="logBody">{logs}</tbody>
                </table>
            </div>
        </div>
    </div>
"#,
        tabs = region(Region::ViewTabs, ""),
        status = region(Region::Status, "Loading..."),
        stats = region(Region::Stats, &empty_stats),
        wealth_chart = region(Region::WealthChart, ""),
        weights = region(Region::WeightsContainer, ""),
        weights_history_card = if weights_history {
            format!(
                r#"
            <div class="card">
                <div class="card-header">
                    <span class="card-title">Weights Over Time</span>
                </div>
                <div id="weightsChart">{}</div>
            </div>
"#,
                region(Region::WeightsChart, "")
            )
        } else {
            String::new()
        },
        penalties = region(Region::PenaltyGauges, ""),
        log_count = region(Region::LogCount, ""),
        logs = region(Region::LogBody, ""),
    )
}
