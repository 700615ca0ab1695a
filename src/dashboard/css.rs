//! Dashboard CSS styles
//!
//! Dark terminal theme. Colors are CSS custom properties so the region
//! fragments can refer to them (`var(--accent2)`, `var(--danger)`, ...).

pub const STYLES: &str = r"
* { box-sizing: border-box; margin: 0; padding: 0; }

:root {
    --bg: #0a0e14;
    --card: #0f1520;
    --border: #1a2332;
    --text: #c8d3e0;
    --text-dim: #4a5568;
    --accent: #00ff88;
    --accent2: #00ff88;
    --danger: #ff3b5c;
    --warn: #ffaa00;
    --blue: #0088ff;
}

body {
    font-family: 'JetBrains Mono', 'SF Mono', Menlo, Consolas, monospace;
    background: var(--bg);
    color: var(--text);
    padding: 20px;
    min-height: 100vh;
}

.container { max-width: 1280px; margin: 0 auto; }

/* Header */
header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 24px;
    padding-bottom: 16px;
    border-bottom: 1px solid var(--border);
}

h1 { font-size: 20px; font-weight: 600; letter-spacing: 1px; }
h1 span { color: var(--accent); }

.status {
    display: flex;
    align-items: center;
    gap: 16px;
    font-size: 11px;
    color: var(--text-dim);
    letter-spacing: 0.5px;
}

.countdown { color: var(--accent); }

/* View tabs */
.tabs { display: flex; gap: 6px; }

.tab {
    padding: 6px 14px;
    border-radius: 6px;
    border: 1px solid var(--border);
    background: transparent;
    color: var(--text-dim);
    font: inherit;
    font-size: 12px;
    cursor: pointer;
    transition: all 0.2s;
}

.tab:hover { color: var(--text); }
.tab.active { background: rgba(0, 255, 136, 0.1); color: var(--accent); border-color: var(--accent); }

/* Grid Layout */
.grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
    gap: 16px;
}

.wide { grid-column: 1 / -1; }

/* Cards */
.card, .stat-card {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 10px;
    padding: 20px;
}

.card-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 16px;
}

.card-title {
    font-size: 12px;
    color: var(--text-dim);
    text-transform: uppercase;
    letter-spacing: 1px;
}

.chart-caption { font-size: 11px; color: var(--text-dim); margin-bottom: 8px; }
.chart-svg { width: 100%; height: 200px; display: block; }

/* Stats */
.stats {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
    gap: 16px;
    margin-bottom: 16px;
}

.stat-label { font-size: 11px; color: var(--text-dim); text-transform: uppercase; letter-spacing: 1px; }
.stat-label span { text-transform: none; margin-left: 6px; }
.stat-value { font-size: 30px; font-weight: 700; margin-top: 8px; }
.stat-sub { font-size: 12px; color: var(--text-dim); margin-top: 6px; }
.stat-sub.up { color: var(--accent2); }
.stat-sub.down { color: var(--danger); }

/* Weights */
.weight-row {
    display: flex;
    align-items: center;
    gap: 10px;
    padding: 5px 0;
    font-size: 12px;
}

.weight-ticker { width: 48px; font-weight: 600; }
.weight-bar-bg { flex: 1; height: 8px; background: var(--border); border-radius: 4px; overflow: hidden; }
.weight-bar-fill { height: 100%; border-radius: 4px; transition: width 0.6s ease; }
.weight-pct { width: 52px; text-align: right; color: var(--text-dim); }

/* Penalty gauges */
.penalty-slot { padding: 8px 0; }
.penalty-slot + .penalty-slot { opacity: 0.6; }
.penalty-label { font-size: 12px; margin-bottom: 6px; }
.penalty-track { height: 10px; background: var(--border); border-radius: 5px; overflow: hidden; }
.penalty-fill { height: 100%; border-radius: 5px; transition: width 0.6s ease; }
.penalty-time { font-size: 10px; color: var(--text-dim); margin-top: 4px; }

/* Trade log */
.log-table { width: 100%; border-collapse: collapse; font-size: 12px; }

.log-table th,
.log-table td {
    text-align: left;
    padding: 9px 8px;
    border-bottom: 1px solid var(--border);
}

.log-table th {
    color: var(--text-dim);
    font-weight: 500;
    font-size: 11px;
    text-transform: uppercase;
}

.log-table tr:last-child td { border-bottom: none; }

.timestamp { color: var(--text-dim); white-space: nowrap; }
.ticker-cell { font-weight: 600; }
.price-cell, .qty-cell, .penalty-cell { font-variant-numeric: tabular-nums; }

.action-badge {
    font-size: 10px;
    padding: 3px 8px;
    border-radius: 4px;
    font-weight: 600;
    letter-spacing: 0.5px;
}

.action-badge.buy { background: rgba(0, 255, 136, 0.12); color: var(--accent); }
.action-badge.sell { background: rgba(255, 59, 92, 0.12); color: var(--danger); }
.action-badge.rebalance { background: rgba(0, 136, 255, 0.12); color: var(--blue); }

.log-count { font-size: 11px; color: var(--text-dim); }

.empty-state { text-align: center; padding: 28px; color: var(--text-dim); }
.empty-state .big { display: block; font-size: 28px; margin-bottom: 8px; }

/* Responsive */
@media (max-width: 600px) {
    .grid, .stats { grid-template-columns: 1fr; }
    header { flex-direction: column; gap: 12px; }
    .status { flex-wrap: wrap; justify-content: center; }
}
";
