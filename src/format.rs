//! Display formatting
//!
//! Pure number/text → string helpers shared by every renderer.

use chrono::{DateTime, Utc};

/// Shown wherever a value is missing or not a number
pub const PLACEHOLDER: &str = "—";

/// Whole-dollar currency: `-1234.4` → `-$1,234`
pub fn fmt_usd(value: impl Into<Option<f64>>) -> String {
    match value.into() {
        Some(n) if n.is_finite() => {
            let formatted = format!("${}", group_thousands(n.abs().round()));
            if n < 0.0 && n.abs().round() > 0.0 {
                format!("-{formatted}")
            } else {
                formatted
            }
        }
        _ => PLACEHOLDER.to_string(),
    }
}

/// Signed percentage with two decimals: `5` → `+5.00%`
pub fn fmt_pct(value: impl Into<Option<f64>>) -> String {
    match value.into() {
        Some(n) if n.is_finite() => {
            // -0.0 compares >= 0 and must not print as "+-0.00"
            let n = if n == 0.0 { 0.0 } else { n };
            let sign = if n >= 0.0 { "+" } else { "" };
            format!("{sign}{n:.2}%")
        }
        _ => PLACEHOLDER.to_string(),
    }
}

/// Y-axis tick for wealth charts: `104500` → `$105k`
pub fn fmt_axis_usd(value: f64) -> String {
    let thousands = (value / 1000.0).round();
    let thousands = if thousands == 0.0 { 0.0 } else { thousands };
    format!("${thousands:.0}k")
}

/// Y-axis tick for weight charts: `12.34` → `12%`
pub fn fmt_axis_pct(value: f64) -> String {
    let rounded = value.round();
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.0}%")
}

/// `2024-03-01T15:30:00.123Z` → `2024-03-01 15:30:00`
pub fn fmt_log_timestamp(timestamp: Option<&str>) -> String {
    match timestamp {
        Some(ts) if !ts.is_empty() => ts.replacen('T', " ", 1).chars().take(19).collect(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Status line clock, e.g. `3/1/2024, 3:30:00 PM`
pub fn fmt_sync_time(now: DateTime<Utc>) -> String {
    now.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string().to_uppercase()
}

/// Escape text for use inside HTML element content and attribute values
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Parse a cell the way the dashboard always has: unparseable → `None`
pub fn parse_number(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|c| c.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn group_thousands(whole: f64) -> String {
    let digits = format!("{whole:.0}");
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
