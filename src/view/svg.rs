//! Line charts as inline SVG

use std::fmt::Write as _;

use super::{ChartSpec, TickFormat};
use crate::format::{escape_html, fmt_axis_pct, fmt_axis_usd};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 200.0;
const LEFT: f64 = 48.0;
const RIGHT: f64 = 8.0;
const TOP: f64 = 8.0;
const BOTTOM: f64 = 8.0;
const GRID_LINES: usize = 4;

struct Frame {
    count: usize,
    y_min: f64,
    y_span: f64,
}

impl Frame {
    fn x(&self, i: usize) -> f64 {
        let plot_w = WIDTH - LEFT - RIGHT;
        if self.count <= 1 {
            LEFT + plot_w / 2.0
        } else {
            LEFT + plot_w * i as f64 / (self.count - 1) as f64
        }
    }

    fn y(&self, v: f64) -> f64 {
        let plot_h = HEIGHT - TOP - BOTTOM;
        TOP + plot_h * (1.0 - (v - self.y_min) / self.y_span)
    }
}

fn tick_label(format: TickFormat, value: f64) -> String {
    match format {
        TickFormat::ThousandsUsd => fmt_axis_usd(value),
        TickFormat::Percent => fmt_axis_pct(value),
    }
}

fn point_label(format: TickFormat, value: f64) -> String {
    match format {
        TickFormat::ThousandsUsd => crate::format::fmt_usd(value),
        TickFormat::Percent => format!("{value:.1}%"),
    }
}

/// Render the chart; `chart_id` keeps gradient ids unique on the page
pub fn render(spec: &ChartSpec, chart_id: u64) -> String {
    let frame = Frame {
        count: spec.labels.len(),
        y_min: spec.y_min,
        y_span: if spec.y_max > spec.y_min {
            spec.y_max - spec.y_min
        } else {
            1.0
        },
    };

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="chart-svg" viewBox="0 0 {WIDTH} {HEIGHT}" preserveAspectRatio="none" role="img" data-chart-id="{chart_id}">"#
    );

    // grid + y ticks
    for step in 0..=GRID_LINES {
        let value = spec.y_min + frame.y_span * step as f64 / GRID_LINES as f64;
        let y = frame.y(value);
        let _ = write!(
            svg,
            r##"<line x1="{LEFT}" y1="{y:.1}" x2="{x2}" y2="{y:.1}" stroke="rgba(26,35,50,0.6)" stroke-width="1"/><text x="{tx}" y="{ty:.1}" fill="#4a5568" font-size="10" text-anchor="end">{label}</text>"##,
            x2 = WIDTH - RIGHT,
            tx = LEFT - 6.0,
            ty = y + 3.0,
            label = escape_html(&tick_label(spec.ticks, value)),
        );
    }

    for (n, series) in spec.series.iter().enumerate() {
        let points: Vec<(f64, f64)> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| (frame.x(i), frame.y(*v)))
            .collect();
        if points.is_empty() {
            continue;
        }
        let path = points
            .iter()
            .map(|(x, y)| format!("{x:.1},{y:.1}"))
            .collect::<Vec<_>>()
            .join(" ");

        if series.fill {
            let gradient = format!("grad-{chart_id}-{n}");
            let base = HEIGHT - BOTTOM;
            let (first_x, _) = points[0];
            let (last_x, _) = points[points.len() - 1];
            let _ = write!(
                svg,
                r#"<defs><linearGradient id="{gradient}" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="{c}" stop-opacity="0.25"/><stop offset="1" stop-color="{c}" stop-opacity="0"/></linearGradient></defs><polygon fill="url(#{gradient})" points="{first_x:.1},{base:.1} {path} {last_x:.1},{base:.1}"/>"#,
                c = series.color,
            );
        }

        let dash = if series.dashed {
            r#" stroke-dasharray="4 4""#
        } else {
            ""
        };
        let width = if series.dashed { 1 } else { 2 };
        let _ = write!(
            svg,
            r#"<polyline fill="none" stroke="{color}" stroke-width="{width}"{dash} points="{path}"><title>{name}</title></polyline>"#,
            color = series.color,
            name = escape_html(&series.name),
        );

        if spec.point_radius > 0 && !series.dashed {
            for (i, (x, y)) in points.iter().enumerate() {
                let label = spec.labels.get(i).map_or("", String::as_str);
                let _ = write!(
                    svg,
                    r#"<circle cx="{x:.1}" cy="{y:.1}" r="{r}" fill="{color}"><title>{label}: {value}</title></circle>"#,
                    r = spec.point_radius,
                    color = series.color,
                    label = escape_html(label),
                    value = escape_html(&point_label(spec.ticks, series.values[i])),
                );
            }
        }
    }

    svg.push_str("</svg>");
    svg
}
