//! Dashboard module - wealth monitor web interface
//!
//! The worker renders the first paint into the page; after that the script
//! polls `/api/regions` and swaps fragments in place.
//!
//! # Architecture
//! - `html.rs`: Page structure, one element per region
//! - `css.rs`: Styling with CSS custom properties
//! - `js.rs`: Poll loop, countdown, tabs and counters

mod css;
mod html;
mod js;

use crate::config::Config;
use crate::types::ViewMode;
use crate::view::HtmlSink;

/// Generate the complete dashboard HTML page
pub fn dashboard_html(sink: &HtmlSink, view_mode: ViewMode, config: &Config) -> String {
    let refresh_seconds = config.refresh_interval_seconds;
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Wealth Monitor</title>
    <style>
{css}
    </style>
</head>
<body>
{html}
    <script>
const CONFIG = {{ refreshSeconds: {refresh_seconds}, view: '{view_mode}' }};
{js}
    </script>
</body>
</html>"#,
        css = css::STYLES,
        html = html::body(sink, config.dashboard.weights_history),
        js = js::SCRIPT
    )
}
