//! Dashboard JavaScript
//!
//! Client-side loop for the wealth dashboard:
//! - Re-polls `/api/regions` on a fixed timer and swaps each region in
//! - View tabs trigger an immediate poll with the new view
//! - Countdown to the next sync
//! - Counts the headline figures up when the first paint asks for it
//!
//! Expects a global `CONFIG = { refreshSeconds, view }` defined before it.

pub const SCRIPT: &str = r#"
// ============================================================================
// State
// ============================================================================
let currentView = CONFIG.view;
let secondsLeft = CONFIG.refreshSeconds;

// ============================================================================
// Regions
// ============================================================================
async function fetchRegions(trigger) {
    const url = `/api/regions?view=${currentView}&trigger=${trigger}&t=${Date.now()}`;
    try {
        const res = await fetch(url);
        if (!res.ok) return null;
        return await res.json();
    } catch (e) {
        return null;
    }
}

function applyRegions(regions) {
    if (!regions) return;
    for (const [id, html] of Object.entries(regions)) {
        const el = document.getElementById(id);
        if (el) el.innerHTML = html;
    }
    const countdown = document.getElementById('countdown');
    if (countdown) secondsLeft = parseInt(countdown.dataset.seconds, 10) || CONFIG.refreshSeconds;
    animateCounters();
}

// Overlapping polls are not serialized; whichever response lands last wins.
async function refresh(trigger) {
    applyRegions(await fetchRegions(trigger));
}

// ============================================================================
// Counters
// ============================================================================
function formatCounter(value, format) {
    if (format === 'pct') {
        return (value >= 0 ? '+' : '') + value.toFixed(2) + '%';
    }
    const abs = Math.abs(value).toLocaleString('en-US', { maximumFractionDigits: 0 });
    return (value < 0 ? '-$' : '$') + abs;
}

function animateCounters() {
    document.querySelectorAll('[data-count-to]').forEach(el => {
        const target = parseFloat(el.dataset.countTo);
        const format = el.dataset.format;
        const finalText = el.dataset.final;
        el.removeAttribute('data-count-to');
        if (isNaN(target)) return;

        const duration = 1200;
        const start = performance.now();
        function step(now) {
            const t = Math.min((now - start) / duration, 1);
            const eased = 1 - Math.pow(1 - t, 3);
            el.textContent = formatCounter(target * eased, format);
            if (t < 1) {
                requestAnimationFrame(step);
            } else {
                el.textContent = finalText;
            }
        }
        requestAnimationFrame(step);
    });
}

// ============================================================================
// Countdown
// ============================================================================
function tick() {
    secondsLeft = Math.max(secondsLeft - 1, 0);
    const countdown = document.getElementById('countdown');
    if (countdown) countdown.textContent = `NEXT SYNC IN ${secondsLeft}s`;
}

// ============================================================================
// View tabs
// ============================================================================
document.getElementById('viewTabs').addEventListener('click', event => {
    const tab = event.target.closest('[data-view]');
    if (!tab || tab.dataset.view === currentView) return;
    currentView = tab.dataset.view;
    const url = new URL(window.location);
    url.searchParams.set('view', currentView);
    history.replaceState(null, '', url);
    refresh('tab');
});

// ============================================================================
// Initialization
// ============================================================================
animateCounters();
setInterval(() => refresh('timer'), CONFIG.refreshSeconds * 1000);
setInterval(tick, 1000);
"#;
