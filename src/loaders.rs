//! Data loaders
//!
//! Turn the raw files into row structures. A loader never fails: an
//! unreachable resource, a non-success status or unparseable content all
//! come back as `None`/empty and the renderers show their placeholder.

use std::collections::BTreeMap;

use crate::format::parse_number;
use crate::source::{ACCOUNT_HISTORY_CSV, DataSource, LOGS_JSON, WEALTH_CSV, WEALTH_LIVE_CSV};
use crate::types::{DailyWealthRecord, LiveWealth, LogEntry, ViewMode, WealthRecord};

/// One CSV line keyed by header name; missing trailing cells are absent
pub type CsvRecord = BTreeMap<String, String>;

/// Header plus positional rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Header is the first non-blank line; cells are comma-split and trimmed
    pub fn parse(text: &str) -> Self {
        let mut lines = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty());

        let Some(header) = lines.next() else {
            return Self::default();
        };

        Self {
            headers: split_cells(header),
            rows: lines.map(split_cells).collect(),
        }
    }

    /// Map each row onto the header names
    pub fn records(&self) -> Vec<CsvRecord> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row.iter())
                    .map(|(h, v)| (h.clone(), v.clone()))
                    .collect()
            })
            .collect()
    }
}

fn split_cells(line: &str) -> Vec<String> {
    line.split(',').map(|c| c.trim().to_string()).collect()
}

/// Parse CSV text into header-keyed records
pub fn parse_csv(text: &str) -> Vec<CsvRecord> {
    CsvTable::parse(text).records()
}

/// `date, wealth, <ticker>...` rows in file order
pub fn parse_wealth_records(text: &str) -> Vec<WealthRecord> {
    let table = CsvTable::parse(text);
    let tickers: Vec<&String> = table
        .headers
        .iter()
        .filter(|h| h.as_str() != "date" && h.as_str() != "wealth")
        .collect();

    table
        .records()
        .into_iter()
        .map(|mut record| WealthRecord {
            date: record.remove("date"),
            wealth: record.remove("wealth"),
            weights: tickers
                .iter()
                .map(|t| ((*t).clone(), record.get(t.as_str()).cloned()))
                .collect(),
        })
        .collect()
}

/// `date, wealth` rows in file order
pub fn parse_daily_records(text: &str) -> Vec<DailyWealthRecord> {
    parse_csv(text)
        .into_iter()
        .map(|mut record| DailyWealthRecord {
            date: record.remove("date"),
            wealth: record.remove("wealth"),
        })
        .collect()
}

/// Last data row of `timestamp, wealth`, read positionally
pub fn parse_live_wealth(text: &str) -> Option<LiveWealth> {
    let table = CsvTable::parse(text);
    let last = table.rows.last()?;
    let wealth = parse_number(last.get(1).map(String::as_str))?;
    Some(LiveWealth {
        wealth,
        timestamp: last.first().cloned().unwrap_or_default(),
    })
}

/// JSON array of log entries; anything else is treated as no logs
///
/// Entries are converted one by one, so a malformed entry never hides the
/// rest. Elements that are not objects are skipped.
pub fn parse_logs(text: &str) -> Option<Vec<LogEntry>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(text).ok()?;
    Some(
        values
            .into_iter()
            .filter(serde_json::Value::is_object)
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect(),
    )
}

/// `None` when the history file is unavailable
pub async fn load_account_history<S: DataSource>(source: &S) -> Option<Vec<WealthRecord>> {
    let text = source.fetch_text(ACCOUNT_HISTORY_CSV).await.ok()?;
    Some(parse_wealth_records(&text))
}

pub async fn load_daily_wealth<S: DataSource>(source: &S) -> Vec<DailyWealthRecord> {
    fetch_daily_wealth(source).await.unwrap_or_default()
}

pub async fn load_live_wealth<S: DataSource>(source: &S) -> Option<LiveWealth> {
    let text = source.fetch_text(WEALTH_LIVE_CSV).await.ok()?;
    parse_live_wealth(&text)
}

pub async fn load_logs<S: DataSource>(source: &S) -> Vec<LogEntry> {
    fetch_logs(source).await.unwrap_or_default()
}

async fn fetch_daily_wealth<S: DataSource>(source: &S) -> Option<Vec<DailyWealthRecord>> {
    let text = source.fetch_text(WEALTH_CSV).await.ok()?;
    Some(parse_daily_records(&text))
}

async fn fetch_logs<S: DataSource>(source: &S) -> Option<Vec<LogEntry>> {
    let text = source.fetch_text(LOGS_JSON).await.ok()?;
    parse_logs(&text)
}

/// Everything one refresh cycle needs
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub history: Option<Vec<WealthRecord>>,
    pub daily: Vec<DailyWealthRecord>,
    pub live: Option<LiveWealth>,
    pub logs: Vec<LogEntry>,
    /// Resources that could not be used this cycle
    pub unavailable: Vec<&'static str>,
}

/// Fetch every resource the view needs at once; latency is the slowest fetch
pub async fn load_snapshot<S: DataSource>(source: &S, view_mode: ViewMode) -> Snapshot {
    let daily = async {
        match view_mode {
            ViewMode::Daily => Some(fetch_daily_wealth(source).await),
            ViewMode::Biweekly => None,
        }
    };

    let (history, logs, live, daily) = futures::join!(
        load_account_history(source),
        fetch_logs(source),
        load_live_wealth(source),
        daily,
    );

    let mut unavailable = Vec::new();
    if history.is_none() {
        unavailable.push(ACCOUNT_HISTORY_CSV);
    }
    if logs.is_none() {
        unavailable.push(LOGS_JSON);
    }
    if live.is_none() {
        unavailable.push(WEALTH_LIVE_CSV);
    }
    if matches!(daily, Some(None)) {
        unavailable.push(WEALTH_CSV);
    }

    Snapshot {
        history,
        daily: daily.flatten().unwrap_or_default(),
        live,
        logs: logs.unwrap_or_default(),
        unavailable,
    }
}
