//! Progress reporting for the comparison pipeline
//!
//! The pipeline emits [`ProgressEvent`]s to an injected [`ProgressSink`] instead of
//! printing directly, so the console run, the Discord command and the tests can
//! each decide where the messages go.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    FetchingCurrent,
    FetchingHistory,
    HistoryFetched { asset_id: String, past_price: Option<f64> },
    HistoryFailed { asset_id: String, error: String },
    Table(String),
    SavedCsv(PathBuf),
    SavedChart(PathBuf),
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::FetchingCurrent => write!(f, "🔄 Fetching current prices..."),
            ProgressEvent::FetchingHistory => write!(f, "🔄 Fetching historical data..."),
            ProgressEvent::HistoryFetched { asset_id, past_price } => match past_price {
                Some(price) => write!(f, "✅ {}: {}", asset_id, price),
                None => write!(f, "✅ {}: n/a", asset_id),
            },
            ProgressEvent::HistoryFailed { asset_id, error } => {
                write!(f, "❌ Error {}: {}", asset_id, error)
            }
            ProgressEvent::Table(table) => write!(f, "\n📊 Weekly Comparison:\n\n{}", table),
            ProgressEvent::SavedCsv(path) => write!(f, "\n✅ Saved table to {}", path.display()),
            ProgressEvent::SavedChart(path) => write!(f, "✅ Saved chart to {}", path.display()),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Prints every event to stdout
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn emit(&self, event: ProgressEvent) {
        println!("{}", event);
    }
}

/// Keeps events in memory, in order
#[derive(Default)]
pub struct BufferedSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Ids of assets whose history fetch failed
    pub fn failed_assets(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::HistoryFailed { asset_id, .. } => Some(asset_id),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for BufferedSink {
    fn emit(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
