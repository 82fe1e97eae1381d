use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use bias_core::BiasError;
use bias_engine::MarketFeeds;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use signal_normalizer::{RawHeadline, RawOptionContract, RawQuote};

/// Frozen market inputs for one offline evaluation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotBundle {
    /// Evaluation time; defaults to now when absent
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    #[serde(default)]
    pub positioning_csv: Option<String>,
    /// CSV file, relative to the bundle file when not absolute
    #[serde(default)]
    pub positioning_csv_path: Option<PathBuf>,
    #[serde(default)]
    pub quotes: Vec<RawQuote>,
    #[serde(default)]
    pub option_chains: HashMap<String, Vec<RawOptionContract>>,
    #[serde(default)]
    pub calendar: Option<Value>,
    #[serde(default)]
    pub headlines: Vec<RawHeadline>,
}

impl SnapshotBundle {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot bundle {}", path.display()))?;
        let mut bundle: SnapshotBundle = serde_json::from_str(&text)
            .with_context(|| format!("Snapshot bundle {} is not valid JSON", path.display()))?;

        if bundle.positioning_csv.is_none() {
            if let Some(csv_path) = &bundle.positioning_csv_path {
                let resolved = match path.parent() {
                    Some(dir) if csv_path.is_relative() => dir.join(csv_path),
                    _ => csv_path.clone(),
                };
                // Unreadable CSV is a missing source, not a fatal error
                match std::fs::read_to_string(&resolved) {
                    Ok(csv) => bundle.positioning_csv = Some(csv),
                    Err(e) => tracing::warn!("Positioning CSV {} unreadable: {}", resolved.display(), e),
                }
            }
        }

        tracing::info!(
            "Loaded bundle: {} quotes, {} option chains, {} headlines, calendar {}",
            bundle.quotes.len(),
            bundle.option_chains.len(),
            bundle.headlines.len(),
            if bundle.calendar.is_some() { "present" } else { "absent" }
        );
        Ok(bundle)
    }
}

/// Serves a [`SnapshotBundle`] through the feed interface
pub struct FileFeeds {
    bundle: SnapshotBundle,
}

impl FileFeeds {
    pub fn new(bundle: SnapshotBundle) -> Self {
        Self { bundle }
    }
}

fn missing(what: &str) -> BiasError {
    BiasError::Feed(format!("{} not in bundle", what))
}

#[async_trait]
impl MarketFeeds for FileFeeds {
    async fn positioning_csv(&self) -> Result<String, BiasError> {
        self.bundle
            .positioning_csv
            .clone()
            .ok_or_else(|| missing("positioning CSV"))
    }

    async fn daily_quote(&self, symbol: &str) -> Result<RawQuote, BiasError> {
        self.bundle
            .quotes
            .iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
            .cloned()
            .ok_or_else(|| missing(&format!("quote {}", symbol)))
    }

    async fn option_chain(&self, underlying: &str) -> Result<Vec<RawOptionContract>, BiasError> {
        self.bundle
            .option_chains
            .get(underlying)
            .cloned()
            .ok_or_else(|| missing(&format!("option chain {}", underlying)))
    }

    async fn economic_calendar(&self, _from: NaiveDate, _to: NaiveDate) -> Result<Value, BiasError> {
        // Window filtering happens in the macro scorer
        self.bundle.calendar.clone().ok_or_else(|| missing("calendar"))
    }

    async fn headlines(
        &self,
        keywords: &[String],
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<RawHeadline>, BiasError> {
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        Ok(self
            .bundle
            .headlines
            .iter()
            .filter(|h| {
                h.title
                    .as_deref()
                    .map(|t| t.to_lowercase())
                    .is_some_and(|t| keywords.iter().any(|k| t.contains(k.as_str())))
            })
            .cloned()
            .collect())
    }
}
