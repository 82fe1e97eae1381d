//! One evaluation cycle: fetch every feed once, normalize, score all profiles.
//!
//! Fetches run sequentially and each is bounded by the configured timeout. A
//! failed or slow source is logged and leaves its records empty; the cycle
//! itself never fails.

use std::future::Future;
use std::sync::Arc;

use bias_core::{BiasError, BiasResult, Instrument, MarketSnapshot};
use chrono::{DateTime, Duration, Utc};
use signal_normalizer::{
    build_quote_board, compute_breadth, cross_asset_from_board, normalize_calendar,
    normalize_headlines, summarize_chain, CotTable, InstrumentMatcher,
};

use crate::cache::{FeedCache, TtlMap};
use crate::config::EngineConfig;
use crate::feeds::MarketFeeds;
use crate::BiasEngine;

pub struct EvaluationCycle {
    feeds: Arc<dyn MarketFeeds>,
    cache: FeedCache,
    config: EngineConfig,
    engine: BiasEngine,
}

impl EvaluationCycle {
    pub fn new(feeds: Arc<dyn MarketFeeds>, config: EngineConfig, engine: BiasEngine) -> Self {
        Self {
            feeds,
            cache: FeedCache::new(config.ttls),
            config,
            engine,
        }
    }

    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }

    pub fn engine(&self) -> &BiasEngine {
        &self.engine
    }

    /// Manual refresh: the next cycle refetches every source
    pub fn refresh(&self) {
        self.cache.invalidate_all();
    }

    /// Assemble a snapshot as of `as_of` and evaluate every profile against it
    pub async fn run(&self, as_of: DateTime<Utc>) -> Vec<BiasResult> {
        tracing::info!("Starting evaluation cycle as of {}", as_of);
        let snapshot = self.assemble_snapshot(as_of).await;
        self.engine.evaluate(&snapshot)
    }

    pub async fn assemble_snapshot(&self, as_of: DateTime<Utc>) -> MarketSnapshot {
        let mut snapshot = MarketSnapshot::empty(as_of);

        // Positioning
        if let Some(csv) = self
            .cached(&self.cache.positioning, "cot".to_string(), "positioning", self.feeds.positioning_csv())
            .await
        {
            match CotTable::from_csv(&csv) {
                Ok(table) => {
                    for instrument in [Instrument::Nasdaq100, Instrument::Gold] {
                        match table.report_for(&InstrumentMatcher::for_instrument(instrument)) {
                            Some(report) => {
                                snapshot.positioning.insert(instrument, report);
                            }
                            None => tracing::warn!("No positioning record for {}", instrument.name()),
                        }
                    }
                }
                Err(e) => tracing::warn!("Positioning report unreadable: {}", e),
            }
        }

        // Daily quotes, one ticker at a time
        let mut raw_quotes = Vec::new();
        for symbol in self.config.quote_symbols() {
            let label = format!("quote {}", symbol);
            if let Some(quote) = self
                .cached(&self.cache.quotes, symbol.clone(), &label, self.feeds.daily_quote(&symbol))
                .await
            {
                raw_quotes.push(quote);
            }
        }
        snapshot.quotes = build_quote_board(&raw_quotes);
        snapshot.breadth = compute_breadth(&snapshot.quotes, &self.config.breadth_basket);
        snapshot.cross_asset = cross_asset_from_board(&snapshot.quotes, &self.config.cross_asset);

        // Option chains
        let mut underlyings = vec![
            self.config.nasdaq_options_ticker.clone(),
            self.config.gold_options_ticker.clone(),
        ];
        underlyings.dedup();
        for underlying in underlyings {
            let label = format!("options {}", underlying);
            if let Some(chain) = self
                .cached(&self.cache.options, underlying.clone(), &label, self.feeds.option_chain(&underlying))
                .await
            {
                if let Some(flow) = summarize_chain(&chain) {
                    snapshot.option_flows.insert(underlying, flow);
                }
            }
        }

        // Economic calendar
        let window = Duration::try_days(self.config.macro_window_days).unwrap_or(Duration::MAX);
        let from = as_of
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
            .date_naive();
        let to = as_of
            .checked_add_signed(window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .date_naive();
        if let Some(payload) = self
            .cached(
                &self.cache.calendar,
                format!("{}:{}", from, to),
                "calendar",
                self.feeds.economic_calendar(from, to),
            )
            .await
        {
            snapshot.macro_events = normalize_calendar(&payload, &self.config.macro_countries);
        }

        // Headlines
        let lookback = Duration::try_hours(self.config.news_lookback_hours).unwrap_or(Duration::MAX);
        let since = as_of.checked_sub_signed(lookback).unwrap_or(DateTime::<Utc>::MIN_UTC);
        for (instrument, keywords) in [
            (Instrument::Nasdaq100, &self.config.nasdaq_news_keywords),
            (Instrument::Gold, &self.config.gold_news_keywords),
        ] {
            let key = format!("{}:{}", keywords.join("|"), since.format("%Y-%m-%dT%H"));
            let label = format!("news {}", instrument.name());
            if let Some(raw) = self
                .cached(&self.cache.news, key, &label, self.feeds.headlines(keywords, since, as_of))
                .await
            {
                snapshot.headlines.insert(instrument, normalize_headlines(&raw));
            }
        }

        tracing::debug!(
            "Snapshot assembled: {} positioning, {} quotes, {} option flows, calendar {}, {} headline sets",
            snapshot.positioning.len(),
            snapshot.quotes.len(),
            snapshot.option_flows.len(),
            if snapshot.macro_events.is_some() { "ok" } else { "missing" },
            snapshot.headlines.len()
        );

        snapshot
    }

    /// Serve `key` from `slot` when fresh, else run `fetch` under the feed timeout.
    /// Failures are logged and become `None`.
    async fn cached<T, F>(&self, slot: &TtlMap<T>, key: String, source: &str, fetch: F) -> Option<T>
    where
        T: Clone,
        F: Future<Output = Result<T, BiasError>>,
    {
        if let Some(hit) = slot.get(&key) {
            tracing::debug!("Cache hit for {}", source);
            return Some(hit);
        }

        let outcome = match tokio::time::timeout(self.config.feed_timeout(), fetch).await {
            Ok(result) => result,
            Err(_) => Err(BiasError::Timeout(format!(
                "{} after {}s",
                source, self.config.feed_timeout_secs
            ))),
        };

        match outcome {
            Ok(data) => {
                slot.insert(key, data.clone());
                Some(data)
            }
            Err(e) => {
                tracing::warn!("{} unavailable, scoring without it: {}", source, e);
                None
            }
        }
    }
}
