use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use signal_normalizer::CrossAssetTickers;
use std::env;
use std::time::Duration;

use crate::cache::CacheTtls;

const DEFAULT_BREADTH_BASKET: &[&str] = &[
    "AAPL", "MSFT", "AMZN", "GOOGL", "META", "TSLA", "NVDA", "JPM", "JNJ", "V",
    "XOM", "PG", "HD", "AVGO", "LLY", "BAC", "PFE", "KO", "DIS", "NFLX",
];

/// Upper bounds keep the fetch windows inside a sensible range
const MAX_MACRO_WINDOW_DAYS: i64 = 365;
const MAX_NEWS_LOOKBACK_HOURS: i64 = 24 * 30;

const DEFAULT_MACRO_COUNTRIES: &[&str] = &["United States", "Euro Area", "China"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    // Macro calendar
    pub macro_window_days: i64,
    pub macro_countries: Vec<String>,

    // Nasdaq
    pub breadth_basket: Vec<String>,
    pub nasdaq_benchmark: String,
    pub nasdaq_options_ticker: String,

    // Gold
    pub gold_options_ticker: String,
    pub cross_asset: CrossAssetTickers,

    // News
    pub news_lookback_hours: i64,
    pub nasdaq_news_keywords: Vec<String>,
    pub gold_news_keywords: Vec<String>,

    // Feeds
    pub feed_timeout_secs: u64,
    pub ttls: CacheTtls,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            macro_window_days: signal_scorers::macro_calendar::DEFAULT_WINDOW_DAYS,
            macro_countries: owned(DEFAULT_MACRO_COUNTRIES),
            breadth_basket: owned(DEFAULT_BREADTH_BASKET),
            nasdaq_benchmark: "QQQ".to_string(),
            nasdaq_options_ticker: "QQQ".to_string(),
            gold_options_ticker: "GLD".to_string(),
            cross_asset: CrossAssetTickers::default(),
            news_lookback_hours: signal_scorers::news::DEFAULT_LOOKBACK_HOURS,
            nasdaq_news_keywords: owned(signal_scorers::news::NASDAQ_KEYWORDS),
            gold_news_keywords: owned(signal_scorers::news::GOLD_KEYWORDS),
            feed_timeout_secs: 15,
            ttls: CacheTtls::default(),
        }
    }
}

impl EngineConfig {
    /// Read overrides from the environment; unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let cross_defaults = defaults.cross_asset.clone();

        let config = Self {
            macro_window_days: parsed("MACRO_WINDOW_DAYS", defaults.macro_window_days)?,
            macro_countries: list("MACRO_COUNTRIES", defaults.macro_countries),
            breadth_basket: list("BREADTH_BASKET", defaults.breadth_basket),
            nasdaq_benchmark: env::var("NASDAQ_BENCHMARK").unwrap_or(defaults.nasdaq_benchmark),
            nasdaq_options_ticker: env::var("NASDAQ_OPTIONS_TICKER")
                .unwrap_or(defaults.nasdaq_options_ticker),
            gold_options_ticker: env::var("GOLD_OPTIONS_TICKER").unwrap_or(defaults.gold_options_ticker),
            cross_asset: CrossAssetTickers {
                dollar: env::var("DOLLAR_PROXY").unwrap_or(cross_defaults.dollar),
                long_yield: env::var("YIELD_PROXY").unwrap_or(cross_defaults.long_yield),
                volatility: env::var("VOLATILITY_PROXY").unwrap_or(cross_defaults.volatility),
            },
            news_lookback_hours: parsed("NEWS_LOOKBACK_HOURS", defaults.news_lookback_hours)?,
            nasdaq_news_keywords: list("NASDAQ_NEWS_KEYWORDS", defaults.nasdaq_news_keywords),
            gold_news_keywords: list("GOLD_NEWS_KEYWORDS", defaults.gold_news_keywords),
            feed_timeout_secs: parsed("FEED_TIMEOUT_SECS", defaults.feed_timeout_secs)?,
            ttls: CacheTtls {
                positioning_secs: parsed("TTL_POSITIONING_SECS", defaults.ttls.positioning_secs)?,
                prices_secs: parsed("TTL_PRICES_SECS", defaults.ttls.prices_secs)?,
                options_secs: parsed("TTL_OPTIONS_SECS", defaults.ttls.options_secs)?,
                calendar_secs: parsed("TTL_CALENDAR_SECS", defaults.ttls.calendar_secs)?,
                news_secs: parsed("TTL_NEWS_SECS", defaults.ttls.news_secs)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_MACRO_WINDOW_DAYS).contains(&self.macro_window_days) {
            anyhow::bail!(
                "MACRO_WINDOW_DAYS must be within 0..={}, got {}",
                MAX_MACRO_WINDOW_DAYS,
                self.macro_window_days
            );
        }
        if !(1..=MAX_NEWS_LOOKBACK_HOURS).contains(&self.news_lookback_hours) {
            anyhow::bail!(
                "NEWS_LOOKBACK_HOURS must be within 1..={}, got {}",
                MAX_NEWS_LOOKBACK_HOURS,
                self.news_lookback_hours
            );
        }
        if self.feed_timeout_secs == 0 {
            anyhow::bail!("FEED_TIMEOUT_SECS must be > 0");
        }
        if self.breadth_basket.is_empty() {
            anyhow::bail!("BREADTH_BASKET must name at least one ticker");
        }
        Ok(())
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }

    /// Every ticker the cycle needs a daily quote for, deduplicated in first-seen order
    pub fn quote_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = Vec::new();
        let candidates = std::iter::once(self.nasdaq_benchmark.as_str())
            .chain(self.breadth_basket.iter().map(String::as_str))
            .chain(self.cross_asset.symbols());
        for symbol in candidates {
            if !symbols.iter().any(|s| s == symbol) {
                symbols.push(symbol.to_string());
            }
        }
        symbols
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn parsed<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} is not a valid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

/// Comma-separated list; an unset or blank variable keeps the default
fn list(key: &str, default: Vec<String>) -> Vec<String> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard() {
        let config = EngineConfig::default();
        assert_eq!(config.macro_window_days, 3);
        assert_eq!(config.breadth_basket.len(), 20);
        assert_eq!(config.macro_countries, vec!["United States", "Euro Area", "China"]);
        assert_eq!(config.gold_options_ticker, "GLD");
        assert_eq!(config.ttls.positioning_secs, 1800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quote_symbols_deduplicated() {
        let mut config = EngineConfig::default();
        config.breadth_basket = vec!["QQQ".to_string(), "AAPL".to_string()];
        assert_eq!(
            config.quote_symbols(),
            vec!["QQQ", "AAPL", "DX-Y.NYB", "^TNX", "^VIX"]
        );
    }

    #[test]
    fn test_validate_bounds_windows() {
        let mut config = EngineConfig::default();
        config.macro_window_days = 1_000_000_000;
        assert!(config.validate().is_err());
        config.macro_window_days = 365;
        assert!(config.validate().is_ok());

        config.news_lookback_hours = i64::MAX;
        assert!(config.validate().is_err());
        config.news_lookback_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_basket() {
        let mut config = EngineConfig::default();
        config.breadth_basket.clear();
        assert!(config.validate().is_err());
    }
}
