use async_trait::async_trait;
use bias_core::BiasError;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use signal_normalizer::{RawHeadline, RawOptionContract, RawQuote};

/// Upstream market data sources, one call per payload.
///
/// Implementations return raw payloads; coercion happens in the normalizer.
/// An `Err` means the source is unavailable for this cycle and the affected
/// signals degrade to "no data".
#[async_trait]
pub trait MarketFeeds: Send + Sync {
    /// Legacy futures-only COT report as CSV text
    async fn positioning_csv(&self) -> Result<String, BiasError>;

    /// Last two daily closes for one ticker
    async fn daily_quote(&self, symbol: &str) -> Result<RawQuote, BiasError>;

    /// Contracts of the nearest expiry for one underlying
    async fn option_chain(&self, underlying: &str) -> Result<Vec<RawOptionContract>, BiasError>;

    /// Economic calendar rows between two dates, inclusive
    async fn economic_calendar(&self, from: NaiveDate, to: NaiveDate) -> Result<Value, BiasError>;

    /// Headlines matching any keyword published in `[from, to]`
    async fn headlines(
        &self,
        keywords: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RawHeadline>, BiasError>;
}
