use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::BiasLabel;

/// Instruments the engine produces a bias for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Instrument {
    Nasdaq100,
    Gold,
}

impl Instrument {
    pub fn name(&self) -> &'static str {
        match self {
            Instrument::Nasdaq100 => "Nasdaq 100",
            Instrument::Gold => "Gold (XAUUSD)",
        }
    }
}

/// Week-over-week change of the speculative book. Zero when no prior week exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositioningDeltas {
    pub long: i64,
    pub short: i64,
    pub open_interest: i64,
}

/// Weekly futures positioning (COT) for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositioningReport {
    pub report_date: NaiveDate,
    pub noncommercial_long: i64,
    pub noncommercial_short: i64,
    pub commercial_long: i64,
    pub commercial_short: i64,
    pub open_interest: i64,
    pub deltas: PositioningDeltas,
}

impl PositioningReport {
    /// Noncommercial long minus noncommercial short
    pub fn net_speculative(&self) -> i64 {
        self.noncommercial_long.saturating_sub(self.noncommercial_short)
    }

    pub fn net_commercial(&self) -> i64 {
        self.commercial_long.saturating_sub(self.commercial_short)
    }
}

/// Last session quote for a ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: String,
    pub last_close: f64,
    /// Percent change vs. the prior session close (1.5 = +1.5%)
    pub percent_change: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

/// All quotes fetched in one cycle, keyed by symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteBoard {
    quotes: BTreeMap<String, PriceQuote>,
}

impl QuoteBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, quote: PriceQuote) {
        self.quotes.insert(quote.symbol.clone(), quote);
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceQuote> {
        self.quotes.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceQuote> {
        self.quotes.values()
    }
}

impl FromIterator<PriceQuote> for QuoteBoard {
    fn from_iter<I: IntoIterator<Item = PriceQuote>>(iter: I) -> Self {
        let mut board = QuoteBoard::new();
        for quote in iter {
            board.insert(quote);
        }
        board
    }
}

/// Nearest-expiry option chain totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionFlowSummary {
    pub call_volume: i64,
    pub put_volume: i64,
    pub call_open_interest: i64,
    pub put_open_interest: i64,
    /// put_volume / call_volume; None when call volume is zero
    pub put_call_ratio: Option<f64>,
}

impl OptionFlowSummary {
    pub fn from_totals(call_volume: i64, put_volume: i64, call_open_interest: i64, put_open_interest: i64) -> Self {
        let put_call_ratio = if call_volume > 0 {
            Some(put_volume as f64 / call_volume as f64)
        } else {
            None
        };
        Self {
            call_volume,
            put_volume,
            call_open_interest,
            put_open_interest,
            put_call_ratio,
        }
    }
}

/// Advance/decline counts over the breadth basket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthSnapshot {
    pub advancing: u32,
    pub declining: u32,
    pub total_sampled: u32,
    pub advance_decline_ratio: f64,
    /// Fraction of the basket that advanced (0.0 to 1.0)
    pub pct_advancing: f64,
}

impl BreadthSnapshot {
    pub fn from_counts(advancing: u32, declining: u32, total_sampled: u32) -> Option<Self> {
        if total_sampled == 0 {
            return None;
        }
        Some(Self {
            advancing,
            declining,
            total_sampled,
            advance_decline_ratio: advancing as f64 / declining.max(1) as f64,
            pct_advancing: advancing as f64 / total_sampled as f64,
        })
    }
}

/// Severity of a scheduled economic release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub fn weight(&self) -> f64 {
        match self {
            ImpactLevel::Low => 0.0,
            ImpactLevel::Medium => 1.0,
            ImpactLevel::High => 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroEvent {
    pub timestamp: DateTime<Utc>,
    pub country: String,
    #[serde(default)]
    pub name: Option<String>,
    pub impact: ImpactLevel,
    /// Actual minus consensus; None while the release is pending
    #[serde(default)]
    pub surprise: Option<f64>,
}

/// Same-day moves of the reference series used for gold
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossAssetSnapshot {
    pub dollar: Option<PriceQuote>,
    pub long_yield: Option<PriceQuote>,
    pub volatility: Option<PriceQuote>,
}

impl CrossAssetSnapshot {
    pub fn is_empty(&self) -> bool {
        self.dollar.is_none() && self.long_yield.is_none() && self.volatility.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub published_at: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// Every normalized record of one evaluation cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub as_of: DateTime<Utc>,
    pub positioning: BTreeMap<Instrument, PositioningReport>,
    pub quotes: QuoteBoard,
    /// Option flow keyed by underlying ticker
    pub option_flows: BTreeMap<String, OptionFlowSummary>,
    pub breadth: Option<BreadthSnapshot>,
    pub cross_asset: CrossAssetSnapshot,
    /// None when the calendar feed was unavailable
    pub macro_events: Option<Vec<MacroEvent>>,
    /// Headlines keyed by instrument; a missing key means the feed was unavailable
    pub headlines: BTreeMap<Instrument, Vec<Headline>>,
}

impl MarketSnapshot {
    pub fn empty(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            positioning: BTreeMap::new(),
            quotes: QuoteBoard::new(),
            option_flows: BTreeMap::new(),
            breadth: None,
            cross_asset: CrossAssetSnapshot::default(),
            macro_events: None,
            headlines: BTreeMap::new(),
        }
    }

    pub fn positioning_for(&self, instrument: Instrument) -> Option<&PositioningReport> {
        self.positioning.get(&instrument)
    }

    pub fn option_flow_for(&self, ticker: &str) -> Option<&OptionFlowSummary> {
        self.option_flows.get(ticker)
    }

    pub fn headlines_for(&self, instrument: Instrument) -> Option<&[Headline]> {
        self.headlines.get(&instrument).map(|h| h.as_slice())
    }
}

/// Closed interval a scorer's output is clamped to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub fn symmetric(bound: f64) -> Self {
        Self { min: -bound, max: bound }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        value.clamp(self.min, self.max)
    }

    /// Largest absolute value the range admits
    pub fn magnitude(&self) -> f64 {
        self.min.abs().max(self.max.abs())
    }
}

/// Signals the engine knows how to score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Positioning,
    PriceMomentum,
    OptionsSkew,
    Breadth,
    MacroCalendar,
    CrossAsset,
    NewsKeywords,
    Inflation,
}

impl SignalKind {
    pub fn name(&self) -> &'static str {
        match self {
            SignalKind::Positioning => "positioning",
            SignalKind::PriceMomentum => "price momentum",
            SignalKind::OptionsSkew => "options skew",
            SignalKind::Breadth => "breadth",
            SignalKind::MacroCalendar => "macro calendar",
            SignalKind::CrossAsset => "cross-asset",
            SignalKind::NewsKeywords => "news",
            SignalKind::Inflation => "inflation",
        }
    }
}

/// Uniform output of every scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalScore {
    pub value: f64,
    pub rationale: String,
    /// False when the upstream record was missing and the score is the neutral fill
    pub available: bool,
}

impl SignalScore {
    pub fn bounded(value: f64, range: ScoreRange, rationale: impl Into<String>) -> Self {
        Self {
            value: range.clamp(value),
            rationale: rationale.into(),
            available: true,
        }
    }

    pub fn no_data(kind: SignalKind) -> Self {
        Self {
            value: 0.0,
            rationale: format!("no data for {}", kind.name()),
            available: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBreakdown {
    pub kind: SignalKind,
    pub weight: f64,
    pub score: SignalScore,
}

impl SignalBreakdown {
    pub fn contribution(&self) -> f64 {
        self.weight * self.score.value
    }
}

/// Final per-instrument result of one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasResult {
    pub instrument: Instrument,
    pub profile: String,
    pub composite_score: f64,
    pub label: BiasLabel,
    pub breakdown: Vec<SignalBreakdown>,
    pub evaluated_at: DateTime<Utc>,
}

impl BiasResult {
    /// Number of slots that had real data behind them
    pub fn available_signals(&self) -> usize {
        self.breakdown.iter().filter(|b| b.score.available).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_put_call_ratio_undefined_without_calls() {
        let flow = OptionFlowSummary::from_totals(0, 500, 10, 20);
        assert!(flow.put_call_ratio.is_none());

        let flow = OptionFlowSummary::from_totals(1000, 790, 10, 20);
        assert_relative_eq!(flow.put_call_ratio.unwrap(), 0.79, epsilon = 1e-12);
    }

    #[test]
    fn test_breadth_from_counts() {
        let b = BreadthSnapshot::from_counts(12, 8, 20).unwrap();
        assert_relative_eq!(b.advance_decline_ratio, 1.5);
        assert_relative_eq!(b.pct_advancing, 0.6);

        // No decliners: ratio uses a floor of one
        let b = BreadthSnapshot::from_counts(5, 0, 5).unwrap();
        assert_relative_eq!(b.advance_decline_ratio, 5.0);

        assert!(BreadthSnapshot::from_counts(0, 0, 0).is_none());
    }

    #[test]
    fn test_score_range_clamp() {
        let range = ScoreRange::symmetric(2.0);
        assert_eq!(range.clamp(2.5), 2.0);
        assert_eq!(range.clamp(-7.0), -2.0);
        assert_eq!(range.clamp(f64::NAN), 0.0);
        assert_eq!(range.magnitude(), 2.0);
    }

    #[test]
    fn test_no_data_score() {
        let s = SignalScore::no_data(SignalKind::Positioning);
        assert_eq!(s.value, 0.0);
        assert_eq!(s.rationale, "no data for positioning");
        assert!(!s.available);
    }

    #[test]
    fn test_net_positions() {
        let report = PositioningReport {
            report_date: NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
            noncommercial_long: 30_000,
            noncommercial_short: 25_000,
            commercial_long: 10_000,
            commercial_short: 14_000,
            open_interest: 250_000,
            deltas: PositioningDeltas::default(),
        };
        assert_eq!(report.net_speculative(), 5_000);
        assert_eq!(report.net_commercial(), -4_000);
    }
}
