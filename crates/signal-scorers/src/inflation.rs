use bias_core::{MarketSnapshot, ScoreRange, SignalKind, SignalScore, SignalScorer};

pub const INFLATION_RANGE: ScoreRange = ScoreRange { min: -2.0, max: 2.0 };

// TODO: score CPI/breakeven surprises once the calendar feed exposes them per series.
/// Holds the gold profile's inflation weight. No inflation feed is wired yet,
/// so the slot always contributes zero and is reported as unavailable.
#[derive(Debug, Clone, Default)]
pub struct ReservedInflationScorer;

impl SignalScorer for ReservedInflationScorer {
    fn kind(&self) -> SignalKind {
        SignalKind::Inflation
    }

    fn range(&self) -> ScoreRange {
        INFLATION_RANGE
    }

    fn score(&self, _snapshot: &MarketSnapshot) -> SignalScore {
        SignalScore {
            value: 0.0,
            rationale: "inflation signal not implemented".to_string(),
            available: false,
        }
    }
}
