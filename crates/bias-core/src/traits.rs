use crate::{MarketSnapshot, ScoreRange, SignalKind, SignalScore};

/// A single pluggable signal: reads its record(s) out of the cycle snapshot
/// and returns a score clamped to `range()`.
///
/// Implementations must be total: a missing record yields `SignalScore::no_data`.
pub trait SignalScorer: Send + Sync {
    fn kind(&self) -> SignalKind;

    fn range(&self) -> ScoreRange;

    fn score(&self, snapshot: &MarketSnapshot) -> SignalScore;
}
