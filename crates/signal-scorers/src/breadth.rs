use bias_core::{BreadthSnapshot, MarketSnapshot, ScoreRange, SignalKind, SignalScore, SignalScorer};

pub const BREADTH_RANGE: ScoreRange = ScoreRange { min: -3.0, max: 3.0 };

/// Two independent votes: A/D ratio and share of names advancing.
pub fn score_breadth(breadth: Option<&BreadthSnapshot>) -> SignalScore {
    let Some(b) = breadth else {
        return SignalScore::no_data(SignalKind::Breadth);
    };

    let mut s = 0.0;
    if b.advance_decline_ratio > 1.2 {
        s += 1.0;
    } else if b.advance_decline_ratio < 0.8 {
        s -= 1.0;
    }
    if b.pct_advancing > 0.55 {
        s += 1.0;
    } else if b.pct_advancing < 0.45 {
        s -= 1.0;
    }

    SignalScore::bounded(
        s,
        BREADTH_RANGE,
        format!(
            "Breadth score {} ({} adv / {} dec / {} total)",
            s, b.advancing, b.declining, b.total_sampled
        ),
    )
}

#[derive(Debug, Clone, Default)]
pub struct BreadthScorer;

impl SignalScorer for BreadthScorer {
    fn kind(&self) -> SignalKind {
        SignalKind::Breadth
    }

    fn range(&self) -> ScoreRange {
        BREADTH_RANGE
    }

    fn score(&self, snapshot: &MarketSnapshot) -> SignalScore {
        score_breadth(snapshot.breadth.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(adv: u32, dec: u32, total: u32) -> BreadthSnapshot {
        BreadthSnapshot::from_counts(adv, dec, total).unwrap()
    }

    #[test]
    fn test_both_votes_bullish() {
        let s = score_breadth(Some(&snap(12, 8, 20)));
        assert_eq!(s.value, 2.0);
        assert_eq!(s.rationale, "Breadth score 2 (12 adv / 8 dec / 20 total)");
    }

    #[test]
    fn test_mixed_and_bearish() {
        // ratio 1.0 neutral, 50% neutral
        assert_eq!(score_breadth(Some(&snap(10, 10, 20))).value, 0.0);
        // ratio 0.5 bearish, 25% bearish
        assert_eq!(score_breadth(Some(&snap(5, 10, 20))).value, -2.0);
        // ratio 2.0 bullish, but unquoted names drag the share below 45%
        assert_eq!(score_breadth(Some(&snap(8, 4, 20))).value, 0.0);
    }

    #[test]
    fn test_missing_breadth() {
        assert!(!score_breadth(None).available);
    }
}
