use bias_core::{MarketSnapshot, PriceQuote, ScoreRange, SignalKind, SignalScore, SignalScorer};

pub const MOMENTUM_RANGE: ScoreRange = ScoreRange { min: -1.0, max: 1.0 };

/// Daily move (in percent) that counts as directional
const MOVE_THRESHOLD_PCT: f64 = 0.2;

pub fn score_momentum(quote: Option<&PriceQuote>) -> SignalScore {
    let Some(q) = quote else {
        return SignalScore::no_data(SignalKind::PriceMomentum);
    };

    let s = if q.percent_change > MOVE_THRESHOLD_PCT {
        1.0
    } else if q.percent_change < -MOVE_THRESHOLD_PCT {
        -1.0
    } else {
        0.0
    };
    SignalScore::bounded(s, MOMENTUM_RANGE, format!("{} change {:.2}%", q.symbol, q.percent_change))
}

/// Momentum of the instrument's benchmark proxy (e.g. QQQ)
#[derive(Debug, Clone)]
pub struct PriceMomentumScorer {
    benchmark: String,
}

impl PriceMomentumScorer {
    pub fn new(benchmark: impl Into<String>) -> Self {
        Self {
            benchmark: benchmark.into(),
        }
    }
}

impl SignalScorer for PriceMomentumScorer {
    fn kind(&self) -> SignalKind {
        SignalKind::PriceMomentum
    }

    fn range(&self) -> ScoreRange {
        MOMENTUM_RANGE
    }

    fn score(&self, snapshot: &MarketSnapshot) -> SignalScore {
        score_momentum(snapshot.quotes.get(&self.benchmark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(pct: f64) -> PriceQuote {
        PriceQuote {
            symbol: "QQQ".to_string(),
            last_close: 440.0,
            percent_change: pct,
            volume: None,
        }
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(score_momentum(Some(&quote(0.5))).value, 1.0);
        assert_eq!(score_momentum(Some(&quote(-0.21))).value, -1.0);
        assert_eq!(score_momentum(Some(&quote(0.2))).value, 0.0);
        assert_eq!(score_momentum(Some(&quote(-0.2))).value, 0.0);
    }

    #[test]
    fn test_flat_is_a_real_signal() {
        let s = score_momentum(Some(&quote(0.0)));
        assert_eq!(s.value, 0.0);
        assert!(s.available);
        assert_eq!(s.rationale, "QQQ change 0.00%");

        let missing = score_momentum(None);
        assert!(!missing.available);
    }
}
