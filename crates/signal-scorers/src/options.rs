use bias_core::{MarketSnapshot, OptionFlowSummary, ScoreRange, SignalKind, SignalScore, SignalScorer};

pub const OPTIONS_RANGE: ScoreRange = ScoreRange { min: -1.0, max: 1.0 };

const BULLISH_PCR: f64 = 0.8;
const BEARISH_PCR: f64 = 1.2;

/// Put/call volume skew. An undefined ratio (no call volume) is "no data".
pub fn score_options(flow: Option<&OptionFlowSummary>) -> SignalScore {
    let Some(pcr) = flow.and_then(|f| f.put_call_ratio).filter(|r| r.is_finite()) else {
        return SignalScore::no_data(SignalKind::OptionsSkew);
    };

    if pcr < BULLISH_PCR {
        SignalScore::bounded(1.0, OPTIONS_RANGE, format!("Put/Call {:.2} bullish", pcr))
    } else if pcr > BEARISH_PCR {
        SignalScore::bounded(-1.0, OPTIONS_RANGE, format!("Put/Call {:.2} bearish", pcr))
    } else {
        SignalScore::bounded(0.0, OPTIONS_RANGE, format!("Put/Call {:.2} neutral", pcr))
    }
}

/// Options skew of one underlying's chain (QQQ, GLD)
#[derive(Debug, Clone)]
pub struct OptionsSkewScorer {
    underlying: String,
}

impl OptionsSkewScorer {
    pub fn new(underlying: impl Into<String>) -> Self {
        Self {
            underlying: underlying.into(),
        }
    }
}

impl SignalScorer for OptionsSkewScorer {
    fn kind(&self) -> SignalKind {
        SignalKind::OptionsSkew
    }

    fn range(&self) -> ScoreRange {
        OPTIONS_RANGE
    }

    fn score(&self, snapshot: &MarketSnapshot) -> SignalScore {
        let mut s = score_options(snapshot.option_flow_for(&self.underlying));
        if s.available {
            s.rationale = format!("{} {}", self.underlying, s.rationale);
        }
        s
    }
}
