use bias_core::format::format_compact;
use bias_core::{Instrument, MarketSnapshot, PositioningReport, ScoreRange, SignalKind, SignalScore, SignalScorer};
use serde::{Deserialize, Serialize};

pub const POSITIONING_RANGE: ScoreRange = ScoreRange { min: -2.0, max: 2.0 };

/// Gold open interest runs at a larger scale than equity-index futures, so a
/// net speculative long above this is treated as a crowded-long conviction.
const GOLD_STRONG_NET_LONG: i64 = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositioningRule {
    /// Sign of net speculative, adjusted by whether shorts grew faster than longs
    Generic,
    /// Tiered net speculative, adjusted by the sign of the long delta
    Gold,
}

/// Generic COT rule (Nasdaq).
pub fn score_positioning(report: Option<&PositioningReport>) -> SignalScore {
    let Some(cot) = report else {
        return SignalScore::no_data(SignalKind::Positioning);
    };

    let mut s = if cot.net_speculative() > 0 { 1.0 } else { -1.0 };
    if cot.deltas.short > cot.deltas.long {
        s -= 0.5;
    } else {
        s += 0.5;
    }

    SignalScore::bounded(
        s,
        POSITIONING_RANGE,
        format!(
            "NetSpec {}, ΔLong {}, ΔShort {}",
            format_compact(cot.net_speculative() as f64),
            format_compact(cot.deltas.long as f64),
            format_compact(cot.deltas.short as f64),
        ),
    )
}

/// Gold COT rule.
pub fn score_gold_positioning(report: Option<&PositioningReport>) -> SignalScore {
    let Some(cot) = report else {
        return SignalScore::no_data(SignalKind::Positioning);
    };

    let net = cot.net_speculative();
    let mut s = if net > GOLD_STRONG_NET_LONG {
        1.5
    } else if net > 0 {
        1.0
    } else {
        -1.0
    };
    s += if cot.deltas.long > 0 { 0.5 } else { -0.5 };

    SignalScore::bounded(
        s,
        POSITIONING_RANGE,
        format!(
            "Gold NetSpec {}, ΔLong {}",
            format_compact(net as f64),
            format_compact(cot.deltas.long as f64),
        ),
    )
}

/// Positioning signal bound to one instrument's report
#[derive(Debug, Clone)]
pub struct PositioningScorer {
    instrument: Instrument,
    rule: PositioningRule,
}

impl PositioningScorer {
    pub fn new(instrument: Instrument, rule: PositioningRule) -> Self {
        Self { instrument, rule }
    }
}

impl SignalScorer for PositioningScorer {
    fn kind(&self) -> SignalKind {
        SignalKind::Positioning
    }

    fn range(&self) -> ScoreRange {
        POSITIONING_RANGE
    }

    fn score(&self, snapshot: &MarketSnapshot) -> SignalScore {
        let report = snapshot.positioning_for(self.instrument);
        match self.rule {
            PositioningRule::Generic => score_positioning(report),
            PositioningRule::Gold => score_gold_positioning(report),
        }
    }
}
