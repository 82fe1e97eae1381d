use bias_core::{CrossAssetSnapshot, MarketSnapshot, ScoreRange, SignalKind, SignalScore, SignalScorer};

pub const CROSS_ASSET_RANGE: ScoreRange = ScoreRange { min: -2.0, max: 2.0 };

/// Gold read-through from the dollar, long yields and implied volatility.
///
/// Each proxy votes on its own; a proxy without a quote is skipped. With no
/// proxy quoted at all the signal is "no data".
pub fn score_cross_asset(cross: &CrossAssetSnapshot) -> SignalScore {
    if cross.is_empty() {
        return SignalScore::no_data(SignalKind::CrossAsset);
    }

    let mut s = 0.0;
    let mut notes: Vec<&str> = Vec::new();

    if let Some(dxy) = &cross.dollar {
        if dxy.percent_change < 0.0 {
            s += 1.0;
            notes.push("DXY↓ supports gold");
        } else {
            s -= 1.0;
            notes.push("DXY↑ hurts gold");
        }
    }

    if let Some(tnx) = &cross.long_yield {
        if tnx.percent_change > 0.0 {
            s -= 1.0;
            notes.push("US10Y↑ hurts gold");
        } else {
            s += 1.0;
            notes.push("US10Y↓ supports gold");
        }
    }

    if let Some(vix) = &cross.volatility {
        if vix.percent_change < 0.0 {
            s -= 0.5;
            notes.push("VIX↓ risk-on (bearish gold)");
        } else {
            s += 0.5;
            notes.push("VIX↑ risk-off (bullish gold)");
        }
    }

    SignalScore::bounded(s, CROSS_ASSET_RANGE, notes.join("; "))
}

#[derive(Debug, Clone, Default)]
pub struct CrossAssetScorer;

impl SignalScorer for CrossAssetScorer {
    fn kind(&self) -> SignalKind {
        SignalKind::CrossAsset
    }

    fn range(&self) -> ScoreRange {
        CROSS_ASSET_RANGE
    }

    fn score(&self, snapshot: &MarketSnapshot) -> SignalScore {
        score_cross_asset(&snapshot.cross_asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bias_core::PriceQuote;

    fn q(symbol: &str, pct: f64) -> Option<PriceQuote> {
        Some(PriceQuote {
            symbol: symbol.to_string(),
            last_close: 1.0,
            percent_change: pct,
            volume: None,
        })
    }

    #[test]
    fn test_all_supportive() {
        let cross = CrossAssetSnapshot {
            dollar: q("DX-Y.NYB", -0.4),
            long_yield: q("^TNX", -1.0),
            volatility: q("^VIX", 2.0),
        };
        let s = score_cross_asset(&cross);
        // 1 + 1 + 0.5 clamps to 2
        assert_eq!(s.value, 2.0);
        assert_eq!(
            s.rationale,
            "DXY↓ supports gold; US10Y↓ supports gold; VIX↑ risk-off (bullish gold)"
        );
    }

    #[test]
    fn test_all_hostile() {
        let cross = CrossAssetSnapshot {
            dollar: q("DX-Y.NYB", 0.3),
            long_yield: q("^TNX", 0.5),
            volatility: q("^VIX", -5.0),
        };
        assert_eq!(score_cross_asset(&cross).value, -2.0);
    }

    #[test]
    fn test_flat_moves() {
        // Flat dollar counts as up, flat yield counts as down, flat vol counts as up
        let cross = CrossAssetSnapshot {
            dollar: q("DX-Y.NYB", 0.0),
            long_yield: q("^TNX", 0.0),
            volatility: q("^VIX", 0.0),
        };
        assert_eq!(score_cross_asset(&cross).value, 0.5);
    }

    #[test]
    fn test_partial_and_missing() {
        let cross = CrossAssetSnapshot {
            dollar: None,
            long_yield: q("^TNX", 0.5),
            volatility: None,
        };
        assert_eq!(score_cross_asset(&cross).value, -1.0);
        assert!(!score_cross_asset(&CrossAssetSnapshot::default()).available);
    }
}
