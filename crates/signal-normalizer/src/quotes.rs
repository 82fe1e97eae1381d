use bias_core::{PriceQuote, QuoteBoard};
use serde::{Deserialize, Serialize};

/// Two-session close pair as returned by the quote feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    pub symbol: String,
    #[serde(default)]
    pub previous_close: Option<f64>,
    #[serde(default)]
    pub last_close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Build a quote from the last two closes.
///
/// A zero previous close yields a flat (0%) change rather than no data;
/// missing or non-finite closes invalidate the quote.
pub fn normalize_quote(raw: &RawQuote) -> Option<PriceQuote> {
    let last = raw.last_close.filter(|v| v.is_finite())?;
    let prev = raw.previous_close.filter(|v| v.is_finite())?;

    let percent_change = if prev != 0.0 {
        (last - prev) / prev * 100.0
    } else {
        0.0
    };

    Some(PriceQuote {
        symbol: raw.symbol.clone(),
        last_close: last,
        percent_change,
        volume: raw.volume.filter(|v| v.is_finite()),
    })
}

pub fn build_quote_board(raw: &[RawQuote]) -> QuoteBoard {
    let board: QuoteBoard = raw.iter().filter_map(normalize_quote).collect();
    if board.len() < raw.len() {
        tracing::debug!("Quote board: {} of {} quotes usable", board.len(), raw.len());
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn raw(symbol: &str, prev: Option<f64>, last: Option<f64>) -> RawQuote {
        RawQuote {
            symbol: symbol.to_string(),
            previous_close: prev,
            last_close: last,
            volume: Some(1_000.0),
        }
    }

    #[test]
    fn test_percent_change() {
        let q = normalize_quote(&raw("QQQ", Some(400.0), Some(402.0))).unwrap();
        assert_relative_eq!(q.percent_change, 0.5, epsilon = 1e-9);
        assert_eq!(q.last_close, 402.0);
    }

    #[test]
    fn test_zero_previous_close_is_flat() {
        let q = normalize_quote(&raw("QQQ", Some(0.0), Some(10.0))).unwrap();
        assert_eq!(q.percent_change, 0.0);
    }

    #[test]
    fn test_missing_close_is_dropped() {
        assert!(normalize_quote(&raw("QQQ", None, Some(10.0))).is_none());
        assert!(normalize_quote(&raw("QQQ", Some(10.0), Some(f64::NAN))).is_none());

        let board = build_quote_board(&[
            raw("QQQ", Some(400.0), Some(402.0)),
            raw("NVDA", None, Some(900.0)),
        ]);
        assert_eq!(board.len(), 1);
        assert!(board.get("NVDA").is_none());
    }
}
