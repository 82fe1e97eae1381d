use bias_core::{CrossAssetSnapshot, QuoteBoard};
use serde::{Deserialize, Serialize};

/// Tickers standing in for dollar strength, long yields and implied volatility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossAssetTickers {
    pub dollar: String,
    pub long_yield: String,
    pub volatility: String,
}

impl Default for CrossAssetTickers {
    fn default() -> Self {
        Self {
            dollar: "DX-Y.NYB".to_string(),
            long_yield: "^TNX".to_string(),
            volatility: "^VIX".to_string(),
        }
    }
}

impl CrossAssetTickers {
    pub fn symbols(&self) -> [&str; 3] {
        [self.dollar.as_str(), self.long_yield.as_str(), self.volatility.as_str()]
    }
}

pub fn cross_asset_from_board(board: &QuoteBoard, tickers: &CrossAssetTickers) -> CrossAssetSnapshot {
    CrossAssetSnapshot {
        dollar: board.get(&tickers.dollar).cloned(),
        long_yield: board.get(&tickers.long_yield).cloned(),
        volatility: board.get(&tickers.volatility).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bias_core::PriceQuote;

    #[test]
    fn test_picks_proxies_from_board() {
        let board: QuoteBoard = vec![PriceQuote {
            symbol: "^VIX".to_string(),
            last_close: 14.0,
            percent_change: -3.0,
            volume: None,
        }]
        .into_iter()
        .collect();

        let snap = cross_asset_from_board(&board, &CrossAssetTickers::default());
        assert!(snap.dollar.is_none());
        assert!(snap.long_yield.is_none());
        assert_eq!(snap.volatility.unwrap().percent_change, -3.0);
    }
}
